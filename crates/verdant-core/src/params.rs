//! Parameter structures for garden operations.
//!
//! These are interface-neutral: the CLI converts its clap argument structs
//! into them with `From` impls, and the [`crate::Garden`] facade and
//! [`crate::Database`] take them by reference.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    bulk::{PlantQuery, QuickFilter},
    models::Phase,
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a care plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCarePlan {
    pub name: String,
    /// Days between waterings
    pub watering: Option<u32>,
    /// Days between fertilizings
    pub fertilizing: Option<u32>,
    /// Days between cleanings
    pub cleaning: Option<u32>,
    /// Days between repottings
    pub potting: Option<u32>,
}

/// Parameters for creating a plant.
///
/// Last-performed stamps are stored as given; unreadable stamps are treated
/// as "never performed" when care status is evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlant {
    pub name: String,
    #[serde(default)]
    pub phase: Phase,
    pub system: Option<String>,
    pub care_plan_id: Option<u64>,
    pub watered_on: Option<String>,
    pub fertilized_on: Option<String>,
    pub cleansed_on: Option<String>,
    pub potted_on: Option<String>,
}

/// Parameters for creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    pub name: String,
    pub description: Option<String>,
    /// ISO-8601 date or date-time
    pub due_on: Option<String>,
}

/// Parameters for creating a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGoal {
    pub name: String,
    /// Target month as `YYYY-MM`
    pub due_month: String,
}

/// Parameters for moving a todo to another day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTodo {
    pub id: u64,
    pub due_on: Date,
}

/// Parameters for listing plants that need care.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOverdue {
    /// Case-insensitive text matched against plant and system names
    pub search: Option<String>,
    /// Quick filters, all of which must be overdue
    #[serde(default)]
    pub filters: Vec<QuickFilter>,
}

impl From<&ListOverdue> for PlantQuery {
    fn from(params: &ListOverdue) -> Self {
        PlantQuery::new(params.search.clone(), params.filters.iter().copied())
    }
}

/// Parameters for a bulk care action.
///
/// Every plant matching the query is selected unless `ids` narrows the
/// selection further.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCare {
    pub search: Option<String>,
    #[serde(default)]
    pub filters: Vec<QuickFilter>,
    #[serde(default)]
    pub ids: Vec<u64>,
}

impl From<&BulkCare> for PlantQuery {
    fn from(params: &BulkCare) -> Self {
        PlantQuery::new(params.search.clone(), params.filters.iter().copied())
    }
}
