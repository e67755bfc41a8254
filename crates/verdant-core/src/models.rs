//! Data models for plants, care plans, todos and goals.
//!
//! The records in this module are plain values as fetched from the data
//! layer. The engine never mutates them; derived views (overdue sets, calendar
//! buckets, filtered lists) are recomputed from the latest snapshot and writes
//! travel as explicit payloads such as [`PlantCareUpdate`].
//!
//! Dates on [`Plant`] and [`Todo`] are kept as the raw strings exchanged with
//! the backing store. They are normalized to calendar days only at evaluation
//! time, in the time zone of the caller's `now`, see [`crate::dates`].
//!
//! # Examples
//!
//! ```rust
//! use verdant_core::models::{ActionKind, CarePlan};
//!
//! let plan = CarePlan {
//!     id: 1,
//!     name: "Tropicals".to_string(),
//!     watering: Some(7),
//!     fertilizing: None,
//!     cleaning: Some(30),
//!     potting: Some(0),
//! };
//!
//! assert_eq!(plan.frequency(ActionKind::Water), Some(7));
//! assert_eq!(plan.frequency(ActionKind::Fertilize), None);
//! // A zero frequency is treated as "not tracked".
//! assert_eq!(plan.frequency(ActionKind::Repot), None);
//! ```

use std::{fmt, str::FromStr};

use jiff::{civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::dates::{self, CalendarMonth};

/// A recurring care action tracked by a care plan.
///
/// Variants are declared in evaluation order; sets of actions iterate as
/// water, fertilize, cleanse, repot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Water,
    Fertilize,
    Cleanse,
    Repot,
}

impl ActionKind {
    /// All action kinds in evaluation order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Water,
        ActionKind::Fertilize,
        ActionKind::Cleanse,
        ActionKind::Repot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Water => "water",
            ActionKind::Fertilize => "fertilize",
            ActionKind::Cleanse => "cleanse",
            ActionKind::Repot => "repot",
        }
    }

    /// Name of the care-plan activity, as shown next to overdue plants.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Water => "Watering",
            ActionKind::Fertilize => "Fertilizing",
            ActionKind::Cleanse => "Cleaning",
            ActionKind::Repot => "Potting",
        }
    }

    /// Name of the plant field recording when the action was last performed.
    pub fn stamp_field(&self) -> &'static str {
        match self {
            ActionKind::Water => "watered_on",
            ActionKind::Fertilize => "fertilized_on",
            ActionKind::Cleanse => "cleansed_on",
            ActionKind::Repot => "potted_on",
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "water" | "watering" => Ok(ActionKind::Water),
            "fertilize" | "fertilizing" => Ok(ActionKind::Fertilize),
            "cleanse" | "cleaning" => Ok(ActionKind::Cleanse),
            "repot" | "potting" => Ok(ActionKind::Repot),
            _ => Err(format!("Invalid care action: {s}")),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Growth phase of a plant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Cutting,
    Seed,
    Juvy,
    #[default]
    Adult,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Cutting => "cutting",
            Phase::Seed => "seed",
            Phase::Juvy => "juvy",
            Phase::Adult => "adult",
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cutting" => Ok(Phase::Cutting),
            "seed" => Ok(Phase::Seed),
            "juvy" | "juvenile" => Ok(Phase::Juvy),
            "adult" => Ok(Phase::Adult),
            _ => Err(format!("Invalid plant phase: {s}")),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-action frequency thresholds, in days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarePlan {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub watering: Option<u32>,
    #[serde(default)]
    pub fertilizing: Option<u32>,
    #[serde(default)]
    pub cleaning: Option<u32>,
    #[serde(default)]
    pub potting: Option<u32>,
}

impl CarePlan {
    /// Frequency in days for an action, or `None` when the plan does not
    /// track it. Zero counts as untracked.
    pub fn frequency(&self, kind: ActionKind) -> Option<u32> {
        let frequency = match kind {
            ActionKind::Water => self.watering,
            ActionKind::Fertilize => self.fertilizing,
            ActionKind::Cleanse => self.cleaning,
            ActionKind::Repot => self.potting,
        };
        frequency.filter(|days| *days > 0)
    }

    /// Actions this plan tracks, in evaluation order.
    pub fn tracked(&self) -> impl Iterator<Item = (ActionKind, u32)> + '_ {
        ActionKind::ALL
            .into_iter()
            .filter_map(|kind| self.frequency(kind).map(|days| (kind, days)))
    }
}

/// A plant and the last time each care action was performed on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plant {
    pub id: u64,

    /// Display name (usually the species name)
    pub name: String,

    #[serde(default)]
    pub phase: Phase,

    /// Name of the system the plant lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default)]
    pub care_plan_id: Option<u64>,

    #[serde(default)]
    pub watered_on: Option<String>,
    #[serde(default)]
    pub fertilized_on: Option<String>,
    #[serde(default)]
    pub cleansed_on: Option<String>,
    #[serde(default)]
    pub potted_on: Option<String>,
}

impl Plant {
    /// Raw stamp of when `kind` was last performed.
    pub fn last_performed(&self, kind: ActionKind) -> Option<&str> {
        match kind {
            ActionKind::Water => self.watered_on.as_deref(),
            ActionKind::Fertilize => self.fertilized_on.as_deref(),
            ActionKind::Cleanse => self.cleansed_on.as_deref(),
            ActionKind::Repot => self.potted_on.as_deref(),
        }
    }

    /// Last-performed stamp normalized to a local day.
    pub fn last_performed_day(&self, kind: ActionKind, tz: &TimeZone) -> Option<Date> {
        dates::parse_optional_day(self.last_performed(kind), tz)
    }
}

/// A todo with an optional due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
}

/// A monthly goal. Goals are due on the last day of their month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: u64,
    pub name: String,
    /// Target month as `YYYY-MM`
    pub due_month: String,
}

/// Kind of entity placed on the calendar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Todo,
    Goal,
}

/// A todo or goal reduced to what the calendar needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledItem {
    pub id: u64,
    pub kind: ItemKind,
    pub name: String,
    pub due: Date,
}

impl ScheduledItem {
    /// Places a todo on its local due day. Todos without a readable due date
    /// have no place on the calendar.
    pub fn from_todo(todo: &Todo, tz: &TimeZone) -> Option<Self> {
        let due = dates::parse_optional_day(todo.due_on.as_deref(), tz)?;
        Some(Self {
            id: todo.id,
            kind: ItemKind::Todo,
            name: todo.name.clone(),
            due,
        })
    }

    /// Places a goal on the last day of its month.
    pub fn from_goal(goal: &Goal) -> Option<Self> {
        let month = goal.due_month.parse::<CalendarMonth>().ok()?;
        Some(Self {
            id: goal.id,
            kind: ItemKind::Goal,
            name: goal.name.clone(),
            due: month.last_day(),
        })
    }

    /// Todos can be dragged to another day; goals stay where they are.
    pub fn is_mutable(&self) -> bool {
        self.kind == ItemKind::Todo
    }
}

/// Partial plant update stamping last-performed days.
///
/// Only the fields that are set are serialized, so the payload can be sent
/// as-is as a PATCH body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantCareUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watered_on: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertilized_on: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleansed_on: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potted_on: Option<Date>,
}

impl PlantCareUpdate {
    /// Records `day` as the last time `kind` was performed.
    pub fn stamp(&mut self, kind: ActionKind, day: Date) {
        let slot = match kind {
            ActionKind::Water => &mut self.watered_on,
            ActionKind::Fertilize => &mut self.fertilized_on,
            ActionKind::Cleanse => &mut self.cleansed_on,
            ActionKind::Repot => &mut self.potted_on,
        };
        *slot = Some(day);
    }

    pub fn get(&self, kind: ActionKind) -> Option<Date> {
        match kind {
            ActionKind::Water => self.watered_on,
            ActionKind::Fertilize => self.fertilized_on,
            ActionKind::Cleanse => self.cleansed_on,
            ActionKind::Repot => self.potted_on,
        }
    }

    pub fn is_empty(&self) -> bool {
        ActionKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }

    /// Stamped actions in evaluation order.
    pub fn actions(&self) -> impl Iterator<Item = (ActionKind, Date)> + '_ {
        ActionKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|day| (kind, day)))
    }
}

impl fmt::Display for CarePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        let mut tracked = self.tracked().peekable();
        if tracked.peek().is_none() {
            writeln!(f, "- No care actions tracked")?;
        }
        for (kind, days) in tracked {
            writeln!(f, "- **{}**: every {days} days", kind.label())?;
        }
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Phase**: {}", self.phase)?;
        if let Some(system) = &self.system {
            writeln!(f, "- **System**: {system}")?;
        }
        match self.care_plan_id {
            Some(id) => writeln!(f, "- **Care plan**: {id}")?,
            None => writeln!(f, "- **Care plan**: none")?,
        }
        for kind in ActionKind::ALL {
            let stamp = self.last_performed(kind).unwrap_or("never");
            writeln!(f, "- **{}**: {stamp}", kind.stamp_field())?;
        }
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self.due_on.as_deref().unwrap_or("unscheduled");
        writeln!(f, "- **{}** (ID: {}), due {due}", self.name, self.id)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** (ID: {}), due {}",
            self.name, self.id, self.due_month
        )
    }
}

impl fmt::Display for ScheduledItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            ItemKind::Todo => "○",
            ItemKind::Goal => "◆",
        };
        write!(f, "{marker} {} (#{})", self.name, self.id)
    }
}
