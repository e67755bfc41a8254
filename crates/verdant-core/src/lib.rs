//! Core library for the Verdant plant-care manager.
//!
//! The engine answers four questions about a garden snapshot:
//!
//! - which care actions each plant is overdue for ([`care`]);
//! - which todos and goals fall on which calendar day ([`calendar`]);
//! - which plants match a set of quick filters and search text, and what a
//!   bulk care action writes for them ([`bulk`]);
//! - whether moving a calendar item to another day needs a write
//!   ([`schedule`]).
//!
//! Those modules are pure: they take fetched records and an explicit `now`
//! and never touch the store. [`Database`] is the SQLite data layer, and
//! [`Garden`] is the async facade that feeds one into the other.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use verdant_core::{
//!     params::{CreateCarePlan, CreatePlant, ListOverdue},
//!     GardenBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let garden = GardenBuilder::new()
//!     .with_database_path("garden.db")
//!     .build()
//!     .await?;
//!
//! let plan = garden
//!     .create_care_plan(&CreateCarePlan {
//!         name: "Tropicals".to_string(),
//!         watering: Some(7),
//!         ..Default::default()
//!     })
//!     .await?;
//! garden
//!     .create_plant(&CreatePlant {
//!         name: "Monstera deliciosa".to_string(),
//!         care_plan_id: Some(plan.id),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let now = jiff::Zoned::now();
//! for status in garden.overdue(&ListOverdue::default(), &now).await? {
//!     println!("{} needs {:?}", status.plant.name, status.overdue);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bulk;
pub mod calendar;
pub mod care;
pub mod dates;
pub mod db;
pub mod display;
pub mod error;
pub mod garden;
pub mod models;
pub mod params;
pub mod schedule;

// Re-export commonly used types
pub use bulk::{PlantQuery, QuickFilter, Selection};
pub use calendar::{CalendarBuckets, CalendarCell, MonthView, WeekStart};
pub use care::{CarePlanIndex, CareStatus, OverdueActions};
pub use dates::CalendarMonth;
pub use db::Database;
pub use error::{GardenError, Result};
pub use garden::{Garden, GardenBuilder};
pub use models::{
    ActionKind, CarePlan, Goal, ItemKind, Phase, Plant, PlantCareUpdate, ScheduledItem, Todo,
};
pub use schedule::{DragSnapshot, UpdateIntent};
