//! Care status evaluation.
//!
//! Decides which care actions a plant is overdue for. An action is overdue when
//! its care plan tracks it and either it was never performed or more than
//! `frequency` whole days have passed since it was. Exactly `frequency` days
//! is still on schedule.
//!
//! Everything here is a pure function of its arguments; `now` is always
//! supplied by the caller and its time zone defines the local calendar.
//!
//! ```rust
//! use jiff::{civil::date, tz::TimeZone};
//! use verdant_core::{care, ActionKind, CarePlan, Phase, Plant};
//!
//! let plan = CarePlan {
//!     id: 1,
//!     name: "Succulents".to_string(),
//!     watering: Some(5),
//!     fertilizing: None,
//!     cleaning: Some(10),
//!     potting: None,
//! };
//! let plant = Plant {
//!     id: 7,
//!     name: "Echeveria".to_string(),
//!     phase: Phase::Adult,
//!     system: None,
//!     care_plan_id: Some(1),
//!     watered_on: Some("2024-01-01".to_string()),
//!     fertilized_on: None,
//!     cleansed_on: Some("2024-01-05".to_string()),
//!     potted_on: None,
//! };
//! let now = date(2024, 1, 10).at(9, 0, 0, 0).to_zoned(TimeZone::UTC)?;
//!
//! let overdue = care::evaluate(&plant, Some(&plan), &now);
//! assert_eq!(overdue.into_iter().collect::<Vec<_>>(), vec![ActionKind::Water]);
//! # Ok::<(), jiff::Error>(())
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use jiff::{civil::Date, ToSpan, Zoned};
use serde::Serialize;

use crate::{
    dates,
    models::{ActionKind, CarePlan, Plant},
};

/// Overdue actions of one plant, iterating in evaluation order.
pub type OverdueActions = BTreeSet<ActionKind>;

/// Computes the set of overdue care actions for `plant`.
///
/// `plan` is the plant's resolved care plan. Without one nothing is tracked
/// and the result is empty. Missing or unreadable stamps count as never
/// performed.
pub fn evaluate(plant: &Plant, plan: Option<&CarePlan>, now: &Zoned) -> OverdueActions {
    let Some(plan) = plan else {
        return OverdueActions::new();
    };

    let today = now.date();
    let tz = now.time_zone();

    plan.tracked()
        .filter(|(kind, frequency)| {
            is_overdue(plant.last_performed_day(*kind, tz), *frequency, today)
        })
        .map(|(kind, _)| kind)
        .collect()
}

/// Whole local days since a raw stamp, or `None` when the stamp is missing
/// or unreadable.
pub fn days_since(stamp: Option<&str>, now: &Zoned) -> Option<i64> {
    let last = dates::parse_optional_day(stamp, now.time_zone())?;
    dates::days_between(last, now.date())
}

/// First day on which an action with the given frequency becomes overdue.
///
/// Never-performed actions are due today.
pub fn next_due(last: Option<Date>, frequency: u32, today: Date) -> Date {
    match last {
        Some(day) => day
            .checked_add((i64::from(frequency) + 1).days())
            .unwrap_or(Date::MAX),
        None => today,
    }
}

fn is_overdue(last: Option<Date>, frequency: u32, today: Date) -> bool {
    match last.and_then(|day| dates::days_between(day, today)) {
        Some(elapsed) => elapsed > i64::from(frequency),
        None => true,
    }
}

/// Care plans keyed by id, used to resolve `Plant::care_plan_id`.
#[derive(Debug, Clone, Default)]
pub struct CarePlanIndex {
    plans: HashMap<u64, CarePlan>,
}

impl CarePlanIndex {
    pub fn new(plans: impl IntoIterator<Item = CarePlan>) -> Self {
        plans.into_iter().collect()
    }

    pub fn get(&self, id: u64) -> Option<&CarePlan> {
        self.plans.get(&id)
    }

    /// The plan a plant follows. A reference to an unknown plan resolves to
    /// no plan at all.
    pub fn plan_for(&self, plant: &Plant) -> Option<&CarePlan> {
        let id = plant.care_plan_id?;
        let plan = self.plans.get(&id);
        if plan.is_none() {
            log::debug!("plant {} references unknown care plan {id}", plant.id);
        }
        plan
    }

    /// Evaluates a plant against its own care plan.
    pub fn evaluate(&self, plant: &Plant, now: &Zoned) -> OverdueActions {
        evaluate(plant, self.plan_for(plant), now)
    }

    /// Overdue actions and next due days for `plant`.
    pub fn status(&self, plant: &Plant, now: &Zoned) -> CareStatus {
        let plan = self.plan_for(plant);
        let today = now.date();
        let upcoming = plan
            .map(|plan| {
                plan.tracked()
                    .map(|(kind, frequency)| {
                        let last = plant.last_performed_day(kind, now.time_zone());
                        (kind, next_due(last, frequency, today))
                    })
                    .collect()
            })
            .unwrap_or_default();

        CareStatus {
            plant: plant.clone(),
            overdue: evaluate(plant, plan, now),
            next_due: upcoming,
        }
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl FromIterator<CarePlan> for CarePlanIndex {
    fn from_iter<I: IntoIterator<Item = CarePlan>>(iter: I) -> Self {
        Self {
            plans: iter.into_iter().map(|plan| (plan.id, plan)).collect(),
        }
    }
}

/// One (plant, action) pair of the overdue set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverdueEntry {
    pub plant_id: u64,
    pub action: ActionKind,
}

/// A plant together with its evaluated overdue actions.
#[derive(Debug, Clone)]
pub struct PlantStatus<'a> {
    pub plant: &'a Plant,
    pub overdue: OverdueActions,
}

impl PlantStatus<'_> {
    pub fn is_overdue(&self) -> bool {
        !self.overdue.is_empty()
    }
}

/// A plant's full care picture at one instant: what is overdue and when each
/// tracked action falls due next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareStatus {
    pub plant: Plant,
    pub overdue: OverdueActions,
    pub next_due: BTreeMap<ActionKind, Date>,
}

impl CareStatus {
    pub fn is_overdue(&self) -> bool {
        !self.overdue.is_empty()
    }
}

/// Evaluates every plant, keeping input order.
pub fn annotate<'a>(
    plants: &'a [Plant],
    plans: &CarePlanIndex,
    now: &Zoned,
) -> Vec<PlantStatus<'a>> {
    plants
        .iter()
        .map(|plant| PlantStatus {
            plant,
            overdue: plans.evaluate(plant, now),
        })
        .collect()
}

/// The overdue set: every (plant, action) pair that is overdue at `now`, in
/// plant order and then action order.
pub fn overdue_set(plants: &[Plant], plans: &CarePlanIndex, now: &Zoned) -> Vec<OverdueEntry> {
    plants
        .iter()
        .flat_map(|plant| {
            plans
                .evaluate(plant, now)
                .into_iter()
                .map(move |action| OverdueEntry {
                    plant_id: plant.id,
                    action,
                })
        })
        .collect()
}
