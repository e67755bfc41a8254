//! Bulk filtering and bulk care payloads.
//!
//! Quick filters narrow a plant list to the plants overdue for *every* active
//! filter. Adding a filter can only shrink the result. Fertilizing has no
//! quick filter: it needs a method and a composition a one-click bulk action
//! cannot supply, so [`QuickFilter`] simply has no variant for it.

use std::{collections::BTreeSet, fmt, str::FromStr};

use jiff::Zoned;
use serde::{Deserialize, Serialize};

use crate::{
    care::{CarePlanIndex, OverdueActions},
    error::{GardenError, Result},
    models::{ActionKind, Plant, PlantCareUpdate},
};

/// A bulk quick filter over the overdue set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickFilter {
    Water,
    Cleanse,
    Repot,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 3] = [QuickFilter::Water, QuickFilter::Cleanse, QuickFilter::Repot];

    /// The care action this filter selects on.
    pub fn action(&self) -> ActionKind {
        match self {
            QuickFilter::Water => ActionKind::Water,
            QuickFilter::Cleanse => ActionKind::Cleanse,
            QuickFilter::Repot => ActionKind::Repot,
        }
    }
}

impl TryFrom<ActionKind> for QuickFilter {
    type Error = String;

    fn try_from(kind: ActionKind) -> std::result::Result<Self, Self::Error> {
        match kind {
            ActionKind::Water => Ok(QuickFilter::Water),
            ActionKind::Cleanse => Ok(QuickFilter::Cleanse),
            ActionKind::Repot => Ok(QuickFilter::Repot),
            ActionKind::Fertilize => Err("fertilize has no bulk quick filter".to_string()),
        }
    }
}

impl FromStr for QuickFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<ActionKind>()?.try_into()
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action())
    }
}

/// The active quick filters.
pub type Criteria = BTreeSet<QuickFilter>;

/// Whether an overdue set satisfies every active filter.
pub fn matches(overdue: &OverdueActions, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|filter| overdue.contains(&filter.action()))
}

/// Plants overdue for every action in `criteria`, in input order.
///
/// No criteria means no filtering.
pub fn filter<'a>(
    plants: &'a [Plant],
    plans: &CarePlanIndex,
    now: &Zoned,
    criteria: &Criteria,
) -> Vec<&'a Plant> {
    if criteria.is_empty() {
        return plants.iter().collect();
    }
    plants
        .iter()
        .filter(|plant| matches(&plans.evaluate(plant, now), criteria))
        .collect()
}

/// Merged payload stamping every active action with `now`'s local day.
///
/// ```rust
/// use jiff::{civil::date, tz::TimeZone};
/// use verdant_core::bulk::{build_bulk_update, Criteria, QuickFilter};
///
/// let now = date(2024, 6, 1).at(10, 0, 0, 0).to_zoned(TimeZone::UTC)?;
/// let criteria = Criteria::from([QuickFilter::Water, QuickFilter::Repot]);
///
/// let update = build_bulk_update(&criteria, &now);
/// assert_eq!(
///     serde_json::to_string(&update).unwrap(),
///     r#"{"watered_on":"2024-06-01","potted_on":"2024-06-01"}"#
/// );
/// # Ok::<(), jiff::Error>(())
/// ```
pub fn build_bulk_update(criteria: &Criteria, now: &Zoned) -> PlantCareUpdate {
    let today = now.date();
    let mut update = PlantCareUpdate::default();
    for filter in criteria {
        update.stamp(filter.action(), today);
    }
    update
}

/// Whether the plant's name or system name contains `needle`, ignoring case.
pub fn matches_text(plant: &Plant, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    plant.name.to_lowercase().contains(&needle)
        || plant
            .system
            .as_deref()
            .is_some_and(|system| system.to_lowercase().contains(&needle))
}

/// Free-text search stage. Blank text keeps everything.
pub fn search<'a, I>(plants: I, text: &str) -> Vec<&'a Plant>
where
    I: IntoIterator<Item = &'a Plant>,
{
    plants
        .into_iter()
        .filter(|plant| matches_text(plant, text))
        .collect()
}

/// Search text and quick filters combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantQuery {
    pub text: Option<String>,
    pub criteria: Criteria,
}

impl PlantQuery {
    pub fn new(text: Option<String>, criteria: impl IntoIterator<Item = QuickFilter>) -> Self {
        Self {
            text,
            criteria: criteria.into_iter().collect(),
        }
    }

    /// Runs the filter stage and then the search stage.
    pub fn apply<'a>(
        &self,
        plants: &'a [Plant],
        plans: &CarePlanIndex,
        now: &Zoned,
    ) -> Vec<&'a Plant> {
        let filtered = filter(plants, plans, now, &self.criteria);
        match self.text.as_deref() {
            Some(text) => search(filtered, text),
            None => filtered,
        }
    }
}

/// Plants picked for a bulk action, keyed by id.
///
/// A new selection starts with every candidate selected. Ids outside the
/// candidate list are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    candidates: Vec<u64>,
    selected: BTreeSet<u64>,
}

impl Selection {
    pub fn new<'a>(plants: impl IntoIterator<Item = &'a Plant>) -> Self {
        let candidates: Vec<u64> = plants.into_iter().map(|plant| plant.id).collect();
        let selected = candidates.iter().copied().collect();
        Self {
            candidates,
            selected,
        }
    }

    /// Flips one plant. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: u64) -> bool {
        if !self.candidates.contains(&id) {
            return false;
        }
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.candidates.iter().copied().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Clears a full selection, otherwise selects everything.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.clear();
        } else {
            self.select_all();
        }
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selected.len() == self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in candidate order.
    pub fn selected_ids(&self) -> Vec<u64> {
        self.candidates
            .iter()
            .copied()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// One care payload per selected plant.
    ///
    /// # Errors
    ///
    /// `GardenError::InvalidInput` when nothing is selected or no filter is
    /// active.
    pub fn payloads(&self, criteria: &Criteria, now: &Zoned) -> Result<Vec<(u64, PlantCareUpdate)>> {
        if self.is_empty() {
            return Err(GardenError::invalid_input("selection")
                .with_reason("Please select at least one plant"));
        }
        if criteria.is_empty() {
            return Err(GardenError::invalid_input("criteria")
                .with_reason("Select at least one care action"));
        }

        let update = build_bulk_update(criteria, now);
        Ok(self
            .selected_ids()
            .into_iter()
            .map(|id| (id, update.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::TimeZone};

    use super::*;
    use crate::models::{CarePlan, Phase};

    fn now() -> Zoned {
        date(2024, 6, 1)
            .at(10, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
    }

    fn plans() -> CarePlanIndex {
        CarePlanIndex::new(vec![CarePlan {
            id: 1,
            name: "Everything weekly".to_string(),
            watering: Some(7),
            fertilizing: Some(7),
            cleaning: Some(7),
            potting: Some(7),
        }])
    }

    fn plant(id: u64, name: &str, overdue: &[ActionKind]) -> Plant {
        let stamp = |kind: ActionKind| {
            if overdue.contains(&kind) {
                Some("2024-05-01".to_string())
            } else {
                Some("2024-05-31".to_string())
            }
        };
        Plant {
            id,
            name: name.to_string(),
            phase: Phase::Adult,
            system: Some("Greenhouse".to_string()),
            care_plan_id: Some(1),
            watered_on: stamp(ActionKind::Water),
            fertilized_on: stamp(ActionKind::Fertilize),
            cleansed_on: stamp(ActionKind::Cleanse),
            potted_on: stamp(ActionKind::Repot),
        }
    }

    fn garden() -> Vec<Plant> {
        vec![
            plant(1, "Monstera", &[ActionKind::Water]),
            plant(2, "Pothos", &[ActionKind::Water, ActionKind::Repot]),
            plant(3, "Hoya", &[ActionKind::Cleanse]),
            plant(4, "Fern", &[]),
        ]
    }

    fn ids(plants: &[&Plant]) -> Vec<u64> {
        plants.iter().map(|plant| plant.id).collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let plants = garden();
        let result = filter(&plants, &plans(), &now(), &Criteria::new());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_criteria_are_and_combined() {
        let plants = garden();
        let water = Criteria::from([QuickFilter::Water]);
        assert_eq!(ids(&filter(&plants, &plans(), &now(), &water)), vec![1, 2]);

        let water_and_repot = Criteria::from([QuickFilter::Water, QuickFilter::Repot]);
        assert_eq!(
            ids(&filter(&plants, &plans(), &now(), &water_and_repot)),
            vec![2]
        );
    }

    #[test]
    fn test_adding_criteria_never_widens() {
        let plants = garden();
        let plans = plans();
        let now = now();

        let mut criteria = Criteria::new();
        let mut previous = filter(&plants, &plans, &now, &criteria).len();
        for extra in QuickFilter::ALL {
            criteria.insert(extra);
            let current = filter(&plants, &plans, &now, &criteria).len();
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_plants_without_plan_never_match_criteria() {
        let mut untracked = plant(9, "Cactus", &[ActionKind::Water]);
        untracked.care_plan_id = None;
        let plants = vec![untracked];

        let water = Criteria::from([QuickFilter::Water]);
        assert!(filter(&plants, &plans(), &now(), &water).is_empty());
    }

    #[test]
    fn test_bulk_update_only_stamps_active_actions() {
        let criteria = Criteria::from([QuickFilter::Water, QuickFilter::Repot]);
        let update = build_bulk_update(&criteria, &now());

        assert_eq!(update.watered_on, Some(date(2024, 6, 1)));
        assert_eq!(update.potted_on, Some(date(2024, 6, 1)));
        assert_eq!(update.fertilized_on, None);
        assert_eq!(update.cleansed_on, None);

        let json = serde_json::to_value(&update).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("fertilized_on"));
        assert!(!object.contains_key("cleansed_on"));
    }

    #[test]
    fn test_fertilize_is_not_a_quick_filter() {
        assert!("fertilize".parse::<QuickFilter>().is_err());
        assert!(QuickFilter::try_from(ActionKind::Fertilize).is_err());
        assert_eq!("cleaning".parse::<QuickFilter>(), Ok(QuickFilter::Cleanse));
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_system() {
        let plants = garden();
        assert_eq!(ids(&search(&plants, "mon")), vec![1]);
        assert_eq!(ids(&search(&plants, "GREENHOUSE")).len(), 4);
        assert_eq!(ids(&search(&plants, "  ")).len(), 4);
        assert!(search(&plants, "orchid").is_empty());
    }

    #[test]
    fn test_query_combines_search_and_filters() {
        let plants = garden();
        let query = PlantQuery::new(Some("pot".to_string()), [QuickFilter::Water]);
        assert_eq!(ids(&query.apply(&plants, &plans(), &now())), vec![2]);

        let query = PlantQuery::new(Some("hoya".to_string()), [QuickFilter::Water]);
        assert!(query.apply(&plants, &plans(), &now()).is_empty());
    }

    #[test]
    fn test_selection_toggling() {
        let plants = garden();
        let mut selection = Selection::new(&plants);
        assert!(selection.is_all_selected());

        assert!(!selection.toggle(2));
        assert!(!selection.is_selected(2));
        assert!(!selection.is_all_selected());
        assert_eq!(selection.selected_ids(), vec![1, 3, 4]);

        assert!(selection.toggle(2));
        assert!(!selection.toggle(42));

        selection.toggle_all();
        assert!(selection.is_empty());
        selection.toggle_all();
        assert!(selection.is_all_selected());
    }

    #[test]
    fn test_selection_payloads() {
        let plants = garden();
        let mut selection = Selection::new(&plants[..2]);
        let criteria = Criteria::from([QuickFilter::Cleanse]);

        let payloads = selection.payloads(&criteria, &now()).unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].0, 1);
        assert_eq!(payloads[1].1.cleansed_on, Some(date(2024, 6, 1)));

        assert!(selection.payloads(&Criteria::new(), &now()).is_err());
        selection.clear();
        assert!(matches!(
            selection.payloads(&criteria, &now()),
            Err(GardenError::InvalidInput { .. })
        ));
    }
}
