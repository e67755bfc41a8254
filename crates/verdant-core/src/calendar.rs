//! Calendar aggregation and month grids.
//!
//! Todos and goals are reduced to [`ScheduledItem`]s and grouped by their due
//! day. Buckets are sparse: a day with nothing due has no entry, and
//! [`CalendarBuckets::get`] answers an empty slice for it.
//!
//! The month grid always covers whole weeks, from the first day of the week
//! containing the 1st to the last day of the week containing the month's last
//! day.

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::{civil::Date, tz::TimeZone, ToSpan};
use serde::{Deserialize, Serialize};

use crate::{
    dates::{self, CalendarMonth},
    models::{Goal, ScheduledItem, Todo},
};

/// First day of the calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Days between the start of `day`'s week and `day`.
    fn offset(&self, day: Date) -> i64 {
        let offset = match self {
            WeekStart::Sunday => day.weekday().to_sunday_zero_offset(),
            WeekStart::Monday => day.weekday().to_monday_zero_offset(),
        };
        i64::from(offset)
    }

    /// Short weekday names in grid column order.
    pub fn weekday_names(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(format!("Invalid week start: {s}")),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

/// Scheduled items grouped by due day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarBuckets {
    buckets: BTreeMap<Date, Vec<ScheduledItem>>,
}

impl CalendarBuckets {
    /// Items due on `day`, in insertion order. Empty when nothing is due.
    pub fn get(&self, day: Date) -> &[ScheduledItem] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks a bucket up by its `YYYY-MM-DD` key.
    pub fn get_key(&self, key: &str) -> &[ScheduledItem] {
        match key.parse::<Date>() {
            Ok(day) => self.get(day),
            Err(_) => &[],
        }
    }

    /// Days that have at least one item, ascending.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, &[ScheduledItem])> + '_ {
        self.buckets.iter().map(|(day, items)| (*day, items.as_slice()))
    }

    /// Number of materialized buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of items across all buckets.
    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// The buckets keyed by their `YYYY-MM-DD` strings.
    pub fn to_keyed(&self) -> BTreeMap<String, Vec<ScheduledItem>> {
        self.buckets
            .iter()
            .map(|(day, items)| (dates::day_key(*day), items.clone()))
            .collect()
    }

    fn push(&mut self, item: ScheduledItem) {
        self.buckets.entry(item.due).or_default().push(item);
    }
}

impl FromIterator<ScheduledItem> for CalendarBuckets {
    fn from_iter<I: IntoIterator<Item = ScheduledItem>>(iter: I) -> Self {
        let mut buckets = CalendarBuckets::default();
        for item in iter {
            buckets.push(item);
        }
        buckets
    }
}

/// Groups todos and goals by due day.
///
/// Todos land on their local due day in `tz`; goals land on the last day of
/// their month. Within a bucket todos come first, each group in input order.
/// Todos without a readable due date and goals with an unreadable month are
/// left off the calendar.
///
/// # Examples
///
/// ```rust
/// use jiff::{civil::date, tz::TimeZone};
/// use verdant_core::{calendar, Goal, Todo};
///
/// let todos = vec![Todo {
///     id: 1,
///     name: "Order perlite".to_string(),
///     description: None,
///     due_on: Some("2024-03-15".to_string()),
/// }];
/// let goals = vec![Goal {
///     id: 2,
///     name: "Propagate pothos".to_string(),
///     due_month: "2024-03".to_string(),
/// }];
///
/// let buckets = calendar::aggregate(&todos, &goals, &TimeZone::UTC);
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets.get(date(2024, 3, 15))[0].id, 1);
/// assert_eq!(buckets.get_key("2024-03-31")[0].id, 2);
/// assert!(buckets.get(date(2024, 3, 16)).is_empty());
/// ```
pub fn aggregate(todos: &[Todo], goals: &[Goal], tz: &TimeZone) -> CalendarBuckets {
    let todo_items = todos.iter().filter_map(|todo| {
        let item = ScheduledItem::from_todo(todo, tz);
        if item.is_none() {
            log::debug!("todo {} has no usable due date, not placed", todo.id);
        }
        item
    });
    let goal_items = goals.iter().filter_map(|goal| {
        let item = ScheduledItem::from_goal(goal);
        if item.is_none() {
            log::warn!(
                "goal {} has unreadable due month '{}', not placed",
                goal.id,
                goal.due_month
            );
        }
        item
    });

    todo_items.chain(goal_items).collect()
}

/// The days shown for `month`, in whole weeks starting on `week_start`.
///
/// That is 35 or 42 days, or 28 for a February that begins on the week start
/// day in a common year.
pub fn days_in_month_view(month: CalendarMonth, week_start: WeekStart) -> Vec<Date> {
    let first = month.first_day();
    let last = month.last_day();

    let start = first
        .checked_sub(week_start.offset(first).days())
        .unwrap_or(first);
    let end = last
        .checked_add((6 - week_start.offset(last)).days())
        .unwrap_or(last);

    start
        .series(1.day())
        .take_while(|day| *day <= end)
        .collect()
}

/// One cell of a rendered month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: Date,
    /// Whether the day belongs to the displayed month (not a padding day)
    pub in_month: bool,
    pub is_today: bool,
    /// The day is in the past and still has items on it
    pub is_past_due: bool,
    pub items: Vec<ScheduledItem>,
}

/// Builds the month grid, attaching each day's bucket.
pub fn month_grid(
    month: CalendarMonth,
    week_start: WeekStart,
    buckets: &CalendarBuckets,
    today: Date,
) -> Vec<CalendarCell> {
    days_in_month_view(month, week_start)
        .into_iter()
        .map(|date| {
            let items = buckets.get(date).to_vec();
            CalendarCell {
                date,
                in_month: month.contains(date),
                is_today: date == today,
                is_past_due: !items.is_empty() && date < today,
                items,
            }
        })
        .collect()
}

/// View state of the month calendar: the displayed month and the day whose
/// agenda is open, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub month: CalendarMonth,
    pub week_start: WeekStart,
    pub selected_day: Option<Date>,
}

impl MonthView {
    /// Opens the month containing `today`, with nothing selected.
    pub fn new(today: Date, week_start: WeekStart) -> Self {
        Self {
            month: CalendarMonth::containing(today),
            week_start,
            selected_day: None,
        }
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
        self.selected_day = None;
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
        self.selected_day = None;
    }

    /// Selects `day`, or closes it when it is already selected.
    pub fn select_day(&mut self, day: Date) {
        if self.selected_day == Some(day) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(day);
        }
    }

    pub fn days(&self) -> Vec<Date> {
        days_in_month_view(self.month, self.week_start)
    }

    pub fn grid(&self, buckets: &CalendarBuckets, today: Date) -> Vec<CalendarCell> {
        month_grid(self.month, self.week_start, buckets, today)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, Weekday};

    use super::*;
    use crate::models::ItemKind;

    fn todo(id: u64, due_on: Option<&str>) -> Todo {
        Todo {
            id,
            name: format!("todo {id}"),
            description: None,
            due_on: due_on.map(String::from),
        }
    }

    fn goal(id: u64, due_month: &str) -> Goal {
        Goal {
            id,
            name: format!("goal {id}"),
            due_month: due_month.to_string(),
        }
    }

    fn month(s: &str) -> CalendarMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_todo_and_goal_buckets() {
        let buckets = aggregate(
            &[todo(1, Some("2024-03-15"))],
            &[goal(2, "2024-03")],
            &TimeZone::UTC,
        );

        let keyed = buckets.to_keyed();
        assert_eq!(
            keyed.keys().cloned().collect::<Vec<_>>(),
            vec!["2024-03-15".to_string(), "2024-03-31".to_string()]
        );
        assert_eq!(keyed["2024-03-15"][0].id, 1);
        assert_eq!(keyed["2024-03-15"][0].kind, ItemKind::Todo);
        assert_eq!(keyed["2024-03-31"][0].id, 2);
        assert_eq!(keyed["2024-03-31"][0].kind, ItemKind::Goal);
    }

    #[test]
    fn test_every_item_lands_in_exactly_one_bucket() {
        let todos = vec![
            todo(1, Some("2024-03-31")),
            todo(2, Some("2024-03-31T08:00:00")),
            todo(3, Some("2024-04-01")),
        ];
        let goals = vec![goal(4, "2024-03"), goal(5, "2024-04")];

        let buckets = aggregate(&todos, &goals, &TimeZone::UTC);
        assert_eq!(buckets.item_count(), 5);

        for (day, items) in buckets.iter() {
            for item in items {
                assert_eq!(item.due, day);
            }
        }
        let ids: Vec<u64> = buckets
            .get(date(2024, 3, 31))
            .iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_unplaceable_items_are_skipped() {
        let buckets = aggregate(
            &[todo(1, None), todo(2, Some("soon"))],
            &[goal(3, "next year")],
            &TimeZone::UTC,
        );
        assert!(buckets.is_empty());
        assert!(buckets.get_key("2024-01-01").is_empty());
        assert!(buckets.get_key("garbage").is_empty());
    }

    #[test]
    fn test_aggregate_is_stable_across_calls() {
        let todos = vec![todo(1, Some("2024-03-15")), todo(2, Some("2024-03-15"))];
        let goals = vec![goal(3, "2024-03")];

        let first = aggregate(&todos, &goals, &TimeZone::UTC);
        let second = aggregate(&todos.clone(), &goals.clone(), &TimeZone::UTC);
        assert_eq!(first, second);
        assert_eq!(todos[0].due_on.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_todo_instants_use_local_day() {
        let tokyo = TimeZone::fixed(jiff::tz::offset(9));
        let buckets = aggregate(&[todo(1, Some("2024-03-15T20:00:00Z"))], &[], &tokyo);
        assert_eq!(buckets.days().collect::<Vec<_>>(), vec![date(2024, 3, 16)]);
    }

    #[test]
    fn test_month_view_sizes() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let march = days_in_month_view(month("2024-03"), WeekStart::Sunday);
        assert_eq!(march.len(), 42);
        assert_eq!(march[0], date(2024, 2, 25));
        assert_eq!(march[41], date(2024, 4, 6));

        let september = days_in_month_view(month("2024-09"), WeekStart::Sunday);
        assert_eq!(september.len(), 35);
        assert_eq!(september[0], date(2024, 9, 1));

        let february = days_in_month_view(month("2015-02"), WeekStart::Sunday);
        assert_eq!(february.len(), 28);
    }

    #[test]
    fn test_month_view_monday_start() {
        let march = days_in_month_view(month("2024-03"), WeekStart::Monday);
        assert_eq!(march.len(), 35);
        assert_eq!(march[0], date(2024, 2, 26));
        assert_eq!(march[0].weekday(), Weekday::Monday);
        assert_eq!(march[34], date(2024, 3, 31));
    }

    #[test]
    fn test_month_view_whole_weeks_for_every_month() {
        for week_start in [WeekStart::Sunday, WeekStart::Monday] {
            let mut current = month("2023-01");
            for _ in 0..24 {
                let days = days_in_month_view(current, week_start);
                assert_eq!(days.len() % 7, 0);
                assert!(days.contains(&current.first_day()));
                assert!(days.contains(&current.last_day()));
                assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
                current = current.next();
            }
        }
    }

    #[test]
    fn test_month_grid_flags() {
        let buckets = aggregate(
            &[todo(1, Some("2024-03-04")), todo(2, Some("2024-03-20"))],
            &[],
            &TimeZone::UTC,
        );
        let today = date(2024, 3, 10);
        let grid = month_grid(month("2024-03"), WeekStart::Sunday, &buckets, today);

        let cell = |day: Date| grid.iter().find(|cell| cell.date == day).unwrap();
        assert!(!cell(date(2024, 2, 25)).in_month);
        assert!(cell(date(2024, 3, 4)).is_past_due);
        assert!(!cell(date(2024, 3, 5)).is_past_due);
        assert!(!cell(date(2024, 3, 20)).is_past_due);
        assert!(cell(date(2024, 3, 10)).is_today);
        assert_eq!(cell(date(2024, 3, 20)).items.len(), 1);
    }

    #[test]
    fn test_month_view_navigation_and_selection() {
        let mut view = MonthView::new(date(2024, 12, 5), WeekStart::Sunday);
        assert_eq!(view.month.to_string(), "2024-12");

        view.select_day(date(2024, 12, 5));
        assert_eq!(view.selected_day, Some(date(2024, 12, 5)));
        view.select_day(date(2024, 12, 5));
        assert_eq!(view.selected_day, None);

        view.select_day(date(2024, 12, 6));
        view.next_month();
        assert_eq!(view.month.to_string(), "2025-01");
        assert_eq!(view.selected_day, None);

        view.previous_month();
        view.previous_month();
        assert_eq!(view.month.to_string(), "2024-11");
    }

    #[test]
    fn test_week_start_parse() {
        assert_eq!("Monday".parse::<WeekStart>(), Ok(WeekStart::Monday));
        assert_eq!("sun".parse::<WeekStart>(), Ok(WeekStart::Sunday));
        assert!("friday".parse::<WeekStart>().is_err());
    }
}
