//! Display wrapper types for formatting different contexts.
//!
//! Domain models implement [`std::fmt::Display`] for their own markdown form.
//! The wrappers here format collections, reports and operation results, so
//! the same records can read differently in a list, a report or a
//! confirmation. Every wrapper produces markdown for the terminal renderer.
//!
//! ```rust
//! use verdant_core::display::CreateResult;
//! use verdant_core::Goal;
//!
//! let goal = Goal {
//!     id: 3,
//!     name: "Repot the monstera".to_string(),
//!     due_month: "2024-05".to_string(),
//! };
//! let output = CreateResult::new(goal).to_string();
//! assert!(output.contains("Created goal with ID: 3"));
//! ```

use std::fmt;

use jiff::{civil::Date, Zoned};

use crate::{
    calendar::{CalendarCell, WeekStart},
    care::{self, CareStatus},
    dates::CalendarMonth,
    models::{ActionKind, CarePlan, Goal, ItemKind, Plant, ScheduledItem, Todo},
};

/// A titled list of care plans.
pub struct CarePlanList<'a> {
    plans: &'a [CarePlan],
    title: Option<&'a str>,
}

impl<'a> CarePlanList<'a> {
    pub fn new(plans: &'a [CarePlan]) -> Self {
        Self { plans, title: None }
    }

    pub fn with_title(plans: &'a [CarePlan], title: &'a str) -> Self {
        Self {
            plans,
            title: Some(title),
        }
    }
}

impl fmt::Display for CarePlanList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.plans.is_empty() {
            writeln!(f, "No care plans found.")?;
            return Ok(());
        }

        for plan in self.plans {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Plants that need care, with how long each overdue action has waited.
pub struct OverdueReport<'a> {
    statuses: &'a [CareStatus],
    now: &'a Zoned,
}

impl<'a> OverdueReport<'a> {
    pub fn new(statuses: &'a [CareStatus], now: &'a Zoned) -> Self {
        Self { statuses, now }
    }
}

impl fmt::Display for OverdueReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plants needing care")?;
        writeln!(f)?;

        if self.statuses.is_empty() {
            writeln!(f, "All plants are on schedule.")?;
            return Ok(());
        }

        for status in self.statuses {
            let plant = &status.plant;
            writeln!(f, "## {} (ID: {})", plant.name, plant.id)?;
            writeln!(f)?;
            if let Some(system) = &plant.system {
                writeln!(f, "- **System**: {system}")?;
            }
            for kind in &status.overdue {
                let stamp = plant.last_performed(*kind);
                match care::days_since(stamp, self.now) {
                    Some(days) => writeln!(
                        f,
                        "- **{}**: last on {}, {days} days ago",
                        kind.label(),
                        stamp.unwrap_or_default()
                    )?,
                    None => writeln!(f, "- **{}**: never recorded", kind.label())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Every plant with the next due day of each tracked action.
pub struct CareSchedule<'a> {
    statuses: &'a [CareStatus],
}

impl<'a> CareSchedule<'a> {
    pub fn new(statuses: &'a [CareStatus]) -> Self {
        Self { statuses }
    }
}

impl fmt::Display for CareSchedule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plants")?;
        writeln!(f)?;

        if self.statuses.is_empty() {
            writeln!(f, "No plants found.")?;
            return Ok(());
        }

        for status in self.statuses {
            write!(f, "{}", status.plant)?;
            for (kind, day) in &status.next_due {
                let flag = if status.overdue.contains(kind) { " (overdue)" } else { "" };
                writeln!(f, "- **Next {}**: {day}{flag}", kind.label())?;
            }
            if !status.next_due.is_empty() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Confirmation of a bulk care action.
pub struct BulkCareResult<'a> {
    plants: &'a [Plant],
    actions: Vec<ActionKind>,
}

impl<'a> BulkCareResult<'a> {
    pub fn new(plants: &'a [Plant], actions: impl IntoIterator<Item = ActionKind>) -> Self {
        Self {
            plants,
            actions: actions.into_iter().collect(),
        }
    }
}

impl fmt::Display for BulkCareResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.actions.iter().map(|kind| kind.label()).collect();
        let noun = if self.plants.len() == 1 { "plant" } else { "plants" };
        writeln!(
            f,
            "Recorded {} for {} {noun}.",
            labels.join(" and "),
            self.plants.len()
        )?;
        writeln!(f)?;
        for plant in self.plants {
            writeln!(f, "- {} (ID: {})", plant.name, plant.id)?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<CarePlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created care plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Plant> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plant with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Todo> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created todo with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created goal with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Outcome of moving a todo to another day.
pub enum RescheduleResult {
    /// The store confirmed the new due day.
    Moved(Todo),
    /// The todo was already due on the requested day.
    Unchanged { id: u64, day: Date },
}

impl fmt::Display for RescheduleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RescheduleResult::Moved(todo) => {
                let due = todo.due_on.as_deref().unwrap_or("unscheduled");
                writeln!(f, "Moved todo {} to {due}", todo.id)?;
                writeln!(f)?;
                write!(f, "{todo}")
            }
            RescheduleResult::Unchanged { id, day } => {
                writeln!(f, "Todo {id} is already due on {day}. Nothing changed.")
            }
        }
    }
}

/// A month grid as a markdown table, one row per week.
///
/// Each cell shows the day number followed by one marker per item: `○` for a
/// todo, `◆` for a goal. Today is bold, days outside the month are italic and
/// past days that still have items are flagged with `!`.
pub struct MonthCalendar<'a> {
    month: CalendarMonth,
    week_start: WeekStart,
    cells: &'a [CalendarCell],
}

impl<'a> MonthCalendar<'a> {
    pub fn new(month: CalendarMonth, week_start: WeekStart, cells: &'a [CalendarCell]) -> Self {
        Self {
            month,
            week_start,
            cells,
        }
    }

    fn cell_text(cell: &CalendarCell) -> String {
        let day = cell.date.day();
        let mut text = if cell.is_today {
            format!("**{day}**")
        } else if !cell.in_month {
            format!("*{day}*")
        } else {
            day.to_string()
        };

        if !cell.items.is_empty() {
            text.push(' ');
            for item in &cell.items {
                text.push(match item.kind {
                    ItemKind::Todo => '○',
                    ItemKind::Goal => '◆',
                });
            }
        }
        if cell.is_past_due {
            text.push_str(" !");
        }
        text
    }
}

impl fmt::Display for MonthCalendar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.month.label())?;
        writeln!(f)?;

        let names = self.week_start.weekday_names();
        writeln!(f, "|{}|", names.join("|"))?;
        writeln!(f, "|{}|", [":-:"; 7].join("|"))?;
        for week in self.cells.chunks(7) {
            let row: Vec<String> = week.iter().map(Self::cell_text).collect();
            writeln!(f, "|{}|", row.join("|"))?;
        }
        writeln!(f)?;

        let mut upcoming = self
            .cells
            .iter()
            .filter(|cell| cell.in_month && !cell.items.is_empty())
            .peekable();
        if upcoming.peek().is_none() {
            writeln!(f, "Nothing scheduled this month.")?;
            return Ok(());
        }
        for cell in upcoming {
            writeln!(f, "**{}**", cell.date)?;
            for item in &cell.items {
                writeln!(f, "- {item}")?;
            }
        }
        Ok(())
    }
}

/// The items due on a single day.
pub struct DayAgenda<'a> {
    day: Date,
    items: &'a [ScheduledItem],
}

impl<'a> DayAgenda<'a> {
    pub fn new(day: Date, items: &'a [ScheduledItem]) -> Self {
        Self { day, items }
    }
}

impl fmt::Display for DayAgenda<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.day.strftime("%A, %B %-d, %Y"))?;
        writeln!(f)?;

        if self.items.is_empty() {
            writeln!(f, "No events for this day.")?;
            return Ok(());
        }

        for item in self.items {
            let kind = match item.kind {
                ItemKind::Todo => "todo",
                ItemKind::Goal => "goal",
            };
            writeln!(f, "- {item} ({kind})")?;
        }
        Ok(())
    }
}
