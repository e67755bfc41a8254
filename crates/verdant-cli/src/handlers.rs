//! Command handlers: run a garden operation and render its result.

use anyhow::{Context, Result};
use jiff::{civil::Date, Zoned};
use log::debug;
use verdant_core::{
    display::{
        BulkCareResult, CarePlanList, CareSchedule, CreateResult, DayAgenda, MonthCalendar,
        OverdueReport, RescheduleResult,
    },
    params::{BulkCare, ListOverdue, MoveTodo},
    CalendarMonth, Garden, MonthView, WeekStart,
};

use crate::{
    cli::{CalendarArgs, GoalCommands, PlanCommands, PlantCommands, TodoCommands},
    renderer::TerminalRenderer,
};

/// Runs commands against one garden as of a fixed instant.
pub struct Handler {
    garden: Garden,
    renderer: TerminalRenderer,
    now: Zoned,
    week_start: WeekStart,
}

impl Handler {
    pub fn new(garden: Garden, renderer: TerminalRenderer, now: Zoned, week_start: WeekStart) -> Self {
        Self {
            garden,
            renderer,
            now,
            week_start,
        }
    }

    fn today(&self) -> Date {
        self.now.date()
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Add(args) => {
                let plan = self
                    .garden
                    .create_care_plan(&args.into())
                    .await
                    .context("Failed to create care plan")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::List => {
                let plans = self
                    .garden
                    .list_care_plans()
                    .await
                    .context("Failed to list care plans")?;
                self.renderer
                    .render(&CarePlanList::with_title(&plans, "Care plans").to_string())
            }
        }
    }

    pub async fn handle_plant_command(&self, command: PlantCommands) -> Result<()> {
        match command {
            PlantCommands::Add(args) => {
                let plant = self
                    .garden
                    .create_plant(&args.into())
                    .await
                    .context("Failed to create plant")?;
                self.renderer.render(&CreateResult::new(plant).to_string())
            }
            PlantCommands::List => {
                let statuses = self
                    .garden
                    .care_status(&self.now)
                    .await
                    .context("Failed to evaluate plants")?;
                self.renderer.render(&CareSchedule::new(&statuses).to_string())
            }
            PlantCommands::Overdue(args) => self.list_overdue(&args.into()).await,
            PlantCommands::Care(args) => self.bulk_care(&args.into()).await,
        }
    }

    pub async fn list_overdue(&self, params: &ListOverdue) -> Result<()> {
        let statuses = self
            .garden
            .overdue(params, &self.now)
            .await
            .context("Failed to list plants needing care")?;
        self.renderer
            .render(&OverdueReport::new(&statuses, &self.now).to_string())
    }

    async fn bulk_care(&self, params: &BulkCare) -> Result<()> {
        let plants = self
            .garden
            .bulk_care(params, &self.now)
            .await
            .context("Failed to record care")?;
        let actions = params.filters.iter().map(|filter| filter.action());
        self.renderer
            .render(&BulkCareResult::new(&plants, actions).to_string())
    }

    pub async fn handle_todo_command(&self, command: TodoCommands) -> Result<()> {
        match command {
            TodoCommands::Add(args) => {
                let todo = self
                    .garden
                    .create_todo(&args.into())
                    .await
                    .context("Failed to create todo")?;
                self.renderer.render(&CreateResult::new(todo).to_string())
            }
            TodoCommands::List => {
                let todos = self
                    .garden
                    .list_todos()
                    .await
                    .context("Failed to list todos")?;
                let mut output = String::from("# Todos\n\n");
                if todos.is_empty() {
                    output.push_str("No todos found.\n");
                }
                for todo in &todos {
                    output.push_str(&todo.to_string());
                }
                self.renderer.render(&output)
            }
            TodoCommands::Move(args) => {
                let params: MoveTodo = args.into();
                let result = match self
                    .garden
                    .reschedule_todo(&params, self.now.time_zone())
                    .await
                    .context("Failed to move todo")?
                {
                    Some(todo) => RescheduleResult::Moved(todo),
                    None => RescheduleResult::Unchanged {
                        id: params.id,
                        day: params.due_on,
                    },
                };
                self.renderer.render(&result.to_string())
            }
        }
    }

    pub async fn handle_goal_command(&self, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::Add(args) => {
                let goal = self
                    .garden
                    .create_goal(&args.into())
                    .await
                    .context("Failed to create goal")?;
                self.renderer.render(&CreateResult::new(goal).to_string())
            }
            GoalCommands::List => {
                let goals = self
                    .garden
                    .list_goals()
                    .await
                    .context("Failed to list goals")?;
                let mut output = String::from("# Goals\n\n");
                if goals.is_empty() {
                    output.push_str("No goals found.\n");
                }
                for goal in &goals {
                    output.push_str(&goal.to_string());
                }
                self.renderer.render(&output)
            }
        }
    }

    pub async fn show_calendar(&self, args: CalendarArgs) -> Result<()> {
        let mut view = MonthView::new(self.today(), self.week_start);
        if let Some(month) = args.month.or(args.day.map(CalendarMonth::containing)) {
            view.month = month;
        }
        if args.next {
            view.next_month();
        } else if args.previous {
            view.previous_month();
        }
        if let Some(day) = args.day.filter(|day| view.month.contains(*day)) {
            view.select_day(day);
        }
        debug!("showing {} starting on {}", view.month, view.week_start);

        let buckets = self
            .garden
            .calendar(self.now.time_zone())
            .await
            .context("Failed to load calendar")?;
        let cells = view.grid(&buckets, self.today());

        let mut output = MonthCalendar::new(view.month, view.week_start, &cells).to_string();
        if let Some(day) = view.selected_day {
            output.push('\n');
            output.push_str(&DayAgenda::new(day, buckets.get(day)).to_string());
        }
        self.renderer.render(&output)
    }
}
