//! Command-line argument structures.
//!
//! Each subcommand has a clap `Args` struct here and a `From` conversion into
//! the matching `verdant_core::params` type, so clap attributes never leak
//! into the core crate:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Garden
//! ```

use clap::{Args, Subcommand, ValueEnum};
use jiff::civil::Date;
use verdant_core::{params::*, CalendarMonth, Phase, QuickFilter, WeekStart};

#[derive(Args)]
pub struct CreateCarePlanArgs {
    /// Name of the care plan
    pub name: String,
    #[arg(long, value_name = "DAYS", help = "Days between waterings")]
    pub watering: Option<u32>,
    #[arg(long, value_name = "DAYS", help = "Days between fertilizings")]
    pub fertilizing: Option<u32>,
    #[arg(long, value_name = "DAYS", help = "Days between cleanings")]
    pub cleaning: Option<u32>,
    #[arg(long, value_name = "DAYS", help = "Days between repottings")]
    pub potting: Option<u32>,
}

impl From<CreateCarePlanArgs> for CreateCarePlan {
    fn from(val: CreateCarePlanArgs) -> Self {
        CreateCarePlan {
            name: val.name,
            watering: val.watering,
            fertilizing: val.fertilizing,
            cleaning: val.cleaning,
            potting: val.potting,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a care plan
    #[command(alias = "a")]
    Add(CreateCarePlanArgs),
    /// List care plans
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Growth phase as accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    Cutting,
    Seed,
    Juvy,
    Adult,
}

impl From<PhaseArg> for Phase {
    fn from(val: PhaseArg) -> Self {
        match val {
            PhaseArg::Cutting => Phase::Cutting,
            PhaseArg::Seed => Phase::Seed,
            PhaseArg::Juvy => Phase::Juvy,
            PhaseArg::Adult => Phase::Adult,
        }
    }
}

#[derive(Args)]
pub struct CreatePlantArgs {
    /// Name of the plant, usually its species
    pub name: String,
    #[arg(long, value_enum, default_value_t = PhaseArg::Adult)]
    pub phase: PhaseArg,
    #[arg(long = "care-plan", value_name = "ID", help = "Care plan the plant follows")]
    pub care_plan_id: Option<u64>,
    #[arg(long, help = "System the plant lives in")]
    pub system: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub watered_on: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub fertilized_on: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub cleansed_on: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub potted_on: Option<String>,
}

impl From<CreatePlantArgs> for CreatePlant {
    fn from(val: CreatePlantArgs) -> Self {
        CreatePlant {
            name: val.name,
            phase: val.phase.into(),
            system: val.system,
            care_plan_id: val.care_plan_id,
            watered_on: val.watered_on,
            fertilized_on: val.fertilized_on,
            cleansed_on: val.cleansed_on,
            potted_on: val.potted_on,
        }
    }
}

/// Quick filters shared by the overdue listing and bulk care
#[derive(Args)]
pub struct QuickFilterArgs {
    #[arg(long, help = "Needs watering")]
    pub water: bool,
    #[arg(long, help = "Needs cleaning")]
    pub cleanse: bool,
    #[arg(long, help = "Needs repotting")]
    pub repot: bool,
}

impl QuickFilterArgs {
    pub fn filters(&self) -> Vec<QuickFilter> {
        [
            (self.water, QuickFilter::Water),
            (self.cleanse, QuickFilter::Cleanse),
            (self.repot, QuickFilter::Repot),
        ]
        .into_iter()
        .filter_map(|(on, filter)| on.then_some(filter))
        .collect()
    }
}

#[derive(Args)]
pub struct ListOverdueArgs {
    #[command(flatten)]
    pub filters: QuickFilterArgs,
    #[arg(short, long, help = "Only plants whose name or system contains this text")]
    pub search: Option<String>,
}

impl From<ListOverdueArgs> for ListOverdue {
    fn from(val: ListOverdueArgs) -> Self {
        ListOverdue {
            filters: val.filters.filters(),
            search: val.search,
        }
    }
}

#[derive(Args)]
pub struct BulkCareArgs {
    #[command(flatten)]
    pub filters: QuickFilterArgs,
    #[arg(short, long, help = "Only plants whose name or system contains this text")]
    pub search: Option<String>,
    #[arg(
        long = "id",
        value_name = "ID",
        help = "Limit the action to these plants (repeatable)"
    )]
    pub ids: Vec<u64>,
}

impl From<BulkCareArgs> for BulkCare {
    fn from(val: BulkCareArgs) -> Self {
        BulkCare {
            filters: val.filters.filters(),
            search: val.search,
            ids: val.ids,
        }
    }
}

#[derive(Subcommand)]
pub enum PlantCommands {
    /// Add a plant
    #[command(alias = "a")]
    Add(CreatePlantArgs),
    /// List plants with their next care days
    #[command(aliases = ["l", "ls"])]
    List,
    /// List plants that need care
    #[command(alias = "o")]
    Overdue(ListOverdueArgs),
    /// Record care for every plant needing the selected actions
    #[command(alias = "c")]
    Care(BulkCareArgs),
}

#[derive(Args)]
pub struct CreateTodoArgs {
    /// Short name of the todo
    pub name: String,
    #[arg(long, value_name = "DATE", help = "Due date (YYYY-MM-DD or ISO date-time)")]
    pub due_on: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateTodoArgs> for CreateTodo {
    fn from(val: CreateTodoArgs) -> Self {
        CreateTodo {
            name: val.name,
            description: val.description,
            due_on: val.due_on,
        }
    }
}

#[derive(Args)]
pub struct MoveTodoArgs {
    #[arg(help = "Unique identifier of the todo to move")]
    pub id: u64,
    #[arg(help = "New due day (YYYY-MM-DD)")]
    pub date: Date,
}

impl From<MoveTodoArgs> for MoveTodo {
    fn from(val: MoveTodoArgs) -> Self {
        MoveTodo {
            id: val.id,
            due_on: val.date,
        }
    }
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a todo
    #[command(alias = "a")]
    Add(CreateTodoArgs),
    /// List todos
    #[command(aliases = ["l", "ls"])]
    List,
    /// Move a todo to another day
    #[command(alias = "mv")]
    Move(MoveTodoArgs),
}

#[derive(Args)]
pub struct CreateGoalArgs {
    /// Short name of the goal
    pub name: String,
    #[arg(long, value_name = "YYYY-MM", help = "Month the goal is due")]
    pub due_month: String,
}

impl From<CreateGoalArgs> for CreateGoal {
    fn from(val: CreateGoalArgs) -> Self {
        CreateGoal {
            name: val.name,
            due_month: val.due_month,
        }
    }
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a goal
    #[command(alias = "a")]
    Add(CreateGoalArgs),
    /// List goals
    #[command(aliases = ["l", "ls"])]
    List,
}

#[derive(Args)]
pub struct CalendarArgs {
    #[arg(long, value_name = "YYYY-MM", help = "Month to show (defaults to the current month)")]
    pub month: Option<CalendarMonth>,
    #[arg(long, value_name = "DATE", help = "Also show the agenda for this day")]
    pub day: Option<Date>,
    #[arg(long, help = "Show the month after the selected one")]
    pub next: bool,
    #[arg(long, conflicts_with = "next", help = "Show the month before the selected one")]
    pub previous: bool,
}

/// First day of the week as accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum WeekStartArg {
    Sunday,
    Monday,
}

impl From<WeekStartArg> for WeekStart {
    fn from(val: WeekStartArg) -> Self {
        match val {
            WeekStartArg::Sunday => WeekStart::Sunday,
            WeekStartArg::Monday => WeekStart::Monday,
        }
    }
}
