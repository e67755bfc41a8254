use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::cli::{GoalCommands, PlanCommands, PlantCommands, TodoCommands, WeekStartArg};

/// Command-line interface for the Verdant plant care manager
///
/// Verdant tracks when each plant was last watered, fertilized, cleaned and
/// repotted, tells you what is overdue according to its care plan, and keeps
/// a calendar of garden todos and monthly goals.
#[derive(Parser)]
#[command(version, about, name = "verdant")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/verdant/verdant.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Evaluate as of this day (YYYY-MM-DD) instead of now
    #[arg(long, global = true, value_name = "DATE")]
    pub on: Option<Date>,

    /// First day of the calendar week
    #[arg(long, global = true, value_enum, default_value_t = WeekStartArg::Sunday)]
    pub week_start: WeekStartArg,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Verdant CLI
///
/// Without a command, the plants currently needing care are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage care plans
    #[command(alias = "cp")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage plants and record care
    #[command(alias = "p")]
    Plant {
        #[command(subcommand)]
        command: PlantCommands,
    },
    /// Manage todos
    #[command(alias = "t")]
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },
    /// Manage monthly goals
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show the month calendar of todos and goals
    #[command(alias = "cal")]
    Calendar(crate::cli::CalendarArgs),
}
