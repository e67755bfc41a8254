//! Verdant CLI Application
//!
//! Command-line interface for the Verdant plant care manager.

mod args;
mod cli;
mod handlers;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handlers::Handler;
use jiff::{tz::TimeZone, Zoned};
use log::info;
use renderer::TerminalRenderer;
use verdant_core::{params::ListOverdue, GardenBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        on,
        week_start,
        command,
    } = Args::parse();

    let mut builder = GardenBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    let garden = builder.build().await.context("Failed to initialize garden")?;

    // The clock is read once, here; everything below evaluates against `now`.
    let now = match on {
        Some(day) => day
            .to_zoned(TimeZone::system())
            .context("Failed to resolve --on in the local time zone")?,
        None => Zoned::now(),
    };
    info!("Verdant started as of {now}");

    let handler = Handler::new(garden, TerminalRenderer::new(!no_color), now, week_start.into());

    match command {
        Some(Plan { command }) => handler.handle_plan_command(command).await,
        Some(Plant { command }) => handler.handle_plant_command(command).await,
        Some(Todo { command }) => handler.handle_todo_command(command).await,
        Some(Goal { command }) => handler.handle_goal_command(command).await,
        Some(Calendar(args)) => handler.show_calendar(args).await,
        None => handler.list_overdue(&ListOverdue::default()).await,
    }
}
