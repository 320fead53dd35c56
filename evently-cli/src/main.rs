//! evently CLI - manage events and bookings from the command line
//!
//! Every command connects through the shared pool in `evently-store`, so
//! `DATABASE_URL` must be set (directly, in `./.env`, or in
//! `~/.evently/.env`). Records are printed as pretty JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evently_store::db::migrations;
use evently_store::get_connection;

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "evently",
    author,
    version,
    about = "Manage events and bookings stored in PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the events and bookings tables if they are missing
    Migrate,
    /// Event operations (create, update, get, list)
    Event(commands::event::EventArgs),
    /// Booking operations (create, update, get, list)
    Booking(commands::booking::BookingArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    config::load_dotenv();

    match cli.command {
        Commands::Migrate => run_migrate().await?,
        Commands::Event(args) => commands::run_event(args).await?,
        Commands::Booking(args) => commands::run_booking(args).await?,
    }
    Ok(())
}

async fn run_migrate() -> Result<()> {
    let pool = get_connection()
        .await
        .context("Could not connect to the database")?;
    migrations::run(&pool).await.context("Migrations failed")?;
    Ok(())
}
