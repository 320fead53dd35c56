//! `evently booking` - book events and look bookings up

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use evently_store::models::{BookingPatch, NewBooking};
use evently_store::BookingRepo;
use tracing::info;
use uuid::Uuid;

use super::{print_json, store};

#[derive(Parser, Debug)]
pub struct BookingArgs {
    #[command(subcommand)]
    pub command: BookingCommands,
}

#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// Book an event for an email address
    Create(CreateArgs),
    /// Move a booking to another event or change its email
    Update(UpdateArgs),
    /// Show one booking
    Get(GetArgs),
    /// List bookings for an event or an email address
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Event to book
    pub event_id: Uuid,

    /// Attendee email
    pub email: String,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Booking id
    pub id: Uuid,

    /// New event id (must exist)
    #[arg(long)]
    pub event_id: Option<Uuid>,

    /// New attendee email
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Booking id
    pub id: Uuid,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("filter").required(true).args(["event", "email"])))]
pub struct ListArgs {
    /// Bookings for this event id
    #[arg(long)]
    pub event: Option<Uuid>,

    /// Bookings made with this email
    #[arg(long)]
    pub email: Option<String>,
}

pub async fn run_booking(args: BookingArgs) -> Result<()> {
    let repo = BookingRepo::new(store().await?);

    match args.command {
        BookingCommands::Create(args) => {
            let booking = repo
                .create(NewBooking {
                    event_id: Some(args.event_id),
                    email: Some(args.email),
                })
                .await?;
            info!(id = %booking.id, event_id = %booking.event_id, "created booking");
            print_json(&booking)
        }
        BookingCommands::Update(args) => {
            let patch = BookingPatch {
                event_id: args.event_id,
                email: args.email,
            };
            print_json(&repo.update(args.id, patch).await?)
        }
        BookingCommands::Get(args) => print_json(&repo.get(args.id).await?),
        BookingCommands::List(args) => {
            let bookings = match (args.event, args.email) {
                (Some(event_id), _) => repo.list_for_event(event_id).await?,
                (None, Some(email)) => repo.list_for_email(&email).await?,
                (None, None) => Vec::new(),
            };
            print_json(&bookings)
        }
    }
}
