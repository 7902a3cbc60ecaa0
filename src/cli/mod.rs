//! CLI module for green-plate.
//!
//! A thin command surface over [`AppContext`] for inspecting the persisted
//! session and the backend from a terminal:
//! - Argument parsing
//! - Version and usage display
//! - Session and listing/reservation commands
//!
//! # Usage
//!
//! ```ignore
//! use green_plate::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let ctx = AppContext::open(&AppConfig::from_env()).await?;
//! run_cli_command(command, &ctx, &mut std::io::stdout()).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::io::Write;

use crate::context::AppContext;
use crate::error::GreenPlateError;
use crate::format::build_query_params;
use crate::view::ListingCardView;

pub const USAGE: &str = "\
Usage: green-plate <command>

Commands:
  whoami                  Show the signed-in user
  sign-out                Sign out and forget the saved session
  listings [name=value]   List listings, optionally filtered
  reservation <id>        Show a reservation and its pickup code
  help                    Show this message
  --version               Show the version";

impl CliCommand {
    /// Whether the command talks to storage or the backend.
    pub fn needs_context(&self) -> bool {
        !matches!(
            self,
            CliCommand::Version | CliCommand::Help | CliCommand::Invalid(_)
        )
    }
}

/// Run `command` against `ctx`, writing human-readable output to `out`.
///
/// `Version`, `Help` and `Invalid` are answered without touching `ctx`.
pub async fn run_cli_command<W: Write>(
    command: CliCommand,
    ctx: &AppContext,
    out: &mut W,
) -> Result<()> {
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Invalid(reason) => return Err(eyre!("{}\n\n{}", reason, USAGE)),
        CliCommand::WhoAmI => {
            let view = ctx.session_view();
            match ctx.session().user() {
                Some(user) => writeln!(
                    out,
                    "{} <{}> ({})",
                    user.name(),
                    user.email(),
                    view.role_label()
                )?,
                None => writeln!(out, "Not signed in")?,
            }
        }
        CliCommand::SignOut => {
            ctx.session().sign_out();
            ctx.session().flush().await;
            writeln!(out, "Signed out")?;
        }
        CliCommand::Listings(filters) => {
            let params = build_query_params(Some(filters));
            let listings = ctx.listings(&params).await.map_err(report)?;
            if listings.is_empty() {
                writeln!(out, "No listings found")?;
            }
            for card in listings.iter().map(ListingCardView::from_listing) {
                let was = card
                    .original_price
                    .map(|price| format!(" (was {})", price))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{}  {}{}  pickup {}  {}",
                    card.title, card.price, was, card.pickup_window, card.items_left
                )?;
            }
        }
        CliCommand::Reservation(id) => {
            let view = ctx.reservation_view(&id).await.map_err(report)?;
            writeln!(out, "Reservation {}: {}", view.id, view.status_label)?;
            if let Some(title) = &view.listing_title {
                writeln!(out, "  {}", title)?;
            }
            if let Some(window) = &view.pickup_window {
                writeln!(out, "  Pickup {}", window)?;
            }
            writeln!(out, "  {}, total {}", view.quantity_label, view.total)?;
            if let Some(code) = &view.qr_payload {
                writeln!(out, "  Pickup code: {}", code)?;
            }
        }
    }
    Ok(())
}

fn report(err: GreenPlateError) -> color_eyre::Report {
    eyre!("{} [{}]", err.user_message(), err.error_code())
}
