//! Reservations made by customers against a listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a reservation on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    PickedUp,
    Cancelled,
}

impl ReservationStatus {
    /// Human-readable label for status pills.
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::PickedUp => "Picked up",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the pickup code should still be shown.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub listing_id: String,
    pub customer_id: String,
    pub quantity: u32,
    pub total_price: f64,
    pub status: ReservationStatus,
    /// Payload encoded into the pickup QR code.
    pub pickup_code: String,
    pub created_at: DateTime<Utc>,
}
