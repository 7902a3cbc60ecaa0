//! Surplus-food listings published by restaurants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A listing as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub restaurant_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub quantity_available: u32,
    pub pickup_start: DateTime<Utc>,
    pub pickup_end: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Listing {
    /// Whether any portions remain to reserve.
    pub fn is_available(&self) -> bool {
        self.quantity_available > 0
    }
}

/// Body submitted by the listing-creation screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub quantity: u32,
    pub pickup_start: DateTime<Utc>,
    pub pickup_end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
