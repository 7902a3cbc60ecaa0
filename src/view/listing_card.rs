//! Listing card view model

use chrono::{DateTime, Utc};

use crate::format::{format_currency, normalize_image_ref, ImageSource};
use crate::models::Listing;

/// Everything a listing card renders, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCardView {
    pub id: String,
    pub title: String,
    /// Formatted current price
    pub price: String,
    /// Formatted original price, only when it is higher than the current one
    pub original_price: Option<String>,
    /// Whole-percent discount shown in the badge
    pub discount_percent: Option<u32>,
    /// `HH:MM - HH:MM`
    pub pickup_window: String,
    pub items_left: String,
    pub image: Option<ImageSource>,
    pub is_sold_out: bool,
}

impl ListingCardView {
    pub fn from_listing(listing: &Listing) -> Self {
        let discounted_from = listing
            .original_price
            .filter(|original| original.is_finite() && *original > listing.price);

        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            price: format_currency(listing.price),
            original_price: discounted_from.map(format_currency),
            discount_percent: discounted_from
                .map(|original| ((1.0 - listing.price / original) * 100.0).round() as u32),
            pickup_window: pickup_window(&listing.pickup_start, &listing.pickup_end),
            items_left: items_left_label(listing.quantity_available),
            image: normalize_image_ref(listing.image.as_deref()),
            is_sold_out: !listing.is_available(),
        }
    }
}

impl From<&Listing> for ListingCardView {
    fn from(listing: &Listing) -> Self {
        Self::from_listing(listing)
    }
}

pub(crate) fn pickup_window(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
}

fn items_left_label(quantity: u32) -> String {
    match quantity {
        0 => "Sold out".to_string(),
        1 => "1 item left".to_string(),
        n => format!("{} items left", n),
    }
}
