//! Reservation detail view model

use crate::format::format_currency;
use crate::models::{Listing, Reservation, ReservationStatus};

use super::listing_card::pickup_window;

/// A reservation ready for the confirmation and pickup screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationView {
    pub id: String,
    pub status: ReservationStatus,
    pub status_label: &'static str,
    pub total: String,
    pub quantity_label: String,
    /// Encoded into the QR code; `None` once the reservation is closed.
    pub qr_payload: Option<String>,
    pub listing_title: Option<String>,
    pub pickup_window: Option<String>,
}

impl ReservationView {
    pub fn new(reservation: &Reservation, listing: Option<&Listing>) -> Self {
        let quantity_label = match reservation.quantity {
            1 => "1 portion".to_string(),
            n => format!("{} portions", n),
        };

        Self {
            id: reservation.id.clone(),
            status: reservation.status,
            status_label: reservation.status.label(),
            total: format_currency(reservation.total_price),
            quantity_label,
            qr_payload: reservation
                .status
                .is_active()
                .then(|| reservation.pickup_code.clone()),
            listing_title: listing.map(|l| l.title.clone()),
            pickup_window: listing.map(|l| pickup_window(&l.pickup_start, &l.pickup_end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: "res-1".to_string(),
            listing_id: "l-1".to_string(),
            customer_id: "c-1".to_string(),
            quantity: 2,
            total_price: 9.0,
            status,
            pickup_code: "GP-7781".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_active_reservation_shows_qr() {
        let view = ReservationView::new(&reservation(ReservationStatus::Confirmed), None);
        assert_eq!(view.total, "$9.00");
        assert_eq!(view.status_label, "Confirmed");
        assert_eq!(view.quantity_label, "2 portions");
        assert_eq!(view.qr_payload.as_deref(), Some("GP-7781"));
        assert!(view.listing_title.is_none());
        assert!(view.pickup_window.is_none());
    }

    #[test]
    fn test_closed_reservation_hides_qr() {
        let view = ReservationView::new(&reservation(ReservationStatus::PickedUp), None);
        assert_eq!(view.status_label, "Picked up");
        assert!(view.qr_payload.is_none());
    }

    #[test]
    fn test_listing_details_included() {
        let listing = Listing {
            id: "l-1".to_string(),
            restaurant_id: "r-1".to_string(),
            title: "Soup of the day".to_string(),
            description: None,
            price: 4.5,
            original_price: None,
            quantity_available: 1,
            pickup_start: Utc.with_ymd_and_hms(2026, 10, 16, 20, 0, 0).unwrap(),
            pickup_end: Utc.with_ymd_and_hms(2026, 10, 16, 21, 0, 0).unwrap(),
            image: None,
        };
        let view = ReservationView::new(&reservation(ReservationStatus::Pending), Some(&listing));
        assert_eq!(view.listing_title.as_deref(), Some("Soup of the day"));
        assert_eq!(view.pickup_window.as_deref(), Some("20:00 - 21:00"));
    }
}
