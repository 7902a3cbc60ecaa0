//! Domain data shared by the session store, API layer and view-models.

mod listing;
mod reservation;
mod user;

pub use listing::{Listing, ListingDraft};
pub use reservation::{Reservation, ReservationStatus};
pub use user::{Customer, Preferences, Restaurant, User, UserIdentity, UserRole};
