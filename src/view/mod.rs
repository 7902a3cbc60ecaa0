//! View models: data already shaped for the screens that render it.
//!
//! - [`ListingCardView`]: one card in the listings feed
//! - [`ReservationView`]: reservation confirmation and pickup screen
//! - [`SessionView`]: header greeting and route guard

mod listing_card;
mod reservation_view;
mod session_view;

pub use listing_card::ListingCardView;
pub use reservation_view::ReservationView;
pub use session_view::SessionView;
