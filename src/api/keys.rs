//! Canonical cache keys for backend reads.
//!
//! Every read of the same endpoint with the same parameters must map to the
//! same key, so screens build keys here rather than by hand.

use crate::query::QueryKey;

/// Prefix shared by every listings query, filtered or not.
pub fn all_listings() -> QueryKey {
    QueryKey::new(["listings"])
}

pub fn listings(params: &[(String, String)]) -> QueryKey {
    QueryKey::from_request("listings", params)
}

pub fn listing(id: &str) -> QueryKey {
    QueryKey::new(["listing", id])
}

pub fn reservation(id: &str) -> QueryKey {
    QueryKey::new(["reservation", id])
}

pub fn reservations_for(customer_id: &str) -> QueryKey {
    QueryKey::new(["reservations", customer_id])
}
