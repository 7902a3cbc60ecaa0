//! Common test utilities for integration tests.
//!
//! Fixtures for users, listings and contexts wired to in-memory adapters.

#![allow(dead_code)]

use green_plate::adapters::{InMemoryStorage, MockHttpClient};
use green_plate::config::AppConfig;
use green_plate::models::{Customer, Preferences, Restaurant, User, UserIdentity};
use green_plate::AppContext;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_API: &str = "http://api.test";

/// A signed-in customer with en-US preferences.
pub fn test_customer() -> User {
    User::Customer(Customer {
        identity: UserIdentity {
            id: "c-1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
        },
        preferences: Preferences {
            language: "en".to_string(),
            currency: "USD".to_string(),
        },
    })
}

pub fn test_restaurant() -> User {
    User::Restaurant(Restaurant {
        identity: UserIdentity {
            id: "r-1".to_string(),
            email: "owner@bistro.example".to_string(),
            name: "Bistro".to_string(),
        },
        address: "1 Main St".to_string(),
    })
}

/// Wire-format listing body.
pub fn listing_json(id: &str, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "restaurantId": "r-1",
        "title": title,
        "price": price,
        "originalPrice": 12.0,
        "quantityAvailable": 3,
        "pickupStart": "2026-10-16T18:00:00Z",
        "pickupEnd": "2026-10-16T19:30:00Z"
    })
}

/// Wire-format reservation body.
pub fn reservation_json(id: &str, listing_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "listingId": listing_id,
        "customerId": "c-1",
        "quantity": 2,
        "totalPrice": 9.0,
        "status": status,
        "pickupCode": "GP-7781",
        "createdAt": "2026-10-16T12:00:00Z"
    })
}

/// A context over `storage` and `http` talking to [`TEST_API`].
pub async fn test_context(
    config: AppConfig,
    storage: InMemoryStorage,
    http: MockHttpClient,
) -> AppContext {
    let config = config.with_api_base_url(TEST_API);
    AppContext::with_parts(&config, Arc::new(storage), Arc::new(http)).await
}
