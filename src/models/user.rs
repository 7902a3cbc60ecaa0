//! Authenticated user identity.
//!
//! The role is an explicit `role` tag in the serialized form, so a customer
//! record can never be read back as a restaurant or vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields shared by every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Display preferences chosen by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: String,
    pub currency: String,
}

/// A customer account: reserves and picks up listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub identity: UserIdentity,
    pub preferences: Preferences,
}

/// A restaurant account: publishes surplus-food listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(flatten)]
    pub identity: UserIdentity,
    pub address: String,
}

/// Account role, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Restaurant,
}

impl UserRole {
    /// Lowercase label used in logs and the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Customer(Customer),
    Restaurant(Restaurant),
}

impl User {
    /// Shared identity fields.
    pub fn identity(&self) -> &UserIdentity {
        match self {
            User::Customer(c) => &c.identity,
            User::Restaurant(r) => &r.identity,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity().id
    }

    pub fn email(&self) -> &str {
        &self.identity().email
    }

    pub fn name(&self) -> &str {
        &self.identity().name
    }

    pub fn role(&self) -> UserRole {
        match self {
            User::Customer(_) => UserRole::Customer,
            User::Restaurant(_) => UserRole::Restaurant,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match self {
            User::Customer(c) => Some(c),
            User::Restaurant(_) => None,
        }
    }

    pub fn as_restaurant(&self) -> Option<&Restaurant> {
        match self {
            User::Restaurant(r) => Some(r),
            User::Customer(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> User {
        User::Customer(Customer {
            identity: UserIdentity {
                id: "u-1".to_string(),
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
            },
            preferences: Preferences {
                language: "en".to_string(),
                currency: "USD".to_string(),
            },
        })
    }

    #[test]
    fn test_customer_serializes_with_role_tag() {
        let json = serde_json::to_value(customer()).unwrap();
        assert_eq!(json["role"], "customer");
        assert_eq!(json["id"], "u-1");
        assert_eq!(json["preferences"]["currency"], "USD");
    }

    #[test]
    fn test_restaurant_deserializes() {
        let json = r#"{
            "role": "restaurant",
            "id": "r-9",
            "email": "hello@bistro.example",
            "name": "Bistro",
            "address": "12 Market St"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role(), UserRole::Restaurant);
        assert_eq!(user.as_restaurant().unwrap().address, "12 Market St");
        assert!(user.as_customer().is_none());
    }

    #[test]
    fn test_partial_user_is_rejected() {
        // Customer without preferences
        let json = r#"{"role":"customer","id":"u-1","email":"a@b.c","name":"A"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());

        // Missing role
        let json = r#"{"id":"u-1","email":"a@b.c","name":"A","address":"x"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_accessors() {
        let user = customer();
        assert_eq!(user.id(), "u-1");
        assert_eq!(user.email(), "ana@example.com");
        assert_eq!(user.name(), "Ana");
        assert_eq!(user.role().to_string(), "customer");
    }
}
