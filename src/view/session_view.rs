//! Session view model

use crate::models::UserRole;
use crate::session::Session;

/// What the header and route guard need to know about the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    /// Display name, `None` when signed out
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    /// Still restoring or signing in
    pub is_loading: bool,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        Self {
            display_name: session.user.as_ref().map(|u| u.name().to_string()),
            role: session.user.as_ref().map(|u| u.role()),
            is_loading: session.is_loading,
        }
    }

    /// Greeting line for the header.
    pub fn greeting(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Hi, {}", name),
            None => "Welcome".to_string(),
        }
    }

    pub fn role_label(&self) -> &'static str {
        match self.role {
            Some(UserRole::Customer) => "Customer",
            Some(UserRole::Restaurant) => "Restaurant",
            None => "Guest",
        }
    }

    /// Whether protected screens should redirect to the login screen.
    ///
    /// Never redirects while the session is still loading.
    pub fn requires_login(&self) -> bool {
        !self.is_loading && self.role.is_none()
    }
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self::from_session(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Restaurant, User, UserIdentity};

    #[test]
    fn test_signed_out_view() {
        let view = SessionView::from_session(&Session::default());
        assert_eq!(view.greeting(), "Welcome");
        assert_eq!(view.role_label(), "Guest");
        assert!(view.requires_login());
    }

    #[test]
    fn test_loading_never_redirects() {
        let session = Session {
            user: None,
            is_loading: true,
        };
        assert!(!SessionView::from(&session).requires_login());
    }

    #[test]
    fn test_signed_in_restaurant() {
        let session = Session {
            user: Some(User::Restaurant(Restaurant {
                identity: UserIdentity {
                    id: "r-1".to_string(),
                    email: "owner@bistro.example".to_string(),
                    name: "Bistro".to_string(),
                },
                address: "1 Main St".to_string(),
            })),
            is_loading: false,
        };
        let view = SessionView::from_session(&session);
        assert_eq!(view.greeting(), "Hi, Bistro");
        assert_eq!(view.role_label(), "Restaurant");
        assert!(!view.requires_login());
    }
}
