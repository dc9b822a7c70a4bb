//! User domain model

use serde::Serialize;
use uuid::Uuid;

use super::credential::Password;

/// A ledger user, identified for login by a unique email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Password,
}

impl User {
    /// Create a user that has not been persisted yet
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: Password) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_user_has_no_password() {
        let user = User::new("nome", "email@email.com", Password::plain("senha")).with_id(Uuid::new_v4());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "email@email.com");
        assert!(json.get("password").is_none());
    }
}
