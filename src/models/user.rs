use serde::{Deserialize, Serialize};

/// Identity returned by the identity provider after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

impl AuthUser {
    /// Avatar letter shown in the app header.
    pub fn initials(&self) -> String {
        self.email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_uppercase_first_letter() {
        let user = AuthUser {
            uid: "u1".into(),
            email: "olena@example.com".into(),
        };
        assert_eq!(user.initials(), "O");

        let blank = AuthUser {
            uid: "u2".into(),
            email: String::new(),
        };
        assert_eq!(blank.initials(), "");
    }
}
