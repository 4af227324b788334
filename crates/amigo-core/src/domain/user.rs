//! User profile entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Bio length ceiling, enforced on profile update.
pub const BIO_MAX_CHARS: usize = 200;

/// Public profile attached to an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            bio: None,
            updated_at: Utc::now(),
        }
    }

    /// Apply a profile edit, validating the bio length.
    pub fn update(&mut self, username: Option<String>, bio: Option<String>) -> Result<(), DomainError> {
        if let Some(bio) = &bio
            && bio.chars().count() > BIO_MAX_CHARS
        {
            return Err(DomainError::Validation(format!(
                "bio exceeds {BIO_MAX_CHARS} characters"
            )));
        }
        self.username = username;
        self.bio = bio;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Single-character avatar initial: the username's first letter, or a
    /// fallback when unset.
    pub fn initial(&self, fallback: &str) -> String {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bio_length_is_enforced() {
        let mut profile = Profile::new(Uuid::new_v4());
        assert!(profile.update(Some("ana".into()), Some("x".repeat(200))).is_ok());
        assert!(profile.update(Some("ana".into()), Some("x".repeat(201))).is_err());
        // A failed update leaves the previous values in place.
        assert_eq!(profile.bio.as_deref(), Some("x".repeat(200)).as_deref());
    }

    #[test]
    fn avatar_initial_prefers_username() {
        let mut profile = Profile::new(Uuid::new_v4());
        assert_eq!(profile.initial("ana@example.com"), "A");
        profile.update(Some("bo".into()), None).unwrap();
        assert_eq!(profile.initial("ana@example.com"), "B");
    }
}
