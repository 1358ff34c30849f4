use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub owner_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    /// `None` until the first successful update.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub owner_id: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewProfile> for Profile {
    fn from(new: NewProfile) -> Self {
        Self {
            owner_id: new.owner_id,
            display_name: new.display_name,
            bio: new.bio,
            photo_ref: new.photo_ref,
            created_at: new.created_at,
            updated_at: None,
        }
    }
}

/// One optional slot per mutable column. `updated_at` is always written.
#[derive(Debug, Clone)]
pub struct ProfileUpdatePayload {
    pub owner_id: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub photo_ref: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_profile_from_new_profile_has_no_updated_at() {
        let now = Utc::now();
        let profile = Profile::from(NewProfile {
            owner_id: "u1".to_string(),
            display_name: "Ann".to_string(),
            bio: None,
            photo_ref: None,
            created_at: now,
        });

        assert_eq!(profile.owner_id, "u1");
        assert_eq!(profile.display_name, "Ann");
        assert_eq!(profile.created_at, now);
        assert!(profile.bio.is_none());
        assert!(profile.photo_ref.is_none());
        assert!(profile.updated_at.is_none());
    }
}
