use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewUser> for User {
    fn from(new: NewUser) -> Self {
        Self {
            id: new.id,
            email: new.email,
            display_name: new.display_name,
            created_at: new.created_at,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserUpdatePayload {
    pub id: String,
    pub display_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}
