use chrono::{DateTime, Utc};

use crate::types::auth::{UserType, UserView};

/// User row including credentials. Only the auth handlers see this type.
#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub contact_num: i64,
    pub username: String,
    pub email: String,
    pub hashed_pass: String,
    pub salt_pass: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for UserView {
    fn from(u: DbUser) -> Self {
        UserView {
            id: u.id,
            contact_num: u.contact_num,
            username: u.username,
            email: u.email,
            user_type: u.user_type,
            created_at: u.created_at,
        }
    }
}

/// Insert payload for a user whose password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub contact_num: i64,
    pub username: String,
    pub email: String,
    pub hashed_pass: String,
    pub salt_pass: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}
