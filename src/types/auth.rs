use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, blank};

/// Role discriminator stored with every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    User,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::User => "user",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(UserType::Admin),
            "user" => Some(UserType::User),
            _ => None,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(rename = "ContactNum")]
    pub contact_num: Option<i64>,
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
    #[serde(rename = "Type")]
    pub user_type: Option<UserType>,
}

impl Validate for RegisterRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.contact_num.is_none() {
            missing.push("ContactNum");
        }
        if blank(&self.username) {
            missing.push("Username");
        }
        if blank(&self.email) {
            missing.push("Email");
        }
        if blank(&self.password) {
            missing.push("Password");
        }
        if self.user_type.is_none() {
            missing.push("Type");
        }
        missing
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
    /// Compared against the stored role only after the email and password
    /// checks, so an unknown value is a role mismatch rather than a bad body.
    #[serde(rename = "Type")]
    pub user_type: Option<String>,
}

impl Validate for LoginRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.email) {
            missing.push("Email");
        }
        if blank(&self.password) {
            missing.push("Password");
        }
        if blank(&self.user_type) {
            missing.push("Type");
        }
        missing
    }
}

/// Public view of a user; the password hash and salt never leave the store layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "ContactNum")]
    pub contact_num: i64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Type")]
    pub user_type: UserType,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthOutput {
    pub message: &'static str,
    pub output: UserView,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub message: &'static str,
    pub output: Vec<UserView>,
}

#[derive(Debug, Serialize)]
pub struct AuthCheck {
    pub authenticated: bool,
    pub user: AuthCheckUser,
}

#[derive(Debug, Serialize)]
pub struct AuthCheckUser {
    pub id: i64,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<&UserView> for AuthCheckUser {
    fn from(user: &UserView) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            user_type: user.user_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_login_role_still_deserializes() {
        let req: LoginRequest = serde_json::from_value(json!({
            "Email": "a@b.c",
            "Password": "pw",
            "Type": "superuser"
        }))
        .unwrap();
        assert_eq!(req.user_type.as_deref(), Some("superuser"));
        assert!(req.missing_fields().is_empty());
    }

    #[test]
    fn unknown_registration_role_is_rejected() {
        let res = serde_json::from_value::<RegisterRequest>(json!({
            "ContactNum": 1,
            "Username": "a",
            "Email": "a@b.c",
            "Password": "pw",
            "Type": "superuser"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn login_reports_every_missing_field() {
        let req: LoginRequest = serde_json::from_value(json!({ "Email": " " })).unwrap();
        assert_eq!(req.missing_fields(), vec!["Email", "Password", "Type"]);
    }
}
