use serde::{Deserialize, Serialize};

use super::{Validate, blank};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl Validate for ContactRequest {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ContactSent {
    pub message: &'static str,
}
