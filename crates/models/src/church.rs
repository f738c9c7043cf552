use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::event::HasId;

/// Per-church settings record; exactly one exists per church.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChurchSettings {
    pub id: String,
    pub name: String,
    #[serde(default = "ChurchSettings::default_timezone")]
    pub timezone: String,
    /// Weekday the main service falls on, 0 = Sunday.
    #[serde(default)]
    pub service_day: u8,
    #[serde(default)]
    pub default_service_time: Option<String>,
}

impl ChurchSettings {
    fn default_timezone() -> String {
        "UTC".into()
    }
}

impl HasId for ChurchSettings {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChurchSettingsInput {
    pub name: String,
    pub timezone: String,
    pub service_day: u8,
    #[serde(default)]
    pub default_service_time: Option<String>,
}

impl ChurchSettingsInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("church name must not be empty".into()));
        }
        if self.service_day > 6 {
            return Err(ModelError::Validation("service_day must be in 0..=6".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_rejects_invalid_weekday() {
        let input = ChurchSettingsInput {
            name: "Grace Fellowship".into(),
            timezone: "UTC".into(),
            service_day: 7,
            default_service_time: None,
        };
        assert!(input.validate().is_err());
    }
}
