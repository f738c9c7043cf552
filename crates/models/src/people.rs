use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::event::HasId;

/// A person's membership in a church, with assigned roles and skills.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub id: String,
    pub church_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub skill_ids: Vec<String>,
    pub status: MembershipStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Invited,
    Inactive,
}

impl HasId for Membership {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A named role granting a set of permission strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: String,
    pub church_id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl HasId for Role {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A musical/technical skill members can be tagged with (vocals, drums, sound).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: String,
    pub church_id: String,
    pub name: String,
}

impl HasId for Skill {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoleInput {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl RoleInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("role name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkillInput {
    pub name: String,
}

impl SkillInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("skill name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MemberFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub status: Option<MembershipStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&MembershipStatus::Invited).unwrap(), r#""invited""#);
    }

    #[test]
    fn role_input_requires_name() {
        assert!(RoleInput { name: " ".into(), permissions: vec![] }.validate().is_err());
    }
}
