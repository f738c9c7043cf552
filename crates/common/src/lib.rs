//! Shared plumbing for the worship-planning state layer.
//! - Logging initialization used by embedding applications and tests.
//! - Small cross-crate types that belong to no single domain.

pub mod logging;

use serde::{Deserialize, Serialize};

/// Health snapshot returned by the backend system-status probe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    /// True once the backend has at least one church record provisioned.
    pub provisioned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_roundtrips_through_json() {
        let h = Health { status: "ok".into(), provisioned: false };
        let s = serde_json::to_string(&h).unwrap();
        let back: Health = serde_json::from_str(&s).unwrap();
        assert_eq!(h, back);
    }
}
