use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, instrument};

use client::api::{MembersApi, RolesApi};
use client::{ApiError, AuthStore};
use models::people::{Membership, Role};

use crate::reactive::Reactive;

/// Permissions the current member holds, flattened from their roles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: BTreeSet<String>,
}

impl PermissionSet {
    pub fn from_roles(membership: &Membership, roles: &[Role]) -> Self {
        let granted = roles
            .iter()
            .filter(|r| membership.role_ids.contains(&r.id))
            .flat_map(|r| r.permissions.iter().cloned())
            .collect();
        Self { granted }
    }

    pub fn can(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

/// The resolved user, active membership, and derived permission set shared by
/// every store. One context is constructed per session and injected; stores
/// never reach for globals.
pub struct ChurchContext {
    pub auth: Arc<AuthStore>,
    pub membership: Reactive<Option<Membership>>,
    pub permissions: Reactive<PermissionSet>,
    pub error: Reactive<Option<String>>,
}

impl ChurchContext {
    pub fn new(auth: Arc<AuthStore>) -> Arc<Self> {
        Arc::new(Self {
            auth,
            membership: Reactive::new(None),
            permissions: Reactive::default(),
            error: Reactive::new(None),
        })
    }

    /// Resolve membership and permissions for the signed-in user.
    #[instrument(skip_all)]
    pub async fn resolve(
        &self,
        members: &dyn MembersApi,
        roles: &dyn RolesApi,
    ) -> Result<(), ApiError> {
        self.error.set(None);
        let result = async {
            let membership = members.my_membership().await?;
            let all_roles = roles.list_all().await?;
            Ok::<_, ApiError>((membership, all_roles))
        }
        .await;
        match result {
            Ok((membership, all_roles)) => {
                let permissions = membership
                    .as_ref()
                    .map(|m| PermissionSet::from_roles(m, &all_roles))
                    .unwrap_or_default();
                info!(resolved = membership.is_some(), "church context resolved");
                self.membership.set(membership);
                self.permissions.set(permissions);
                Ok(())
            }
            Err(e) => {
                self.error.set(Some(e.display_message()));
                Err(e)
            }
        }
    }

    /// Convenience permission check against the current set.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.get().can(permission)
    }
}
