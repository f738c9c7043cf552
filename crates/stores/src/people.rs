use std::sync::Arc;

use tracing::{info, instrument};

use client::api::{MembersApi, RolesApi, SkillsApi};
use client::{ApiError, RealtimeHub};
use models::event::RecordEvent;
use models::people::{MemberFilter, Membership, MembershipStatus, Role, RoleInput, Skill, SkillInput};

use crate::live::{apply_event, decode_event, Applied, CreatePlacement, LiveHandle};
use crate::pagination::PageState;
use crate::reactive::Reactive;

/// Paginated membership list with role/skill assignment mutations.
pub struct MemberStore {
    api: Arc<dyn MembersApi>,
    pub members: Reactive<Vec<Membership>>,
    pub filter: Reactive<MemberFilter>,
    pub page: Reactive<PageState>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl MemberStore {
    pub fn new(api: Arc<dyn MembersApi>, per_page: u32) -> Arc<Self> {
        Arc::new(Self {
            api,
            members: Reactive::new(Vec::new()),
            filter: Reactive::default(),
            page: Reactive::new(PageState::new(per_page)),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    #[instrument(skip(self))]
    pub async fn load(&self, reset_page: bool) -> Result<(), ApiError> {
        if reset_page {
            self.page.update(|p| p.current_page = 1);
        }
        self.loading.set(true);
        self.error.set(None);
        let state = self.page.get();
        let filter = self.filter.get();
        let result = self.api.list(state.current_page, state.per_page, &filter).await;
        let out = match result {
            Ok(page) => {
                self.page.update(|p| p.absorb(page.page, page.total_items, page.total_pages));
                self.members.set(page.items);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        if !self.page.get().in_range(page) {
            return Ok(());
        }
        self.page.update(|p| p.current_page = page);
        self.load(false).await
    }

    pub fn clear_filter(&self) {
        self.filter.set(MemberFilter::default());
    }

    fn patch_local(&self, member: Membership) {
        self.members.update(|list| {
            if let Some(slot) = list.iter_mut().find(|m| m.id == member.id) {
                *slot = member.clone();
            }
        });
    }

    #[instrument(skip(self, role_ids))]
    pub async fn set_roles(&self, member_id: &str, role_ids: Vec<String>) -> Result<Membership, ApiError> {
        self.error.set(None);
        let member = self.api.set_roles(member_id, &role_ids).await.map_err(|e| self.fail(e))?;
        info!(member_id, roles = role_ids.len(), "member roles updated");
        self.patch_local(member.clone());
        Ok(member)
    }

    pub async fn set_skills(&self, member_id: &str, skill_ids: Vec<String>) -> Result<Membership, ApiError> {
        self.error.set(None);
        let member = self.api.set_skills(member_id, &skill_ids).await.map_err(|e| self.fail(e))?;
        self.patch_local(member.clone());
        Ok(member)
    }

    pub async fn set_status(&self, member_id: &str, status: MembershipStatus) -> Result<Membership, ApiError> {
        self.error.set(None);
        let member = self.api.set_status(member_id, status).await.map_err(|e| self.fail(e))?;
        self.patch_local(member.clone());
        Ok(member)
    }

    pub fn apply_event(&self, event: RecordEvent<Membership>) {
        let mut applied = Applied::Ignored;
        self.members.update(|list| {
            applied = apply_event(list, event, CreatePlacement::Prepend);
        });
        match applied {
            Applied::Created => self.page.update(|p| p.total_items += 1),
            Applied::Deleted => self.page.update(|p| p.total_items = p.total_items.saturating_sub(1)),
            Applied::Updated | Applied::Ignored => {}
        }
    }

    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("memberships");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Membership>("memberships", event) {
                    store.apply_event(event);
                }
            }
        }))
    }
}

/// Roles are few; the whole collection is held, unpaginated.
pub struct RoleStore {
    api: Arc<dyn RolesApi>,
    pub roles: Reactive<Vec<Role>>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl RoleStore {
    pub fn new(api: Arc<dyn RolesApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            roles: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let out = match self.api.list_all().await {
            Ok(roles) => {
                self.roles.set(roles);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    pub async fn create(&self, input: RoleInput) -> Result<Role, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let role = self.api.create(&input).await.map_err(|e| self.fail(e))?;
        self.roles.update(|list| list.insert(0, role.clone()));
        Ok(role)
    }

    pub async fn update(&self, id: &str, input: RoleInput) -> Result<Role, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let role = self.api.update(id, &input).await.map_err(|e| self.fail(e))?;
        self.roles.update(|list| {
            if let Some(slot) = list.iter_mut().find(|r| r.id == role.id) {
                *slot = role.clone();
            }
        });
        Ok(role)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        self.api.delete(id).await.map_err(|e| self.fail(e))?;
        self.roles.update(|list| list.retain(|r| r.id != id));
        Ok(())
    }

    pub fn apply_event(&self, event: RecordEvent<Role>) {
        self.roles.update(|list| {
            apply_event(list, event, CreatePlacement::Prepend);
        });
    }

    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("roles");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Role>("roles", event) {
                    store.apply_event(event);
                }
            }
        }))
    }
}

/// Skills mirror roles: a small full-list cache.
pub struct SkillStore {
    api: Arc<dyn SkillsApi>,
    pub skills: Reactive<Vec<Skill>>,
    pub loading: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl SkillStore {
    pub fn new(api: Arc<dyn SkillsApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            skills: Reactive::new(Vec::new()),
            loading: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let out = match self.api.list_all().await {
            Ok(skills) => {
                self.skills.set(skills);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    pub async fn create(&self, input: SkillInput) -> Result<Skill, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let skill = self.api.create(&input).await.map_err(|e| self.fail(e))?;
        self.skills.update(|list| list.insert(0, skill.clone()));
        Ok(skill)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.error.set(None);
        self.api.delete(id).await.map_err(|e| self.fail(e))?;
        self.skills.update(|list| list.retain(|s| s.id != id));
        Ok(())
    }

    pub fn apply_event(&self, event: RecordEvent<Skill>) {
        self.skills.update(|list| {
            apply_event(list, event, CreatePlacement::Prepend);
        });
    }

    pub fn subscribe(self: &Arc<Self>, hub: &Arc<RealtimeHub>) -> LiveHandle {
        let mut sub = hub.subscribe("skills");
        let store = Arc::clone(self);
        LiveHandle::new(tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                if let Some(event) = decode_event::<Skill>("skills", event) {
                    store.apply_event(event);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::api::people::mock::{sample_member, MockMembersApi};
    use models::event::RecordAction;

    #[tokio::test]
    async fn set_roles_patches_held_entry() {
        let api = MockMembersApi::default();
        api.members.lock().unwrap().push(sample_member("m1", "Casey"));
        let store = MemberStore::new(Arc::new(api), 10);
        store.load(true).await.unwrap();

        store.set_roles("m1", vec!["r1".into()]).await.unwrap();
        assert_eq!(store.members.get()[0].role_ids, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn realtime_delete_for_absent_member_leaves_totals_alone() {
        let store = MemberStore::new(Arc::new(MockMembersApi::default()), 10);
        store.page.update(|p| p.total_items = 0);
        store.apply_event(RecordEvent::new(RecordAction::Delete, sample_member("ghost", "Ghost")));
        assert_eq!(store.page.get().total_items, 0);
        assert!(store.members.get().is_empty());
    }
}
