use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use models::page::Page;
use models::people::{MemberFilter, Membership, MembershipStatus, Role, RoleInput, Skill, SkillInput};

use super::quote;
use crate::error::ApiError;
use crate::records::RecordService;

/// Church memberships with role/skill assignment.
#[async_trait]
pub trait MembersApi: Send + Sync {
    async fn list(&self, page: u32, per_page: u32, filter: &MemberFilter) -> Result<Page<Membership>, ApiError>;
    /// The caller's own membership in the active church, if any.
    async fn my_membership(&self) -> Result<Option<Membership>, ApiError>;
    async fn set_roles(&self, member_id: &str, role_ids: &[String]) -> Result<Membership, ApiError>;
    async fn set_skills(&self, member_id: &str, skill_ids: &[String]) -> Result<Membership, ApiError>;
    async fn set_status(&self, member_id: &str, status: MembershipStatus) -> Result<Membership, ApiError>;
}

/// Roles are a small collection; always fetched whole.
#[async_trait]
pub trait RolesApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Role>, ApiError>;
    async fn create(&self, input: &RoleInput) -> Result<Role, ApiError>;
    async fn update(&self, id: &str, input: &RoleInput) -> Result<Role, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SkillsApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Skill>, ApiError>;
    async fn create(&self, input: &SkillInput) -> Result<Skill, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

pub struct HttpMembersApi {
    records: Arc<RecordService>,
}

impl HttpMembersApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

fn member_filter_expr(filter: &MemberFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let q = quote(search);
        parts.push(format!("(name ~ {q} || email ~ {q})"));
    }
    if let Some(role_id) = filter.role_id.as_deref() {
        parts.push(format!("role_ids ~ {}", quote(role_id)));
    }
    if let Some(skill_id) = filter.skill_id.as_deref() {
        parts.push(format!("skill_ids ~ {}", quote(skill_id)));
    }
    if let Some(status) = filter.status {
        let tag = serde_json::to_string(&status).unwrap_or_default();
        parts.push(format!("status = {tag}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" && "))
    }
}

#[async_trait]
impl MembersApi for HttpMembersApi {
    async fn list(&self, page: u32, per_page: u32, filter: &MemberFilter) -> Result<Page<Membership>, ApiError> {
        let expr = member_filter_expr(filter);
        self.records
            .get_list("memberships", page, per_page, expr.as_deref(), Some("name"))
            .await
    }

    async fn my_membership(&self) -> Result<Option<Membership>, ApiError> {
        self.records.get_json("/api/worship/my-membership").await
    }

    async fn set_roles(&self, member_id: &str, role_ids: &[String]) -> Result<Membership, ApiError> {
        self.records.update("memberships", member_id, &json!({ "role_ids": role_ids })).await
    }

    async fn set_skills(&self, member_id: &str, skill_ids: &[String]) -> Result<Membership, ApiError> {
        self.records.update("memberships", member_id, &json!({ "skill_ids": skill_ids })).await
    }

    async fn set_status(&self, member_id: &str, status: MembershipStatus) -> Result<Membership, ApiError> {
        self.records.update("memberships", member_id, &json!({ "status": status })).await
    }
}

pub struct HttpRolesApi {
    records: Arc<RecordService>,
}

impl HttpRolesApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RolesApi for HttpRolesApi {
    async fn list_all(&self) -> Result<Vec<Role>, ApiError> {
        self.records.get_full_list("roles", None, Some("name")).await
    }

    async fn create(&self, input: &RoleInput) -> Result<Role, ApiError> {
        self.records.create("roles", input).await
    }

    async fn update(&self, id: &str, input: &RoleInput) -> Result<Role, ApiError> {
        self.records.update("roles", id, input).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.records.delete("roles", id).await
    }
}

pub struct HttpSkillsApi {
    records: Arc<RecordService>,
}

impl HttpSkillsApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl SkillsApi for HttpSkillsApi {
    async fn list_all(&self) -> Result<Vec<Skill>, ApiError> {
        self.records.get_full_list("skills", None, Some("name")).await
    }

    async fn create(&self, input: &SkillInput) -> Result<Skill, ApiError> {
        self.records.create("skills", input).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.records.delete("skills", id).await
    }
}

/// In-memory mocks for tests.
pub mod mock {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    pub fn sample_member(id: &str, name: &str) -> Membership {
        let now = Utc::now();
        Membership {
            id: id.to_string(),
            church_id: "church1".into(),
            user_id: format!("user-{id}"),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            role_ids: Vec::new(),
            skill_ids: Vec::new(),
            status: MembershipStatus::Active,
            created: now,
            updated: now,
        }
    }

    #[derive(Default)]
    pub struct MockMembersApi {
        pub members: Mutex<Vec<Membership>>,
        pub own: Mutex<Option<Membership>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl MockMembersApi {
        pub fn fail_with(&self, err: ApiError) {
            *self.fail.lock().unwrap() = Some(err);
        }

        fn check(&self) -> Result<(), ApiError> {
            match &*self.fail.lock().unwrap() {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        fn patch<F: FnOnce(&mut Membership)>(&self, member_id: &str, f: F) -> Result<Membership, ApiError> {
            let mut members = self.members.lock().unwrap();
            let member = members
                .iter_mut()
                .find(|m| m.id == member_id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            f(member);
            member.updated = Utc::now();
            Ok(member.clone())
        }
    }

    #[async_trait]
    impl MembersApi for MockMembersApi {
        async fn list(&self, page: u32, per_page: u32, _filter: &MemberFilter) -> Result<Page<Membership>, ApiError> {
            self.check()?;
            let members = self.members.lock().unwrap().clone();
            let total_items = members.len() as u64;
            let total_pages = (total_items as u32).div_ceil(per_page).max(1);
            let start = ((page - 1) * per_page) as usize;
            let items = members.into_iter().skip(start).take(per_page as usize).collect();
            Ok(Page { page, per_page, total_items, total_pages, items })
        }

        async fn my_membership(&self) -> Result<Option<Membership>, ApiError> {
            self.check()?;
            Ok(self.own.lock().unwrap().clone())
        }

        async fn set_roles(&self, member_id: &str, role_ids: &[String]) -> Result<Membership, ApiError> {
            self.check()?;
            self.patch(member_id, |m| m.role_ids = role_ids.to_vec())
        }

        async fn set_skills(&self, member_id: &str, skill_ids: &[String]) -> Result<Membership, ApiError> {
            self.check()?;
            self.patch(member_id, |m| m.skill_ids = skill_ids.to_vec())
        }

        async fn set_status(&self, member_id: &str, status: MembershipStatus) -> Result<Membership, ApiError> {
            self.check()?;
            self.patch(member_id, |m| m.status = status)
        }
    }

    #[derive(Default)]
    pub struct MockRolesApi {
        pub roles: Mutex<Vec<Role>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl MockRolesApi {
        fn check(&self) -> Result<(), ApiError> {
            match &*self.fail.lock().unwrap() {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RolesApi for MockRolesApi {
        async fn list_all(&self) -> Result<Vec<Role>, ApiError> {
            self.check()?;
            Ok(self.roles.lock().unwrap().clone())
        }

        async fn create(&self, input: &RoleInput) -> Result<Role, ApiError> {
            self.check()?;
            let role = Role {
                id: Uuid::new_v4().to_string(),
                church_id: "church1".into(),
                name: input.name.clone(),
                permissions: input.permissions.clone(),
            };
            self.roles.lock().unwrap().push(role.clone());
            Ok(role)
        }

        async fn update(&self, id: &str, input: &RoleInput) -> Result<Role, ApiError> {
            self.check()?;
            let mut roles = self.roles.lock().unwrap();
            let role = roles
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| ApiError::Other("Record not found.".into()))?;
            role.name = input.name.clone();
            role.permissions = input.permissions.clone();
            Ok(role.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.roles.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockSkillsApi {
        pub skills: Mutex<Vec<Skill>>,
        pub fail: Mutex<Option<ApiError>>,
    }

    #[async_trait]
    impl SkillsApi for MockSkillsApi {
        async fn list_all(&self) -> Result<Vec<Skill>, ApiError> {
            if let Some(e) = &*self.fail.lock().unwrap() {
                return Err(e.clone());
            }
            Ok(self.skills.lock().unwrap().clone())
        }

        async fn create(&self, input: &SkillInput) -> Result<Skill, ApiError> {
            if let Some(e) = &*self.fail.lock().unwrap() {
                return Err(e.clone());
            }
            let skill = Skill {
                id: Uuid::new_v4().to_string(),
                church_id: "church1".into(),
                name: input.name.clone(),
            };
            self.skills.lock().unwrap().push(skill.clone());
            Ok(skill)
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            if let Some(e) = &*self.fail.lock().unwrap() {
                return Err(e.clone());
            }
            self.skills.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_with_wire_name() {
        let filter = MemberFilter { status: Some(MembershipStatus::Invited), ..Default::default() };
        assert_eq!(member_filter_expr(&filter).unwrap(), r#"status = "invited""#);
    }
}
