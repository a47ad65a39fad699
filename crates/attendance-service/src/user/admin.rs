//! Admin user management: list, create, update and delete store accounts.
//!
//! Every call runs under the administrative store credential; without one
//! configured these operations answer `FeatureUnavailable`.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use attendance_auth::{CredentialResolver, RoleEnforcer, ScopedClient};
use attendance_core::error::{AppError, ErrorKind};
use attendance_core::result::AppResult;
use attendance_core::types::KeyRange;
use attendance_entity::user::{USER_ID_PREFIX, UserProfile, user_document_id};

use crate::context::RequestContext;

/// The store's account database.
const USERS_DB: &str = "_users";

/// Request to create an account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Profile fields, including name and roles.
    pub profile: UserProfile,
    /// Initial password.
    pub password: String,
}

/// Partial update of an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub roles: Option<Vec<String>>,
    /// Ignored when blank.
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

/// Handles administrative account operations.
#[derive(Debug, Clone)]
pub struct UserAdminService {
    /// Credential resolver.
    resolver: Arc<CredentialResolver>,
    /// Role enforcer.
    roles: Arc<RoleEnforcer>,
}

impl UserAdminService {
    /// Creates a new admin user service.
    pub fn new(resolver: Arc<CredentialResolver>, roles: Arc<RoleEnforcer>) -> Self {
        Self { resolver, roles }
    }

    /// Lists every account profile.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<UserProfile>> {
        self.roles.require_admin(&ctx.session)?;
        let client = self.users_client()?;

        let rows = client
            .all_docs(&KeyRange::prefix(USER_ID_PREFIX, true))
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.doc.as_ref())
            .filter_map(UserProfile::from_document)
            .collect())
    }

    /// Creates an account. An existing name is a `Conflict`.
    pub async fn create(&self, ctx: &RequestContext, req: NewUser) -> AppResult<UserProfile> {
        self.roles.require_admin(&ctx.session)?;
        let name = req.profile.name.trim().to_string();
        if name.is_empty() || req.password.is_empty() {
            return Err(AppError::validation("Username/Password required"));
        }
        let client = self.users_client()?;

        let profile = UserProfile {
            name,
            roles: clean_roles(req.profile.roles),
            ..req.profile
        };
        client
            .put(
                &user_document_id(&profile.name),
                &profile.new_document(&req.password),
            )
            .await
            .map_err(|e| {
                if e.kind == ErrorKind::Conflict {
                    AppError::conflict("User exists").with_backend_status(409)
                } else {
                    e
                }
            })?;

        info!(user = %profile.name, by = %ctx.user_name(), "User created");
        Ok(profile)
    }

    /// Applies a partial update with fetch-modify-put.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        patch: UserPatch,
    ) -> AppResult<UserProfile> {
        self.roles.require_admin(&ctx.session)?;
        let client = self.users_client()?;
        let id = user_document_id(name);

        let mut doc = fetch(&client, &id).await?;
        let Some(fields) = doc.as_object_mut() else {
            return Err(AppError::internal("User document is not an object"));
        };
        if let Some(roles) = patch.roles {
            fields.insert("roles".into(), Value::from(clean_roles(roles)));
        }
        if let Some(password) = patch.password.filter(|p| !p.is_empty()) {
            fields.insert("password".into(), Value::from(password));
        }
        for (key, value) in [
            ("fullName", patch.full_name),
            ("email", patch.email),
            ("department", patch.department),
            ("phone", patch.phone),
        ] {
            if let Some(value) = value {
                fields.insert(key.into(), Value::from(value));
            }
        }

        client.put(&id, &doc).await?;
        info!(user = %name, by = %ctx.user_name(), "User updated");

        UserProfile::from_document(&doc)
            .ok_or_else(|| AppError::internal("Updated user could not be read back"))
    }

    /// Deletes an account.
    pub async fn delete(&self, ctx: &RequestContext, name: &str) -> AppResult<()> {
        self.roles.require_admin(&ctx.session)?;
        let client = self.users_client()?;
        let id = user_document_id(name);

        let doc = fetch(&client, &id).await?;
        let rev = doc
            .get("_rev")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::internal("User document has no revision"))?;
        client.delete(&id, rev).await?;

        info!(user = %name, by = %ctx.user_name(), "User deleted");
        Ok(())
    }

    fn users_client(&self) -> AppResult<ScopedClient> {
        Ok(self.resolver.require_admin_client()?.in_database(USERS_DB))
    }
}

/// Trim role names and drop blanks.
fn clean_roles(roles: Vec<String>) -> Vec<String> {
    roles
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

async fn fetch(client: &ScopedClient, id: &str) -> AppResult<Value> {
    client
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_auth::SessionBridge;
    use attendance_auth::session::MemorySessionRepository;
    use attendance_core::config::{AuthConfig, SessionConfig, StoreConfig};
    use attendance_store::memory::MemoryDocumentStore;

    async fn setup(with_admin: bool) -> (UserAdminService, RequestContext, SessionBridge) {
        let store = Arc::new(
            MemoryDocumentStore::new()
                .with_database("attendance")
                .with_admin("admin", "secret")
                .with_user("alice", "pw", &["app:admin"]),
        );
        let config = StoreConfig {
            url: "memory://".into(),
            admin_user: if with_admin { "admin".into() } else { String::new() },
            admin_password: if with_admin { "secret".into() } else { String::new() },
            ..Default::default()
        };
        let resolver = Arc::new(CredentialResolver::new(store.clone(), &config));
        let bridge = SessionBridge::new(
            store,
            Arc::new(MemorySessionRepository::new(&SessionConfig::default())),
        );
        let ctx = RequestContext::new(bridge.login("alice", "pw").await.unwrap());
        let roles = Arc::new(RoleEnforcer::new(&AuthConfig::default()));
        (UserAdminService::new(resolver, roles), ctx, bridge)
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            profile: UserProfile {
                name: name.into(),
                roles: vec![" staff ".into(), String::new()],
                full_name: "Bob B".into(),
                ..Default::default()
            },
            password: "pw2".into(),
        }
    }

    #[tokio::test]
    async fn test_create_list_and_login() {
        let (service, ctx, bridge) = setup(true).await;
        let created = service.create(&ctx, new_user("bob")).await.unwrap();
        assert_eq!(created.roles, vec!["staff".to_string()]);

        let users = service.list(&ctx).await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        let session = bridge.login("bob", "pw2").await.unwrap();
        assert!(session.has_role("staff"));
    }

    #[tokio::test]
    async fn test_duplicate_user_conflicts() {
        let (service, ctx, _) = setup(true).await;
        service.create(&ctx, new_user("bob")).await.unwrap();
        let err = service.create(&ctx, new_user("bob")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "User exists");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (service, ctx, _) = setup(true).await;
        service.create(&ctx, new_user("bob")).await.unwrap();
        let updated = service
            .update(
                &ctx,
                "bob",
                UserPatch {
                    roles: Some(vec!["app:admin".into()]),
                    email: Some("bob@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.roles, vec!["app:admin".to_string()]);
        assert_eq!(updated.email, "bob@example.com");
        assert_eq!(updated.full_name, "Bob B");

        service.delete(&ctx, "bob").await.unwrap();
        let err = service.delete(&ctx, "bob").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_admin_credential() {
        let (service, ctx, _) = setup(false).await;
        let err = service.list(&ctx).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::FeatureUnavailable);
    }

    #[tokio::test]
    async fn test_create_requires_name_and_password() {
        let (service, ctx, _) = setup(true).await;
        let mut req = new_user("bob");
        req.password.clear();
        let err = service.create(&ctx, req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
