//! In-memory identity store.
//!
//! Backs the development server and the test suites. Enumeration order is
//! insertion order, which is the "native order" the partition queries
//! expose. Role-name lookups are case-insensitive, matching the usual
//! normalized-name behavior of relational identity schemas.

use async_trait::async_trait;
use fedadmin_model::{ExternalLogin, Role, User, UserClaim};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::role::RoleStore;
use crate::user::UserStore;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    roles: Vec<Role>,
    /// Membership pairs (user id, role name), in insertion order.
    memberships: Vec<(Uuid, String)>,
}

/// In-memory implementation of [`UserStore`] and [`RoleStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users in the store.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Number of roles in the store.
    #[must_use]
    pub fn role_count(&self) -> usize {
        self.inner.read().roles.len()
    }
}

fn role_exists(inner: &Inner, name: &str) -> bool {
    inner.roles.iter().any(|r| r.name.eq_ignore_ascii_case(name))
}

fn user_exists(inner: &Inner, id: Uuid) -> bool {
    inner.users.iter().any(|u| u.id == id)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if user_exists(&inner, user.id) {
            return Err(StoreError::duplicate("User", "id", user.id.to_string()));
        }
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::duplicate("User", "username", &user.username));
        }

        inner.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write();

        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| StoreError::not_found("User", user.id))?;

        // The username is immutable; keep the stored one.
        let username = stored.username.clone();
        *stored = user.clone();
        stored.username = username;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_by_login(&self, provider: &str, subject: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .find(|u| u.has_login(provider, subject))
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().users.clone())
    }

    async fn add_claims(&self, user_id: Uuid, claims: &[UserClaim]) -> StoreResult<()> {
        let mut inner = self.inner.write();

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::not_found("User", user_id))?;

        for claim in claims {
            user.add_claim(claim.clone());
        }
        Ok(())
    }

    async fn add_login(&self, user_id: Uuid, login: &ExternalLogin) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if inner
            .users
            .iter()
            .any(|u| u.id != user_id && u.has_login(&login.provider, &login.subject))
        {
            return Err(StoreError::duplicate(
                "ExternalLogin",
                "subject",
                &login.subject,
            ));
        }

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::not_found("User", user_id))?;

        user.add_login(login.clone());
        Ok(())
    }

    async fn add_to_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if !user_exists(&inner, user_id) {
            return Err(StoreError::not_found("User", user_id));
        }
        if !role_exists(&inner, role_name) {
            return Err(StoreError::not_found_by_name("Role", role_name));
        }

        let member = inner
            .memberships
            .iter()
            .any(|(id, name)| *id == user_id && name.eq_ignore_ascii_case(role_name));
        if !member {
            inner.memberships.push((user_id, role_name.to_string()));
        }
        Ok(())
    }

    async fn remove_from_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if !user_exists(&inner, user_id) {
            return Err(StoreError::not_found("User", user_id));
        }
        if !role_exists(&inner, role_name) {
            return Err(StoreError::not_found_by_name("Role", role_name));
        }

        inner
            .memberships
            .retain(|(id, name)| *id != user_id || !name.eq_ignore_ascii_case(role_name));
        Ok(())
    }

    async fn is_in_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .memberships
            .iter()
            .any(|(id, name)| *id == user_id && name.eq_ignore_ascii_case(role_name)))
    }

    async fn roles_of(&self, user_id: Uuid) -> StoreResult<Vec<String>> {
        let inner = self.inner.read();

        if !user_exists(&inner, user_id) {
            return Err(StoreError::not_found("User", user_id));
        }

        Ok(inner
            .memberships
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, name)| name.clone())
            .collect())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn create(&self, role: &Role) -> StoreResult<()> {
        let mut inner = self.inner.write();

        if role_exists(&inner, &role.name) {
            return Err(StoreError::duplicate("Role", "name", &role.name));
        }

        inner.roles.push(role.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write();

        let position = inner
            .roles
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("Role", id))?;

        let role = inner.roles.remove(position);
        inner
            .memberships
            .retain(|(_, name)| !name.eq_ignore_ascii_case(&role.name));
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.inner.read().roles.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(self
            .inner
            .read()
            .roles
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Role>> {
        Ok(self.inner.read().roles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // MemoryStore implements both store traits, so calls that share a
    // method name go through the trait explicitly.

    async fn add_user(store: &MemoryStore, user: &User) {
        UserStore::create(store, user).await.unwrap();
    }

    async fn add_role(store: &MemoryStore, role: &Role) {
        RoleStore::create(store, role).await.unwrap();
    }

    fn provisioned_user(username: &str) -> User {
        let mut user = User::new(username);
        user.add_login(ExternalLogin::new("saml2", username));
        user
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let store = MemoryStore::new();
        add_user(&store, &User::new("alice")).await;

        let err = UserStore::create(&store, &User::new("alice"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn lookup_by_login_finds_linked_user() {
        let store = MemoryStore::new();
        let user = provisioned_user("alice");
        add_user(&store, &user).await;

        let found = store.get_by_login("saml2", "alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let missing = store.get_by_login("saml2", "bob").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_preserves_username() {
        let store = MemoryStore::new();
        let mut user = User::new("alice");
        add_user(&store, &user).await;

        user.username = "renamed".to_string();
        user.enabled = true;
        store.update(&user).await.unwrap();

        let stored = UserStore::get_by_id(&store, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.username, "alice");
        assert!(stored.enabled);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = MemoryStore::new();

        let err = store.update(&User::new("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn add_login_rejects_linkage_owned_by_another_user() {
        let store = MemoryStore::new();
        let alice = provisioned_user("alice");
        let bob = User::new("bob");
        add_user(&store, &alice).await;
        add_user(&store, &bob).await;

        let err = store
            .add_login(bob.id, &ExternalLogin::new("saml2", "alice"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn membership_roundtrip_is_idempotent() {
        let store = MemoryStore::new();
        let user = User::new("alice");
        add_user(&store, &user).await;
        add_role(&store, &Role::new("Admins")).await;

        store.add_to_role(user.id, "Admins").await.unwrap();
        store.add_to_role(user.id, "Admins").await.unwrap();

        assert!(store.is_in_role(user.id, "Admins").await.unwrap());
        assert_eq!(store.roles_of(user.id).await.unwrap(), vec!["Admins"]);

        store.remove_from_role(user.id, "Admins").await.unwrap();
        store.remove_from_role(user.id, "Admins").await.unwrap();
        assert!(!store.is_in_role(user.id, "Admins").await.unwrap());
    }

    #[tokio::test]
    async fn add_to_unknown_role_is_not_found() {
        let store = MemoryStore::new();
        let user = User::new("alice");
        add_user(&store, &user).await;

        let err = store.add_to_role(user.id, "Ghosts").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn role_names_are_case_insensitive() {
        let store = MemoryStore::new();
        add_role(&store, &Role::new("Admins")).await;

        let err = RoleStore::create(&store, &Role::new("admins"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());

        let found = store.get_by_name("ADMINS").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn delete_role_cascades_memberships() {
        let store = MemoryStore::new();
        let user = User::new("alice");
        add_user(&store, &user).await;
        let role = Role::new("Admins");
        add_role(&store, &role).await;
        store.add_to_role(user.id, "Admins").await.unwrap();

        store.delete(role.id).await.unwrap();

        assert_eq!(store.role_count(), 0);
        assert!(store.roles_of(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_role_is_not_found() {
        let store = MemoryStore::new();

        let err = store.delete(Uuid::now_v7()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["alice", "bob", "carol"] {
            add_user(&store, &User::new(name)).await;
        }

        let users = UserStore::list(&store).await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}
