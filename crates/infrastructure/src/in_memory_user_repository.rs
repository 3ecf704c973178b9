//! Process-local user store for tests and local runs without PostgreSQL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use schoolhub_application::{
    AuthEvent, AuthEventRepository, NotificationRepository, PendingAccount, ProfileChanges,
    UserRecord, UserRepository,
};
use schoolhub_core::{AppError, AppResult};
use schoolhub_domain::{Notification, RoleName, RoleState, RoleTransition, UserId};

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, UserRecord>,
    notifications: Vec<Notification>,
    auth_events: Vec<AuthEvent>,
}

impl StoreState {
    fn email_owner(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }
}

/// In-memory implementation of the user, notification and auth event ports.
///
/// All state sits behind one lock, so each operation is atomic. Multi-step
/// writes are staged and applied only once every step has succeeded.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<StoreState>,
    fail_notification_writes: AtomicBool,
}

impl InMemoryUserRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an account directly, bypassing signup.
    pub async fn seed_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        roles: RoleState,
    ) -> AppResult<UserId> {
        let mut state = self.state.lock().await;
        if state.email_owner(email).is_some() {
            return Err(AppError::Conflict(format!("email '{email}' already exists")));
        }

        let user_id = UserId::new();
        state.users.insert(
            user_id,
            UserRecord {
                id: user_id,
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email: email.to_lowercase(),
                password_hash: password_hash.to_owned(),
                account_enabled: true,
                roles,
            },
        );
        Ok(user_id)
    }

    /// Enables or disables an account.
    pub async fn set_account_enabled(&self, user_id: UserId, enabled: bool) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        user.account_enabled = enabled;
        Ok(())
    }

    /// Makes every subsequent admin notification write fail.
    pub fn fail_notification_writes(&self, fail: bool) {
        self.fail_notification_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    /// Returns a copy of the recorded auth events, oldest first.
    pub async fn auth_events(&self) -> Vec<AuthEvent> {
        self.state.lock().await.auth_events.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.state.lock().await.email_owner(email.trim()).cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn create_pending_account(&self, account: PendingAccount) -> AppResult<UserId> {
        let mut state = self.state.lock().await;
        if state.email_owner(&account.email).is_some() {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user_id = UserId::new();
        let staged_user = UserRecord {
            id: user_id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email.to_lowercase(),
            password_hash: account.password_hash,
            account_enabled: true,
            roles: RoleState::Inactive,
        };

        let created_at = Utc::now();
        let mut staged_notifications = Vec::new();
        for admin in state
            .users
            .values()
            .filter(|user| user.account_enabled && user.roles.holds(RoleName::Admin))
        {
            if self.fail_notification_writes.load(Ordering::SeqCst) {
                return Err(AppError::Internal(
                    "failed to notify administrator: injected failure".to_owned(),
                ));
            }
            staged_notifications.push(account.admin_notice.addressed_to(admin.id, created_at));
        }

        state.users.insert(user_id, staged_user);
        state.notifications.extend(staged_notifications);
        Ok(user_id)
    }

    async fn transition_roles(
        &self,
        user_id: UserId,
        transition: RoleTransition,
    ) -> AppResult<RoleState> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        user.roles = user.roles.apply(transition);
        Ok(user.roles.clone())
    }

    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(email) = &changes.email
            && state
                .email_owner(email)
                .is_some_and(|owner| owner.id != user_id)
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user = state
            .users
            .get_mut(&user_id)
            .filter(|user| user.account_enabled)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email.to_lowercase();
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryUserRepository {
    async fn list_for_recipient(
        &self,
        recipient: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut owned: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn mark_read(&self, recipient: UserId, notification_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.notifications.iter_mut().find(|notification| {
            notification.id == notification_id && notification.recipient == recipient
        }) {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AuthEventRepository for InMemoryUserRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        self.state.lock().await.auth_events.push(event);
        Ok(())
    }
}
