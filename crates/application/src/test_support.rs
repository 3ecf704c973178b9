use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use schoolhub_core::{AppError, AppResult, AuthError, AuthResult};
use schoolhub_domain::{Notification, RoleName, RoleState, RoleTransition, UserId};

use crate::{
    AccessTokenClaims, AuthEvent, AuthEventRepository, AuthEventService, NotificationRepository,
    PasswordHasher, PendingAccount, ProfileChanges, TokenCodec, UserRecord, UserRepository,
};

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<HashMap<UserId, UserRecord>>,
    pub(crate) notifications: Mutex<Vec<Notification>>,
    pub(crate) fail_notifications: AtomicBool,
}

impl FakeUserRepository {
    pub(crate) async fn insert(&self, email: &str, password: &str, roles: RoleState) -> UserId {
        let user = UserRecord {
            id: UserId::new(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: email.to_owned(),
            password_hash: format!("hashed:{password}"),
            account_enabled: true,
            roles,
        };
        let user_id = user.id;
        self.users.lock().await.insert(user_id, user);
        user_id
    }

    pub(crate) async fn disable(&self, user_id: UserId) {
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.account_enabled = false;
        }
    }

    pub(crate) async fn roles_of(&self, user_id: UserId) -> Option<RoleState> {
        self.users
            .lock()
            .await
            .get(&user_id)
            .map(|user| user.roles.clone())
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn create_pending_account(&self, account: PendingAccount) -> AppResult<UserId> {
        let mut users = self.users.lock().await;
        if users.values().any(|user| user.email == account.email) {
            return Err(AppError::Conflict("email exists".to_owned()));
        }

        let admins: Vec<UserId> = users
            .values()
            .filter(|user| user.roles.holds(RoleName::Admin))
            .map(|user| user.id)
            .collect();

        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(AppError::Internal("notification insert failed".to_owned()));
        }

        let user_id = UserId::new();
        let now = Utc::now();
        users.insert(
            user_id,
            UserRecord {
                id: user_id,
                first_name: account.first_name,
                last_name: account.last_name,
                email: account.email,
                password_hash: account.password_hash,
                account_enabled: true,
                roles: RoleState::Inactive,
            },
        );
        self.notifications.lock().await.extend(
            admins
                .into_iter()
                .map(|admin| account.admin_notice.addressed_to(admin, now)),
        );

        Ok(user_id)
    }

    async fn transition_roles(
        &self,
        user_id: UserId,
        transition: RoleTransition,
    ) -> AppResult<RoleState> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.roles = user.roles.apply(transition);
        Ok(user.roles.clone())
    }

    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if let Some(email) = &changes.email
            && users
                .values()
                .any(|user| &user.email == email && user.id != user_id)
        {
            return Err(AppError::Conflict("email exists".to_owned()));
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for FakeUserRepository {
    async fn list_for_recipient(
        &self,
        recipient: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let mut owned: Vec<Notification> = self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn mark_read(&self, recipient: UserId, notification_id: Uuid) -> AppResult<bool> {
        let mut notifications = self.notifications.lock().await;
        let target = notifications.iter_mut().find(|notification| {
            notification.id == notification_id && notification.recipient == recipient
        });
        match target {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Codec that "signs" by serializing claims behind a fixed prefix.
pub(crate) struct FakeTokenCodec;

impl TokenCodec for FakeTokenCodec {
    fn encode(&self, claims: &AccessTokenClaims) -> AppResult<String> {
        let roles = claims
            .roles
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!(
            "signed:{}:{roles}:{}:{}",
            claims.sub, claims.iat, claims.exp
        ))
    }

    fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let rest = token
            .strip_prefix("signed:")
            .ok_or(AuthError::Unauthenticated)?;
        let parts: Vec<&str> = rest.split(':').collect();
        let [sub, roles, iat, exp] = parts.as_slice() else {
            return Err(AuthError::Unauthenticated);
        };
        let roles = roles
            .split(',')
            .filter(|value| !value.is_empty())
            .map(|value| value.parse::<i32>().map_err(|_| AuthError::Unauthenticated))
            .collect::<AuthResult<Vec<_>>>()?;

        Ok(AccessTokenClaims {
            sub: (*sub).to_owned(),
            roles,
            iat: iat.parse().map_err(|_| AuthError::Unauthenticated)?,
            exp: exp.parse().map_err(|_| AuthError::Unauthenticated)?,
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeAuthEventRepository {
    pub(crate) events: Mutex<Vec<AuthEvent>>,
}

#[async_trait]
impl AuthEventRepository for FakeAuthEventRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

pub(crate) fn auth_event_service() -> (AuthEventService, Arc<FakeAuthEventRepository>) {
    let repository = Arc::new(FakeAuthEventRepository::default());
    (AuthEventService::new(repository.clone()), repository)
}
