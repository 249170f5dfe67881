// Session provider: explicit authentication state backed by an external
// identity service. The handle is passed into the workflow rather than read
// from process-wide globals.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::model::AuthUser;
use crate::profile::{ProfileError, ProfileStore};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("email is already registered")]
    AlreadyRegistered,

    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("identity service unavailable: {0}")]
    Unavailable(String),

    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
}

// Identity provider contract. Only success and the failure class are
// observable, its internals stay opaque.
#[async_trait]
pub trait IdentityService: Send + Sync + 'static {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self, user_id: &str) -> Result<(), AuthError>;
}

// Authentication handle for one client. Signing up also creates the user's
// contact profile, mirroring the backend's registration hook.
pub struct Session {
    identity: Arc<dyn IdentityService>,
    profiles: Arc<dyn ProfileStore>,
    current: RwLock<Option<AuthUser>>,
}

impl Session {
    pub fn new(identity: Arc<dyn IdentityService>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            identity,
            profiles,
            current: RwLock::new(None),
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, AuthError> {
        let user = self.identity.sign_up(email, password, name).await?;
        self.profiles.create(&user.id, name, email).await?;

        *self.current.write() = Some(user.clone());
        tracing::info!(user_id = %user.id, "signed up");
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.identity.sign_in(email, password).await?;

        *self.current.write() = Some(user.clone());
        tracing::info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let signed_in = self.current.write().take();
        if let Some(user) = signed_in {
            self.identity.sign_out(&user.id).await?;
            tracing::info!(user_id = %user.id, "signed out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }
}

struct RegisteredUser {
    id: String,
    password: String,
}

// In-memory identity backend used by tests and local development.
#[derive(Default)]
pub struct InMemoryIdentity {
    users: RwLock<HashMap<String, RegisteredUser>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _name: &str,
    ) -> Result<AuthUser, AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let mut users = self.users.write();
        if users.contains_key(email) {
            return Err(AuthError::AlreadyRegistered);
        }

        let user = AuthUser {
            id: format!("user-{:08x}", rand::random::<u32>()),
            email: email.to_string(),
        };
        users.insert(
            email.to_string(),
            RegisteredUser {
                id: user.id.clone(),
                password: password.to_string(),
            },
        );

        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let users = self.users.read();
        match users.get(email) {
            Some(registered) if registered.password == password => Ok(AuthUser {
                id: registered.id.clone(),
                email: email.to_string(),
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_out(&self, _user_id: &str) -> Result<(), AuthError> {
        Ok(())
    }
}
