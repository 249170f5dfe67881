// Profile store accessor: per-user contact details used to prefill the
// booking form.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::Profile;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,

    #[error("profile backend unavailable: {0}")]
    Unavailable(String),
}

// Editable profile fields. Email is fixed by the identity provider at
// registration and deliberately absent here.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    // Called once when a user registers.
    async fn create(
        &self,
        user_id: &str,
        full_name: &str,
        email: &str,
    ) -> Result<Profile, ProfileError>;

    async fn get(&self, user_id: &str) -> Result<Option<Profile>, ProfileError>;

    async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile, ProfileError>;
}

// In-memory profile backend used by tests and local development.
#[derive(Default)]
pub struct InMemoryProfiles {
    rows: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn create(
        &self,
        user_id: &str,
        full_name: &str,
        email: &str,
    ) -> Result<Profile, ProfileError> {
        let profile = Profile {
            user_id: user_id.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: String::new(),
        };

        self.rows
            .write()
            .insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn get(&self, user_id: &str) -> Result<Option<Profile>, ProfileError> {
        Ok(self.rows.read().get(user_id).cloned())
    }

    async fn update(&self, user_id: &str, update: ProfileUpdate) -> Result<Profile, ProfileError> {
        let mut rows = self.rows.write();
        let profile = rows.get_mut(user_id).ok_or(ProfileError::NotFound)?;

        if let Some(full_name) = update.full_name {
            profile.full_name = full_name;
        }
        if let Some(phone) = update.phone {
            profile.phone = phone;
        }

        Ok(profile.clone())
    }
}
