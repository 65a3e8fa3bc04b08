use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::RwLock;

use super::{IdentityStore, StoreError};
use crate::models::{UpdateOutcome, User, UserFilter, UserPatch};

/// In-process stand-in for the `users` collection, with the same unique-email rule.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    offline: bool,
}

impl MemoryStore {
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|mut u| {
                u.id.get_or_insert_with(ObjectId::new);
                u
            })
            .collect();
        Self {
            users: RwLock::new(users),
            offline: false,
        }
    }

    /// Every call fails as if the database were unreachable
    pub fn offline() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            offline: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        match filter {
            UserFilter::Email(email) => &user.email == email,
            UserFilter::Id(id) => user.id.as_ref() == Some(id),
        }
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_one(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_one(&self, user: &User) -> Result<ObjectId, StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        users.push(stored);
        Ok(id)
    }

    async fn update_one(&self, filter: &UserFilter, patch: &UserPatch) -> Result<UpdateOutcome, StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(poisoned)?;
        let outcome = match users.iter_mut().find(|u| Self::matches(u, filter)) {
            Some(user) => UpdateOutcome {
                matched: 1,
                modified: patch.apply(user) as u64,
            },
            None => UpdateOutcome::default(),
        };
        Ok(outcome)
    }

    async fn delete_one(&self, filter: &UserFilter) -> Result<u64, StoreError> {
        self.check()?;
        let mut users = self.users.write().map_err(poisoned)?;
        match users.iter().position(|u| Self::matches(u, filter)) {
            Some(idx) => {
                users.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.read().map_err(poisoned)?.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
