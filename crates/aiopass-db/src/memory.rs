//! In-memory store

use aiopass_auth::hash_password;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use crate::error::DbError;
use crate::models::{Template, User};
use crate::store::Store;

#[derive(Default)]
struct MemoryState {
    users: HashMap<String, User>,
    templates: BTreeMap<i64, Template>,
    last_user_id: i64,
    last_template_id: i64,
}

/// Store backed by process memory
///
/// Mirrors the SQLite engine's semantics (unique usernames, ids that are
/// never reused) without touching disk. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        Ok(self.state.read().users.get(username).cloned())
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, DbError> {
        // Hash outside the lock
        let password_hash = hash_password(password)?;

        let mut state = self.state.write();
        if state.users.contains_key(username) {
            return Err(DbError::Duplicate(format!("User '{}' already exists", username)));
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            username: username.to_string(),
            password_hash,
        };
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn list_templates(&self) -> Result<Vec<Template>, DbError> {
        Ok(self.state.read().templates.values().cloned().collect())
    }

    async fn add_template(&self, prompt: &str) -> Result<Template, DbError> {
        let mut state = self.state.write();
        state.last_template_id += 1;
        let template = Template {
            id: state.last_template_id,
            prompt: prompt.to_string(),
        };
        state.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn delete_template(&self, id: i64) -> Result<(), DbError> {
        self.state
            .write()
            .templates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound(format!("Template {}", id)))
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}
