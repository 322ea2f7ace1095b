//! Credential and template store contract

use aiopass_auth::hash_password;
use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, Template, User};
use crate::repository::Database;

/// Store trait
///
/// The single storage contract the API layer depends on. Implementations
/// must be safe to share across concurrent requests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Look up a user. Absence is `Ok(None)`, not an error.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Hash the password and persist a new user
    ///
    /// Fails with `DbError::Duplicate` if the username is taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, DbError>;

    /// List every template, ordered by id
    async fn list_templates(&self) -> Result<Vec<Template>, DbError>;

    /// Add a template
    async fn add_template(&self, prompt: &str) -> Result<Template, DbError>;

    /// Delete a template, failing with `DbError::NotFound` for unknown ids
    async fn delete_template(&self, id: i64) -> Result<(), DbError>;

    /// Check that the backing storage answers queries
    async fn health_check(&self) -> Result<(), DbError>;
}

#[async_trait]
impl Store for Database {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, DbError> {
        let password_hash = hash_password(password)?;
        self.insert_user(NewUser {
            username: username.to_string(),
            password_hash,
        })
        .await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, DbError> {
        Database::list_templates(self).await
    }

    async fn add_template(&self, prompt: &str) -> Result<Template, DbError> {
        self.insert_template(prompt).await
    }

    async fn delete_template(&self, id: i64) -> Result<(), DbError> {
        if Database::delete_template(self, id).await? {
            Ok(())
        } else {
            Err(DbError::NotFound(format!("Template {}", id)))
        }
    }

    async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use aiopass_auth::verify_password;
    use std::sync::Arc;

    async fn engines() -> Vec<(&'static str, Arc<dyn Store>)> {
        vec![
            (
                "sqlite",
                Arc::new(Database::in_memory().await.unwrap()) as Arc<dyn Store>,
            ),
            ("memory", Arc::new(MemoryStore::new()) as Arc<dyn Store>),
        ]
    }

    #[tokio::test]
    async fn test_created_user_verifies_and_hides_plaintext() {
        for (name, store) in engines().await {
            let created = store.create_user("alice", "wonderland-42").await.unwrap();
            let found = store
                .find_user_by_username("alice")
                .await
                .unwrap()
                .unwrap_or_else(|| panic!("{}: user missing", name));

            assert_eq!(found.id, created.id, "{}", name);
            assert_eq!(found.username, "alice", "{}", name);
            assert_ne!(found.password_hash, "wonderland-42", "{}", name);
            assert!(!found.password_hash.contains("wonderland-42"), "{}", name);
            assert!(verify_password("wonderland-42", &found.password_hash).unwrap(), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        for (name, store) in engines().await {
            let found = store.find_user_by_username("nobody").await.unwrap();
            assert!(found.is_none(), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        for (name, store) in engines().await {
            store.create_user("bob", "first-password").await.unwrap();
            let second = store.create_user("bob", "second-password").await;
            assert!(matches!(second, Err(DbError::Duplicate(_))), "{}", name);

            // The original credential is untouched
            let user = store.find_user_by_username("bob").await.unwrap().unwrap();
            assert!(verify_password("first-password", &user.password_hash).unwrap(), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_concurrent_registration_yields_one_user() {
        for (name, store) in engines().await {
            let (a, b) = tokio::join!(
                store.create_user("carol", "password-one"),
                store.create_user("carol", "password-two"),
            );

            let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
            assert_eq!(successes, 1, "{}", name);
            let failure = if a.is_err() { a } else { b };
            assert!(matches!(failure, Err(DbError::Duplicate(_))), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_template_add_list_delete() {
        for (name, store) in engines().await {
            assert!(store.list_templates().await.unwrap().is_empty(), "{}", name);

            let added = store.add_template("Hello").await.unwrap();
            let listed = store.list_templates().await.unwrap();
            assert_eq!(listed, vec![added.clone()], "{}", name);
            assert_eq!(listed[0].prompt, "Hello", "{}", name);

            store.delete_template(added.id).await.unwrap();
            assert!(store.list_templates().await.unwrap().is_empty(), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_template_leaves_table_unchanged() {
        for (name, store) in engines().await {
            let first = store.add_template("one").await.unwrap();
            let second = store.add_template("two").await.unwrap();

            let result = store.delete_template(second.id + 100).await;
            assert!(matches!(result, Err(DbError::NotFound(_))), "{}", name);

            let listed = store.list_templates().await.unwrap();
            assert_eq!(listed, vec![first, second], "{}", name);
        }
    }

    #[tokio::test]
    async fn test_template_ids_are_not_reused() {
        for (name, store) in engines().await {
            let first = store.add_template("first").await.unwrap();
            store.delete_template(first.id).await.unwrap();
            let second = store.add_template("second").await.unwrap();
            assert!(second.id > first.id, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        for (name, store) in engines().await {
            assert!(store.health_check().await.is_ok(), "{}", name);
        }

        let db = Database::in_memory().await.unwrap();
        db.pool().close().await;
        assert!(matches!(
            Store::health_check(&db).await,
            Err(DbError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_sqlite_file_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("aiopass.db").display());

        {
            let db = Database::new(&url).await.unwrap();
            Store::create_user(&db, "dave", "persistent-pw").await.unwrap();
            Store::add_template(&db, "kept").await.unwrap();
            db.pool().close().await;
        }

        let db = Database::new(&url).await.unwrap();
        assert_eq!(db.count_users().await.unwrap(), 1);
        let templates = Store::list_templates(&db).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].prompt, "kept");
    }
}
