//! Template operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::Template;
use crate::repository::Database;

impl Database {
    // ==================== Template Operations ====================

    /// List all templates in insertion order
    pub async fn list_templates(&self) -> Result<Vec<Template>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, prompt
            FROM templates
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Template::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Insert a new template
    pub async fn insert_template(&self, prompt: &str) -> Result<Template, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO templates (prompt)
            VALUES (?)
            RETURNING id
            "#,
        )
        .bind(prompt)
        .fetch_one(&self.pool)
        .await?;

        Ok(Template {
            id: result.get("id"),
            prompt: prompt.to_string(),
        })
    }

    /// Delete a template, returning whether a row was removed
    pub async fn delete_template(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
