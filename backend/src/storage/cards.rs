use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::storage::DbConnection;
use shared::{CardLayout, SavedCard};

/// Repository for saved card rows. Cards reference a student by storage
/// identity; population happens in the domain layer.
#[derive(Clone)]
pub struct CardRepository {
    db: DbConnection,
}

impl CardRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a card, assigning row identity, a creation timestamp, and a
    /// fresh unique id.
    pub async fn create_card(
        &self,
        student_id: i64,
        template: i32,
        custom_layout: Option<&CardLayout>,
    ) -> Result<SavedCard> {
        let unique_id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();
        let layout_json = custom_layout.map(serde_json::to_string).transpose()?;

        let result = sqlx::query(
            r#"
            INSERT INTO saved_cards (student_id, template, created_at, unique_id, custom_layout)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(student_id)
        .bind(template)
        .bind(&created_at)
        .bind(&unique_id)
        .bind(&layout_json)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.get_card_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Card {} missing right after insert", id))
    }

    /// Get a card by its storage identity
    pub async fn get_card_by_id(&self, id: i64) -> Result<Option<SavedCard>> {
        let row = sqlx::query("SELECT * FROM saved_cards WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_card).transpose()
    }

    /// Get a card by its externally visible unique id
    pub async fn get_card_by_unique_id(&self, unique_id: &str) -> Result<Option<SavedCard>> {
        let row = sqlx::query("SELECT * FROM saved_cards WHERE unique_id = ?")
            .bind(unique_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_card).transpose()
    }

    /// List all cards, newest first
    pub async fn list_cards(&self) -> Result<Vec<SavedCard>> {
        let rows = sqlx::query("SELECT * FROM saved_cards ORDER BY created_at DESC, id DESC")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(row_to_card).collect()
    }
}

fn row_to_card(row: &SqliteRow) -> Result<SavedCard> {
    let custom_layout: Option<String> = row.get("custom_layout");

    Ok(SavedCard {
        id: row.get("id"),
        student_id: row.get("student_id"),
        template: row.get("template"),
        created_at: row.get("created_at"),
        unique_id: row.get("unique_id"),
        custom_layout: custom_layout
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
    })
}
