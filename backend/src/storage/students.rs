use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::BTreeMap;

use crate::storage::DbConnection;
use shared::{NewStudent, Student};

/// Repository for student rows.
#[derive(Clone)]
pub struct StudentRepository {
    db: DbConnection,
}

impl StudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a student, assigning row identity, a creation timestamp, and
    /// a unique id when the record doesn't carry one.
    pub async fn create_student(&self, new: &NewStudent) -> Result<Student> {
        let unique_id = new
            .unique_id
            .clone()
            .unwrap_or_else(Student::generate_unique_id);
        let created_at = Utc::now().to_rfc3339();
        let allergies = serde_json::to_string(&new.allergies)?;
        let custom_fields = if new.custom_fields.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&new.custom_fields)?)
        };

        let result = sqlx::query(
            r#"
            INSERT INTO students (
                name, roll_number, class_division, rack_number, bus_route,
                allergies, photo, created_at, unique_id, emergency_contact,
                blood_group, date_of_birth, address, parent_name, parent_phone,
                custom_fields
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.roll_number)
        .bind(&new.class_division)
        .bind(&new.rack_number)
        .bind(&new.bus_route)
        .bind(&allergies)
        .bind(&new.photo)
        .bind(&created_at)
        .bind(&unique_id)
        .bind(&new.emergency_contact)
        .bind(&new.blood_group)
        .bind(&new.date_of_birth)
        .bind(&new.address)
        .bind(&new.parent_name)
        .bind(&new.parent_phone)
        .bind(&custom_fields)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.get_student_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Student {} missing right after insert", id))
    }

    /// Get a student by its storage identity
    pub async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        let row = sqlx::query("SELECT * FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_student).transpose()
    }

    /// Get a student by its externally visible unique id
    pub async fn get_student_by_unique_id(&self, unique_id: &str) -> Result<Option<Student>> {
        let row = sqlx::query("SELECT * FROM students WHERE unique_id = ?")
            .bind(unique_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_student).transpose()
    }

    /// List all students, newest first
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query("SELECT * FROM students ORDER BY created_at DESC, id DESC")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(row_to_student).collect()
    }
}

fn row_to_student(row: &SqliteRow) -> Result<Student> {
    let allergies: String = row.get("allergies");
    let custom_fields: Option<String> = row.get("custom_fields");

    Ok(Student {
        id: row.get("id"),
        name: row.get("name"),
        roll_number: row.get("roll_number"),
        class_division: row.get("class_division"),
        rack_number: row.get("rack_number"),
        bus_route: row.get("bus_route"),
        allergies: serde_json::from_str(&allergies)?,
        photo: row.get("photo"),
        created_at: row.get("created_at"),
        unique_id: row.get("unique_id"),
        emergency_contact: row.get("emergency_contact"),
        blood_group: row.get("blood_group"),
        date_of_birth: row.get("date_of_birth"),
        address: row.get("address"),
        parent_name: row.get("parent_name"),
        parent_phone: row.get("parent_phone"),
        custom_fields: match custom_fields {
            Some(json) => serde_json::from_str(&json)?,
            None => BTreeMap::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> StudentRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        StudentRepository::new(db)
    }

    fn sample() -> NewStudent {
        let mut custom_fields = BTreeMap::new();
        custom_fields.insert("Favorite Color".to_string(), "Blue".to_string());
        NewStudent {
            name: "Asha".to_string(),
            roll_number: "17".to_string(),
            class_division: "5A".to_string(),
            rack_number: "R-1".to_string(),
            bus_route: "101".to_string(),
            allergies: vec!["nuts".to_string(), "dairy".to_string()],
            photo: String::new(),
            unique_id: None,
            emergency_contact: Some("555-0100".to_string()),
            blood_group: None,
            date_of_birth: None,
            address: None,
            parent_name: None,
            parent_phone: None,
            custom_fields,
        }
    }

    #[tokio::test]
    async fn test_structured_fields_round_trip() {
        let repo = setup_test().await;

        let stored = repo.create_student(&sample()).await.expect("Failed to store student");
        let loaded = repo
            .get_student_by_id(stored.id)
            .await
            .expect("Failed to load student")
            .expect("student should exist");

        assert_eq!(loaded, stored);
        assert_eq!(loaded.allergies, vec!["nuts", "dairy"]);
        assert_eq!(loaded.custom_fields.get("Favorite Color"), Some(&"Blue".to_string()));
        assert_eq!(loaded.emergency_contact.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_provided_unique_id_is_kept() {
        let repo = setup_test().await;

        let mut new = sample();
        new.unique_id = Some("given-id".to_string());
        let stored = repo.create_student(&new).await.expect("Failed to store student");
        assert_eq!(stored.unique_id, "given-id");

        let by_unique = repo
            .get_student_by_unique_id("given-id")
            .await
            .expect("Failed to load student");
        assert_eq!(by_unique.map(|s| s.id), Some(stored.id));
    }

    #[tokio::test]
    async fn test_empty_custom_fields_stored_as_null() {
        let repo = setup_test().await;

        let mut new = sample();
        new.custom_fields.clear();
        let stored = repo.create_student(&new).await.expect("Failed to store student");

        let loaded = repo
            .get_student_by_id(stored.id)
            .await
            .expect("Failed to load student")
            .expect("student should exist");
        assert!(loaded.custom_fields.is_empty());
    }
}
