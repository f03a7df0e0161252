use anyhow::Result;
use log::{info, warn};

use crate::storage::StudentRepository;
use shared::{NewStudent, Student};

/// Service for creating and looking up student records.
///
/// Records are immutable once created; an edit in a client produces a new
/// record rather than mutating a stored one.
#[derive(Clone)]
pub struct StudentService {
    students: StudentRepository,
}

impl StudentService {
    pub fn new(students: StudentRepository) -> Self {
        Self { students }
    }

    /// Create a student from a form submission.
    pub async fn create_student(&self, request: NewStudent) -> Result<Student> {
        info!("Creating student: name={}", request.name);

        validate_new_student(&request)?;
        let student = self.students.create_student(&request).await?;

        info!("Created student {} with unique id {}", student.id, student.unique_id);
        Ok(student)
    }

    /// Look up a student by its externally visible identifier.
    pub async fn get_student(&self, unique_id: &str) -> Result<Option<Student>> {
        let student = self.students.get_student_by_unique_id(unique_id).await?;
        if student.is_none() {
            warn!("Student not found: {}", unique_id);
        }
        Ok(student)
    }

    /// List all students, newest first.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.students.list_students().await
    }
}

/// Reject records whose required fields are empty. Also used by the card
/// service, which can create a student embedded in a card request.
pub(crate) fn validate_new_student(request: &NewStudent) -> Result<()> {
    let required = [
        ("name", &request.name),
        ("rollNumber", &request.roll_number),
        ("classDivision", &request.class_division),
        ("busRoute", &request.bus_route),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("Student {} cannot be empty", field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> StudentService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        StudentService::new(StudentRepository::new(db))
    }

    fn new_student(name: &str, roll: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            roll_number: roll.to_string(),
            class_division: "5A".to_string(),
            rack_number: String::new(),
            bus_route: "101".to_string(),
            allergies: vec![],
            photo: String::new(),
            unique_id: None,
            emergency_contact: None,
            blood_group: None,
            date_of_birth: None,
            address: None,
            parent_name: None,
            parent_phone: None,
            custom_fields: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_student_assigns_identity() {
        let service = setup_test().await;

        let student = service
            .create_student(new_student("Asha Varma", "17"))
            .await
            .expect("Failed to create student");

        assert!(student.id > 0);
        assert!(!student.unique_id.is_empty());
        assert!(!student.created_at.is_empty());
        assert_eq!(student.name, "Asha Varma");
    }

    #[tokio::test]
    async fn test_create_student_rejects_empty_required_fields() {
        let service = setup_test().await;

        let mut request = new_student("Asha", "17");
        request.bus_route = "  ".to_string();
        let err = service.create_student(request).await.expect_err("should be rejected");
        assert!(err.to_string().contains("busRoute"));

        assert!(service.create_student(new_student("", "17")).await.is_err());
    }

    #[tokio::test]
    async fn test_get_student_by_unique_id() {
        let service = setup_test().await;

        let created = service
            .create_student(new_student("Asha", "17"))
            .await
            .expect("Failed to create student");

        let found = service
            .get_student(&created.unique_id)
            .await
            .expect("Failed to query student");
        assert_eq!(found, Some(created));

        let missing = service.get_student("no-such-id").await.expect("Failed to query student");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_students_newest_first() {
        let service = setup_test().await;

        let first = service.create_student(new_student("First", "1")).await.unwrap();
        let second = service.create_student(new_student("Second", "2")).await.unwrap();

        let listed = service.list_students().await.expect("Failed to list students");
        assert_eq!(listed.len(), 2);
        // Same-timestamp inserts fall back to identity order, newest first.
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
