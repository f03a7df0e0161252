use anyhow::Result;
use log::info;

use crate::domain::columns::{self, ImportError, Row};
use crate::storage::StudentRepository;
use shared::ImportStudentsResponse;

/// Service for bulk-importing students from an uploaded CSV file.
#[derive(Clone)]
pub struct ImportService {
    students: StudentRepository,
}

impl ImportService {
    pub fn new(students: StudentRepository) -> Self {
        Self { students }
    }

    /// Import a whole CSV file (header row + data rows, UTF-8).
    ///
    /// All-or-nothing: a parse error or a failed required-field check
    /// rejects the batch before any record is stored. Returns the stored
    /// records in input row order.
    pub async fn import_csv(&self, csv_text: &str) -> Result<ImportStudentsResponse> {
        let rows = parse_rows(csv_text)?;
        info!("Importing {} rows from CSV", rows.len());

        let records = columns::map_rows(&rows)?;

        let mut students = Vec::with_capacity(records.len());
        for record in &records {
            students.push(self.students.create_student(record).await?);
        }

        info!("Imported {} students", students.len());
        Ok(ImportStudentsResponse {
            success_message: format!("Imported {} students from CSV", students.len()),
            students,
        })
    }
}

/// Parse CSV text into (header, value) rows, preserving column order.
/// Ragged rows are a parse error, reported before any resolution runs.
fn parse_rows(csv_text: &str) -> Result<Vec<Row>, ImportError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Parse(e.to_string()))?;
        let row: Row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
