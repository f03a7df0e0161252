//! Column resolution for imported student tables.
//!
//! Imported files arrive with arbitrary header spellings ("Roll Number",
//! "roll_number", "ROLLNUMBER"). Each canonical student field carries an
//! ordered list of accepted spellings; headers are compared after
//! normalization, and the first candidate column with a non-empty value
//! wins. Columns that match no candidate at all are preserved verbatim as
//! custom fields.

use shared::{NewStudent, Student};
use std::collections::BTreeMap;

/// Canonical fields an import cannot omit.
pub const REQUIRED_FIELDS: &[&str] = &["name", "rollNumber", "classDivision", "busRoute"];

/// Accepted header spellings per canonical field, most common first.
/// Both sides of a comparison are normalized, so entries are spelled
/// however reads best.
const HEADER_CANDIDATES: &[(&str, &[&str])] = &[
    ("name", &["name", "student name", "studentname"]),
    ("rollNumber", &["rollnumber", "roll number", "roll", "studentid", "student id"]),
    ("classDivision", &["classdivision", "class division", "class", "division", "grade"]),
    ("busRoute", &["busroute", "bus route", "bus", "route", "transport"]),
    ("rackNumber", &["racknumber", "rack number", "rack"]),
    ("allergies", &["allergies", "allergy"]),
    ("emergencyContact", &["emergencycontact", "emergency contact", "emergency"]),
    ("bloodGroup", &["bloodgroup", "blood group", "blood"]),
    ("dateOfBirth", &["dateofbirth", "date of birth", "dob"]),
    ("address", &["address"]),
    ("parentName", &["parentname", "parent name", "parent"]),
    ("parentPhone", &["parentphone", "parent phone", "phone"]),
];

/// One imported row: (original header, raw cell value) pairs in column order.
pub type Row = Vec<(String, String)>;

/// Errors an import surfaces to the user.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file itself was not parseable; resolution never ran.
    #[error("Could not parse CSV file: {0}")]
    Parse(String),
    /// At least one row had no usable value for a required field; nothing
    /// is imported.
    #[error("CSV data is missing required fields: {}", .missing.join(", "))]
    MissingRequired { missing: Vec<String> },
}

/// Normalize a header for comparison: lowercase, letters and digits only.
fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the value for one canonical field: try candidates in order and
/// return the first matching column with a non-empty value. An empty value
/// falls through to the next candidate, so a present-but-blank cell and a
/// missing column behave identically.
fn resolve_value<'a>(row: &'a Row, candidates: &[&str]) -> Option<&'a str> {
    for candidate in candidates {
        let wanted = normalize_header(candidate);
        if let Some((_, value)) = row.iter().find(|(header, _)| normalize_header(header) == wanted) {
            if !value.is_empty() {
                return Some(value.as_str());
            }
        }
    }
    None
}

fn candidates_for(field: &str) -> &'static [&'static str] {
    HEADER_CANDIDATES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, candidates)| *candidates)
        .unwrap_or(&[])
}

/// True when the header matches any candidate of any canonical field.
fn is_canonical_header(header: &str) -> bool {
    let normalized = normalize_header(header);
    HEADER_CANDIDATES
        .iter()
        .any(|(_, candidates)| candidates.iter().any(|c| normalize_header(c) == normalized))
}

/// Split an allergies cell on commas, trimming each entry.
fn split_allergies(raw: &str) -> Vec<String> {
    raw.split(',').map(|entry| entry.trim().to_string()).collect()
}

/// Map a whole batch of rows onto student records.
///
/// Validation is global and runs before any row is mapped: if any row lacks
/// a usable value for any required field the entire batch is rejected and
/// the error names the missing fields. Row order is preserved in the output.
pub fn map_rows(rows: &[Row]) -> Result<Vec<NewStudent>, ImportError> {
    let mut missing: Vec<String> = Vec::new();
    for row in rows {
        for field in REQUIRED_FIELDS {
            if resolve_value(row, candidates_for(field)).is_none()
                && !missing.iter().any(|m| m == field)
            {
                missing.push((*field).to_string());
            }
        }
    }
    if !missing.is_empty() {
        return Err(ImportError::MissingRequired { missing });
    }

    Ok(rows.iter().map(map_row).collect())
}

/// Map one validated row onto an insertable student record.
fn map_row(row: &Row) -> NewStudent {
    let resolve = |field: &str| resolve_value(row, candidates_for(field));
    let optional = |field: &str| resolve(field).map(str::to_string);

    // Columns no candidate list claims are kept under their original
    // header text; blank cells are dropped.
    let custom_fields: BTreeMap<String, String> = row
        .iter()
        .filter(|(header, value)| !value.is_empty() && !is_canonical_header(header))
        .map(|(header, value)| (header.clone(), value.clone()))
        .collect();

    NewStudent {
        name: resolve("name").unwrap_or_default().to_string(),
        roll_number: resolve("rollNumber").unwrap_or_default().to_string(),
        class_division: resolve("classDivision").unwrap_or_default().to_string(),
        rack_number: resolve("rackNumber").unwrap_or("N/A").to_string(),
        bus_route: resolve("busRoute").unwrap_or_default().to_string(),
        allergies: resolve("allergies").map(split_allergies).unwrap_or_default(),
        photo: String::new(),
        unique_id: Some(Student::generate_unique_id()),
        emergency_contact: optional("emergencyContact"),
        blood_group: optional("bloodGroup"),
        date_of_birth: optional("dateOfBirth"),
        address: optional("address"),
        parent_name: optional("parentName"),
        parent_phone: optional("parentPhone"),
        custom_fields,
    }
}
