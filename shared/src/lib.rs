use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Canonical student record as stored by the backend.
///
/// `id` is the storage-assigned row identity; `unique_id` is the externally
/// visible identifier embedded in QR payloads and used for API lookups.
/// JSON field names are camelCase because card fields reference record
/// properties by those spellings (see [`CardField::value`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
    pub class_division: String,
    /// Locker/rack assignment; defaults to "N/A" when an import has no value.
    pub rack_number: String,
    pub bus_route: String,
    /// Ordered list, stored as a JSON text column.
    pub allergies: Vec<String>,
    /// Opaque image reference (URL or data URI); may be empty.
    pub photo: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub unique_id: String,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    /// Import columns that matched no canonical field, keyed by their
    /// original header text. Stored as a JSON text column.
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

impl Student {
    /// Generate a fresh externally visible identifier.
    pub fn generate_unique_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Insert form of [`Student`]: what a form submission or CSV import carries
/// before storage assigns row identity and a creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub class_division: String,
    #[serde(default)]
    pub rack_number: String,
    pub bus_route: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub photo: String,
    /// Generated when absent.
    #[serde(default)]
    pub unique_id: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

/// Kind of content a card field renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Image,
    Qrcode,
}

/// One positioned element of a card layout.
///
/// `value` is a reference, not content: a canonical student property name
/// ("name", "rollNumber", ...), the sentinel "photo" or "qrcode", or a
/// "customFields.<key>" path. Geometry is in card-canvas pixels and is
/// passed through to the renderer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub value: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

/// A reusable visual arrangement: ordered fields plus card-wide colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLayout {
    pub fields: Vec<CardField>,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
}

/// Template selector carried by a saved card.
///
/// Selectors 1 and 2 are the built-in arrangements; 3 means the card carries
/// its own [`CardLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTemplate {
    Classic,
    Modern,
    Custom,
}

impl CardTemplate {
    pub fn from_selector(selector: i32) -> Option<Self> {
        match selector {
            1 => Some(CardTemplate::Classic),
            2 => Some(CardTemplate::Modern),
            3 => Some(CardTemplate::Custom),
            _ => None,
        }
    }

    pub fn selector(self) -> i32 {
        match self {
            CardTemplate::Classic => 1,
            CardTemplate::Modern => 2,
            CardTemplate::Custom => 3,
        }
    }
}

/// A generated card as stored: a student reference plus the template choice.
/// Cards are immutable once created; re-editing produces a new card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub id: i64,
    pub student_id: i64,
    pub template: i32,
    pub created_at: String,
    pub unique_id: String,
    /// Present exactly when `template` is the custom selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_layout: Option<CardLayout>,
}

/// A saved card with its student populated, as returned by every card read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCardWithStudent {
    #[serde(flatten)]
    pub card: SavedCard,
    pub student: Student,
}

/// Request body for POST /api/saved-cards.
///
/// Either `student_id` references an existing student, or `student` embeds
/// one to be created (or matched by its `unique_id`) together with the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub student: Option<NewStudent>,
    pub template: i32,
    #[serde(default)]
    pub custom_layout: Option<CardLayout>,
}

/// Response for POST /api/students/import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStudentsResponse {
    pub students: Vec<Student>,
    pub success_message: String,
}

/// One card field together with the concrete value a renderer should draw:
/// text content, the photo reference, or a serialized QR payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub field: CardField,
    pub value: String,
}

/// Response for GET /api/saved-cards/:uniqueId/preview, carrying everything
/// a rendering collaborator needs to draw the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreviewResponse {
    pub fields: Vec<ResolvedField>,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
}
