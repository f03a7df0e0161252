//! Card layout resolution.
//!
//! A layout is a declarative list of positioned fields; resolving one
//! against a student record produces the concrete value each field should
//! render: text content, the photo reference, or a serialized QR payload.
//! Resolution is pure and deterministic: no I/O, no failures. A missing
//! property renders as an empty string rather than blocking the rest of
//! the card, and geometry passes through to the renderer untouched.

use serde::Serialize;
use shared::{CardField, CardLayout, CardTemplate, FieldType, ResolvedField, Student};

const CUSTOM_FIELD_PREFIX: &str = "customFields.";

/// Subset of a student record embedded in a scannable code. Large fields
/// (photo, address, custom fields) are excluded to keep the encoded payload
/// short enough for reliable optical scanning.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    id: i64,
    name: &'a str,
    roll_number: &'a str,
    class_division: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rack_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bus_route: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unique_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allergies: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blood_group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emergency_contact: Option<&'a str>,
}

/// Serialize the QR payload for a student under the given template policy.
///
/// Every template carries the identity core (id, name, roll, class). The
/// built-ins add the transport and lookup fields plus their own extras;
/// a custom layout stays at the minimum because it may embed several QR
/// fields on one card.
pub fn qr_payload(student: &Student, template: CardTemplate) -> String {
    let core = QrPayload {
        id: student.id,
        name: &student.name,
        roll_number: &student.roll_number,
        class_division: &student.class_division,
        rack_number: None,
        bus_route: None,
        unique_id: None,
        allergies: None,
        blood_group: None,
        emergency_contact: None,
    };

    let payload = match template {
        CardTemplate::Custom => core,
        CardTemplate::Classic => QrPayload {
            rack_number: Some(&student.rack_number),
            bus_route: Some(&student.bus_route),
            unique_id: Some(&student.unique_id),
            allergies: Some(&student.allergies),
            ..core
        },
        CardTemplate::Modern => QrPayload {
            rack_number: Some(&student.rack_number),
            bus_route: Some(&student.bus_route),
            unique_id: Some(&student.unique_id),
            allergies: Some(&student.allergies),
            blood_group: student.blood_group.as_deref(),
            emergency_contact: student.emergency_contact.as_deref(),
            ..core
        },
    };

    serde_json::to_string(&payload).unwrap_or_default()
}

/// String form of a canonical student property, looked up by its camelCase
/// name. Unknown names and absent optionals resolve to an empty string.
fn canonical_value(student: &Student, name: &str) -> String {
    match name {
        "id" => student.id.to_string(),
        "name" => student.name.clone(),
        "rollNumber" => student.roll_number.clone(),
        "classDivision" => student.class_division.clone(),
        "rackNumber" => student.rack_number.clone(),
        "busRoute" => student.bus_route.clone(),
        "allergies" => student.allergies.join(", "),
        "photo" => student.photo.clone(),
        "createdAt" => student.created_at.clone(),
        "uniqueId" => student.unique_id.clone(),
        "emergencyContact" => student.emergency_contact.clone().unwrap_or_default(),
        "bloodGroup" => student.blood_group.clone().unwrap_or_default(),
        "dateOfBirth" => student.date_of_birth.clone().unwrap_or_default(),
        "address" => student.address.clone().unwrap_or_default(),
        "parentName" => student.parent_name.clone().unwrap_or_default(),
        "parentPhone" => student.parent_phone.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Resolve one field of a layout to the value its renderer draws.
pub fn resolve_field(student: &Student, field: &CardField, template: CardTemplate) -> String {
    match field.field_type {
        FieldType::Qrcode => qr_payload(student, template),
        FieldType::Image => student.photo.clone(),
        FieldType::Text => {
            if let Some(key) = field.value.strip_prefix(CUSTOM_FIELD_PREFIX) {
                student.custom_fields.get(key).cloned().unwrap_or_default()
            } else {
                canonical_value(student, &field.value)
            }
        }
    }
}

/// Resolve every field of a layout, in order. Fields are independent: one
/// unresolvable reference renders blank without affecting the others, and
/// duplicate fields are resolved redundantly rather than deduplicated.
pub fn resolve_layout(
    student: &Student,
    layout: &CardLayout,
    template: CardTemplate,
) -> Vec<ResolvedField> {
    layout
        .fields
        .iter()
        .map(|field| ResolvedField {
            value: resolve_field(student, field, template),
            field: field.clone(),
        })
        .collect()
}

/// The built-in card arrangements, expressed as layouts so built-in and
/// custom cards share one resolution path. The custom selector has no
/// built-in; those cards carry their own layout.
pub fn builtin_layout(template: CardTemplate) -> Option<CardLayout> {
    match template {
        CardTemplate::Classic => Some(classic_layout()),
        CardTemplate::Modern => Some(modern_layout()),
        CardTemplate::Custom => None,
    }
}

fn text(id: &str, label: &str, value: &str, x: f64, y: f64, width: f64, height: f64, font_size: f64) -> CardField {
    CardField {
        id: id.to_string(),
        field_type: FieldType::Text,
        label: label.to_string(),
        value: value.to_string(),
        x,
        y,
        width,
        height,
        font_size: Some(font_size),
        font_weight: Some("normal".to_string()),
    }
}

fn boxed(id: &str, field_type: FieldType, label: &str, value: &str, x: f64, y: f64, width: f64, height: f64) -> CardField {
    CardField {
        id: id.to_string(),
        field_type,
        label: label.to_string(),
        value: value.to_string(),
        x,
        y,
        width,
        height,
        font_size: None,
        font_weight: None,
    }
}

/// Light card: photo and QR stacked on the left, detail rows on the right.
fn classic_layout() -> CardLayout {
    let mut name = text("classic-name", "Name", "name", 144.0, 64.0, 215.0, 28.0, 16.0);
    name.font_weight = Some("bold".to_string());

    CardLayout {
        fields: vec![
            boxed("classic-photo", FieldType::Image, "Photo", "photo", 16.0, 64.0, 112.0, 112.0),
            boxed("classic-qr", FieldType::Qrcode, "QR Code", "qrcode", 16.0, 188.0, 96.0, 96.0),
            name,
            text("classic-roll", "Roll Number", "rollNumber", 144.0, 100.0, 215.0, 24.0, 13.0),
            text("classic-class", "Class/Division", "classDivision", 144.0, 130.0, 215.0, 24.0, 13.0),
            text("classic-rack", "Rack Number", "rackNumber", 144.0, 160.0, 215.0, 24.0, 13.0),
            text("classic-bus", "Bus Route", "busRoute", 144.0, 190.0, 215.0, 24.0, 13.0),
            text("classic-allergies", "Allergies", "allergies", 16.0, 300.0, 343.0, 24.0, 12.0),
        ],
        background_color: "#ffffff".to_string(),
        text_color: "#1f2937".to_string(),
        accent_color: "#4f46e5".to_string(),
    }
}

/// Dark card: centered name, photo beside the detail block, QR at the foot.
fn modern_layout() -> CardLayout {
    let mut name = text("modern-name", "Name", "name", 16.0, 56.0, 343.0, 30.0, 18.0);
    name.font_weight = Some("bold".to_string());

    CardLayout {
        fields: vec![
            name,
            boxed("modern-photo", FieldType::Image, "Photo", "photo", 16.0, 104.0, 112.0, 112.0),
            text("modern-roll", "Roll No", "rollNumber", 144.0, 104.0, 215.0, 22.0, 13.0),
            text("modern-rack", "Rack No", "rackNumber", 144.0, 132.0, 215.0, 22.0, 13.0),
            text("modern-bus", "Bus Route", "busRoute", 144.0, 160.0, 215.0, 22.0, 13.0),
            text("modern-allergies", "Allergies", "allergies", 144.0, 188.0, 215.0, 22.0, 12.0),
            boxed("modern-qr", FieldType::Qrcode, "QR Code", "qrcode", 137.0, 236.0, 100.0, 100.0),
        ],
        background_color: "#3730a3".to_string(),
        text_color: "#ffffff".to_string(),
        accent_color: "#c7d2fe".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn student() -> Student {
        let mut custom_fields = BTreeMap::new();
        custom_fields.insert("Favorite Color".to_string(), "Blue".to_string());
        Student {
            id: 9,
            name: "Asha Varma".to_string(),
            roll_number: "17".to_string(),
            class_division: "5A".to_string(),
            rack_number: "R-12".to_string(),
            bus_route: "101".to_string(),
            allergies: vec!["nuts".to_string(), "dairy".to_string()],
            photo: "data:image/png;base64,abc123".to_string(),
            created_at: "2024-03-01T08:30:00+00:00".to_string(),
            unique_id: "stu-unique-9".to_string(),
            emergency_contact: Some("555-0100".to_string()),
            blood_group: Some("O+".to_string()),
            date_of_birth: None,
            address: Some("12 Hill Road".to_string()),
            parent_name: None,
            parent_phone: None,
            custom_fields,
        }
    }

    fn text_field(value: &str) -> CardField {
        CardField {
            id: "f1".to_string(),
            field_type: FieldType::Text,
            label: "Field".to_string(),
            value: value.to_string(),
            x: 10.0,
            y: 10.0,
            width: 200.0,
            height: 30.0,
            font_size: Some(14.0),
            font_weight: None,
        }
    }

    #[test]
    fn test_text_field_resolves_canonical_property() {
        let student = student();
        assert_eq!(resolve_field(&student, &text_field("rollNumber"), CardTemplate::Classic), "17");
        assert_eq!(resolve_field(&student, &text_field("name"), CardTemplate::Classic), "Asha Varma");
        assert_eq!(
            resolve_field(&student, &text_field("allergies"), CardTemplate::Classic),
            "nuts, dairy"
        );
    }

    #[test]
    fn test_text_field_resolves_custom_field_path() {
        let student = student();
        assert_eq!(
            resolve_field(&student, &text_field("customFields.Favorite Color"), CardTemplate::Custom),
            "Blue"
        );
    }

    #[test]
    fn test_missing_custom_field_resolves_to_empty_string() {
        let student = student();
        assert_eq!(
            resolve_field(&student, &text_field("customFields.Nope"), CardTemplate::Custom),
            ""
        );
    }

    #[test]
    fn test_unknown_canonical_name_resolves_to_empty_string() {
        let student = student();
        assert_eq!(resolve_field(&student, &text_field("qrcode"), CardTemplate::Classic), "");
        assert_eq!(resolve_field(&student, &text_field("noSuchField"), CardTemplate::Classic), "");
    }

    #[test]
    fn test_absent_optional_resolves_blank_not_panicking() {
        let student = student();
        assert_eq!(resolve_field(&student, &text_field("parentName"), CardTemplate::Classic), "");
        assert_eq!(resolve_field(&student, &text_field("dateOfBirth"), CardTemplate::Classic), "");
    }

    #[test]
    fn test_image_field_passes_photo_through_unmodified() {
        let student = student();
        let field = CardField {
            field_type: FieldType::Image,
            value: "photo".to_string(),
            ..text_field("photo")
        };
        assert_eq!(
            resolve_field(&student, &field, CardTemplate::Classic),
            "data:image/png;base64,abc123"
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let student = student();
        let field = CardField {
            field_type: FieldType::Qrcode,
            value: "qrcode".to_string(),
            ..text_field("qrcode")
        };
        let first = resolve_field(&student, &field, CardTemplate::Modern);
        let second = resolve_field(&student, &field, CardTemplate::Modern);
        assert_eq!(first, second);
    }

    #[test]
    fn test_qr_payload_never_contains_photo_or_address() {
        let student = student();
        for template in [CardTemplate::Classic, CardTemplate::Modern, CardTemplate::Custom] {
            let payload = qr_payload(&student, template);
            let decoded: serde_json::Value = serde_json::from_str(&payload).unwrap();
            let object = decoded.as_object().unwrap();
            assert!(!object.contains_key("photo"));
            assert!(!object.contains_key("address"));
            assert!(!object.contains_key("customFields"));
        }
    }

    #[test]
    fn test_builtin_qr_payload_subset() {
        let student = student();
        let decoded: serde_json::Value =
            serde_json::from_str(&qr_payload(&student, CardTemplate::Classic)).unwrap();
        assert_eq!(decoded["id"], 9);
        assert_eq!(decoded["name"], "Asha Varma");
        assert_eq!(decoded["rollNumber"], "17");
        assert_eq!(decoded["classDivision"], "5A");
        assert_eq!(decoded["rackNumber"], "R-12");
        assert_eq!(decoded["busRoute"], "101");
        assert_eq!(decoded["uniqueId"], "stu-unique-9");
        assert_eq!(decoded["allergies"][0], "nuts");
        // Health extras belong to the Modern policy only.
        assert!(decoded.get("bloodGroup").is_none());
        assert!(decoded.get("emergencyContact").is_none());
    }

    #[test]
    fn test_modern_qr_payload_adds_health_extras() {
        let student = student();
        let decoded: serde_json::Value =
            serde_json::from_str(&qr_payload(&student, CardTemplate::Modern)).unwrap();
        assert_eq!(decoded["bloodGroup"], "O+");
        assert_eq!(decoded["emergencyContact"], "555-0100");
    }

    #[test]
    fn test_custom_qr_payload_is_the_minimum_subset() {
        let student = student();
        let decoded: serde_json::Value =
            serde_json::from_str(&qr_payload(&student, CardTemplate::Custom)).unwrap();
        let object = decoded.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["classDivision", "id", "name", "rollNumber"]);
    }

    #[test]
    fn test_resolve_layout_keeps_field_order_and_duplicates() {
        let student = student();
        let layout = CardLayout {
            fields: vec![
                text_field("name"),
                text_field("name"),
                text_field("customFields.Missing"),
            ],
            background_color: "#fff".to_string(),
            text_color: "#000".to_string(),
            accent_color: "#00f".to_string(),
        };

        let resolved = resolve_layout(&student, &layout, CardTemplate::Custom);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].value, "Asha Varma");
        assert_eq!(resolved[1].value, "Asha Varma");
        assert_eq!(resolved[2].value, "");
    }

    #[test]
    fn test_builtin_layouts_cover_the_card_essentials() {
        for template in [CardTemplate::Classic, CardTemplate::Modern] {
            let layout = builtin_layout(template).expect("built-in template has a layout");
            assert!(layout.fields.iter().any(|f| f.field_type == FieldType::Image));
            assert!(layout.fields.iter().any(|f| f.field_type == FieldType::Qrcode));
            assert!(layout.fields.iter().any(|f| f.value == "name"));
        }
        assert!(builtin_layout(CardTemplate::Custom).is_none());
    }
}
