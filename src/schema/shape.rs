//! Object-shape checks on the raw payload.
//!
//! Derived `Deserialize` impls accept a positional JSON array in place of a
//! struct, so every position that holds a record is checked for an object
//! before the payload is deserialized. Absent fields are left to serde.

use serde_json::Value;

use super::Issues;
use crate::models::ContentSlug;

/// Where records sit inside a payload.
#[derive(Debug)]
pub enum Shape {
    /// A record with the listed nested record fields.
    Object(&'static [(&'static str, Shape)]),
    /// An array whose elements have the inner shape.
    ArrayOf(&'static Shape),
}

const RECORD: Shape = Shape::Object(&[]);
const RECORDS: Shape = Shape::ArrayOf(&RECORD);

const HERO: Shape = Shape::Object(&[("noticeBanner", RECORD)]);
const NEWS: Shape = Shape::Object(&[("items", RECORDS)]);
const SCHOOL: Shape = Shape::Object(&[("pricing", RECORD), ("instructor", RECORD)]);
const PRICING: Shape = Shape::Object(&[("rows", RECORDS)]);
const DIRECTIONS: Shape = Shape::Object(&[("buses", RECORDS)]);
const CONTACTS: Shape = Shape::Object(&[("manager", RECORD), ("operator", RECORD)]);

/// Record layout of a slug's payload.
pub fn shape_for(slug: ContentSlug) -> &'static Shape {
    match slug {
        ContentSlug::Hero => &HERO,
        ContentSlug::News => &NEWS,
        ContentSlug::School => &SCHOOL,
        ContentSlug::Pricing => &PRICING,
        ContentSlug::Directions => &DIRECTIONS,
        ContentSlug::Contacts => &CONTACTS,
        ContentSlug::Hours | ContentSlug::AdminAllowlist => &RECORD,
    }
}

/// Record a structural issue for every record position that is not an object.
pub fn check_shape(shape: &Shape, value: &Value, path: &str, issues: &mut Issues) {
    match shape {
        Shape::Object(fields) => {
            let Some(map) = value.as_object() else {
                issues.push(path, format!("Expected object, received {}", kind(value)));
                return;
            };
            for (name, field_shape) in fields.iter() {
                if let Some(field) = map.get(*name) {
                    check_shape(field_shape, field, &join(path, name), issues);
                }
            }
        }
        // Non-array values are reported by deserialization
        Shape::ArrayOf(inner) => {
            if let Some(items) = value.as_array() {
                for (i, item) in items.iter().enumerate() {
                    check_shape(inner, item, &format!("{}[{}]", path, i), issues);
                }
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
