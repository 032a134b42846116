//! Schema registry for editable content blocks.
//!
//! Each known slug maps to a typed record in [`ContentData`]. Validation first
//! checks that every record position holds a JSON object, then deserializes
//! the raw payload into that record (missing fields, wrong types, defaults)
//! and finally runs the format checks, collecting every issue with its
//! path so the editor can point at the offending field.

mod checks;
mod shape;

pub use checks::Issues;

use serde_json::Value;

use crate::errors::{AppError, ValidationErrors};
use crate::models::{
    AdminAllowlistContent, ContactsContent, ContentData, ContentSlug, DirectionsContent,
    HeroContent, HoursContent, NewsContent, Person, PricingContent, SchoolContent,
};

/// Maximum length of the hero notice banner.
pub const NOTICE_BANNER_MAX_CHARS: usize = 300;

/// Minimum length of a phone number.
pub const PHONE_MIN_CHARS: usize = 3;

/// Format checks a record runs after it has been deserialized.
pub trait Validate {
    fn validate(&self, issues: &mut Issues);
}

/// Validation contract for one slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSchema {
    slug: ContentSlug,
}

impl ContentSchema {
    pub fn slug(&self) -> ContentSlug {
        self.slug
    }

    /// Validate `raw` and return the normalized record.
    pub fn validate(&self, raw: &Value) -> Result<ContentData, ValidationErrors> {
        let mut issues = Issues::new();
        shape::check_shape(shape::shape_for(self.slug()), raw, "", &mut issues);
        if !issues.is_empty() {
            return Err(self.errors(issues));
        }

        let data = ContentData::from_value(self.slug(), raw.clone()).map_err(|e| {
            let mut issues = Issues::new();
            issues.push("", e.to_string());
            self.errors(issues)
        })?;

        let mut issues = Issues::new();
        match &data {
            ContentData::Hero(record) => record.validate(&mut issues),
            ContentData::News(record) => record.validate(&mut issues),
            ContentData::Hours(record) => record.validate(&mut issues),
            ContentData::School(record) => record.validate(&mut issues),
            ContentData::Pricing(record) => record.validate(&mut issues),
            ContentData::Directions(record) => record.validate(&mut issues),
            ContentData::Contacts(record) => record.validate(&mut issues),
            ContentData::AdminAllowlist(record) => record.validate(&mut issues),
        }

        if issues.is_empty() {
            Ok(data)
        } else {
            Err(self.errors(issues))
        }
    }

    fn errors(&self, issues: Issues) -> ValidationErrors {
        ValidationErrors {
            slug: self.slug.as_str().to_string(),
            issues: issues.into_vec(),
        }
    }
}

/// Look up the contract for a slug.
pub fn schema_for_slug(slug: &str) -> Result<ContentSchema, AppError> {
    ContentSlug::parse(slug)
        .map(|slug| ContentSchema { slug })
        .ok_or_else(|| AppError::UnknownSlug(slug.to_string()))
}

/// Validate a payload against the contract of `slug`.
pub fn validate_content_data(slug: &str, raw: &Value) -> Result<ContentData, AppError> {
    let schema = schema_for_slug(slug)?;
    Ok(schema.validate(raw)?)
}

impl Validate for HeroContent {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("tagline", &self.tagline);
        issues.url("webcamUrl", &self.webcam_url);
        issues.max_chars(
            "noticeBanner.text",
            &self.notice_banner.text,
            NOTICE_BANNER_MAX_CHARS,
        );
    }
}

impl Validate for NewsContent {
    fn validate(&self, issues: &mut Issues) {
        for (i, item) in self.items.iter().enumerate() {
            issues.non_empty(&format!("items[{}].id", i), &item.id);
            issues.non_empty(&format!("items[{}].title", i), &item.title);
            issues.non_empty(&format!("items[{}].body", i), &item.body);
            issues.datetime(&format!("items[{}].dateIso", i), &item.date_iso);
        }
    }
}

impl Validate for HoursContent {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("text", &self.text);
    }
}

fn validate_person(person: &Person, prefix: &str, issues: &mut Issues) {
    issues.non_empty(&format!("{}.name", prefix), &person.name);
    issues.min_chars(&format!("{}.phone", prefix), &person.phone, PHONE_MIN_CHARS);
    issues.email(&format!("{}.email", prefix), &person.email);
}

impl Validate for SchoolContent {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("description", &self.description);
        issues.non_empty("pricing.individual", &self.pricing.individual);
        issues.non_empty("pricing.group", &self.pricing.group);
        validate_person(&self.instructor, "instructor", issues);
    }
}

impl Validate for PricingContent {
    fn validate(&self, issues: &mut Issues) {
        for (i, row) in self.rows.iter().enumerate() {
            issues.non_empty(&format!("rows[{}].duration", i), &row.duration);
            issues.non_empty(&format!("rows[{}].adults", i), &row.adults);
            issues.non_empty(&format!("rows[{}].kids", i), &row.kids);
        }
    }
}

impl Validate for DirectionsContent {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("car", &self.car);
        issues.non_empty("gps", &self.gps);
        issues.url("mapyCzUrl", &self.mapy_cz_url);
        for (i, bus) in self.buses.iter().enumerate() {
            issues.non_empty(&format!("buses[{}].label", i), &bus.label);
            issues.url(&format!("buses[{}].url", i), &bus.url);
        }
    }
}

impl Validate for ContactsContent {
    fn validate(&self, issues: &mut Issues) {
        validate_person(&self.manager, "manager", issues);
        issues.non_empty("operator.name", &self.operator.name);
        issues.non_empty("operator.address", &self.operator.address);
        issues.non_empty("operator.ico", &self.operator.ico);
        issues.url("operator.web", &self.operator.web);
        issues.url("wufooUrl", &self.wufoo_url);
    }
}

impl Validate for AdminAllowlistContent {
    fn validate(&self, issues: &mut Issues) {
        for (i, email) in self.emails.iter().enumerate() {
            issues.email(&format!("emails[{}]", i), email);
        }
    }
}
