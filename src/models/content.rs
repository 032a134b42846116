//! Content block row and the typed records behind each slug.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted content block, as stored and as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub slug: String,
    pub data: Value,
    pub updated_at: String,
}

impl ContentBlock {
    /// Decode the stored data into its slug's record, if the slug is known
    /// and the row still matches the record's shape.
    pub fn typed(&self) -> Option<ContentData> {
        let slug = ContentSlug::parse(&self.slug)?;
        ContentData::from_value(slug, self.data.clone()).ok()
    }
}

/// Slugs of the editable blocks on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentSlug {
    Hero,
    News,
    Hours,
    School,
    Pricing,
    Directions,
    Contacts,
    AdminAllowlist,
}

impl ContentSlug {
    pub const ALL: [ContentSlug; 8] = [
        ContentSlug::Hero,
        ContentSlug::News,
        ContentSlug::Hours,
        ContentSlug::School,
        ContentSlug::Pricing,
        ContentSlug::Directions,
        ContentSlug::Contacts,
        ContentSlug::AdminAllowlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSlug::Hero => "hero",
            ContentSlug::News => "news",
            ContentSlug::Hours => "hours",
            ContentSlug::School => "school",
            ContentSlug::Pricing => "pricing",
            ContentSlug::Directions => "directions",
            ContentSlug::Contacts => "contacts",
            ContentSlug::AdminAllowlist => "admin-allowlist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ContentSlug::ALL.into_iter().find(|slug| slug.as_str() == s)
    }
}

impl fmt::Display for ContentSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hero section (weather comes from the provider, not from here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub tagline: String,
    pub webcam_url: String,
    #[serde(default)]
    pub notice_banner: NoticeBanner,
}

/// Outage or announcement banner shown above the hero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeBanner {
    pub is_visible: bool,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsContent {
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date_iso: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursContent {
    pub text: String,
}

/// Ski school: description, lesson prices and the instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolContent {
    pub description: String,
    pub pricing: SchoolPricing,
    pub instructor: Person,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolPricing {
    pub individual: String,
    pub group: String,
}

/// A named contact reachable by phone and email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Lift ticket price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingContent {
    pub rows: Vec<PricingRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    pub duration: String,
    pub adults: String,
    pub kids: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsContent {
    pub car: String,
    pub gps: String,
    pub mapy_cz_url: String,
    pub buses: Vec<BusLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsContent {
    pub manager: Person,
    pub operator: Operator,
    pub wufoo_url: String,
}

/// The legal operator of the lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    pub address: String,
    pub ico: String,
    pub web: String,
}

/// Emails allowed to edit content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAllowlistContent {
    pub emails: Vec<String>,
}

/// Typed content keyed by slug. Serializes as the bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentData {
    Hero(HeroContent),
    News(NewsContent),
    Hours(HoursContent),
    School(SchoolContent),
    Pricing(PricingContent),
    Directions(DirectionsContent),
    Contacts(ContactsContent),
    AdminAllowlist(AdminAllowlistContent),
}

impl ContentData {
    /// Deserialize a raw value into the record for `slug`.
    pub fn from_value(slug: ContentSlug, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match slug {
            ContentSlug::Hero => ContentData::Hero(serde_json::from_value(value)?),
            ContentSlug::News => ContentData::News(serde_json::from_value(value)?),
            ContentSlug::Hours => ContentData::Hours(serde_json::from_value(value)?),
            ContentSlug::School => ContentData::School(serde_json::from_value(value)?),
            ContentSlug::Pricing => ContentData::Pricing(serde_json::from_value(value)?),
            ContentSlug::Directions => ContentData::Directions(serde_json::from_value(value)?),
            ContentSlug::Contacts => ContentData::Contacts(serde_json::from_value(value)?),
            ContentSlug::AdminAllowlist => {
                ContentData::AdminAllowlist(serde_json::from_value(value)?)
            }
        })
    }

    pub fn slug(&self) -> ContentSlug {
        match self {
            ContentData::Hero(_) => ContentSlug::Hero,
            ContentData::News(_) => ContentSlug::News,
            ContentData::Hours(_) => ContentSlug::Hours,
            ContentData::School(_) => ContentSlug::School,
            ContentData::Pricing(_) => ContentSlug::Pricing,
            ContentData::Directions(_) => ContentSlug::Directions,
            ContentData::Contacts(_) => ContentSlug::Contacts,
            ContentData::AdminAllowlist(_) => ContentSlug::AdminAllowlist,
        }
    }

    /// The normalized JSON form that gets persisted.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
