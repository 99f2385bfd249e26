//! The business card record and its contact-file export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A digital business card.
///
/// `id` and `name` are always present; every other field is optional and
/// independently nullable. Field names are camelCase on the wire so cards
/// written by the browser client decode unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Opaque identifier, canonically a UUID.
    #[serde(default)]
    pub id: String,
    /// Business or person name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Logo image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Instagram handle, usually with a leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// WhatsApp number in `+digits` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Theme identifier (catalog lives in the client).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Badge identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<String>>,
    /// Requested vanity slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Create a card with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tagline: None,
            logo: None,
            email: None,
            phone: None,
            website: None,
            instagram: None,
            whatsapp: None,
            description: None,
            theme: None,
            badge: None,
            animations: None,
            effects: None,
            card_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Tagline or an empty string.
    pub fn tagline_or_empty(&self) -> &str {
        self.tagline.as_deref().unwrap_or("")
    }

    /// Render the card as a vCard 3.0 contact file.
    ///
    /// Lines for absent optional fields are omitted. `NOTE` falls back to the
    /// tagline when there is no description.
    pub fn to_vcard(&self) -> String {
        let tagline = self.tagline_or_empty();
        let note = self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(tagline);

        let lines = [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{}", self.name),
            format!("ORG:{};{}", self.name, tagline),
            non_empty(&self.phone)
                .map(|p| format!("TEL;TYPE=CELL:{p}"))
                .unwrap_or_default(),
            non_empty(&self.email)
                .map(|e| format!("EMAIL:{e}"))
                .unwrap_or_default(),
            non_empty(&self.website)
                .map(|w| format!("URL:{w}"))
                .unwrap_or_default(),
            format!("NOTE:{note}"),
            "END:VCARD".to_string(),
        ];

        lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Download file name for the vCard, e.g. `Acme_Corp.vcf`.
    pub fn vcard_filename(&self) -> String {
        let stem = self.name.split_whitespace().collect::<Vec<_>>().join("_");
        if stem.is_empty() {
            "business-card.vcf".to_string()
        } else {
            format!("{stem}.vcf")
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Generate a fresh card identifier (UUID v4).
pub fn new_card_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check whether `id` is an RFC 4122 UUID of version 1 through 5.
pub fn is_valid_uuid(id: &str) -> bool {
    match Uuid::try_parse(id) {
        Ok(uuid) => {
            (1..=5).contains(&uuid.get_version_num()) && uuid.get_variant() == uuid::Variant::RFC4122
        }
        Err(_) => false,
    }
}
