//! Rule-based card generator.
//!
//! Pulls a name and contact details out of a free-text description and fills
//! in tagline, description, theme and badge from per-industry templates. Used
//! when no language model is configured.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::card::{Card, new_card_id};

/// Name used when the prompt does not mention one.
pub const DEFAULT_NAME: &str = "Professional Business";

/// Input to [`generate_card`].
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// Free-text description of the business.
    pub prompt: String,
    /// Industry key, e.g. `technology` or `finance`.
    pub industry: String,
}

struct Templates {
    taglines: &'static [&'static str],
    descriptions: &'static [&'static str],
}

struct IndustryProfile {
    theme: &'static str,
    badge: &'static str,
    templates: Templates,
}

const DEFAULT_PROFILE: IndustryProfile = IndustryProfile {
    theme: "minimalist-black-gold",
    badge: "none",
    templates: Templates {
        taglines: &["Professional Services", "Quality Solutions", "Expert Providers"],
        descriptions: &[
            "Professional services tailored to your needs.",
            "Quality solutions for your business.",
        ],
    },
};

fn industry_profile(industry: &str) -> &'static IndustryProfile {
    static TECHNOLOGY: IndustryProfile = IndustryProfile {
        theme: "cyber-neon",
        badge: "tech-innovator",
        templates: Templates {
            taglines: &[
                "Innovative Tech Solutions",
                "Digital Innovation Experts",
                "Future-Ready Technology",
            ],
            descriptions: &[
                "Cutting-edge technology solutions for modern businesses.",
                "Transforming businesses through innovation.",
            ],
        },
    };
    static FINANCE: IndustryProfile = IndustryProfile {
        theme: "minimalist-black-gold",
        badge: "trusted-advisor",
        templates: Templates {
            taglines: &[
                "Trusted Financial Services",
                "Your Financial Partner",
                "Wealth Management Experts",
            ],
            descriptions: &[
                "Secure financial solutions for your future.",
                "Building financial security through expert guidance.",
            ],
        },
    };
    static HEALTHCARE: IndustryProfile = IndustryProfile {
        theme: "nature-green",
        badge: "health-expert",
        templates: Templates {
            taglines: &[
                "Compassionate Healthcare",
                "Health & Wellness Experts",
                "Quality Care Providers",
            ],
            descriptions: &[
                "Quality healthcare with a personal touch.",
                "Dedicated to your health and wellbeing.",
            ],
        },
    };
    static CONSULTING: IndustryProfile = IndustryProfile {
        theme: "executive-black",
        badge: "strategic-partner",
        templates: Templates {
            taglines: &[
                "Strategic Business Solutions",
                "Expert Consultants",
                "Growth Partners",
            ],
            descriptions: &[
                "Strategic consulting for business growth.",
                "Helping businesses achieve their goals.",
            ],
        },
    };
    static DESIGN: IndustryProfile = IndustryProfile {
        theme: "artistic-purple",
        badge: "creative-genius",
        templates: Templates {
            taglines: &[
                "Creative Design Solutions",
                "Visual Innovation",
                "Design Excellence",
            ],
            descriptions: &[
                "Exceptional design that stands out.",
                "Creating visual experiences that inspire.",
            ],
        },
    };

    match industry.trim().to_lowercase().as_str() {
        "technology" => &TECHNOLOGY,
        "finance" => &FINANCE,
        "healthcare" => &HEALTHCARE,
        "consulting" => &CONSULTING,
        "design" => &DESIGN,
        _ => &DEFAULT_PROFILE,
    }
}

static QUOTED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]{2,60})""#).expect("valid regex"));
static INTRODUCED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|called|named)\s+([A-Z][a-zA-Z\s&'-]{2,50})").expect("valid regex")
});
static CAPITALISED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+\s+[A-Z][a-zA-Z\s&'-]{1,40})\b").expect("valid regex")
});
static NAME_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,!?\n]").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})\b").expect("valid regex")
});

static PHONE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\(\d{3}\)\s*\d{3}[-\s]?\d{4}").expect("valid regex"),
        Regex::new(r"\d{3}[-.\s]\d{3}[-.\s]\d{4}").expect("valid regex"),
        Regex::new(r"\b\d{10}\b").expect("valid regex"),
    ]
});

static WEBSITE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"https?://[^\s,]+").expect("valid regex"),
        Regex::new(r"www\.[^\s,]+").expect("valid regex"),
        Regex::new(r"\b[a-zA-Z0-9-]+\.[a-zA-Z]{2,}\b").expect("valid regex"),
    ]
});

// The handle must not be glued to a preceding word, so email addresses
// are not read as Instagram handles.
static INSTAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9._%+-])@([A-Za-z0-9._]{1,30})").expect("valid regex")
});

static WHATSAPP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:whatsapp|wa)[:\s]+(\+?[\d\s\-().]{10,20})").expect("valid regex")
});

/// Generate a card from a free-text prompt.
///
/// Template choices are derived from a hash of the prompt, so the same
/// request always produces the same tagline and description.
pub fn generate_card(request: &GenerationRequest) -> Card {
    let prompt = request.prompt.as_str();
    let profile = industry_profile(&request.industry);
    let (tagline, description) = pick_templates(&profile.templates, prompt);
    let now = Utc::now();

    let card = Card {
        tagline: Some(tagline.to_string()),
        description: Some(description.to_string()),
        email: extract_email(prompt),
        phone: extract_phone(prompt),
        website: extract_website(prompt),
        instagram: extract_instagram(prompt),
        whatsapp: extract_whatsapp(prompt),
        theme: Some(profile.theme.to_string()),
        badge: Some(profile.badge.to_string()),
        created_at: Some(now),
        updated_at: Some(now),
        ..Card::new(new_card_id(), extract_name(prompt))
    };

    tracing::debug!(
        card_id = %card.id,
        name = %card.name,
        industry = %request.industry,
        "generated card from prompt"
    );
    card
}

fn pick_templates(templates: &Templates, prompt: &str) -> (&'static str, &'static str) {
    let hash = xxh3_64(prompt.as_bytes());
    let tagline = templates.taglines[(hash % templates.taglines.len() as u64) as usize];
    let description =
        templates.descriptions[((hash >> 32) % templates.descriptions.len() as u64) as usize];
    (tagline, description)
}

fn first_clause(text: &str) -> &str {
    NAME_END_RE
        .split(text)
        .next()
        .unwrap_or_default()
        .trim()
}

fn extract_name(prompt: &str) -> String {
    if let Some(caps) = QUOTED_NAME_RE.captures(prompt) {
        return caps[1].to_string();
    }

    for re in [&*INTRODUCED_NAME_RE, &*CAPITALISED_NAME_RE] {
        if let Some(caps) = re.captures(prompt) {
            let name = first_clause(&caps[1]);
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }

    DEFAULT_NAME.to_string()
}

fn extract_email(prompt: &str) -> Option<String> {
    EMAIL_RE
        .captures(prompt)
        .map(|caps| caps[1].to_lowercase())
}

fn extract_phone(prompt: &str) -> Option<String> {
    PHONE_RES
        .iter()
        .find_map(|re| re.find(prompt))
        .map(|m| format_phone(m.as_str()))
}

/// Format ten digits as `(XXX) XXX-XXXX`; anything else is returned as is.
fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        raw.to_string()
    }
}

fn extract_website(prompt: &str) -> Option<String> {
    let without_emails = EMAIL_RE.replace_all(prompt, " ");

    WEBSITE_RES.iter().find_map(|re| {
        re.find_iter(&without_emails).find_map(|m| {
            let site = m.as_str().trim_end_matches(['.', ',', ';', '!', '?']);
            if site.contains('@') || site.is_empty() {
                return None;
            }
            if site.starts_with("http") {
                Some(site.to_string())
            } else {
                Some(format!("https://{site}"))
            }
        })
    })
}

fn extract_instagram(prompt: &str) -> Option<String> {
    let caps = INSTAGRAM_RE.captures(prompt)?;
    let handle = caps[1].trim_end_matches('.');
    (!handle.is_empty()).then(|| format!("@{handle}"))
}

fn extract_whatsapp(prompt: &str) -> Option<String> {
    let caps = WHATSAPP_RE.captures(prompt)?;
    let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
    (digits.len() >= 10).then(|| format!("+{digits}"))
}
