//! Social share links and QR codes for a shared card.

use serde::Serialize;
use urlencoding::encode;

use crate::card::Card;

/// Default QR image edge length in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Prefilled share links for common networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub whatsapp: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub email: String,
}

/// Text posted alongside a share link.
pub fn social_text(card: &Card) -> String {
    match card.tagline.as_deref().filter(|t| !t.is_empty()) {
        Some(tagline) => format!("Check out {}'s digital business card - {tagline}", card.name),
        None => format!("Check out {}'s digital business card", card.name),
    }
}

/// Build share links pointing at `share_url`.
pub fn social_links(card: &Card, share_url: &str) -> SocialLinks {
    let text = social_text(card);
    let url = encode(share_url);
    let encoded_text = encode(&text);

    SocialLinks {
        whatsapp: format!("https://wa.me/?text={}", encode(&format!("{text} {share_url}"))),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
        twitter: format!("https://twitter.com/intent/tweet?text={encoded_text}&url={url}"),
        linkedin: format!(
            "https://www.linkedin.com/shareArticle?mini=true&url={url}&title={encoded_text}"
        ),
        email: format!(
            "mailto:?subject={}&body={}",
            encode(&format!("Business Card - {}", card.name)),
            encode(&format!("{text}\n\n{share_url}"))
        ),
    }
}

/// URL of a QR code image encoding `value`.
pub fn qr_code_url(value: &str, size: u32) -> String {
    format!(
        "https://api.qrserver.com/v1/create-qr-code/?size={size}x{size}&data={}",
        encode(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_text() {
        let mut card = Card::new("c1", "Acme");
        assert_eq!(social_text(&card), "Check out Acme's digital business card");
        card.tagline = Some("Widgets".to_string());
        assert_eq!(
            social_text(&card),
            "Check out Acme's digital business card - Widgets"
        );
    }

    #[test]
    fn test_social_links_are_encoded() {
        let card = Card::new("c1", "Acme Corp");
        let links = social_links(&card, "https://cards.test/view/acme-corp?data=ab+c=&views=2");

        assert!(links.facebook.ends_with(
            "u=https%3A%2F%2Fcards.test%2Fview%2Facme-corp%3Fdata%3Dab%2Bc%3D%26views%3D2"
        ));
        assert!(links.whatsapp.starts_with("https://wa.me/?text=Check%20out%20Acme%20Corp"));
        assert!(links.twitter.contains("&url=https%3A%2F%2F"));
        assert!(links.linkedin.contains("mini=true"));
        assert!(links.email.starts_with("mailto:?subject=Business%20Card%20-%20Acme%20Corp&body="));
        assert!(links.email.contains("%0A%0Ahttps%3A"));
    }

    #[test]
    fn test_qr_code_url() {
        assert_eq!(
            qr_code_url("https://cards.test/view/acme", 150),
            "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=https%3A%2F%2Fcards.test%2Fview%2Facme"
        );
    }
}
