//! Share-token codec.
//!
//! A share token is `base64(percent_encode(json(card)))`. It travels in the
//! `data` query parameter of a share URL so the card can be opened on a
//! device that has never seen it.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::card::Card;

/// Standard alphabet, padding optional on decode. Messengers and link
/// shorteners sometimes drop the trailing `=`.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a card into a share token.
///
/// Returns an empty string if the card cannot be serialized; callers treat
/// that as "embedding unavailable" and fall back to a registry-only link.
pub fn encode(card: &Card) -> String {
    match serde_json::to_string(card) {
        Ok(json) => STANDARD.encode(urlencoding::encode(&json).as_bytes()),
        Err(e) => {
            tracing::warn!(card_id = %card.id, error = %e, "failed to encode card for share URL");
            String::new()
        }
    }
}

/// Decode a share token back into a card.
///
/// Any malformed input (bad base64, bad percent-encoding, invalid JSON, a
/// non-object, or a card with an empty id) yields `None`.
pub fn decode(token: &str) -> Option<Card> {
    // Query-string decoding turns '+' into ' '; undo that before base64.
    // Line breaks and tabs from wrapped links are dropped.
    let repaired: String = token
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    if repaired.is_empty() {
        return None;
    }

    let bytes = LENIENT_STANDARD
        .decode(repaired.trim_end_matches('=').as_bytes())
        .map_err(|e| tracing::debug!(error = %e, "share token is not valid base64"))
        .ok()?;
    let escaped = String::from_utf8(bytes).ok()?;
    let json = urlencoding::decode(&escaped)
        .map_err(|e| tracing::debug!(error = %e, "share token has invalid percent-encoding"))
        .ok()?;

    let card: Card = serde_json::from_str(&json)
        .map_err(|e| tracing::debug!(error = %e, "share token does not contain a card"))
        .ok()?;

    if card.id.is_empty() {
        return None;
    }

    Some(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_card() -> Card {
        Card {
            tagline: Some("Widgets & more — 100% \"real\"".to_string()),
            email: Some("hello@acme.test".to_string()),
            instagram: Some("@acme".to_string()),
            theme: Some("cyber-neon".to_string()),
            animations: Some(vec!["float".to_string(), "glow".to_string()]),
            effects: Some(vec![]),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap()),
            ..Card::new("3f1c2a9e-7b4d-4c1e-9a2b-5d6e7f8a9b0c", "Acme Café")
        }
    }

    #[test]
    fn test_round_trip_full_card() {
        let card = sample_card();
        let token = encode(&card);
        assert!(!token.is_empty());
        assert_eq!(decode(&token), Some(card));
    }

    #[test]
    fn test_round_trip_minimal_card() {
        let card = Card::new("c1", "Acme Corp");
        assert_eq!(decode(&encode(&card)), Some(card));
    }

    #[test]
    fn test_token_is_plain_base64() {
        let token = encode(&sample_card());
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        );
    }

    #[test]
    fn test_decode_repairs_spaces_from_query_decoding() {
        let card = sample_card();
        let token = encode(&card);
        let mangled = token.replace('+', " ");
        assert_eq!(decode(&mangled), Some(card));
    }

    #[test]
    fn test_decode_accepts_missing_padding() {
        // Two of any three consecutive payload lengths need padding.
        let (card, token) = (0..3)
            .map(|n| Card::new("c1", format!("Acme{}", "x".repeat(n))))
            .map(|card| {
                let token = encode(&card);
                (card, token)
            })
            .find(|(_, token)| token.ends_with('='))
            .unwrap();

        let unpadded = token.trim_end_matches('=');
        assert_ne!(unpadded, token);
        assert_eq!(decode(&token), Some(card.clone()));
        assert_eq!(decode(unpadded), Some(card.clone()));

        let wrapped = format!("{}\n{}", &unpadded[..10], &unpadded[10..]);
        assert_eq!(decode(&wrapped), Some(card));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("not-valid-base64!!"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("   "), None);
    }

    #[test]
    fn test_decode_rejects_non_object_json() {
        let token = STANDARD.encode(urlencoding::encode("[1,2,3]").as_bytes());
        assert_eq!(decode(&token), None);
        let token = STANDARD.encode(urlencoding::encode("42").as_bytes());
        assert_eq!(decode(&token), None);
    }

    #[test]
    fn test_decode_rejects_missing_id() {
        let token = STANDARD.encode(urlencoding::encode(r#"{"name":"No Id"}"#).as_bytes());
        assert_eq!(decode(&token), None);
    }

    #[test]
    fn test_decode_accepts_browser_style_token() {
        // btoa(encodeURIComponent(JSON.stringify(card))) leaves !'()* unescaped.
        let json = r#"{"id":"c1","name":"Bob's (Shop)!","tagline":null,"createdAt":"2024-01-01T00:00:00.000Z"}"#;
        let escaped = json
            .replace('{', "%7B")
            .replace('}', "%7D")
            .replace('"', "%22")
            .replace(':', "%3A")
            .replace(',', "%2C")
            .replace(' ', "%20");
        let token = STANDARD.encode(escaped.as_bytes());
        let card = decode(&token).expect("browser token decodes");
        assert_eq!(card.name, "Bob's (Shop)!");
        assert_eq!(card.tagline, None);
        assert!(card.created_at.is_some());
    }
}
