//! Business card page renderer.
//!
//! Renders the card face (logo, name, tagline, badge, contact links), the
//! view count, a vCard download, and a share panel with QR code and social
//! links.

use maud::{Markup, PreEscaped, html};

use cardly_core::social::{self, DEFAULT_QR_SIZE};
use cardly_core::{Card, ResolvedView};

use super::components::{
    ICON_DOWNLOAD, OpenGraphData, copy_button, format_count, is_safe_url, page_shell,
    replace_url_script, truncate,
};

const DEFAULT_THEME: &str = "minimalist-black-gold";

/// Render a resolved card page.
pub fn render(resolved: &ResolvedView, base_url: &str, site_name: &str) -> Markup {
    let card = &resolved.card;
    let canonical_path = resolved.canonical_path();
    let canonical = format!("{base_url}{canonical_path}");

    let title = format!("{} | {site_name}", card.name);
    let description = page_description(card);
    let logo = card.logo.as_deref().filter(|url| is_safe_url(url));

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type: "profile",
        image: logo,
    };

    let body = html! {
        (card_face(card, resolved.view_count))

        div class="actions" {
            a class="btn" href={(canonical_path) "/vcard"} download=(card.vcard_filename()) {
                (PreEscaped(ICON_DOWNLOAD)) " Save Contact"
            }
            (copy_button(&canonical, "Copy Link"))
        }

        (share_panel(card, &canonical))

        @if let Some(path) = resolved.rewrite_to.as_deref() {
            (replace_url_script(path))
        }
    };

    page_shell(&title, &description, &canonical, og, body, site_name)
}

fn page_description(card: &Card) -> String {
    let text = card
        .tagline
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(card.description.as_deref().filter(|d| !d.is_empty()));
    match text {
        Some(text) => truncate(text, 200),
        None => format!("Digital business card for {}", card.name),
    }
}

fn card_face(card: &Card, view_count: u64) -> Markup {
    let initial = card
        .name
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();
    let theme = card.theme.as_deref().unwrap_or(DEFAULT_THEME);
    let badge = card.badge.as_deref().filter(|b| !b.is_empty() && *b != "none");

    html! {
        div class="bcard" data-theme=(theme) {
            div class="bcard-logo" {
                (initial.as_str())
                @if let Some(logo) = card.logo.as_deref() {
                    @if is_safe_url(logo) {
                        img src=(logo) alt=(card.name) loading="lazy" onerror="this.style.display='none'";
                    }
                }
            }
            h1 class="bcard-name" { (card.name) }
            @if let Some(tagline) = card.tagline.as_deref() {
                p class="bcard-tagline" { (tagline) }
            }
            @if let Some(badge) = badge {
                span class="bcard-badge" { (badge.replace('-', " ")) }
            }
            @if let Some(description) = card.description.as_deref() {
                p class="bcard-description" { (description) }
            }
            (contact_links(card))
            p class="bcard-views" {
                (format_count(view_count)) @if view_count == 1 { " view" } @else { " views" }
            }
        }
    }
}

fn contact_links(card: &Card) -> Markup {
    let email = non_empty(&card.email);
    let phone = non_empty(&card.phone);
    let website = non_empty(&card.website).filter(|w| is_safe_url(w));
    let instagram = non_empty(&card.instagram).map(|h| h.trim_start_matches('@'));
    let whatsapp_digits = non_empty(&card.whatsapp)
        .map(|n| n.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|digits| !digits.is_empty());

    html! {
        div class="bcard-contacts" {
            @if let Some(email) = email {
                a href={"mailto:" (email)} { (email) }
            }
            @if let Some(phone) = phone {
                a href={"tel:" (phone.replace(' ', ""))} { (phone) }
            }
            @if let Some(website) = website {
                a href=(website) rel="nofollow noopener" target="_blank" {
                    (truncate(website.strip_prefix("https://").or_else(|| website.strip_prefix("http://")).unwrap_or(website), 40))
                }
            }
            @if let Some(handle) = instagram {
                a href={"https://instagram.com/" (handle)} rel="nofollow noopener" target="_blank" {
                    "@" (handle)
                }
            }
            @if let Some(digits) = whatsapp_digits {
                a href={"https://wa.me/" (digits)} rel="nofollow noopener" target="_blank" {
                    "WhatsApp"
                }
            }
        }
    }
}

fn share_panel(card: &Card, share_url: &str) -> Markup {
    let links = social::social_links(card, share_url);

    html! {
        section class="share" {
            h2 { "Share this card" }
            img class="share-qr" src=(social::qr_code_url(share_url, DEFAULT_QR_SIZE))
                alt={"QR code for " (card.name)} width="160" height="160";
            div class="share-links" {
                a href=(links.whatsapp) rel="noopener" target="_blank" { "WhatsApp" }
                a href=(links.facebook) rel="noopener" target="_blank" { "Facebook" }
                a href=(links.twitter) rel="noopener" target="_blank" { "Twitter" }
                a href=(links.linkedin) rel="noopener" target="_blank" { "LinkedIn" }
                a href=(links.email) { "Email" }
            }
            p class="share-url" { (share_url) }
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardly_core::resolve::ResolutionSource;

    fn resolved(card: Card, rewrite_to: Option<&str>) -> ResolvedView {
        ResolvedView {
            card,
            view_count: 6,
            slug: "acme-corp".to_string(),
            source: ResolutionSource::EmbeddedToken,
            rewrite_to: rewrite_to.map(str::to_string),
        }
    }

    fn full_card() -> Card {
        Card {
            tagline: Some("Widgets done right".to_string()),
            email: Some("hello@acme.test".to_string()),
            phone: Some("(555) 123-4567".to_string()),
            website: Some("https://acme.test".to_string()),
            instagram: Some("@acme".to_string()),
            whatsapp: Some("+1 555 123 4567".to_string()),
            theme: Some("cyber-neon".to_string()),
            badge: Some("tech-innovator".to_string()),
            ..Card::new("c1", "Acme Corp")
        }
    }

    #[test]
    fn renders_card_fields_and_views() {
        let html = render(&resolved(full_card(), None), "https://cards.test", "Cardly").into_string();
        assert!(html.contains("<title>Acme Corp | Cardly</title>"));
        assert!(html.contains("data-theme=\"cyber-neon\""));
        assert!(html.contains("Widgets done right"));
        assert!(html.contains("mailto:hello@acme.test"));
        assert!(html.contains("https://instagram.com/acme"));
        assert!(html.contains("https://wa.me/15551234567"));
        assert!(html.contains("6 views"));
        assert!(html.contains("tech innovator"));
        assert!(html.contains("href=\"/view/acme-corp/vcard\""));
        assert!(html.contains("https://api.qrserver.com/v1/create-qr-code/?size=200x200"));
        assert!(html.contains("rel=\"canonical\" href=\"https://cards.test/view/acme-corp\""));
        assert!(!html.contains("history.replaceState"));
    }

    #[test]
    fn escapes_user_content() {
        let card = Card {
            tagline: Some("<script>alert(1)</script>".to_string()),
            ..Card::new("c1", "<b>Evil</b>")
        };
        let html = render(&resolved(card, None), "https://cards.test", "Cardly").into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;b&gt;Evil&lt;/b&gt;"));
    }

    #[test]
    fn unsafe_urls_are_dropped() {
        let card = Card {
            website: Some("javascript:alert(1)".to_string()),
            logo: Some("javascript:alert(2)".to_string()),
            ..Card::new("c1", "Acme")
        };
        let html = render(&resolved(card, None), "https://cards.test", "Cardly").into_string();
        assert!(!html.contains("javascript:alert"));
    }

    #[test]
    fn includes_rewrite_script_when_requested() {
        let html = render(
            &resolved(Card::new("c1", "Acme Corp"), Some("/view/acme-corp")),
            "https://cards.test",
            "Cardly",
        )
        .into_string();
        assert!(html.contains("history.replaceState(null,'',\"/view/acme-corp\")"));
    }

    #[test]
    fn description_falls_back() {
        assert_eq!(
            page_description(&Card::new("c1", "Acme")),
            "Digital business card for Acme"
        );
        let card = Card {
            description: Some("We make widgets.".to_string()),
            ..Card::new("c1", "Acme")
        };
        assert_eq!(page_description(&card), "We make widgets.");
    }
}
