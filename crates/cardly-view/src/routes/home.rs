//! Home page with the most-viewed shared cards.

use axum::extract::State;
use axum::response::IntoResponse;
use maud::{DOCTYPE, PreEscaped, html};

use crate::render::components::{PAGE_CSS, format_count};
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let site_name = &state.config.site_name;
    let registry = state.resolver.registry();

    // Counters outlive unsharing, so drop unshared cards before taking the top.
    let top: Vec<_> = registry
        .counters()
        .leaderboard(usize::MAX)
        .into_iter()
        .filter_map(|(id, views)| {
            registry
                .lookup(&id)
                .filter(|record| record.id == id)
                .map(|record| (record, views))
        })
        .take(state.config.leaderboard_size)
        .collect();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (site_name) " | Digital Business Cards" }
                meta name="description" content="Create, share and track digital business cards with a link or a QR code.";
                meta property="og:title" content=(site_name);
                meta property="og:type" content="website";
                style { (PreEscaped(PAGE_CSS)) }
                style { (PreEscaped(HOME_CSS)) }
            }
            body {
                main class="home" {
                    h1 class="home-title" { (site_name) }
                    p class="home-tagline" {
                        "Digital business cards you can share with a link or a QR code."
                    }

                    @if !top.is_empty() {
                        section class="home-top" {
                            h2 { "Most viewed" }
                            ol {
                                @for (record, views) in &top {
                                    li {
                                        a href={"/view/" (record.slug)} { (record.card.name) }
                                        span class="home-views" { (format_count(*views)) " views" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Additional CSS for the home page only.
const HOME_CSS: &str = r#"
.home{display:flex;flex-direction:column;align-items:center;min-height:60vh;text-align:center;padding:2rem 1rem}
.home-title{font-size:3rem;font-weight:800;letter-spacing:-.04em}
.home-tagline{font-size:1.1rem;color:var(--fg2);margin-top:.5rem;max-width:400px}
.home-top{margin-top:2.5rem;width:100%;max-width:420px;text-align:left}
.home-top h2{font-size:.8rem;text-transform:uppercase;letter-spacing:.05em;color:var(--fg3);margin-bottom:.75rem}
.home-top ol{list-style:none;display:flex;flex-direction:column;gap:.5rem}
.home-top li{display:flex;justify-content:space-between;padding:.5rem .75rem;border-radius:6px;border:1px solid var(--border)}
.home-views{color:var(--fg3);font-size:.85rem}
"#;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use cardly_core::Card;
    use cardly_core::store::MemoryStore;

    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn most_viewed_skips_unshared_cards() {
        let config = Config {
            bind_addr: "127.0.0.1:0".to_string(),
            base_url: "https://cards.test".to_string(),
            site_name: "Cardly".to_string(),
            db_path: None,
            leaderboard_size: 2,
        };
        let state = AppState::with_store(config, Arc::new(MemoryStore::new()));
        let registry = state.resolver.registry();
        registry.share(&Card::new("c1", "Acme Corp"));
        registry.share(&Card::new("c2", "Beta Labs"));
        registry.share(&Card::new("gone", "Gone Inc"));
        registry.unshare("gone");

        let counters = registry.counters();
        counters.set_if_higher("gone", 50);
        counters.set_if_higher("never-shared", 40);
        counters.set_if_higher("c1", 3);
        counters.set_if_higher("c2", 1);

        let response = home_page(State(state.clone())).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("href=\"/view/acme-corp\""));
        assert!(body.contains("href=\"/view/beta-labs\""));
        assert!(!body.contains("Gone Inc"));
        assert!(body.find("acme-corp").unwrap() < body.find("beta-labs").unwrap());
    }
}
