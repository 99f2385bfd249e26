//! Cardly core: business cards, share links and view resolution.
//!
//! This crate holds the sharing protocol behind Cardly's card pages:
//!
//! - [`card`]: the card record and its vCard export
//! - [`slug`]: human-readable URL slugs
//! - [`codec`]: the share token embedded in share URLs
//! - [`store`]: namespaced key-value storage (in-memory and SQLite)
//! - [`counter`]: monotonic per-card view counters
//! - [`registry`]: shared cards, addressable by slug or id
//! - [`cards`]: locally-authored cards
//! - [`resolve`]: turning a view request into the card to display
//! - [`social`]: social share links and QR code URLs
//! - [`generate`]: rule-based card generation from a text prompt
//!
//! Everything here is synchronous; the HTTP service lives in `cardly-view`.

pub mod card;
pub mod cards;
pub mod codec;
pub mod counter;
pub mod error;
pub mod generate;
pub mod registry;
pub mod resolve;
pub mod slug;
pub mod social;
pub mod store;

pub use card::Card;
pub use error::{Error, Result};
pub use registry::{ShareRecord, ShareRegistry};
pub use resolve::{NotFound, ResolvedView, Resolver, ViewRequest};
