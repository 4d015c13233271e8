//! Skritter API client and record normalization.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for API calls and record conversion
//! - [`types`] - Wire types for `GET /items` pages
//! - [`client`] - Paginated fetch with cursor handling and deduplication
//! - [`convert`] - Mapping of wire records onto local entities
//!
//! # Example
//!
//! ```ignore
//! use charstats::skritter::{SkritterClient, DEFAULT_BASE_URL};
//!
//! let client = SkritterClient::new(DEFAULT_BASE_URL, "token")?;
//! let fetched = client.fetch_changed(None, None).await?;
//! println!("{} items over {} pages", fetched.items.len(), fetched.pages);
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, FetchedCollections, SkritterClient};
pub use convert::{
    DEFINITION_LOCALE, epoch_to_timestamp, item_to_active_model, normalize_starred,
    vocab_to_active_model,
};
pub use error::{ConvertError, SkritterError};
pub use types::{ItemsPage, SkritterAudio, SkritterItem, SkritterVocab};
