//! Charstats - sync Skritter study records into a local database.
//!
//! This library fetches vocab and review items from the Skritter API,
//! normalizes them onto a small relational schema, and writes them
//! idempotently so that later syncs only fetch what changed.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//! - `sqlite` / `postgres` - Database drivers.
//!
//! # Example
//!
//! ```ignore
//! use charstats::{connect_and_migrate, skritter::SkritterClient, sync};
//!
//! let db = connect_and_migrate("sqlite://skritter.db?mode=rwc").await?;
//! let client = SkritterClient::new(charstats::skritter::DEFAULT_BASE_URL, &token)?;
//!
//! let summary = sync::run_sync(&db, &client, &sync::SyncOptions::default(), None).await?;
//! println!("{} items updated", summary.items_affected);
//!
//! let hardest = charstats::store::hardest_items(&db, &Default::default()).await?;
//! ```

pub mod db;
pub mod entity;
pub mod http;
pub mod skritter;
pub mod store;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::{connect, status_check};
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use store::StoreError;
