//! Item entity - one trackable learning fact about a vocab's part.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item model - review statistics for one part (tone, reading, ...) of a vocab.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Remote item ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub lang: String,
    pub style: String,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    /// When the remote service last changed this item. Drives the sync watermark.
    pub changed: DateTimeWithTimeZone,
    /// When the item was last reviewed.
    pub last: DateTimeWithTimeZone,
    /// When the item was first created remotely.
    pub created_at: DateTimeWithTimeZone,
    /// When the item is next due.
    pub next: DateTimeWithTimeZone,

    // ─── Review Statistics ───────────────────────────────────────────────────
    pub reviews: i32,
    pub successes: i32,
    /// Cumulative study time in seconds.
    pub time_studied: i32,
    /// Current spaced-repetition interval in seconds.
    pub interval: i64,
    pub previous_interval: i64,
    pub previous_success: bool,

    // ─── Ownership ───────────────────────────────────────────────────────────
    /// Owning vocab. The remote payload lists several; only the first is kept.
    pub vocab_id: String,
    /// Raw part code (`defn`, `rune`, `tone`, `rdng`).
    pub part: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Join-only relation; the schema carries no foreign key constraint.
    #[sea_orm(
        belongs_to = "super::vocab::Entity",
        from = "Column::VocabId",
        to = "super::vocab::Column::Id"
    )]
    Vocab,
}

impl Related<super::vocab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vocab.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
