//! Vocab entity - one lexical unit (word or character) being studied.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vocab model - a word or character with the learner's metadata.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vocab")]
pub struct Model {
    /// Remote vocab ID (e.g. `zh-人-0`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    // ─── Identity ────────────────────────────────────────────────────────────
    pub lang: String,
    pub priority: i32,
    pub style: String,
    pub ilk: String,

    // ─── Content ─────────────────────────────────────────────────────────────
    /// Written form of the word or character.
    pub writing: String,
    /// Phonetic reading (pinyin for Chinese).
    pub reading: String,
    /// English definition; empty when the remote record has none.
    #[sea_orm(column_type = "Text")]
    pub definition_en: String,
    /// Heisig keyword, if the remote service supplied one.
    #[sea_orm(column_type = "Text")]
    pub heisig_definition: String,
    #[sea_orm(column_type = "Text")]
    pub audio_url: String,

    // ─── Difficulty ──────────────────────────────────────────────────────────
    pub toughness: i32,
    pub toughness_string: String,

    /// Always stored as `false`; the remote value is not trusted.
    #[sea_orm(default_value = false)]
    pub starred: bool,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// When this vocab was last seen by a sync run.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item::Entity")]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
