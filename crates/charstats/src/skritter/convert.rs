//! Model conversion from Skritter wire records to local entities.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::error::ConvertError;
use super::types::{SkritterItem, SkritterVocab};
use crate::entity::item::ActiveModel as ItemActiveModel;
use crate::entity::vocab::ActiveModel as VocabActiveModel;

/// Locale whose definition is stored in `vocab.definition_en`.
pub const DEFINITION_LOCALE: &str = "en";

/// Convert epoch seconds to a UTC timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
#[must_use]
pub fn epoch_to_timestamp(secs: i64) -> Option<DateTimeWithTimeZone> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.fixed_offset())
}

/// Local value of the starred flag.
///
/// The API reports `starred` as a bool on some responses and an integer on
/// others, so the remote value is never used.
#[must_use]
pub fn normalize_starred(_raw: Option<&serde_json::Value>) -> bool {
    false
}

/// Convert a Skritter vocab into an active model ready for upsert.
///
/// `synced_at` becomes `created_at`; callers pass one timestamp per run.
pub fn vocab_to_active_model(
    vocab: &SkritterVocab,
    synced_at: DateTimeWithTimeZone,
) -> VocabActiveModel {
    let definition = vocab
        .definitions
        .get(DEFINITION_LOCALE)
        .cloned()
        .unwrap_or_default();

    VocabActiveModel {
        id: Set(vocab.id.clone()),
        lang: Set(vocab.lang.clone()),
        priority: Set(vocab.priority),
        style: Set(vocab.style.clone()),
        ilk: Set(vocab.ilk.clone()),
        writing: Set(vocab.writing.clone()),
        reading: Set(vocab.reading.clone()),
        definition_en: Set(definition),
        heisig_definition: Set(vocab.heisig_definition.clone()),
        audio_url: Set(vocab.audio.clone()),
        toughness: Set(vocab.toughness),
        toughness_string: Set(vocab.toughness_string.clone()),
        starred: Set(normalize_starred(vocab.starred.as_ref())),
        created_at: Set(synced_at),
    }
}

/// Convert a Skritter item into an active model ready for replacement.
///
/// Only the first entry of `vocabIds` is kept as the owning vocab; any
/// further associations are dropped.
///
/// # Errors
///
/// - [`ConvertError::MissingVocab`] if the item lists no vocab.
/// - [`ConvertError::InvalidTimestamp`] if an epoch field is out of range.
pub fn item_to_active_model(item: &SkritterItem) -> Result<ItemActiveModel, ConvertError> {
    let vocab_id = item
        .vocab_ids
        .first()
        .cloned()
        .ok_or_else(|| ConvertError::MissingVocab {
            item_id: item.id.clone(),
        })?;

    let timestamp = |field: &'static str, value: i64| {
        epoch_to_timestamp(value).ok_or_else(|| ConvertError::InvalidTimestamp {
            item_id: item.id.clone(),
            field,
            value,
        })
    };

    Ok(ItemActiveModel {
        id: Set(item.id.clone()),
        lang: Set(item.lang.clone()),
        style: Set(item.style.clone()),
        changed: Set(timestamp("changed", item.changed)?),
        last: Set(timestamp("last", item.last)?),
        created_at: Set(timestamp("created", item.created)?),
        next: Set(timestamp("next", item.next)?),
        reviews: Set(item.reviews),
        successes: Set(item.successes),
        time_studied: Set(item.time_studied),
        interval: Set(item.interval),
        previous_interval: Set(item.previous_interval),
        previous_success: Set(item.previous_success),
        vocab_id: Set(vocab_id),
        part: Set(item.part.clone()),
    })
}
