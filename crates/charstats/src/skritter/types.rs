//! Skritter API data types.
//!
//! Only the fields the local schema (or a plausible future column) needs are
//! declared; everything else in the payload is ignored. Numeric fields the
//! API omits or sends as `null` default to zero.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// One page of `GET /items`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsPage {
    /// Continuation token. Missing, `null` and `""` all mean "no more pages".
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(rename = "Items", default, deserialize_with = "null_as_default")]
    pub items: Vec<SkritterItem>,
    #[serde(rename = "Vocabs", default, deserialize_with = "null_as_default")]
    pub vocabs: Vec<SkritterVocab>,
    /// Informational only; HTTP status is what's checked.
    #[serde(rename = "statusCode", default, deserialize_with = "null_as_default")]
    pub status_code: i32,
}

impl ItemsPage {
    /// The cursor for the next request, if any.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Decode `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A study item: review state for one part of a vocab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkritterItem {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part: String,

    // Epoch seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub changed: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub successes: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_studied: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interval: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_interval: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_success: bool,

    /// Associated vocab IDs. Usually exactly one.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vocab_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vocab_list_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_ids: Vec<String>,
}

/// A vocab: one word or character.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkritterVocab {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ilk: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writing: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reading: String,
    /// Locale -> definition text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub definitions: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub heisig_definition: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub toughness: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub toughness_string: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio: String,
    #[serde(rename = "audioURL", default, deserialize_with = "null_as_default")]
    pub audio_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audios: Vec<SkritterAudio>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dictionary_links: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    /// Sent as a bool by some endpoints and as 0/1 by others, so kept raw.
    #[serde(default)]
    pub starred: Option<serde_json::Value>,
}

/// Audio clip attached to a vocab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkritterAudio {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reading: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writing: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mp3: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_decodes_capitalized_collections() {
        let page: ItemsPage = serde_json::from_value(serde_json::json!({
            "cursor": "abc",
            "statusCode": 200,
            "Items": [{
                "id": "user-zh-人-0-rune",
                "lang": "zh",
                "part": "rune",
                "changed": 1700000000,
                "timeStudied": 42,
                "previousInterval": 600,
                "previousSuccess": true,
                "vocabIds": ["zh-人-0"]
            }],
            "Vocabs": [{
                "id": "zh-人-0",
                "writing": "人",
                "audioURL": "https://audio.test/ren.mp3",
                "heisigDefinition": "person",
                "toughnessString": "easy",
                "definitions": {"en": "person"},
                "audios": [{"id": "a1", "mp3": "ren.mp3"}],
                "starred": 1
            }]
        }))
        .expect("page should decode");

        assert_eq!(page.next_cursor(), Some("abc"));
        assert_eq!(page.status_code, 200);

        let item = &page.items[0];
        assert_eq!(item.time_studied, 42);
        assert_eq!(item.previous_interval, 600);
        assert!(item.previous_success);
        assert_eq!(item.vocab_ids, vec!["zh-人-0".to_string()]);
        assert_eq!(item.reviews, 0);

        let vocab = &page.vocabs[0];
        assert_eq!(vocab.audio_url, "https://audio.test/ren.mp3");
        assert_eq!(vocab.heisig_definition, "person");
        assert_eq!(vocab.audios[0].mp3, "ren.mp3");
        assert_eq!(vocab.starred, Some(serde_json::json!(1)));
    }

    #[test]
    fn null_and_empty_cursors_mean_exhausted() {
        let null: ItemsPage =
            serde_json::from_str(r#"{"cursor": null, "Items": [], "Vocabs": []}"#)
                .expect("decode");
        assert_eq!(null.next_cursor(), None);

        let empty: ItemsPage = serde_json::from_str(r#"{"cursor": ""}"#).expect("decode");
        assert_eq!(empty.next_cursor(), None);
        assert!(empty.items.is_empty());
        assert!(empty.vocabs.is_empty());

        let null_collections: ItemsPage =
            serde_json::from_str(r#"{"Items": null, "Vocabs": null, "statusCode": null}"#)
                .expect("decode");
        assert!(null_collections.items.is_empty());
        assert!(null_collections.vocabs.is_empty());
    }

    #[test]
    fn starred_of_any_shape_decodes() {
        for raw in [r#"true"#, r#"0"#, r#""yes""#, r#"null"#] {
            let json = format!(r#"{{"id": "v", "starred": {raw}}}"#);
            let vocab: SkritterVocab = serde_json::from_str(&json).expect("decode");
            assert_eq!(vocab.id, "v");
        }
    }

    #[test]
    fn null_fields_decode_as_zero_values() {
        let page: ItemsPage = serde_json::from_value(serde_json::json!({
            "cursor": null,
            "Items": [{
                "id": "user-zh-大-0-tone",
                "part": null,
                "changed": 1700000000,
                "last": null,
                "previousInterval": null,
                "previousSuccess": null,
                "vocabListIds": null,
                "vocabIds": ["zh-大-0"]
            }],
            "Vocabs": [{
                "id": "zh-大-0",
                "heisigDefinition": null,
                "audio": null,
                "audioURL": null,
                "definitions": null,
                "audios": null,
                "toughness": null
            }]
        }))
        .expect("nulls should decode");

        let item = &page.items[0];
        assert_eq!(item.part, "");
        assert_eq!(item.last, 0);
        assert_eq!(item.previous_interval, 0);
        assert!(!item.previous_success);
        assert!(item.vocab_list_ids.is_empty());
        assert_eq!(item.changed, 1_700_000_000);

        let vocab = &page.vocabs[0];
        assert_eq!(vocab.heisig_definition, "");
        assert_eq!(vocab.audio, "");
        assert_eq!(vocab.audio_url, "");
        assert!(vocab.definitions.is_empty());
        assert!(vocab.audios.is_empty());
        assert_eq!(vocab.toughness, 0);
    }
}
