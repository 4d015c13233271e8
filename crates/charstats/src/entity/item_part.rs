//! Part codes attached to items.

use serde::{Deserialize, Serialize};

/// The aspect of a vocab an item tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPart {
    Definition,
    Writing,
    Tone,
    Reading,
}

impl ItemPart {
    pub const ALL: [ItemPart; 4] = [
        ItemPart::Writing,
        ItemPart::Definition,
        ItemPart::Tone,
        ItemPart::Reading,
    ];

    /// Code used on the wire and in the `items.part` column.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ItemPart::Definition => "defn",
            ItemPart::Writing => "rune",
            ItemPart::Tone => "tone",
            ItemPart::Reading => "rdng",
        }
    }

    /// Human-facing label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ItemPart::Definition => "meaning",
            ItemPart::Writing => "writing",
            ItemPart::Tone => "tone",
            ItemPart::Reading => "reading",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "defn" => Some(ItemPart::Definition),
            "rune" => Some(ItemPart::Writing),
            "tone" => Some(ItemPart::Tone),
            "rdng" => Some(ItemPart::Reading),
            _ => None,
        }
    }

    /// Display label for a raw part code; unknown codes are returned as-is.
    #[must_use]
    pub fn label_for_code(code: &str) -> &str {
        match Self::from_code(code) {
            Some(part) => part.label(),
            None => code,
        }
    }
}

impl std::fmt::Display for ItemPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
