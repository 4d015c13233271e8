//! Common re-exports for convenient entity usage.

pub use super::item::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as Item, Model as ItemModel,
};
pub use super::item_part::ItemPart;
pub use super::vocab::{
    ActiveModel as VocabActiveModel, Column as VocabColumn, Entity as Vocab, Model as VocabModel,
};
