//! SeaORM entity definitions for the local study-record schema.

pub mod item;
pub mod item_part;
pub mod prelude;
pub mod vocab;
