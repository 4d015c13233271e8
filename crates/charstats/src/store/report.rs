//! The "hardest items" report.

use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;

use super::errors::Result;
use crate::entity::item::{self, Entity as Item};
use crate::entity::item_part::ItemPart;
use crate::entity::vocab;

/// Default number of rows in the report.
pub const DEFAULT_REPORT_LIMIT: u64 = 3;

/// Which parts to rank and how many rows to return.
///
/// Parts switched off are excluded; parts with codes outside [`ItemPart`]
/// are never excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyQuery {
    pub limit: u64,
    pub writing: bool,
    pub definition: bool,
    pub tone: bool,
    pub reading: bool,
}

impl Default for DifficultyQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_REPORT_LIMIT,
            writing: true,
            definition: true,
            tone: false,
            reading: false,
        }
    }
}

impl DifficultyQuery {
    /// Parts the caller switched off.
    #[must_use]
    pub fn excluded_parts(&self) -> Vec<ItemPart> {
        [
            (ItemPart::Writing, self.writing),
            (ItemPart::Definition, self.definition),
            (ItemPart::Tone, self.tone),
            (ItemPart::Reading, self.reading),
        ]
        .into_iter()
        .filter_map(|(part, included)| (!included).then_some(part))
        .collect()
    }
}

/// One row of the difficulty report.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct DifficultItem {
    pub vocab_id: String,
    pub part: String,
    pub writing: String,
    pub reading: String,
    pub heisig_definition: String,
    pub definition_en: String,
    pub reviews: i32,
    pub successes: i32,
    /// `successes * 100 / reviews`, truncated.
    pub percent: i64,
}

impl DifficultItem {
    /// Display label of the part (`writing`, `meaning`, ...).
    #[must_use]
    pub fn part_label(&self) -> &str {
        ItemPart::label_for_code(&self.part)
    }
}

/// Select statement behind [`hardest_items`].
///
/// `percent` is integer division over two `INTEGER` columns, which Postgres
/// types as `int4`; it is cast to `BIGINT` so every backend yields an `i64`.
fn hardest_items_select(query: &DifficultyQuery) -> Select<Item> {
    let percent = Expr::col((Item, item::Column::Successes))
        .mul(100)
        .div(Expr::col((Item, item::Column::Reviews)));

    let mut select = Item::find()
        .select_only()
        .column(item::Column::VocabId)
        .column(item::Column::Part)
        .column(item::Column::Reviews)
        .column(item::Column::Successes)
        .column_as(
            SimpleExpr::from(Func::cast_as(percent.clone(), Alias::new("BIGINT"))),
            "percent",
        )
        .column(vocab::Column::Writing)
        .column(vocab::Column::Reading)
        .column(vocab::Column::HeisigDefinition)
        .column(vocab::Column::DefinitionEn)
        .join(JoinType::InnerJoin, item::Relation::Vocab.def())
        .filter(item::Column::Reviews.gt(0));

    let excluded: Vec<&'static str> = query
        .excluded_parts()
        .into_iter()
        .map(ItemPart::code)
        .collect();
    if !excluded.is_empty() {
        select = select.filter(item::Column::Part.is_not_in(excluded));
    }

    select
        .order_by_asc(percent)
        .order_by_desc(item::Column::Reviews)
        .order_by_asc(item::Column::Id)
        .limit(query.limit)
}

/// Items with the lowest success rate, joined with their vocab.
///
/// Items that were never reviewed are skipped. Items whose vocab is missing
/// are dropped by the inner join.
pub async fn hardest_items(
    db: &DatabaseConnection,
    query: &DifficultyQuery,
) -> Result<Vec<DifficultItem>> {
    let rows = hardest_items_select(query)
        .into_model::<DifficultItem>()
        .all(db)
        .await?;

    tracing::debug!(rows = rows.len(), limit = query.limit, "Ran difficulty report");
    Ok(rows)
}
