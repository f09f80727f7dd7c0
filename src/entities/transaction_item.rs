//! Transaction item entity - One line of a checkout.
//!
//! Items bought together share a `transaction_id`; the `unit_price` is copied
//! from the product at the time of sale so later price edits don't rewrite history.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Shared identifier of the checkout this line belongs to
    #[sea_orm(indexed)]
    pub transaction_id: i64,
    /// ID of the product sold
    pub item_id: i64,
    /// Units sold on this line
    pub quantity: i32,
    /// Product price at the time of sale
    pub unit_price: f64,
    /// When the checkout was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `TransactionItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ItemId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
