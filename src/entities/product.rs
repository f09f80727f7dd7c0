//! Product entity - A catalog item with price and stock count.
//!
//! Products are soft deleted so that transaction and sales history keeps
//! pointing at a valid row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Basmati Rice 1kg")
    pub name: String,
    /// Free-form category (e.g., "grocery", "dairy")
    pub category: String,
    /// Units on hand, never negative
    pub stock: i32,
    /// Unit price, never negative
    pub price: f64,
    /// Best-before date, if the product perishes
    pub expiry_date: Option<Date>,
    /// Supplier name
    pub supplier: String,
    /// Soft delete flag - if true, product is hidden but history is preserved
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many transaction items
    #[sea_orm(has_many = "super::transaction_item::Entity")]
    TransactionItems,
    /// One product has many sales records
    #[sea_orm(has_many = "super::sales_record::Entity")]
    SalesRecords,
}

impl Related<super::transaction_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItems.def()
    }
}

impl Related<super::sales_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
