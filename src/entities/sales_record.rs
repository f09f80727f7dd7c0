//! Sales record entity - Units of a product sold on a given day.
//!
//! These rows feed the dashboard history and the sales forecast.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product sold
    pub item_id: i64,
    /// Calendar day of the sale
    pub date: Date,
    /// Units sold
    pub sales: i64,
}

/// Defines relationships between `SalesRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record references one product
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
