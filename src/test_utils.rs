//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::product::{self, NewProduct},
    entities::{self, sales_record},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds product input with the given name, stock and price.
///
/// # Defaults
/// * `category`: "general"
/// * `expiry_date`: None
/// * `supplier`: "Test Supplier"
pub fn new_product(name: &str, stock: i32, price: f64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: "general".to_string(),
        stock,
        price,
        expiry_date: None,
        supplier: "Test Supplier".to_string(),
    }
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * stock: 10
/// * price: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, None, new_product(name, 10, 10.0)).await
}

/// Creates a test product with custom stock and price.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    stock: i32,
    price: f64,
) -> Result<entities::product::Model> {
    product::create_product(db, None, new_product(name, stock, price)).await
}

/// Inserts a sales record directly, bypassing checkout.
pub async fn record_test_sale(
    db: &DatabaseConnection,
    item_id: i64,
    date: NaiveDate,
    sales: i64,
) -> Result<sales_record::Model> {
    sales_record::ActiveModel {
        item_id: Set(item_id),
        date: Set(date),
        sales: Set(sales),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
