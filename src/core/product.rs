//! Product business logic - Handles all catalog operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting products.
//! Every write goes through [`NewProduct::validate`], so stock and price can never be stored
//! negative. Deletion is a soft delete: the row stays so that sales history keeps its
//! reference, but the product disappears from every active query and can no longer be sold.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Input for creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Product name, trimmed before storing
    pub name: String,
    /// Free-form category
    #[serde(default)]
    pub category: String,
    /// Units on hand
    pub stock: i32,
    /// Unit price
    pub price: f64,
    /// `YYYY-MM-DD`, empty or absent for no expiry
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Supplier name
    #[serde(default)]
    pub supplier: String,
}

impl NewProduct {
    /// Validates the input and parses the expiry date.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The name is empty or whitespace-only
    /// - The stock is negative
    /// - The price is negative or not finite (NaN, infinity)
    /// - The expiry date is not a `YYYY-MM-DD` date
    pub fn validate(&self) -> Result<Option<NaiveDate>> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Product name cannot be empty"));
        }

        if self.stock < 0 {
            return Err(Error::InvalidStock { stock: self.stock });
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidPrice { price: self.price });
        }

        parse_expiry_date(self.expiry_date.as_deref())
    }
}

/// Parses an optional `YYYY-MM-DD` date; blank input means "no date".
///
/// # Errors
/// Returns [`Error::InvalidDate`] when the text is not a calendar date.
pub fn parse_expiry_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::InvalidDate {
                value: text.to_string(),
            }),
    }
}

/// Retrieves all active (non-deleted) products, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves active products that still have stock, for the billing screen.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(product::Column::Stock.gt(0))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, including deleted ones.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by ID, returning None if it doesn't exist or was deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_active_product<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Ok(Product::find_by_id(product_id)
        .one(db)
        .await?
        .filter(|p| !p.is_deleted))
}

/// Creates a new product after validating the input.
///
/// When `id` is given the row is inserted with that primary key.
///
/// # Errors
/// Returns an error if validation fails or the insert fails (e.g. the id is taken).
pub async fn create_product<C>(db: &C, id: Option<i64>, input: NewProduct) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let expiry_date = input.validate()?;
    let now = chrono::Utc::now().naive_utc();

    let mut product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        category: Set(input.category.trim().to_string()),
        stock: Set(input.stock),
        price: Set(input.price),
        expiry_date: Set(expiry_date),
        supplier: Set(input.supplier.trim().to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    if let Some(id) = id {
        product.id = Set(id);
    }

    let product = product.insert(db).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok(product)
}

/// Replaces every editable field of an active product.
///
/// # Errors
/// Returns an error if:
/// - Validation fails
/// - The product does not exist or is deleted
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: NewProduct,
) -> Result<product::Model> {
    let expiry_date = input.validate()?;

    let mut product: product::ActiveModel = get_active_product(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(input.name.trim().to_string());
    product.category = Set(input.category.trim().to_string());
    product.stock = Set(input.stock);
    product.price = Set(input.price);
    product.expiry_date = Set(expiry_date);
    product.supplier = Set(input.supplier.trim().to_string());
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    let product = product.update(db).await?;
    tracing::info!(product_id = product.id, "Product updated");
    Ok(product)
}

/// Inserts or updates a product, the way the inventory form submits it.
///
/// An id naming an active product updates it; an unused id (or none) inserts.
///
/// # Errors
/// Returns an error if:
/// - Validation fails
/// - The id belongs to a deleted product ([`Error::ProductNotFound`])
/// - The database write fails
pub async fn save_product(
    db: &DatabaseConnection,
    id: Option<i64>,
    input: NewProduct,
) -> Result<product::Model> {
    if let Some(id) = id
        && let Some(existing) = get_product_by_id(db, id).await?
    {
        if existing.is_deleted {
            return Err(Error::ProductNotFound { id });
        }
        return update_product(db, id, input).await;
    }
    create_product(db, id, input).await
}

/// Soft deletes a product by marking it as deleted, preserving sales history.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = get_active_product(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    let product = product.update(db).await?;
    tracing::info!(product_id, "Product deleted");
    Ok(product)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test empty name validation
        let result = create_product(&db, None, new_product("   ", 1, 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Test negative stock validation
        let result = create_product(&db, None, new_product("Rice", -1, 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidStock { stock: -1 }));

        // Test negative price validation
        let result = create_product(&db, None, new_product("Rice", 1, -10.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidPrice { price: -10.0 }
        ));

        // Test NaN and infinity price validation
        let result = create_product(&db, None, new_product("Rice", 1, f64::NAN)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { price: _ }));
        let result = create_product(&db, None, new_product("Rice", 1, f64::INFINITY)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { price: _ }));

        // Test malformed expiry date
        let mut input = new_product("Milk", 1, 1.0);
        input.expiry_date = Some("31/12/2026".to_string());
        let result = create_product(&db, None, input).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidDate { value: _ }));

        Ok(())
    }

    #[test]
    fn test_parse_expiry_date() {
        assert_eq!(parse_expiry_date(None).unwrap(), None);
        assert_eq!(parse_expiry_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_expiry_date(Some("2026-12-31")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert!(parse_expiry_date(Some("2026-02-30")).is_err());
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = new_product("  Basmati Rice  ", 40, 2.5);
        input.expiry_date = Some("2027-01-31".to_string());
        input.supplier = "Sonar Traders".to_string();
        let product = create_product(&db, None, input).await?;

        assert_eq!(product.name, "Basmati Rice");
        assert_eq!(product.stock, 40);
        assert_eq!(product.price, 2.5);
        assert_eq!(product.expiry_date, NaiveDate::from_ymd_opt(2027, 1, 31));
        assert_eq!(product.supplier, "Sonar Traders");
        assert!(!product.is_deleted);

        // Creating makes it retrievable
        let found = get_active_product(&db, product.id).await?.unwrap();
        assert_eq!(found, product);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_with_explicit_id() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, Some(42), new_product("Tea", 5, 3.0)).await?;
        assert_eq!(product.id, 42);

        // The same id cannot be inserted twice
        let result = create_product(&db, Some(42), new_product("Coffee", 5, 3.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_active_products_ordered() -> Result<()> {
        let db = setup_test_db().await?;

        let sugar = create_test_product(&db, "Sugar").await?;
        let flour = create_test_product(&db, "Flour").await?;

        let products = get_all_active_products(&db).await?;
        assert_eq!(products, vec![flour, sugar]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_available_products_skips_empty_stock() -> Result<()> {
        let db = setup_test_db().await?;

        let in_stock = create_custom_product(&db, "Soap", 3, 1.0).await?;
        create_custom_product(&db, "Shampoo", 0, 4.0).await?;

        let available = get_available_products(&db).await?;
        assert_eq!(available, vec![in_stock]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Original").await?;

        let mut input = new_product("Updated", 7, 15.0);
        input.category = "dairy".to_string();
        let updated = update_product(&db, product.id, input).await?;

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.category, "dairy");
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.price, 15.0);

        let retrieved = Product::find_by_id(product.id).one(&db).await?.unwrap();
        assert_eq!(retrieved, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_product(&db, 999, new_product("Ghost", 1, 1.0)).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 999 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_product_upserts() -> Result<()> {
        let db = setup_test_db().await?;

        // Unknown id inserts with that id
        let created = save_product(&db, Some(7), new_product("Eggs", 12, 0.3)).await?;
        assert_eq!(created.id, 7);

        // Known id updates in place
        let updated = save_product(&db, Some(7), new_product("Eggs", 24, 0.25)).await?;
        assert_eq!(updated.id, 7);
        assert_eq!(updated.stock, 24);
        assert_eq!(get_all_active_products(&db).await?.len(), 1);

        // No id inserts a fresh row
        let other = save_product(&db, None, new_product("Bread", 5, 1.2)).await?;
        assert_ne!(other.id, 7);
        assert_eq!(get_all_active_products(&db).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Butter").await?;

        let deleted = delete_product(&db, product.id).await?;
        assert!(deleted.is_deleted);

        // Deleting removes it from every active view
        assert!(get_all_active_products(&db).await?.is_empty());
        assert!(get_active_product(&db, product.id).await?.is_none());

        // The row itself is kept for history
        assert!(get_product_by_id(&db, product.id).await?.is_some());

        // A second delete reports not found
        let result = delete_product(&db, product.id).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_deleted_product_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Cheese").await?;
        delete_product(&db, product.id).await?;

        let result = update_product(&db, product.id, new_product("Cheese", 1, 1.0)).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_product_over_deleted_id_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, Some(7), new_product("Yogurt", 4, 0.8)).await?;
        delete_product(&db, 7).await?;

        let result = save_product(&db, Some(7), new_product("Yogurt", 6, 0.9)).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 7 }));

        // The deleted row is left untouched
        let stored = get_product_by_id(&db, 7).await?.unwrap();
        assert!(stored.is_deleted);
        assert_eq!(stored.stock, 4);

        Ok(())
    }
}
