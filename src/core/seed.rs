//! Start-up seeding.
//!
//! The `[[products]]` entries of config.toml are inserted the first time the service
//! runs against an empty catalog. Once any product exists (even a deleted one) seeding
//! is skipped, so edits made through the API are never overwritten on restart.

use crate::{
    config::{ProductSeed, users::BootstrapUser},
    core::{
        product::{NewProduct, create_product},
        user::ensure_user,
    },
    entities::Product,
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::{debug, info};

impl From<&ProductSeed> for NewProduct {
    fn from(seed: &ProductSeed) -> Self {
        Self {
            name: seed.name.clone(),
            category: seed.category.clone(),
            stock: seed.stock,
            price: seed.price,
            expiry_date: Some(seed.expiry_date.clone()),
            supplier: seed.supplier.clone(),
        }
    }
}

/// Inserts the configured products if the catalog has never been populated.
///
/// The inserts share one transaction. Returns the number of products inserted.
///
/// # Errors
/// Returns an error if a configured product is invalid or an insert fails.
pub async fn seed_initial_products(
    db: &DatabaseConnection,
    seeds: &[ProductSeed],
) -> Result<usize> {
    let existing = Product::find().count(db).await?;
    if existing > 0 {
        debug!(existing, "Catalog already populated, skipping product seed");
        return Ok(0);
    }

    info!(
        "Starting to seed initial products. Found {} configurations from TOML.",
        seeds.len()
    );
    // All or nothing: a bad entry must not leave a partial catalog behind
    let txn = db.begin().await?;
    for seed in seeds {
        create_product(&txn, None, NewProduct::from(seed)).await?;
    }
    txn.commit().await?;
    Ok(seeds.len())
}

/// Creates the bootstrap account if it doesn't exist yet.
///
/// # Errors
/// Returns an error if hashing or the database insert fails.
pub async fn seed_bootstrap_user(db: &DatabaseConnection, user: &BootstrapUser) -> Result<()> {
    if ensure_user(db, &user.username, &user.password).await? {
        info!(username = %user.username, "Bootstrap user created");
    } else {
        debug!(username = %user.username, "Bootstrap user already exists");
    }
    Ok(())
}
