//! Checkout business logic - Sells a set of products as one transaction.
//!
//! A checkout validates every line, then inside a single database transaction decrements
//! stock, appends one transaction item and one sales record per line under a freshly
//! allocated transaction id, and commits. Any failure before the commit drops the
//! database transaction, which rolls back every write made so far.

use crate::{
    core::product::get_active_product,
    entities::{Product, TransactionItem, product, sales_record, transaction_item},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    DatabaseTransaction, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckoutLine {
    /// Product being bought
    pub product_id: i64,
    /// Units requested
    pub quantity: i32,
}

/// One sold line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    /// Product sold
    pub product_id: i64,
    /// Product name at the time of sale
    pub name: String,
    /// Units sold
    pub quantity: i32,
    /// Unit price at the time of sale
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub line_total: f64,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Shared identifier of every line in this checkout
    pub transaction_id: i64,
    /// Sold lines, one per distinct product
    pub lines: Vec<ReceiptLine>,
    /// Sum of all line totals
    pub total: f64,
    /// When the checkout was committed
    pub created_at: DateTime<Utc>,
}

/// A past transaction reassembled from its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// Shared transaction identifier
    pub transaction_id: i64,
    /// Items recorded under this identifier
    pub items: Vec<transaction_item::Model>,
    /// Sum of `quantity * unit_price` over the items
    pub total: f64,
    /// When the checkout was recorded
    pub created_at: DateTime<Utc>,
}

/// Merges lines naming the same product and checks quantities.
///
/// Order of first appearance is preserved.
///
/// # Errors
/// Returns [`Error::EmptyCheckout`] for no lines and [`Error::InvalidQuantity`] for
/// non-positive quantities (or a merged quantity that overflows).
pub fn merge_lines(lines: &[CheckoutLine]) -> Result<Vec<CheckoutLine>> {
    if lines.is_empty() {
        return Err(Error::EmptyCheckout);
    }

    let mut merged: Vec<CheckoutLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(Error::InvalidQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }
        if let Some(existing) = merged.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.quantity =
                existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(Error::InvalidQuantity {
                        product_id: line.product_id,
                        quantity: line.quantity,
                    })?;
        } else {
            merged.push(*line);
        }
    }
    Ok(merged)
}

/// Sells the requested products atomically.
///
/// # Errors
/// Returns an error if:
/// - There are no lines, or a quantity is not positive
/// - A product does not exist or is deleted
/// - A product has less stock than requested
/// - Any database operation fails
///
/// In every error case no stock, transaction item or sales record is changed.
pub async fn checkout(db: &DatabaseConnection, lines: &[CheckoutLine]) -> Result<Receipt> {
    let lines = merge_lines(lines)?;

    let txn = db.begin().await?;

    // Validate everything before the first write
    let mut products = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = get_active_product(&txn, line.product_id)
            .await?
            .ok_or(Error::ProductNotFound {
                id: line.product_id,
            })?;
        if product.stock < line.quantity {
            return Err(Error::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: line.quantity,
            });
        }
        products.push(product);
    }

    let transaction_id = next_transaction_id(&txn).await?;
    let now = Utc::now();
    let today = now.date_naive();

    let mut receipt_lines = Vec::with_capacity(lines.len());
    for (line, product) in lines.iter().zip(products) {
        decrement_stock(&txn, &product, line.quantity).await?;

        transaction_item::ActiveModel {
            transaction_id: Set(transaction_id),
            item_id: Set(product.id),
            quantity: Set(line.quantity),
            unit_price: Set(product.price),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        sales_record::ActiveModel {
            item_id: Set(product.id),
            date: Set(today),
            sales: Set(i64::from(line.quantity)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        receipt_lines.push(ReceiptLine {
            product_id: product.id,
            name: product.name,
            quantity: line.quantity,
            unit_price: product.price,
            line_total: f64::from(line.quantity) * product.price,
        });
    }

    txn.commit().await?;

    let total = receipt_lines.iter().map(|l| l.line_total).sum();
    tracing::info!(
        transaction_id,
        lines = receipt_lines.len(),
        total,
        "Checkout completed"
    );

    Ok(Receipt {
        transaction_id,
        lines: receipt_lines,
        total,
        created_at: now,
    })
}

/// Allocates the next transaction id: one past the largest recorded, starting at 1.
async fn next_transaction_id(txn: &DatabaseTransaction) -> Result<i64> {
    let current: Option<Option<i64>> = TransactionItem::find()
        .select_only()
        .column_as(transaction_item::Column::TransactionId.max(), "max_id")
        .into_tuple::<Option<i64>>()
        .one(txn)
        .await?;
    Ok(current.flatten().unwrap_or(0) + 1)
}

/// Decrements stock only if enough is still there.
///
/// The `stock >= quantity` guard makes a concurrent checkout that drained the
/// product fail here instead of driving stock negative.
async fn decrement_stock(
    txn: &DatabaseTransaction,
    product: &product::Model,
    quantity: i32,
) -> Result<()> {
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .col_expr(
            product::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .filter(product::Column::Id.eq(product.id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::InsufficientStock {
            product_id: product.id,
            available: product.stock,
            requested: quantity,
        });
    }
    Ok(())
}

/// Lists the most recent transactions, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_transactions(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<TransactionSummary>> {
    let ids: Vec<i64> = TransactionItem::find()
        .select_only()
        .column(transaction_item::Column::TransactionId)
        .distinct()
        .order_by_desc(transaction_item::Column::TransactionId)
        .limit(limit)
        .into_tuple::<i64>()
        .all(db)
        .await?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let items = TransactionItem::find()
        .filter(transaction_item::Column::TransactionId.is_in(ids))
        .order_by_asc(transaction_item::Column::Id)
        .all(db)
        .await?;

    let mut summaries = group_items(items);
    summaries.sort_by(|a, b| b.transaction_id.cmp(&a.transaction_id));
    Ok(summaries)
}

/// Retrieves one transaction by its shared id.
///
/// # Errors
/// Returns [`Error::TransactionNotFound`] if no item carries that id.
pub async fn get_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<TransactionSummary> {
    let items = TransactionItem::find()
        .filter(transaction_item::Column::TransactionId.eq(transaction_id))
        .order_by_asc(transaction_item::Column::Id)
        .all(db)
        .await?;

    group_items(items)
        .pop()
        .ok_or(Error::TransactionNotFound { id: transaction_id })
}

fn group_items(items: Vec<transaction_item::Model>) -> Vec<TransactionSummary> {
    let mut groups: BTreeMap<i64, Vec<transaction_item::Model>> = BTreeMap::new();
    for item in items {
        groups.entry(item.transaction_id).or_default().push(item);
    }

    groups
        .into_iter()
        .filter_map(|(transaction_id, items)| {
            let created_at = items.first()?.created_at;
            let total = items
                .iter()
                .map(|i| f64::from(i.quantity) * i.unit_price)
                .sum();
            Some(TransactionSummary {
                transaction_id,
                items,
                total,
                created_at,
            })
        })
        .collect()
}
