//! Dashboard report generation.
//!
//! Collects the catalog and sales aggregates shown on the dashboard and attaches the
//! sales forecast. All functions are framework-agnostic and return structured data
//! that the web layer serializes as-is.

use crate::{
    config::DashboardConfig,
    core::{
        forecast::{self, Forecast},
        product::get_all_active_products,
    },
    entities::{SalesRecord, TransactionItem, product, sales_record, transaction_item},
    errors::Result,
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect};
use serde::Serialize;

/// Stock alert entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAlert {
    /// Product id
    pub id: i64,
    /// Product name
    pub name: String,
    /// Units on hand
    pub stock: i32,
    /// Expiry date, if any
    pub expiry_date: Option<NaiveDate>,
}

impl From<&product::Model> for ProductAlert {
    fn from(p: &product::Model) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            stock: p.stock,
            expiry_date: p.expiry_date,
        }
    }
}

/// Units sold on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    /// Calendar day
    pub date: NaiveDate,
    /// Units sold across all products
    pub sales: f64,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Number of active products
    pub product_count: usize,
    /// Units in stock across all active products
    pub total_stock: i64,
    /// Sum of `stock * price` across active products
    pub inventory_value: f64,
    /// Active products at or below the low-stock threshold
    pub low_stock: Vec<ProductAlert>,
    /// Active products with stock that expire within the window (or already expired)
    pub expiring_soon: Vec<ProductAlert>,
    /// Number of distinct checkouts recorded
    pub transaction_count: u64,
    /// Units sold across all sales records
    pub total_units_sold: i64,
    /// Units sold per day, oldest first
    pub daily_sales: Vec<DailySales>,
    /// Predicted units sold for the coming days
    pub forecast: Forecast,
}

/// Builds the dashboard report as of today.
///
/// # Errors
/// Returns an error if a catalog or sales query fails. Forecast failures only
/// produce an empty forecast.
pub async fn build_dashboard(
    db: &DatabaseConnection,
    config: &DashboardConfig,
) -> Result<DashboardReport> {
    build_dashboard_at(db, config, Utc::now().date_naive()).await
}

/// Builds the dashboard report as if `today` were the current date.
pub async fn build_dashboard_at(
    db: &DatabaseConnection,
    config: &DashboardConfig,
    today: NaiveDate,
) -> Result<DashboardReport> {
    let products = get_all_active_products(db).await?;

    let total_stock = products.iter().map(|p| i64::from(p.stock)).sum();
    let inventory_value = products
        .iter()
        .map(|p| f64::from(p.stock) * p.price)
        .sum();

    let low_stock = products
        .iter()
        .filter(|p| p.stock <= config.low_stock_threshold)
        .map(ProductAlert::from)
        .collect();

    let horizon = u64::try_from(config.expiry_window_days)
        .ok()
        .and_then(|days| today.checked_add_days(Days::new(days)))
        .unwrap_or(today);
    let mut expiring_soon: Vec<ProductAlert> = products
        .iter()
        .filter(|p| p.stock > 0 && p.expiry_date.is_some_and(|d| d <= horizon))
        .map(ProductAlert::from)
        .collect();
    expiring_soon.sort_by_key(|a| a.expiry_date);

    let transaction_count = TransactionItem::find()
        .select_only()
        .column(transaction_item::Column::TransactionId)
        .distinct()
        .count(db)
        .await?;

    let records: Vec<(NaiveDate, i64)> = SalesRecord::find()
        .select_only()
        .column(sales_record::Column::Date)
        .column(sales_record::Column::Sales)
        .into_tuple::<(NaiveDate, i64)>()
        .all(db)
        .await?;
    let total_units_sold = records.iter().map(|(_, sales)| sales).sum();
    let daily_sales = forecast::daily_totals(records)
        .into_iter()
        .map(|(date, sales)| DailySales { date, sales })
        .collect();

    let forecast = forecast::forecast_sales(db, config.forecast_days).await;

    Ok(DashboardReport {
        product_count: products.len(),
        total_stock,
        inventory_value,
        low_stock,
        expiring_soon,
        transaction_count,
        total_units_sold,
        daily_sales,
        forecast,
    })
}
