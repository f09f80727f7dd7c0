//! Billing handlers - checkout and transaction history.

use crate::{
    core::{
        checkout::{self, CheckoutLine, Receipt, TransactionSummary},
        product,
    },
    entities::product::Model as ProductModel,
    errors::Result,
    web::{AppState, ApiJson, CurrentUser},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Number of past transactions shown on the billing screen.
const RECENT_TRANSACTIONS: u64 = 10;

/// Body of `POST /billing` and `POST /api/checkout`
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Requested lines
    pub items: Vec<CheckoutLine>,
}

/// Billing screen data
#[derive(Debug, Serialize)]
pub struct BillingView {
    /// Products that can be sold right now
    pub products: Vec<ProductModel>,
    /// Most recent transactions, newest first
    pub recent_transactions: Vec<TransactionSummary>,
}

/// Shows sellable products and recent transactions.
pub async fn view(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<BillingView>> {
    let products = product::get_available_products(&state.database).await?;
    let recent_transactions =
        checkout::list_transactions(&state.database, RECENT_TRANSACTIONS).await?;
    Ok(Json(BillingView {
        products,
        recent_transactions,
    }))
}

/// Sells the requested items.
pub async fn checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<Receipt>)> {
    let receipt = checkout::checkout(&state.database, &request.items)
        .await
        .inspect_err(|e| {
            tracing::info!(by = %user.username, error = %e, "Checkout rejected");
        })?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Shows one past transaction.
pub async fn get_transaction(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(transaction_id): Path<i64>,
) -> Result<Json<TransactionSummary>> {
    Ok(Json(
        checkout::get_transaction(&state.database, transaction_id).await?,
    ))
}
