//! Product sale-info route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use indecisive_wear_core::{Locale, SaleInfo};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for the sale endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SaleQuery {
    /// Storefront locale (`bg`, `en-GB`, ...). Defaults to Bulgarian.
    pub locale: Option<String>,
}

/// Sale status plus ready-made badge labels.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub sale: SaleInfo,
    /// Current price label, only when on sale.
    pub badge: Option<String>,
    /// `-N%` label, only when on sale.
    pub percentage_badge: Option<String>,
}

/// GET /api/products/{handle}/sale
#[instrument(skip(state, query), fields(handle = %handle))]
pub async fn sale(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<SaleQuery>,
) -> Result<Json<SaleResponse>> {
    let locale = query
        .locale
        .as_deref()
        .and_then(|l| l.parse::<Locale>().ok())
        .unwrap_or_default();

    let facts = state.storefront().product_price_facts(&handle).await?;
    let policy = &state.config().sale_policy;

    Ok(Json(SaleResponse {
        sale: policy.resolve(&facts),
        badge: policy.badge_text(&facts, locale),
        percentage_badge: policy.percentage_badge(&facts),
    }))
}
