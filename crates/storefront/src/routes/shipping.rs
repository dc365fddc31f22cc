//! Shopify carrier-service callback handler.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::carrier_service::{
    HMAC_HEADER, RateRequestPayload, RateResponse, verify_signature,
};
use crate::state::AppState;

/// POST /api/shipping/rates
///
/// Signature failures and malformed payloads are rejected. Courier problems
/// never are: they produce an empty rate list so checkout still works.
#[instrument(skip_all)]
pub async fn rates(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RateResponse>> {
    if let Some(secret) = &state.config().shopify.carrier_secret {
        let signature = headers.get(HMAC_HEADER).and_then(|v| v.to_str().ok());
        if !verify_signature(&body, signature, secret.expose_secret()) {
            warn!("Rejected carrier-service request with bad signature");
            return Err(AppError::Unauthorized("invalid signature".to_string()));
        }
    }

    let payload: RateRequestPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid rate request: {e}")))?;

    let request = payload
        .rate
        .to_delivery_request(&state.config().delivery.origin)
        .map_err(|e| AppError::BadRequest(format!("invalid rate request: {e}")))?;
    let country = request.to.country_code.clone();

    add_breadcrumb(
        "shipping",
        "Quoting checkout rates",
        Some(&[("country", country.as_str())]),
    );

    let options = state.delivery().available_options(&request).await;
    let response = RateResponse::from_options(&options, Utc::now().date_naive());

    info!(
        country = %country,
        weight_kg = %request.weight_kg,
        rates = response.rates.len(),
        "Returned carrier-service rates"
    );

    Ok(Json(response))
}
