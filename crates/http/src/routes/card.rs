//! Card endpoints
//!
//! Validation only; nothing here changes any state.

use crate::{
    error::HttpError,
    middleware::auth::AuthenticatedUser,
    state::AppState,
    types::{
        CardApplicationRequest, CardPaymentRequest, CardStatus, CardStatusResponse, CardType,
        ErrorResponse, MessageResponse, PaymentReceipt, PaymentResponse,
    },
};
use axum::{Extension, extract::rejection::JsonRejection, response::Json};
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

pub const INVALID_CARD_TYPE_MESSAGE: &str = "Invalid card type";
pub const PAYMENT_FIELDS_MESSAGE: &str = "Payment method and transaction ID are required";

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Current card status
#[utoipa::path(
    get,
    path = "/api/card/status",
    responses(
        (status = 200, description = "Card status", body = CardStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "card"
)]
#[instrument(name = "card_status", skip_all, fields(user_id = %user.id))]
pub async fn card_status(Extension(user): Extension<AuthenticatedUser>) -> Json<CardStatusResponse> {
    Json(CardStatusResponse {
        success: true,
        data: CardStatus {
            has_card: true,
            card_type: CardType::VirtualDebit,
            status: "active".to_string(),
            last_four: "4242".to_string(),
        },
    })
}

/// Apply for a card
#[utoipa::path(
    post,
    path = "/api/card/apply",
    request_body = CardApplicationRequest,
    responses(
        (status = 200, description = "Application received", body = MessageResponse),
        (status = 400, description = "Invalid card type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "card"
)]
#[instrument(name = "card_apply", skip_all, fields(user_id = %user.id))]
pub async fn apply_card(
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CardApplicationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, HttpError> {
    let Json(request) = payload?;

    let card_type = request
        .card_type
        .as_deref()
        .and_then(CardType::parse)
        .ok_or_else(|| HttpError::BadRequest(INVALID_CARD_TYPE_MESSAGE.to_string()))?;

    info!(%card_type, "Card application received");
    Ok(Json(MessageResponse::ok(format!(
        "Application for {card_type} card received and is being processed."
    ))))
}

/// Record a card payment
#[utoipa::path(
    post,
    path = "/api/card/payment",
    request_body = CardPaymentRequest,
    responses(
        (status = 200, description = "Payment acknowledged", body = PaymentResponse),
        (status = 400, description = "Missing payment fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "card"
)]
#[instrument(name = "card_payment", skip_all, fields(user_id = %user.id))]
pub async fn card_payment(
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CardPaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, HttpError> {
    let Json(request) = payload?;

    let (Some(payment_method), Some(transaction_id)) = (
        non_blank(request.payment_method),
        non_blank(request.transaction_id),
    ) else {
        return Err(HttpError::BadRequest(PAYMENT_FIELDS_MESSAGE.to_string()));
    };

    info!(%transaction_id, "Card payment acknowledged");
    Ok(Json(PaymentResponse {
        success: true,
        message: "Payment processed successfully".to_string(),
        data: PaymentReceipt {
            transaction_id,
            payment_method,
            status: "completed".to_string(),
        },
    }))
}

/// Create the card router
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(card_status))
        .routes(routes!(apply_card))
        .routes(routes!(card_payment))
}
