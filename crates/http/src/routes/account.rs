//! Account endpoints

use crate::{
    middleware::auth::AuthenticatedUser,
    state::AppState,
    types::{AccountInfo, AccountInfoResponse, ErrorResponse},
};
use axum::{Extension, response::Json};
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Get the account summary for the authenticated customer
#[utoipa::path(
    get,
    path = "/api/account/info",
    responses(
        (status = 200, description = "Account information", body = AccountInfoResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "account"
)]
#[instrument(name = "account_info", skip_all, fields(user_id = %user.id))]
pub async fn account_info(Extension(user): Extension<AuthenticatedUser>) -> Json<AccountInfoResponse> {
    // Placeholder until the upstream exposes account data
    Json(AccountInfoResponse {
        success: true,
        data: AccountInfo {
            user_id: user.id,
            account_number: "****4821".to_string(),
            account_type: "checking".to_string(),
            currency: "USD".to_string(),
            balance: 0.0,
            status: "active".to_string(),
        },
    })
}

/// Create the account router
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(account_info))
}
