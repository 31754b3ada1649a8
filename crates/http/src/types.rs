//! Request and response schemas shared by the server and the client

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Failure envelope returned by every `/api` route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

/// Login request forwarded to the upstream backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Any further fields, forwarded untouched
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            extra: HashMap::new(),
        }
    }
}

/// Registration request forwarded to the upstream backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Profile fields (names, phone, ...) owned by the upstream
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

/// Password-reset email request forwarded to the upstream backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ForgotPasswordRequest {
    pub email: String,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

/// Password reset forwarded to the upstream backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ResetPasswordRequest {
    /// Reset token from the email link
    pub token: String,
    pub password: String,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

/// Card products a customer may apply for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    VirtualDebit,
    PhysicalDebit,
    VirtualCredit,
    PhysicalCredit,
}

impl CardType {
    pub const ALL: [Self; 4] = [
        Self::VirtualDebit,
        Self::PhysicalDebit,
        Self::VirtualCredit,
        Self::PhysicalCredit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VirtualDebit => "virtual_debit",
            Self::PhysicalDebit => "physical_debit",
            Self::VirtualCredit => "virtual_credit",
            Self::PhysicalCredit => "physical_credit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card application body
///
/// `type` is kept as a string so an unknown product is reported as an
/// invalid card type rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct CardApplicationRequest {
    #[serde(rename = "type", default)]
    pub card_type: Option<String>,
}

/// Card payment body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentRequest {
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Success envelope carrying a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Account summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub user_id: String,
    pub account_number: String,
    pub account_type: String,
    pub currency: String,
    pub balance: f64,
    pub status: String,
}

/// Success envelope for account info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct AccountInfoResponse {
    pub success: bool,
    pub data: AccountInfo,
}

/// Current card state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CardStatus {
    pub has_card: bool,
    pub card_type: CardType,
    pub status: String,
    pub last_four: String,
}

/// Success envelope for card status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct CardStatusResponse {
    pub success: bool,
    pub data: CardStatus,
}

/// Acknowledged payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub payment_method: String,
    pub status: String,
}

/// Success envelope for a card payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct PaymentResponse {
    pub success: bool,
    pub message: String,
    pub data: PaymentReceipt,
}
