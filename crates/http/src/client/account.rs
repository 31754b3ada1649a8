//! Account and card API client methods

use super::{ClientError, PortalClient};
use crate::types::{
    AccountInfoResponse, CardApplicationRequest, CardPaymentRequest, CardStatusResponse,
    CardType, MessageResponse, PaymentResponse,
};
use reqwest::{StatusCode, header};

/// Result of loading a portal page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was served
    Served(StatusCode),
    /// The guard sent the browser elsewhere
    Redirected { location: String },
}

impl PortalClient {
    /// Account summary for the logged-in customer
    pub async fn account_info(&self) -> Result<AccountInfoResponse, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/account/info")?;
        self.execute(req).await
    }

    /// Current card status
    pub async fn card_status(&self) -> Result<CardStatusResponse, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/card/status")?;
        self.execute(req).await
    }

    /// Apply for a card product
    pub async fn apply_card(&self, card_type: CardType) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/card/apply")?
            .json(&CardApplicationRequest {
                card_type: Some(card_type.as_str().to_string()),
            });
        self.execute(req).await
    }

    /// Submit a card payment
    pub async fn card_payment(
        &self,
        payment: &CardPaymentRequest,
    ) -> Result<PaymentResponse, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/card/payment")?
            .json(payment);
        self.execute(req).await
    }

    /// Load a page with the stored cookies, without following redirects
    pub async fn fetch_page(&self, path: &str) -> Result<PageOutcome, ClientError> {
        let req = self.request(reqwest::Method::GET, path)?;
        let response = self.send(req).await?;

        if response.status().is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            debug!(path, %location, "Page redirected");
            return Ok(PageOutcome::Redirected { location });
        }

        Ok(PageOutcome::Served(response.status()))
    }
}
