//! Coupons HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use coupons_core::{
    Coupon, CouponApplied, CouponCustomerLink, CouponId, CouponPatch, CouponStatus, Customer,
    CustomerId, CustomerPatch, NewCoupon, NewCustomer, NewReseller, PageRequest, Reseller,
    ResellerId, ResellerPatch, Unavailable,
};

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, HealthResponse};

/// Coupons API client.
///
/// Every method maps one endpoint; error bodies come back as typed
/// [`ClientError`] variants.
#[derive(Debug, Clone)]
pub struct CouponsClient {
    client: Client,
    base_url: String,
    api_prefix: String,
}

impl CouponsClient {
    /// Create a new coupons client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the coupons service (e.g., `"http://coupons:8080"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new coupons client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_prefix: options.api_prefix.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{path}", self.base_url, self.api_prefix)
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        self.send(self.client.get(url)).await
    }

    // ------------------------------------------------------------------------
    // Coupons
    // ------------------------------------------------------------------------

    /// List coupons.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_coupons(&self, page: PageRequest) -> Result<Vec<Coupon>, ClientError> {
        self.send(self.client.get(self.url("/coupons")).query(&page))
            .await
    }

    /// Get a coupon by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the coupon doesn't exist.
    pub async fn get_coupon(&self, id: CouponId) -> Result<Coupon, ClientError> {
        self.send(self.client.get(self.url(&format!("/coupons/{id}"))))
            .await
    }

    /// Create a batch of coupons; all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::CommitFailed` if any coupon cannot be stored.
    pub async fn create_coupons(&self, coupons: &[NewCoupon]) -> Result<Vec<Coupon>, ClientError> {
        self.send(self.client.post(self.url("/coupons")).json(coupons))
            .await
    }

    /// Partially update a coupon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn update_coupon(
        &self,
        id: CouponId,
        patch: &CouponPatch,
    ) -> Result<Coupon, ClientError> {
        self.send(
            self.client
                .patch(self.url(&format!("/coupons/{id}")))
                .json(patch),
        )
        .await
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn delete_coupon(&self, id: CouponId) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!("/coupons/{id}"))))
            .await
    }

    /// Current status of a coupon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the coupon doesn't exist.
    pub async fn coupon_status(&self, id: CouponId) -> Result<CouponStatus, ClientError> {
        self.send(self.client.get(self.url(&format!("/coupons/{id}/status"))))
            .await
    }

    /// Redeem a coupon by code.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotFound` if no coupon has this code.
    /// - `ClientError::CouponUnavailable` if the coupon is inactive or outside its window.
    pub async fn apply_coupon(&self, code: &str) -> Result<CouponApplied, ClientError> {
        tracing::debug!(code = %code, "Applying coupon");
        self.send(
            self.client
                .patch(self.url(&format!("/coupons/apply/{code}"))),
        )
        .await
    }

    /// Customers linked to a coupon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the coupon doesn't exist.
    pub async fn coupon_customers(
        &self,
        id: CouponId,
        page: PageRequest,
    ) -> Result<Vec<Customer>, ClientError> {
        self.send(
            self.client
                .get(self.url(&format!("/coupons/{id}/customers")))
                .query(&page),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------------

    /// List customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_customers(&self, page: PageRequest) -> Result<Vec<Customer>, ClientError> {
        self.send(self.client.get(self.url("/customers")).query(&page))
            .await
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the customer doesn't exist.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ClientError> {
        self.send(self.client.get(self.url(&format!("/customers/{id}"))))
            .await
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::CommitFailed` if the username is taken.
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, ClientError> {
        self.send(self.client.post(self.url("/customers")).json(customer))
            .await
    }

    /// Partially update a customer.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn update_customer(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Customer, ClientError> {
        self.send(
            self.client
                .patch(self.url(&format!("/customers/{id}")))
                .json(patch),
        )
        .await
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!("/customers/{id}"))))
            .await
    }

    /// Coupons linked to a customer.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the customer doesn't exist.
    pub async fn customer_coupons(
        &self,
        id: CustomerId,
        page: PageRequest,
    ) -> Result<Vec<Coupon>, ClientError> {
        self.send(
            self.client
                .get(self.url(&format!("/customers/{id}/coupons")))
                .query(&page),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Resellers
    // ------------------------------------------------------------------------

    /// List resellers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_resellers(&self, page: PageRequest) -> Result<Vec<Reseller>, ClientError> {
        self.send(self.client.get(self.url("/resellers")).query(&page))
            .await
    }

    /// Get a reseller by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the reseller doesn't exist.
    pub async fn get_reseller(&self, id: ResellerId) -> Result<Reseller, ClientError> {
        self.send(self.client.get(self.url(&format!("/resellers/{id}"))))
            .await
    }

    /// Create a reseller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_reseller(&self, reseller: &NewReseller) -> Result<Reseller, ClientError> {
        self.send(self.client.post(self.url("/resellers")).json(reseller))
            .await
    }

    /// Partially update a reseller.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn update_reseller(
        &self,
        id: ResellerId,
        patch: &ResellerPatch,
    ) -> Result<Reseller, ClientError> {
        self.send(
            self.client
                .patch(self.url(&format!("/resellers/{id}")))
                .json(patch),
        )
        .await
    }

    /// Delete a reseller.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::CommitFailed`.
    pub async fn delete_reseller(&self, id: ResellerId) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!("/resellers/{id}"))))
            .await
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    /// List coupon–customer links.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_links(
        &self,
        page: PageRequest,
    ) -> Result<Vec<CouponCustomerLink>, ClientError> {
        self.send(
            self.client
                .get(self.url("/coupon-customer-link"))
                .query(&page),
        )
        .await
    }

    /// Get one link.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the pair is not linked.
    pub async fn get_link(
        &self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> Result<CouponCustomerLink, ClientError> {
        self.send(self.client.get(self.url(&format!(
            "/coupon-customer-link/{coupon_id}/{customer_id}"
        ))))
        .await
    }

    /// Link a coupon to a customer.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::CommitFailed` if either side is missing or the
    /// pair is already linked.
    pub async fn create_link(
        &self,
        link: CouponCustomerLink,
    ) -> Result<CouponCustomerLink, ClientError> {
        self.send(
            self.client
                .post(self.url("/coupon-customer-link"))
                .json(&link),
        )
        .await
    }

    /// Remove a link.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the pair is not linked.
    pub async fn delete_link(
        &self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> Result<(), ClientError> {
        self.send_empty(self.client.delete(self.url(&format!(
            "/coupon-customer-link/{coupon_id}/{customer_id}"
        ))))
        .await
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(Self::error_from(status, response).await)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        Err(Self::error_from(status, response).await)
    }

    /// Convert an error response into a typed error.
    async fn error_from(status: StatusCode, response: reqwest::Response) -> ClientError {
        let Ok(api_error) = response.json::<ApiErrorResponse>().await else {
            return ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            };
        };

        let body = api_error.error;
        let detail = |key: &str| body.details.as_ref().and_then(|d| d.get(key)).cloned();

        match body.code.as_str() {
            "not_found" => ClientError::NotFound {
                message: body.message,
            },
            "commit_failed" => ClientError::CommitFailed {
                retryable: detail("retryable")
                    .as_ref()
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false),
                message: body.message,
            },
            "coupon_unavailable" => {
                match detail("reason").and_then(|v| serde_json::from_value::<Unavailable>(v).ok()) {
                    Some(reason) => ClientError::CouponUnavailable {
                        reason,
                        message: body.message,
                    },
                    None => ClientError::Api {
                        code: body.code,
                        message: body.message,
                        status: status.as_u16(),
                    },
                }
            }
            _ => ClientError::Api {
                code: body.code,
                message: body.message,
                status: status.as_u16(),
            },
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Prefix the service mounts its API under (default: "/api/v1").
    pub api_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            api_prefix: "/api/v1".to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a custom API prefix.
    #[must_use]
    pub fn with_api_prefix(prefix: impl Into<String>) -> Self {
        Self {
            api_prefix: prefix.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = CouponsClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.url("/coupons"), "http://localhost:8080/api/v1/coupons");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = CouponsClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_api_prefix("/coupons-api/");
        let client = CouponsClient::with_options("http://localhost:8080", options).unwrap();
        assert_eq!(
            client.url("/resellers"),
            "http://localhost:8080/coupons-api/resellers"
        );
    }
}
