//! Fabrick banking API client
//!
//! Handles communication with the GBS banking API (v4.0): balance,
//! transactions and money transfers for a single account.
//!
//! Every response is wrapped in the `{status, errors, payload}` envelope.
//! This client only decodes the envelope; deciding whether it is a success
//! is the job of [`crate::services::validate`].

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::{AccountBalance, Envelope, TimeZoneId, Transaction, TransferRequest, TransferResult};
use crate::ports::BankingApi;

/// Path prefix of all account resources
const ACCOUNTS_PATH: &str = "/api/gbs/banking/v4.0/accounts";

pub const HEADER_AUTH_SCHEMA: &str = "Auth-Schema";
pub const HEADER_API_KEY: &str = "Api-Key";
pub const HEADER_TIME_ZONE: &str = "X-Time-Zone";

/// Date format of the `fromAccountingDate` / `toAccountingDate` query parameters
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// How much of an error body is quoted back in error messages
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Fabrick API client
#[derive(Debug)]
pub struct FabrickClient {
    client: Client,
    base_url: String,
    auth_schema: String,
    api_key: String,
    timeout: Duration,
}

impl FabrickClient {
    /// Create a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_settings(
            &config.base_url,
            &config.auth_schema,
            &config.api_key,
            config.timeout,
        )
    }

    /// Create a client with explicit settings
    pub fn with_settings(
        base_url: &str,
        auth_schema: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("Banking API key cannot be empty");
        }
        if base_url.trim().is_empty() {
            anyhow::bail!("Banking API base URL cannot be empty");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_schema: auth_schema.to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Fetch the balance envelope
    pub fn fetch_balance(
        &self,
        account_id: u64,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<AccountBalance>>> {
        let url = self.account_url(account_id, "balance");
        tracing::debug!(%url, "GET balance");

        let request = self.client.get(&url).headers(self.headers(time_zone)?);
        self.execute(request)
    }

    /// Fetch the transactions envelope for an accounting-date range
    pub fn fetch_transactions(
        &self,
        account_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<Vec<Transaction>>>> {
        let url = self.account_url(account_id, "transactions");
        tracing::debug!(%url, %from_date, %to_date, "GET transactions");

        let request = self
            .client
            .get(&url)
            .query(&[
                (
                    "fromAccountingDate",
                    from_date.format(QUERY_DATE_FORMAT).to_string(),
                ),
                (
                    "toAccountingDate",
                    to_date.format(QUERY_DATE_FORMAT).to_string(),
                ),
            ])
            .headers(self.headers(time_zone)?);
        self.execute(request)
    }

    /// Submit a money transfer
    pub fn post_transfer(
        &self,
        account_id: u64,
        transfer: &TransferRequest,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<TransferResult>>> {
        let url = self.account_url(account_id, "payments/money-transfers");
        tracing::debug!(%url, "POST money transfer");

        let body = serde_json::to_vec(transfer).context("Failed to encode transfer request")?;
        let request = self
            .client
            .post(&url)
            .headers(self.headers(time_zone)?)
            .body(body);
        self.execute(request)
    }

    fn account_url(&self, account_id: u64, resource: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url, ACCOUNTS_PATH, account_id, resource
        )
    }

    /// Headers sent on every call
    fn headers(&self, time_zone: &TimeZoneId) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, HEADER_AUTH_SCHEMA, &self.auth_schema)?;
        insert_header(&mut headers, HEADER_API_KEY, &self.api_key)?;
        insert_header(&mut headers, HEADER_TIME_ZONE, time_zone.as_str())?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send the request and decode the envelope.
    ///
    /// An empty body (or a literal `null`) yields `Ok(None)`.
    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<Envelope<T>>> {
        let response = request.send().map_err(|e| self.map_request_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .context("Failed to read banking API response body")?;

        if !status.is_success() {
            anyhow::bail!(
                "Banking API error: HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            );
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: Option<Envelope<T>> =
            serde_json::from_str(&body).context("Failed to parse banking API response")?;
        Ok(envelope)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            anyhow::anyhow!(
                "Connection timed out after {} seconds",
                self.timeout.as_secs()
            )
        } else if error.is_connect() {
            anyhow::anyhow!("Unable to connect to the banking API at {}", self.base_url)
        } else {
            anyhow::anyhow!("Banking API request failed: {}", error)
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .with_context(|| format!("Invalid header name {}", name))?;
    let header_value =
        HeaderValue::from_str(value).with_context(|| format!("Invalid {} header value", name))?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// First few hundred characters of a response body, on one line
fn excerpt(body: &str) -> String {
    let flat = body.trim().replace(['\r', '\n'], " ");
    if flat.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = flat.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

fn remote_call_error(e: anyhow::Error) -> DomainError {
    DomainError::remote_call(format!("{:#}", e))
}

impl BankingApi for FabrickClient {
    fn get_balance(
        &self,
        account_id: u64,
        time_zone: &TimeZoneId,
    ) -> DomainResult<Option<Envelope<AccountBalance>>> {
        self.fetch_balance(account_id, time_zone)
            .map_err(remote_call_error)
    }

    fn get_transactions(
        &self,
        account_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        time_zone: &TimeZoneId,
    ) -> DomainResult<Option<Envelope<Vec<Transaction>>>> {
        self.fetch_transactions(account_id, from_date, to_date, time_zone)
            .map_err(remote_call_error)
    }

    fn submit_transfer(
        &self,
        account_id: u64,
        request: &TransferRequest,
        time_zone: &TimeZoneId,
    ) -> DomainResult<Option<Envelope<TransferResult>>> {
        self.post_transfer(account_id, request, time_zone)
            .map_err(remote_call_error)
    }
}
