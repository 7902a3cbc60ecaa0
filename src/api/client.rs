//! REST client for the Green Plate backend.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::error::FetchError;
use crate::format::to_query_string;
use crate::models::{Listing, ListingDraft, Reservation};
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Typed access to the backend endpoints the screens read and write.
///
/// Cheap to clone, so fetchers handed to the query cache can own a copy.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without a trailing slash
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Listings matching `params`, in server order.
    ///
    /// # Arguments
    /// * `params` - Filter pairs, usually from [`crate::format::build_query_params`]
    pub async fn listings(&self, params: &[(String, String)]) -> Result<Vec<Listing>, FetchError> {
        let mut url = self.url("/listings");
        if !params.is_empty() {
            url.push('?');
            url.push_str(&to_query_string(params));
        }
        self.get_json(&url).await
    }

    pub async fn listing(&self, id: &str) -> Result<Listing, FetchError> {
        let url = self.url(&format!("/listings/{}", urlencoding::encode(id)));
        self.get_json(&url).await
    }

    /// Publish a new listing and return it as stored by the server.
    pub async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing, FetchError> {
        let url = self.url("/listings");
        let body = serde_json::to_string(draft).map_err(|e| FetchError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let response = self.http.post(&url, &body, &json_headers()).await?;
        decode(&url, check_status(response)?)
    }

    pub async fn reservation(&self, id: &str) -> Result<Reservation, FetchError> {
        let url = self.url(&format!("/reservations/{}", urlencoding::encode(id)));
        self.get_json(&url).await
    }

    /// All reservations made by `customer_id`.
    pub async fn reservations_for(&self, customer_id: &str) -> Result<Vec<Reservation>, FetchError> {
        let query = to_query_string(&[("customerId".to_string(), customer_id.to_string())]);
        let url = format!("{}?{}", self.url("/reservations"), query);
        self.get_json(&url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let response = self.http.get(url, &json_headers()).await?;
        decode(url, check_status(response)?)
    }
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

fn check_status(response: Response) -> Result<Response, HttpError> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .ok()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "Unknown error".to_string());
    Err(HttpError::ServerError {
        status: response.status,
        message,
    })
}

fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, FetchError> {
    response.json().map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
