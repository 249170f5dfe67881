// Catalog client: the REST surface of the hotel/booking backend.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::model::{BookingRequest, CatalogBooking, Hotel, SearchFilters};

// Error types for catalog access. An empty hotel list is a valid result,
// never an error.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("catalog error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("resource not found")]
    NotFound,

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

// Client configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

// Catalog operations used by the discovery and booking views.
#[async_trait]
pub trait CatalogApi: Send + Sync + 'static {
    // List hotels matching an optional filter set.
    async fn list_hotels(&self, filters: &SearchFilters) -> Result<Vec<Hotel>, FetchError>;

    // Fetch a single hotel record.
    async fn hotel_by_id(&self, id: i64) -> Result<Hotel, FetchError>;

    // Free-text search across the catalog.
    async fn search_hotels(&self, query: &str) -> Result<Vec<Hotel>, FetchError>;

    // Booking endpoints of the same service.
    async fn create_booking(&self, request: &BookingRequest)
        -> Result<CatalogBooking, FetchError>;
    async fn booking_by_id(&self, id: i64) -> Result<CatalogBooking, FetchError>;
    async fn list_bookings(&self) -> Result<Vec<CatalogBooking>, FetchError>;
}

// HTTP implementation over reqwest.
pub struct HotelCatalog {
    config: CatalogConfig,
    http: reqwest::Client,
}

impl HotelCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, params = query.len(), "catalog request");

        let response = self.http.get(&url).query(query).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HotelCatalog {
    async fn list_hotels(&self, filters: &SearchFilters) -> Result<Vec<Hotel>, FetchError> {
        self.get_json("/hotels", &filters.to_query_pairs()).await
    }

    async fn hotel_by_id(&self, id: i64) -> Result<Hotel, FetchError> {
        self.get_json(&format!("/hotels/{}", id), &[]).await
    }

    async fn search_hotels(&self, query: &str) -> Result<Vec<Hotel>, FetchError> {
        self.get_json("/hotels/search", &[("q", query.to_string())])
            .await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<CatalogBooking, FetchError> {
        let url = self.endpoint("/bookings");
        tracing::debug!(%url, hotel_id = request.hotel_id, "booking request");

        let response = self.http.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn booking_by_id(&self, id: i64) -> Result<CatalogBooking, FetchError> {
        self.get_json(&format!("/bookings/{}", id), &[]).await
    }

    async fn list_bookings(&self) -> Result<Vec<CatalogBooking>, FetchError> {
        self.get_json("/bookings", &[]).await
    }
}
