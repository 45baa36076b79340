//! Stateless HTTP request builder and response parser for the food API.
//!
//! # Design
//! `FoodClient` holds only a `base_url` and carries no mutable state between
//! calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The host executes the HTTP round-trip in between, which
//! keeps the core deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{FavoritePayload, FavoriteRef, Food, FoodId, OrderPayload, PlacedOrder};

/// Synchronous, stateless client for the food API.
#[derive(Debug, Clone)]
pub struct FoodClient {
    base_url: String,
}

impl FoodClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn build_list_favorites(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "favorites")
    }

    pub fn build_get_food(&self, id: FoodId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("foods/{id}"))
    }

    pub fn build_create_favorite(&self, input: &FavoritePayload) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "favorites", input)
    }

    pub fn build_delete_favorite(&self, id: FoodId) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("favorites/{id}"))
    }

    pub fn build_create_order(&self, input: &OrderPayload) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "orders", input)
    }

    pub fn parse_list_favorites(&self, response: HttpResponse) -> Result<Vec<FavoriteRef>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_get_food(&self, response: HttpResponse) -> Result<Food, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    /// The favorite store answers 201 on insert and 200 on overwrite; the
    /// echoed body is not needed.
    pub fn parse_create_favorite(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 201])?;
        Ok(())
    }

    pub fn parse_delete_favorite(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])?;
        Ok(())
    }

    pub fn parse_create_order(&self, response: HttpResponse) -> Result<PlacedOrder, ApiError> {
        check_status(&response, &[201])?;
        decode(&response.body)
    }

    fn bare(&self, method: HttpMethod, resource: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}/{resource}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<T: Serialize>(&self, method: HttpMethod, resource: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}/{resource}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
