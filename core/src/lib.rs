//! Order composer core for the food detail screen.
//!
//! # Overview
//! Loads a food and the user's favorites, tracks the quantities chosen for
//! the food and its extras, prices the cart, keeps the favorite flag in sync
//! with the service and packages the order. Nothing here touches the
//! network: requests are built as `HttpRequest` values and responses are
//! parsed from `HttpResponse` values (host-does-IO pattern).
//!
//! # Design
//! - `FoodClient` is stateless; it holds only `base_url`.
//! - Each remote operation is split into `build_*` and `parse_*`, so the
//!   I/O boundary is explicit.
//! - `OrderComposer` owns the screen state and drives the client.
//! - Prices are `Money` (integer cents) so totals are exact.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod http;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod thumbnail;
pub mod types;

pub use client::FoodClient;
pub use composer::{
    assemble_details, FavoriteSet, FavoriteSync, FavoriteToggle, FavoritesLookup, FoodDetails,
    LoadRequests, OrderComposer,
};
pub use config::ClientConfig;
pub use error::{ApiError, ComposerError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ledger::Ledger;
pub use money::{CurrencyFormat, Money};
pub use types::{
    Extra, ExtraId, FavoritePayload, FavoriteRef, Food, FoodId, OrderExtra, OrderPayload,
    PlacedOrder,
};
