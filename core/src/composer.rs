//! State of the food detail screen: load, adjust, favorite, order.
//!
//! # Design
//! `OrderComposer` never performs I/O. Each step that needs the service
//! returns an `HttpRequest`; the host runs it and feeds the outcome back as
//! `Result<HttpResponse, ApiError>`, with `Err(ApiError::Transport(..))`
//! when the request never got an answer.
//!
//! Loading is two independent requests that may finish in any order. The
//! view model (`FoodDetails`) is exposed only once both the food and the
//! favorites have arrived, since the favorite flag depends on both.
//!
//! Favorite toggling is optimistic: the flag flips before the request is
//! sent and stays flipped if the request fails. The failure is logged and
//! the remote store converges on the next toggle.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::FoodClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ComposerError};
use crate::http::{HttpRequest, HttpResponse};
use crate::ledger::Ledger;
use crate::money::{CurrencyFormat, Money};
use crate::pricing;
use crate::thumbnail::thumbnail_url;
use crate::types::{ExtraId, FavoritePayload, FavoriteRef, Food, FoodId, OrderPayload, PlacedOrder};

/// Answers whether a food is one of the user's favorites.
pub trait FavoritesLookup {
    fn is_favorite(&self, id: FoodId) -> bool;
}

/// The favorite food ids loaded for this screen visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(BTreeSet<FoodId>);

impl FavoriteSet {
    pub fn contains(&self, id: FoodId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FoodId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = FoodId>>(iter: I) -> Self {
        FavoriteSet(iter.into_iter().collect())
    }
}

impl From<Vec<FavoriteRef>> for FavoriteSet {
    fn from(refs: Vec<FavoriteRef>) -> Self {
        refs.into_iter().map(|f| f.id).collect()
    }
}

impl FavoritesLookup for FavoriteSet {
    fn is_favorite(&self, id: FoodId) -> bool {
        self.contains(id)
    }
}

impl<F: Fn(FoodId) -> bool> FavoritesLookup for F {
    fn is_favorite(&self, id: FoodId) -> bool {
        self(id)
    }
}

/// View model of the loaded food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodDetails {
    pub food: Food,
    pub formatted_price: String,
    pub is_favorite: bool,
}

/// Merge a freshly loaded food with the favorites into a view model and a
/// ledger with every extra at zero.
pub fn assemble_details(
    food: Food,
    favorites: &impl FavoritesLookup,
    currency: &CurrencyFormat,
) -> (FoodDetails, Ledger) {
    let ledger = Ledger::new(&food.extras);
    let details = FoodDetails {
        formatted_price: currency.format(food.price),
        is_favorite: favorites.is_favorite(food.id),
        food,
    };
    (details, ledger)
}

/// The two requests that populate the screen. They are independent and may
/// run concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequests {
    pub favorites: HttpRequest,
    pub food: HttpRequest,
}

/// Which remote call a favorite toggle issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteSync {
    Create,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub sync: FavoriteSync,
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
pub struct OrderComposer {
    client: FoodClient,
    currency: CurrencyFormat,
    food_id: FoodId,
    favorites: Option<FavoriteSet>,
    details: Option<FoodDetails>,
    ledger: Ledger,
}

impl OrderComposer {
    pub fn new(config: &ClientConfig, food_id: FoodId) -> Self {
        Self {
            client: FoodClient::from_config(config),
            currency: config.currency.clone(),
            food_id,
            favorites: None,
            details: None,
            ledger: Ledger::default(),
        }
    }

    pub fn food_id(&self) -> FoodId {
        self.food_id
    }

    /// Point the screen at another food. Returns `true` when the id changed
    /// and everything was reset; the host should then issue
    /// `load_requests` again.
    pub fn navigate_to(&mut self, food_id: FoodId) -> bool {
        if food_id == self.food_id {
            return false;
        }
        debug!(from = self.food_id, to = food_id, "navigating to another food");
        self.food_id = food_id;
        self.favorites = None;
        self.details = None;
        self.ledger = Ledger::default();
        true
    }

    pub fn load_requests(&self) -> LoadRequests {
        LoadRequests {
            favorites: self.client.build_list_favorites(),
            food: self.client.build_get_food(self.food_id),
        }
    }

    /// Apply the outcome of `GET favorites`. On failure the previous state
    /// is kept and the error returned.
    pub fn apply_favorites(&mut self, response: Result<HttpResponse, ApiError>) -> Result<(), ApiError> {
        let favorites: FavoriteSet = response
            .and_then(|r| self.client.parse_list_favorites(r))
            .inspect_err(|e| warn!(error = %e, "loading favorites failed"))?
            .into();
        debug!(count = favorites.len(), "favorites loaded");

        if let Some(details) = self.details.as_mut() {
            details.is_favorite = favorites.is_favorite(details.food.id);
        }
        self.favorites = Some(favorites);
        Ok(())
    }

    /// Apply the outcome of `GET foods/{id}`. A record for another id than
    /// the current one is stale and dropped. On failure the previous state
    /// is kept and the error returned.
    pub fn apply_food(&mut self, response: Result<HttpResponse, ApiError>) -> Result<(), ApiError> {
        let food = response
            .and_then(|r| self.client.parse_get_food(r))
            .inspect_err(|e| warn!(food_id = self.food_id, error = %e, "loading food failed"))?;
        if food.id != self.food_id {
            debug!(expected = self.food_id, got = food.id, "dropping stale food response");
            return Ok(());
        }

        let favorites = self.favorites.clone().unwrap_or_default();
        let (details, ledger) = assemble_details(food, &favorites, &self.currency);
        debug!(food_id = details.food.id, extras = details.food.extras.len(), "food loaded");
        self.details = Some(details);
        self.ledger = ledger;
        Ok(())
    }

    /// The view model, once both the food and the favorites are in.
    pub fn details(&self) -> Option<&FoodDetails> {
        self.favorites.as_ref().and(self.details.as_ref())
    }

    pub fn is_favorite(&self) -> bool {
        self.details().is_some_and(|d| d.is_favorite)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn increment_extra(&mut self, id: ExtraId) {
        self.ledger = self.ledger.increment_extra(id);
    }

    pub fn decrement_extra(&mut self, id: ExtraId) {
        self.ledger = self.ledger.decrement_extra(id);
    }

    pub fn increment_food(&mut self) {
        self.ledger = self.ledger.increment_food();
    }

    pub fn decrement_food(&mut self) {
        self.ledger = self.ledger.decrement_food();
    }

    /// Zero until the food has loaded.
    pub fn cart_total(&self) -> Money {
        pricing::cart_total(self.unit_price(), &self.ledger)
    }

    pub fn formatted_total(&self) -> String {
        pricing::formatted_total(self.unit_price(), &self.ledger, &self.currency)
    }

    fn unit_price(&self) -> Money {
        self.details.as_ref().map_or(Money::ZERO, |d| d.food.price)
    }

    /// Flip the favorite flag and return the request that mirrors the new
    /// state remotely: create when it became a favorite, delete otherwise.
    pub fn toggle_favorite(&mut self) -> Result<FavoriteToggle, ComposerError> {
        // Needs the favorites too: applying them later resets the flag.
        if self.details().is_none() {
            return Err(ComposerError::NotLoaded);
        }
        let details = self.details.as_mut().ok_or(ComposerError::NotLoaded)?;
        details.is_favorite = !details.is_favorite;
        let food = &details.food;

        let toggle = if details.is_favorite {
            let payload = FavoritePayload {
                id: food.id,
                name: food.name.clone(),
                description: food.description.clone(),
                price: food.price,
                category: food.category,
                image_url: food.image_url.clone(),
                thumbnail_url: thumbnail_url(&food.image_url),
            };
            FavoriteToggle {
                sync: FavoriteSync::Create,
                request: self.client.build_create_favorite(&payload)?,
            }
        } else {
            FavoriteToggle {
                sync: FavoriteSync::Delete,
                request: self.client.build_delete_favorite(food.id),
            }
        };
        debug!(food_id = food.id, favorite = details.is_favorite, "favorite toggled");
        Ok(toggle)
    }

    /// Record the outcome of a toggle's request. Failures are logged and
    /// leave the local flag as it is. Returns whether the remote store
    /// accepted the change.
    pub fn finish_favorite(&self, sync: FavoriteSync, response: Result<HttpResponse, ApiError>) -> bool {
        let outcome = response.and_then(|r| match sync {
            FavoriteSync::Create => self.client.parse_create_favorite(r),
            FavoriteSync::Delete => self.client.parse_delete_favorite(r),
        });
        match outcome {
            Ok(()) => true,
            Err(e) => {
                warn!(food_id = self.food_id, ?sync, error = %e, "favorite sync failed");
                false
            }
        }
    }

    /// Package the food and the current ledger as an order.
    pub fn order_payload(&self) -> Result<OrderPayload, ComposerError> {
        let details = self.details().ok_or(ComposerError::NotLoaded)?;
        let food = &details.food;
        Ok(OrderPayload {
            product_id: food.id,
            name: food.name.clone(),
            description: food.description.clone(),
            price: food.price,
            category: food.category,
            formatted_price: details.formatted_price.clone(),
            thumbnail_url: food.image_url.clone(),
            extras: self.ledger.snapshot(),
            quantity: self.ledger.food_quantity(),
        })
    }

    pub fn submit_order(&self) -> Result<HttpRequest, ComposerError> {
        let payload = self.order_payload()?;
        Ok(self.client.build_create_order(&payload)?)
    }

    pub fn finish_order(&self, response: Result<HttpResponse, ApiError>) -> Result<PlacedOrder, ApiError> {
        response
            .and_then(|r| self.client.parse_create_order(r))
            .inspect_err(|e| warn!(food_id = self.food_id, error = %e, "order submission failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    const FOOD_JSON: &str = r#"{
        "id": 5,
        "name": "Veggie",
        "description": "Salada com legumes",
        "price": 10,
        "category": 2,
        "image_url": "https://storage.googleapis.com/golang-restaurant/food2.png",
        "extras": [
            {"id": 1, "name": "Queijo", "value": 2.5},
            {"id": 2, "name": "Croutons", "value": 1}
        ]
    }"#;

    fn composer() -> OrderComposer {
        OrderComposer::new(&ClientConfig::new("http://localhost:3333"), 5)
    }

    fn loaded(favorites: &str) -> OrderComposer {
        let mut composer = composer();
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        composer
            .apply_favorites(Ok(HttpResponse::new(200, favorites)))
            .unwrap();
        composer
    }

    #[test]
    fn load_requests_target_favorites_and_current_food() {
        let requests = composer().load_requests();
        assert_eq!(requests.favorites.path, "http://localhost:3333/favorites");
        assert_eq!(requests.food.path, "http://localhost:3333/foods/5");
    }

    #[test]
    fn favorite_flag_follows_membership() {
        assert!(loaded(r#"[{"id":5},{"id":9}]"#).is_favorite());
        assert!(!loaded(r#"[{"id":9}]"#).is_favorite());
    }

    #[test]
    fn details_wait_for_both_loads_in_either_order() {
        let mut composer = composer();
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        assert!(composer.details().is_none());
        composer
            .apply_favorites(Ok(HttpResponse::new(200, r#"[{"id":5}]"#)))
            .unwrap();
        assert!(composer.details().unwrap().is_favorite);

        let mut composer = self::composer();
        composer
            .apply_favorites(Ok(HttpResponse::new(200, r#"[{"id":5}]"#)))
            .unwrap();
        assert!(composer.details().is_none());
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        let details = composer.details().unwrap();
        assert!(details.is_favorite);
        assert_eq!(details.formatted_price, "R$ 10,00");
    }

    #[test]
    fn assemble_details_accepts_any_lookup() {
        let food: Food = serde_json::from_str(FOOD_JSON).unwrap();
        let (details, ledger) = assemble_details(food, &|id: FoodId| id == 5, &CurrencyFormat::usd());
        assert!(details.is_favorite);
        assert_eq!(details.formatted_price, "$10.00");
        assert_eq!(ledger.extra_quantity(1), Some(0));
        assert_eq!(ledger.extra_quantity(2), Some(0));
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let mut composer = loaded("[]");
        composer.increment_extra(1);

        let err = composer
            .apply_food(Err(ApiError::Transport("connection refused".to_string())))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        let err = composer.apply_food(Ok(HttpResponse::new(404, ""))).unwrap_err();
        assert_eq!(err, ApiError::NotFound);
        let err = composer
            .apply_favorites(Ok(HttpResponse::new(200, "{")))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));

        assert!(composer.details().is_some());
        assert_eq!(composer.ledger().extra_quantity(1), Some(1));
    }

    #[test]
    fn stale_food_response_is_dropped() {
        let mut composer = composer();
        assert!(composer.navigate_to(7));
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        composer.apply_favorites(Ok(HttpResponse::new(200, "[]"))).unwrap();
        assert!(composer.details().is_none());
    }

    #[test]
    fn navigate_to_same_food_keeps_state() {
        let mut composer = loaded("[]");
        composer.increment_food();
        assert!(!composer.navigate_to(5));
        assert_eq!(composer.ledger().food_quantity(), 2);

        assert!(composer.navigate_to(6));
        assert!(composer.details().is_none());
        assert_eq!(composer.ledger().food_quantity(), 1);
        assert_eq!(composer.load_requests().food.path, "http://localhost:3333/foods/6");
    }

    #[test]
    fn reloading_food_resets_ledger() {
        let mut composer = loaded("[]");
        composer.increment_extra(1);
        composer.increment_food();
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        assert_eq!(composer.ledger().extra_quantity(1), Some(0));
        assert_eq!(composer.ledger().food_quantity(), 1);
    }

    #[test]
    fn cart_total_matches_ledger() {
        let mut composer = loaded("[]");
        composer.increment_food();
        for _ in 0..3 {
            composer.increment_extra(1);
        }
        assert_eq!(composer.cart_total(), Money::from_minor(2750));
        assert_eq!(composer.formatted_total(), "R$ 27,50");
    }

    #[test]
    fn cart_total_is_zero_before_load() {
        assert_eq!(composer().cart_total(), Money::ZERO);
    }

    #[test]
    fn toggle_twice_issues_create_then_delete() {
        let mut composer = loaded("[]");
        assert!(!composer.is_favorite());

        let first = composer.toggle_favorite().unwrap();
        assert!(composer.is_favorite());
        assert_eq!(first.sync, FavoriteSync::Create);
        assert_eq!(first.request.method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(first.request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 5);
        assert_eq!(
            body["thumbnail_url"],
            "https://storage.googleapis.com/golang-gorestaurant-mobile/veggie"
        );

        let second = composer.toggle_favorite().unwrap();
        assert!(!composer.is_favorite());
        assert_eq!(second.sync, FavoriteSync::Delete);
        assert_eq!(second.request.method, HttpMethod::Delete);
        assert_eq!(second.request.path, "http://localhost:3333/favorites/5");
    }

    #[test]
    fn failed_favorite_sync_is_not_reverted() {
        let mut composer = loaded("[]");
        let toggle = composer.toggle_favorite().unwrap();
        let synced = composer.finish_favorite(toggle.sync, Ok(HttpResponse::new(500, "boom")));
        assert!(!synced);
        assert!(composer.is_favorite());

        let toggle = composer.toggle_favorite().unwrap();
        assert!(composer.finish_favorite(toggle.sync, Ok(HttpResponse::new(204, ""))));
        assert!(!composer.is_favorite());
    }

    #[test]
    fn toggle_before_load_does_nothing() {
        let mut composer = composer();
        assert_eq!(composer.toggle_favorite().unwrap_err(), ComposerError::NotLoaded);
        assert!(!composer.is_favorite());
    }

    #[test]
    fn toggle_before_favorites_is_not_loaded() {
        let mut composer = composer();
        composer.apply_food(Ok(HttpResponse::new(200, FOOD_JSON))).unwrap();
        assert_eq!(composer.toggle_favorite().unwrap_err(), ComposerError::NotLoaded);
        assert_eq!(composer.submit_order().unwrap_err(), ComposerError::NotLoaded);

        composer.apply_favorites(Ok(HttpResponse::new(200, "[]"))).unwrap();
        assert!(!composer.is_favorite());
        let toggle = composer.toggle_favorite().unwrap();
        assert_eq!(toggle.sync, FavoriteSync::Create);
        assert!(composer.is_favorite());
    }

    #[test]
    fn order_payload_mirrors_ledger_including_zero_extras() {
        let mut composer = loaded("[]");
        composer.increment_extra(2);
        composer.increment_extra(2);
        composer.increment_food();

        let payload = composer.order_payload().unwrap();
        assert_eq!(payload.product_id, 5);
        assert_eq!(payload.formatted_price, "R$ 10,00");
        assert_eq!(
            payload.thumbnail_url,
            "https://storage.googleapis.com/golang-restaurant/food2.png"
        );
        assert_eq!(payload.quantity, 2);
        let extras: Vec<_> = payload.extras.iter().map(|e| (e.id, e.quantity)).collect();
        assert_eq!(extras, vec![(1, 0), (2, 2)]);

        let request = composer.submit_order().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "http://localhost:3333/orders");
    }

    #[test]
    fn order_before_load_is_rejected() {
        assert_eq!(composer().submit_order().unwrap_err(), ComposerError::NotLoaded);
    }

    #[test]
    fn finish_order_surfaces_failures() {
        let composer = loaded("[]");
        let err = composer
            .finish_order(Err(ApiError::Transport("timeout".to_string())))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        let err = composer
            .finish_order(Ok(HttpResponse::new(422, "bad order")))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 422, .. }));
    }
}
