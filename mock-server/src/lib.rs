use std::{collections::BTreeMap, env, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Extra {
    pub id: u64,
    pub name: String,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: u64,
    pub image_url: String,
    pub extras: Vec<Extra>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: u64,
    pub image_url: String,
    pub thumbnail_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderExtra {
    pub id: u64,
    pub name: String,
    pub value: f64,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub product_id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: u64,
    #[serde(rename = "formattedPrice")]
    pub formatted_price: String,
    pub thumbnail_url: String,
    pub extras: Vec<OrderExtra>,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    #[serde(flatten)]
    pub order: NewOrder,
}

/// In-memory stores. Foods are read-only; favorites and orders change.
#[derive(Clone)]
pub struct Db {
    foods: Arc<BTreeMap<u64, Food>>,
    favorites: Arc<RwLock<BTreeMap<u64, Favorite>>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl Db {
    pub fn new(foods: Vec<Food>) -> Self {
        Self {
            foods: Arc::new(foods.into_iter().map(|f| (f.id, f)).collect()),
            favorites: Arc::new(RwLock::new(BTreeMap::new())),
            orders: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

/// Where the binary listens, from `HOST` and `PORT`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3333;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// A `PORT` that is not a valid port number falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(Self::DEFAULT_PORT),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The menu the server starts with.
pub fn seed_foods() -> Vec<Food> {
    let image = |n: u32| format!("https://storage.googleapis.com/golang-restaurant/food{n}.png");
    vec![
        Food {
            id: 1,
            name: "Ao molho".to_string(),
            description: "Macarrão ao molho branco, fughi e cheiro verde das montanhas.".to_string(),
            price: 19.9,
            category: 1,
            image_url: image(1),
            extras: vec![
                Extra { id: 1, name: "Bacon".to_string(), value: 1.5 },
                Extra { id: 2, name: "Frango".to_string(), value: 2.0 },
            ],
        },
        Food {
            id: 2,
            name: "Veggie".to_string(),
            description: "Macarrão com pimentão, ervilha e ervas finas colhidas no himalaia.".to_string(),
            price: 21.9,
            category: 1,
            image_url: image(2),
            extras: vec![Extra { id: 3, name: "Bacon".to_string(), value: 1.5 }],
        },
        Food {
            id: 3,
            name: "A la Camarón".to_string(),
            description: "Macarrão com vegetais de primeira linha e camarão dos 7 mares.".to_string(),
            price: 25.9,
            category: 1,
            image_url: image(3),
            extras: vec![
                Extra { id: 4, name: "Camarão extra".to_string(), value: 4.0 },
                Extra { id: 5, name: "Queijo".to_string(), value: 2.5 },
            ],
        },
    ]
}

pub fn app() -> Router {
    app_with(seed_foods())
}

pub fn app_with(foods: Vec<Food>) -> Router {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/foods/{id}", get(get_food))
        .route("/favorites", get(list_favorites).post(create_favorite))
        .route("/favorites/{id}", delete(delete_favorite))
        .route("/orders", get(list_orders).post(create_order))
        .with_state(Db::new(foods))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_foods(State(db): State<Db>) -> Json<Vec<Food>> {
    Json(db.foods.values().cloned().collect())
}

async fn get_food(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Food>, StatusCode> {
    db.foods.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn list_favorites(State(db): State<Db>) -> Json<Vec<Favorite>> {
    let favorites = db.favorites.read().await;
    Json(favorites.values().cloned().collect())
}

/// Upsert: 201 for a new favorite, 200 when it replaced one.
async fn create_favorite(
    State(db): State<Db>,
    Json(input): Json<Favorite>,
) -> (StatusCode, Json<Favorite>) {
    let previous = db.favorites.write().await.insert(input.id, input.clone());
    info!(food_id = input.id, replaced = previous.is_some(), "favorite stored");
    let status = if previous.is_some() { StatusCode::OK } else { StatusCode::CREATED };
    (status, Json(input))
}

/// Deleting an id that is not a favorite is still a success.
async fn delete_favorite(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let removed = db.favorites.write().await.remove(&id);
    info!(food_id = id, existed = removed.is_some(), "favorite removed");
    StatusCode::NO_CONTENT
}

async fn list_orders(State(db): State<Db>) -> Json<Vec<Order>> {
    Json(db.orders.read().await.clone())
}

async fn create_order(
    State(db): State<Db>,
    Json(input): Json<NewOrder>,
) -> (StatusCode, Json<Order>) {
    let order = Order {
        id: Uuid::new_v4(),
        order: input,
    };
    info!(order_id = %order.id, product_id = order.order.product_id, "order placed");
    db.orders.write().await.push(order.clone());
    (StatusCode::CREATED, Json(order))
}
