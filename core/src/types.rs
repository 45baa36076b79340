//! Domain DTOs for the food API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined
//! independently; integration tests catch schema drift between the crates.
//! Wire decimals (`price`, `value`) are read into `Money` through the
//! `money::decimal` adapter. Unknown fields are ignored so the service may
//! grow its records without breaking older clients.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{self, Money};

pub type FoodId = u64;
pub type ExtraId = u64;

/// A food record as returned by `GET foods/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub description: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub category: u64,
    pub image_url: String,
    pub extras: Vec<Extra>,
}

/// An optional add-on offered with a food.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extra {
    pub id: ExtraId,
    pub name: String,
    #[serde(with = "money::decimal")]
    pub value: Money,
}

/// One entry of `GET favorites`. Only the id matters to the composer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteRef {
    pub id: FoodId,
}

/// Body of `POST favorites`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoritePayload {
    pub id: FoodId,
    pub name: String,
    pub description: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub category: u64,
    pub image_url: String,
    pub thumbnail_url: String,
}

/// An extra as it appears in an order: the catalog entry plus the chosen
/// quantity (zero included).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderExtra {
    pub id: ExtraId,
    pub name: String,
    #[serde(with = "money::decimal")]
    pub value: Money,
    pub quantity: u32,
}

/// Body of `POST orders`.
///
/// `formattedPrice` keeps its camel-case wire name; `thumbnail_url` carries
/// the food's full image URL, which is what the orders screen displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPayload {
    pub product_id: FoodId,
    pub name: String,
    pub description: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub category: u64,
    #[serde(rename = "formattedPrice")]
    pub formatted_price: String,
    pub thumbnail_url: String,
    pub extras: Vec<OrderExtra>,
    pub quantity: u32,
}

/// An order accepted by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: Uuid,
    #[serde(flatten)]
    pub order: OrderPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_reads_decimal_prices_and_ignores_unknown_fields() {
        let food: Food = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Ao molho",
                "description": "Macarrão ao molho branco",
                "price": 19.9,
                "category": 1,
                "image_url": "https://storage.example.com/gorestaurant-food1.png",
                "thumbnail_url": "ignored",
                "extras": [{"id": 1, "name": "Bacon", "value": 1.5}]
            }"#,
        )
        .unwrap();
        assert_eq!(food.price, Money::from_minor(1990));
        assert_eq!(food.extras[0].value, Money::from_minor(150));
    }

    #[test]
    fn food_without_extras_is_malformed() {
        let result: Result<Food, _> = serde_json::from_str(
            r#"{"id":1,"name":"x","description":"y","price":1,"category":1,"image_url":"z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn order_payload_uses_wire_names() {
        let payload = OrderPayload {
            product_id: 5,
            name: "Veggie".to_string(),
            description: "Salada".to_string(),
            price: Money::from_minor(2150),
            category: 2,
            formatted_price: "R$ 21,50".to_string(),
            thumbnail_url: "https://img/food2.png".to_string(),
            extras: vec![OrderExtra {
                id: 3,
                name: "Queijo".to_string(),
                value: Money::from_minor(200),
                quantity: 0,
            }],
            quantity: 1,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["product_id"], 5);
        assert_eq!(json["formattedPrice"], "R$ 21,50");
        assert!(json.get("formatted_price").is_none());
        assert_eq!(json["price"], 21.5);
        assert_eq!(json["extras"][0]["quantity"], 0);
    }

    #[test]
    fn placed_order_flattens_payload_next_to_id() {
        let placed: PlacedOrder = serde_json::from_str(
            r#"{
                "id": "00000000-0000-0000-0000-000000000001",
                "product_id": 5,
                "name": "Veggie",
                "description": "Salada",
                "price": 21.5,
                "category": 2,
                "formattedPrice": "R$ 21,50",
                "thumbnail_url": "https://img/food2.png",
                "extras": [],
                "quantity": 2
            }"#,
        )
        .unwrap();
        assert_eq!(placed.order.product_id, 5);
        assert_eq!(placed.order.quantity, 2);
        assert_eq!(placed.order.price, Money::from_minor(2150));
    }
}
