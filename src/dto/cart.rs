use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Address, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Update,
    Remove,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartUpdateForm {
    pub product_id: Uuid,
    pub action: CartAction,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummary {
    pub items: Vec<CartLineDto>,
    pub total_items: i64,
    pub total_price_cents: i64,
    pub total_price: String,
    pub addresses: Vec<Address>,
}
