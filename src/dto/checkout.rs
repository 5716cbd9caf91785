use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::AddressSnapshot;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmPurchaseRequest {
    pub address_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmPurchaseResponse {
    pub status: String,
    pub purchase_event_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseItem {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseDetails {
    pub purchase_event_id: Uuid,
    pub user_id: Uuid,
    pub address: AddressSnapshot,
    pub purchase_date: DateTime<Utc>,
    pub items: Vec<PurchaseItem>,
}
