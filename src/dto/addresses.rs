use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Address, PurchaseEvent, User};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddressForm {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub user: User,
    pub addresses: Vec<Address>,
    pub purchase_events: Vec<PurchaseEvent>,
}
