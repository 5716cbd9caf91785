use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// Fields of the sell form after the multipart body has been read.
#[derive(Debug, Default)]
pub struct SellForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub condition: Option<String>,
    pub image_name: Option<String>,
    pub image_bytes: Option<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
