use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{AddressSnapshot, format_cents},
    entity::{addresses, cart_items, products, purchase_events, purchases, reports, users},
};

/// Public view of an account; the password hash never leaves the service layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_admin: model.is_admin,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// Two-decimal rendering of `price_cents`.
    pub price: String,
    pub condition: String,
    pub rating: f64,
    pub image_filename: String,
    pub image_url: String,
    pub seller_id: Uuid,
    pub seller_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn from_entity(model: products::Model, seller_email: Option<String>) -> Self {
        Self {
            id: model.id,
            price: format_cents(model.price_cents),
            image_url: format!("/uploads/{}", model.image_filename),
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            condition: model.condition,
            rating: model.rating,
            image_filename: model.image_filename,
            seller_id: model.seller_id,
            seller_email,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: Option<String>,
    pub label: Option<String>,
}

impl From<addresses::Model> for Address {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            street: model.street,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            country: model.country,
            phone_number: model.phone_number,
            label: model.label,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
    pub address: AddressSnapshot,
    pub purchase_date: DateTime<Utc>,
}

impl From<purchase_events::Model> for PurchaseEvent {
    fn from(model: purchase_events::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            address_id: model.address_id,
            purchase_date: model.purchase_date.with_timezone(&Utc),
            address: snapshot_of(&model),
        }
    }
}

pub fn snapshot_of(event: &purchase_events::Model) -> AddressSnapshot {
    AddressSnapshot {
        street: event.street.clone(),
        city: event.city.clone(),
        state: event.state.clone(),
        zip_code: event.zip_code.clone(),
        country: event.country.clone(),
        phone_number: event.phone_number.clone(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl From<reports::Model> for Report {
    fn from(model: reports::Model) -> Self {
        Self {
            id: model.id,
            file_path: model.file_path,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
