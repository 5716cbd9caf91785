use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    domain::PurchaseLineDraft,
    dto::checkout::{PurchaseDetails, PurchaseItem},
    entity::{
        addresses::Entity as Addresses,
        cart_items::{Column as CartCol, Entity as CartItems},
        products::{Column as ProdCol, Entity as Products},
        purchase_events::{ActiveModel as EventActive, Column as EventCol, Entity as PurchaseEvents},
        purchases::{ActiveModel as PurchaseActive, Column as PurchaseCol, Entity as Purchases},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{PurchaseEvent, snapshot_of},
    state::AppState,
};

/// Turn the user's cart into a purchase event.
///
/// The event, its lines and the cart clear-out are committed together; if any
/// step fails the transaction is dropped and rolled back, leaving no event and
/// the cart as it was. An empty cart produces an event with no lines.
/// The address is not checked against the caller.
pub async fn confirm_purchase(
    state: &AppState,
    user: &AuthUser,
    address_id: Uuid,
) -> AppResult<Uuid> {
    let txn = state.orm.begin().await?;

    let address = Addresses::find_by_id(address_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Address {address_id} not found")))?;

    let event = EventActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        address_id: Set(Some(address.id)),
        street: Set(address.street),
        city: Set(address.city),
        state: Set(address.state),
        zip_code: Set(address.zip_code),
        country: Set(address.country),
        phone_number: Set(address.phone_number),
        purchase_date: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let drafts = locked_cart_drafts(&txn, user).await?;
    for (line_no, draft) in drafts.iter().enumerate() {
        PurchaseActive {
            id: Set(Uuid::new_v4()),
            purchase_event_id: Set(event.id),
            product_id: Set(Some(draft.product_id)),
            product_name: Set(draft.product_name.clone()),
            unit_price_cents: Set(draft.unit_price_cents),
            quantity: Set(draft.quantity.get()),
            line_no: Set(line_no as i32),
        }
        .insert(&txn)
        .await?;
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        purchase_event_id = %event.id,
        lines = drafts.len(),
        "purchase confirmed"
    );
    Ok(event.id)
}

/// Lock the user's cart rows for the rest of the transaction and copy each
/// one, with its product's current name and price, into a purchase draft.
async fn locked_cart_drafts(
    txn: &DatabaseTransaction,
    user: &AuthUser,
) -> AppResult<Vec<PurchaseLineDraft>> {
    let lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(txn)
        .await?;
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    lines
        .iter()
        .map(|line| {
            let product = products.get(&line.product_id).ok_or_else(|| {
                AppError::not_found(format!("Product {} not found", line.product_id))
            })?;
            PurchaseLineDraft::new(
                product.id,
                &product.name,
                product.price_cents,
                line.quantity,
            )
        })
        .collect()
}

pub async fn purchase_details(state: &AppState, event_id: Uuid) -> AppResult<PurchaseDetails> {
    let event = PurchaseEvents::find_by_id(event_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Purchase event not found"))?;

    let items = Purchases::find()
        .filter(PurchaseCol::PurchaseEventId.eq(event.id))
        .order_by_asc(PurchaseCol::LineNo)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|line| PurchaseItem {
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
        })
        .collect();

    Ok(PurchaseDetails {
        purchase_event_id: event.id,
        user_id: event.user_id,
        address: snapshot_of(&event),
        purchase_date: event.purchase_date.with_timezone(&Utc),
        items,
    })
}

pub async fn list_purchase_events(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<Vec<PurchaseEvent>> {
    let events = PurchaseEvents::find()
        .filter(EventCol::UserId.eq(user.user_id))
        .order_by_desc(EventCol::PurchaseDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PurchaseEvent::from)
        .collect();
    Ok(events)
}
