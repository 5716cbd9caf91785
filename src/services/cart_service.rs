use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    domain::{Quantity, format_cents},
    dto::cart::{CartLineDto, CartSummary},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    services::address_service,
    state::AppState,
};

fn line_filter(user: &AuthUser, product_id: Uuid) -> Condition {
    Condition::all()
        .add(CartCol::UserId.eq(user.user_id))
        .add(CartCol::ProductId.eq(product_id))
}

/// Put one unit of a product in the cart. A second add of the same product
/// is refused rather than merged.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<CartItem> {
    let duplicate = || AppError::Conflict("Item already exists in your cart!".to_string());

    let exist = CartItems::find()
        .filter(line_filter(user, product_id))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(duplicate());
    }

    let item = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(product_id),
        quantity: Set(Quantity::one().get()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => duplicate(),
        Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::not_found("Product not found.")
        }
        _ => AppError::OrmError(err),
    })?;

    Ok(item.into())
}

/// Set the quantity of an existing line. Returns `false` when the user has
/// no line for that product; nothing is changed in that case.
pub async fn update_cart_line(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<bool> {
    let quantity = Quantity::new(quantity)?;

    let line = CartItems::find()
        .filter(line_filter(user, product_id))
        .one(&state.orm)
        .await?;
    let Some(line) = line else {
        return Ok(false);
    };

    let mut active: CartActive = line.into();
    active.quantity = Set(quantity.get());
    active.update(&state.orm).await?;
    Ok(true)
}

/// Delete the user's line(s) for a product; returns how many were removed.
pub async fn remove_cart_line(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<u64> {
    let result = CartItems::delete_many()
        .filter(line_filter(user, product_id))
        .exec(&state.orm)
        .await?;
    Ok(result.rows_affected)
}

pub async fn cart_summary(state: &AppState, user: &AuthUser) -> AppResult<CartSummary> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (line, product) in rows {
        let Some(product) = product else { continue };
        let (_, line_cents) = totals([(line.quantity, product.price_cents)])?;
        items.push(CartLineDto {
            id: line.id,
            line_total: format_cents(line_cents),
            quantity: line.quantity,
            product: Product::from_entity(product, None),
        });
    }

    let (total_items, total_price_cents) = totals(
        items
            .iter()
            .map(|line| (line.quantity, line.product.price_cents)),
    )?;

    let addresses = address_service::list_addresses(state, user).await?;

    Ok(CartSummary {
        items,
        total_items,
        total_price_cents,
        total_price: format_cents(total_price_cents),
        addresses,
    })
}

/// Item count and price total of `(quantity, unit_price_cents)` lines.
pub fn totals(lines: impl IntoIterator<Item = (i32, i64)>) -> AppResult<(i64, i64)> {
    let overflow = || AppError::Validation("Cart total is too large.".to_string());
    let mut items: i64 = 0;
    let mut cents: i64 = 0;
    for (quantity, price) in lines {
        let quantity = i64::from(quantity);
        items = items.checked_add(quantity).ok_or_else(overflow)?;
        let line = quantity.checked_mul(price).ok_or_else(overflow)?;
        cents = cents.checked_add(line).ok_or_else(overflow)?;
    }
    Ok((items, cents))
}
