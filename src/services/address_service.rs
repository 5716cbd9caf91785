use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    domain::NewAddress,
    dto::addresses::Profile,
    entity::{
        addresses::{ActiveModel as AddressActive, Column as AddressCol, Entity as Addresses},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Address, User},
    services::checkout_service,
    state::AppState,
};

pub async fn add_address(
    state: &AppState,
    user: &AuthUser,
    address: NewAddress,
) -> AppResult<Address> {
    let model = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        street: Set(address.street),
        city: Set(address.city),
        state: Set(address.state),
        zip_code: Set(address.zip_code),
        country: Set(address.country),
        phone_number: Set(address.phone_number),
        label: Set(address.label),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(model.into())
}

/// Delete one of the caller's own addresses. Past purchase events keep their
/// copy of it.
pub async fn delete_address(state: &AppState, user: &AuthUser, address_id: Uuid) -> AppResult<()> {
    let address = Addresses::find_by_id(address_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Address not found."))?;

    if address.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "You don't have permission to delete this address.".into(),
        ));
    }

    address.delete(&state.orm).await?;
    Ok(())
}

pub async fn list_addresses(state: &AppState, user: &AuthUser) -> AppResult<Vec<Address>> {
    let addresses = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_asc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();
    Ok(addresses)
}

pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<Profile> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Profile {
        user: User::from(account),
        addresses: list_addresses(state, user).await?,
        purchase_events: checkout_service::list_purchase_events(state, user).await?,
    })
}
