use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    domain::NewAddress,
    dto::addresses::{AddressForm, Profile},
    middleware::auth::RequireUser,
    response::{ApiResponse, Notice},
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile_page))
        .route("/addresses", post(add_address))
        .route("/addresses/{id}/delete", post(delete_address))
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Account, saved addresses and purchase history", body = ApiResponse<Profile>),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = [])),
    tag = "Profile"
)]
pub async fn profile_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ApiResponse<Profile>>, Notice> {
    let profile = address_service::profile(&state, &user)
        .await
        .map_err(|err| err.into_notice("/"))?;
    Ok(Json(ApiResponse::success("Profile", profile, None)))
}

#[utoipa::path(
    post,
    path = "/profile/addresses",
    request_body(content = AddressForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the profile with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Profile"
)]
pub async fn add_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<AddressForm>,
) -> Notice {
    let address = NewAddress::new(
        form.street.as_deref(),
        form.city.as_deref(),
        form.state.as_deref(),
        form.zip_code.as_deref(),
        form.country.as_deref(),
        form.phone_number.as_deref(),
        form.label.as_deref(),
    );
    let result = match address {
        Ok(address) => address_service::add_address(&state, &user, address).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => Notice::success("/profile", "Address added successfully!"),
        Err(err) => err.into_notice("/profile"),
    }
}

#[utoipa::path(
    post,
    path = "/profile/addresses/{id}/delete",
    params(
        ("id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 303, description = "Redirect to the profile with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Profile"
)]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Notice {
    match address_service::delete_address(&state, &user, id).await {
        Ok(()) => Notice::success("/profile", "Address deleted successfully!"),
        Err(err) => err.into_notice("/profile"),
    }
}
