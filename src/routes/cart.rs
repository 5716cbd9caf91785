use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartAction, CartSummary, CartUpdateForm},
    error::AppError,
    middleware::auth::RequireUser,
    response::{ApiResponse, Meta, Notice},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_page))
        .route("/add/{product_id}", post(add_to_cart))
        .route("/update", post(update_item))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart lines, totals and the addresses available at checkout", body = ApiResponse<CartSummary>),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = [])),
    tag = "Cart"
)]
pub async fn cart_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ApiResponse<CartSummary>>, Notice> {
    let summary = cart_service::cart_summary(&state, &user)
        .await
        .map_err(|err| err.into_notice("/"))?;
    let meta = Meta::new(summary.items.len() as i64);
    Ok(Json(ApiResponse::success("Cart", summary, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/cart/add/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 303, description = "Redirect to the shop with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<Uuid>,
) -> Notice {
    match cart_service::add_to_cart(&state, &user, product_id).await {
        Ok(_) => Notice::success("/shop", "Item successfully added to your cart."),
        Err(err) => err.into_notice("/shop"),
    }
}

#[utoipa::path(
    post,
    path = "/cart/update",
    request_body(content = CartUpdateForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the cart with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CartUpdateForm>,
) -> Notice {
    match form.action {
        CartAction::Remove => {
            match cart_service::remove_cart_line(&state, &user, form.product_id).await {
                Ok(_) => Notice::success("/cart", "Item removed from your cart."),
                Err(err) => err.into_notice("/cart"),
            }
        }
        CartAction::Update => {
            let Some(quantity) = form.quantity else {
                return AppError::Validation("Quantity is required.".into()).into_notice("/cart");
            };
            match cart_service::update_cart_line(&state, &user, form.product_id, quantity).await {
                Ok(true) => Notice::success("/cart", "Cart updated successfully."),
                // Nothing to update: return to the cart without a message.
                Ok(false) => Notice::success("/cart", ""),
                Err(err) => err.into_notice("/cart"),
            }
        }
    }
}
