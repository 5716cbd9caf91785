use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    routing::{get, post},
};

use crate::{
    dto::products::{ProductList, SellForm},
    error::{AppError, AppResult},
    middleware::auth::RequireUser,
    response::{ApiResponse, Meta, Notice},
    services::product_service,
    state::AppState,
};

const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products)).route(
        "/sell",
        post(sell_product).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

#[utoipa::path(
    get,
    path = "/shop",
    responses(
        (status = 200, description = "Every listed product with its seller", body = ApiResponse<ProductList>)
    ),
    tag = "Shop"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let list = product_service::list_products(&state).await?;
    let meta = Meta::new(list.items.len() as i64);
    Ok(Json(ApiResponse::success("Products", list, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/shop/sell",
    request_body(content_type = "multipart/form-data", description = "name, description, price, condition, image"),
    responses(
        (status = 303, description = "Redirect to the shop with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Shop"
)]
pub async fn sell_product(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    multipart: Multipart,
) -> Notice {
    let result = match read_sell_form(multipart).await {
        Ok(form) => product_service::sell_product(&state, &user, form).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => Notice::success("/shop", "Product listed successfully!"),
        Err(err) => err.into_notice("/shop"),
    }
}

fn bad_upload(err: MultipartError) -> AppError {
    tracing::debug!(error = %err, "unreadable sell form");
    AppError::Validation("Failed to list the product. Please try again.".into())
}

async fn read_sell_form(mut multipart: Multipart) -> AppResult<SellForm> {
    let mut form = SellForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                form.image_name = field.file_name().map(str::to_string);
                form.image_bytes = Some(field.bytes().await.map_err(bad_upload)?.to_vec());
            }
            "name" => form.name = Some(field.text().await.map_err(bad_upload)?),
            "description" => form.description = Some(field.text().await.map_err(bad_upload)?),
            "price" => form.price = Some(field.text().await.map_err(bad_upload)?),
            "condition" => form.condition = Some(field.text().await.map_err(bad_upload)?),
            _ => {}
        }
    }
    Ok(form)
}
