use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::checkout::{
        CheckoutErrorBody, ConfirmPurchaseRequest, ConfirmPurchaseResponse, PurchaseDetails,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirm_purchase", post(confirm_purchase))
        .route("/purchase_details/{id}", get(purchase_details))
}

fn json_error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(CheckoutErrorBody {
            error: error.into(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/confirm_purchase",
    request_body = ConfirmPurchaseRequest,
    responses(
        (status = 200, description = "Cart converted into a purchase event", body = ConfirmPurchaseResponse),
        (status = 401, description = "Not logged in", body = CheckoutErrorBody),
        (status = 500, description = "Checkout failed and was rolled back", body = CheckoutErrorBody)
    ),
    security(("session_cookie" = [])),
    tag = "Checkout"
)]
pub async fn confirm_purchase(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    payload: Result<Json<ConfirmPurchaseRequest>, JsonRejection>,
) -> Response {
    let Ok(user) = user else {
        return json_error(StatusCode::UNAUTHORIZED, "User not logged in");
    };
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match checkout_service::confirm_purchase(&state, &user, payload.address_id).await {
        Ok(purchase_event_id) => (
            StatusCode::OK,
            Json(ConfirmPurchaseResponse {
                status: "success".to_string(),
                purchase_event_id,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(user_id = %user.user_id, error = %err, "checkout rolled back");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/purchase_details/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase event ID")
    ),
    responses(
        (status = 200, description = "Purchase event with address and items", body = PurchaseDetails),
        (status = 404, description = "Purchase event not found", body = CheckoutErrorBody)
    ),
    tag = "Checkout"
)]
pub async fn purchase_details(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match checkout_service::purchase_details(&state, id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err @ AppError::NotFound(_)) => json_error(StatusCode::NOT_FOUND, err.to_string()),
        Err(err) => {
            tracing::error!(error = %err, "purchase details lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
