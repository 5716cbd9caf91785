use axum::{Json, Router, extract::Query, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    response::{ApiResponse, NoticeLevel},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub level: Option<NoticeLevel>,
    pub login_failed: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub notice: Option<String>,
    pub level: Option<NoticeLevel>,
    pub login_failed: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// Landing page every notice redirect can fall back to.
#[utoipa::path(
    get,
    path = "/",
    params(NoticeQuery),
    responses(
        (status = 200, description = "Home page with any pending notice", body = ApiResponse<HomePage>)
    ),
    tag = "Home"
)]
pub async fn home(Query(query): Query<NoticeQuery>) -> Json<ApiResponse<HomePage>> {
    let page = HomePage {
        notice: query.notice,
        level: query.level,
        login_failed: query.login_failed.unwrap_or(false),
    };
    Json(ApiResponse::success("Welcome to Thrift & Thrive", page, None))
}
