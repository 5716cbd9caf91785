use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{Dashboard, SetAdminForm},
        reports::{ReportRangeQuery, ReportView},
    },
    middleware::auth::RequireAdmin,
    response::{ApiResponse, Meta, Notice},
    services::{admin_service, product_service, report_service},
    state::AppState,
};

const DASHBOARD: &str = "/admin";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/reports/generate", get(generate_report))
        .route("/reports/delete_all", post(delete_all_reports))
        .route("/reports/{id}", get(view_report))
        .route("/reports/{id}/download", get(download_report))
        .route("/reports/{id}/delete", post(delete_report))
        .route("/products/sample", post(add_sample_products))
        .route("/products/delete_all", post(delete_all_products))
        .route("/purchases/delete_all", post(delete_all_purchases))
        .route("/users/{id}/admin", post(set_admin_flag))
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "All purchase lines and generated reports", body = ApiResponse<Dashboard>),
        (status = 303, description = "Admin access required")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<ApiResponse<Dashboard>>, Notice> {
    let dashboard = admin_service::dashboard(&state, &admin)
        .await
        .map_err(|err| err.into_notice("/"))?;
    let meta = Meta::new(dashboard.purchases.len() as i64);
    Ok(Json(ApiResponse::success("Admin dashboard", dashboard, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/admin/reports/generate",
    params(ReportRangeQuery),
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn generate_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ReportRangeQuery>,
) -> Notice {
    match report_service::generate_report(&state, &admin, query).await {
        Ok(_) => Notice::success(DASHBOARD, "Report generated successfully!"),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    get,
    path = "/admin/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report rows, header first", body = ApiResponse<ReportView>),
        (status = 303, description = "Report not found or deleted")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn view_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportView>>, Notice> {
    let view = report_service::view_report(&state, &admin, id)
        .await
        .map_err(|err| err.into_notice(DASHBOARD))?;
    let meta = Meta::new(view.rows.len().saturating_sub(1) as i64);
    Ok(Json(ApiResponse::success("Report", view, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/admin/reports/{id}/download",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Raw CSV file", content_type = "text/csv"),
        (status = 303, description = "Report not found or deleted")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn download_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Response {
    match report_service::download_report(&state, &admin, id).await {
        Ok(download) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.file_name),
                ),
            ],
            download.bytes,
        )
            .into_response(),
        Err(err) => err.into_notice(DASHBOARD).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reports/{id}/delete",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn delete_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Notice {
    match report_service::delete_report(&state, &admin, id).await {
        Ok(()) => Notice::success(DASHBOARD, "Report and file deleted successfully."),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reports/delete_all",
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn delete_all_reports(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Notice {
    match report_service::delete_all_reports(&state, &admin).await {
        Ok(_) => Notice::success(DASHBOARD, "All reports have been successfully deleted."),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    post,
    path = "/admin/products/sample",
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn add_sample_products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Notice {
    match product_service::add_sample_products(&state, &admin).await {
        Ok(count) => Notice::success(
            DASHBOARD,
            format!("Successfully added {count} sample products."),
        ),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    post,
    path = "/admin/products/delete_all",
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn delete_all_products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Notice {
    match product_service::delete_all_products(&state, &admin).await {
        Ok(count) => Notice::success(
            DASHBOARD,
            format!(
                "Successfully deleted {count} products and corresponding cart entries from the database."
            ),
        ),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    post,
    path = "/admin/purchases/delete_all",
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn delete_all_purchases(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Notice {
    match admin_service::delete_all_purchases(&state, &admin).await {
        Ok(counts) => Notice::success(
            DASHBOARD,
            format!(
                "Successfully deleted {} purchase entries and {} purchase event entries from the database.",
                counts.purchases, counts.purchase_events
            ),
        ),
        Err(err) => err.into_notice(DASHBOARD),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body(content = SetAdminForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the dashboard with a notice")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn set_admin_flag(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Form(form): Form<SetAdminForm>,
) -> Notice {
    match admin_service::set_admin_flag(&state, &admin, id, form.is_admin).await {
        Ok(user) => {
            let status = if user.is_admin {
                "now an admin"
            } else {
                "no longer an admin"
            };
            Notice::success(DASHBOARD, format!("{} is {status}.", user.email))
        }
        Err(err) => err.into_notice(DASHBOARD),
    }
}
