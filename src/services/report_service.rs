use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};
use sqlx::FromRow;
use std::path::Path;
use uuid::Uuid;

use crate::{
    domain::{AddressSnapshot, ReportRange},
    dto::reports::{ReportDownload, ReportRangeQuery, ReportView},
    entity::reports::{ActiveModel as ReportActive, Column as ReportCol, Entity as Reports},
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Report,
    state::AppState,
};

const REPORT_MISSING: &str = "Report not found or deleted.";

/// One purchase line with the event and buyer fields a report row needs.
#[derive(Debug, Clone, FromRow)]
pub struct ReportLine {
    pub user_email: String,
    pub user_id: Uuid,
    pub purchase_event_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub product_name: String,
    pub quantity: i32,
    pub purchase_date: DateTime<Utc>,
}

impl ReportLine {
    pub fn into_row(self) -> Vec<String> {
        let address = AddressSnapshot {
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            phone_number: None,
        };
        vec![
            self.user_email,
            self.user_id.to_string(),
            self.purchase_event_id.to_string(),
            address.one_line(),
            self.product_name,
            self.quantity.to_string(),
            self.purchase_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

pub async fn load_report_lines(
    state: &AppState,
    range: &ReportRange,
) -> AppResult<Vec<ReportLine>> {
    let lines = sqlx::query_as::<_, ReportLine>(
        r#"
        SELECT u.email AS user_email, pe.user_id, pe.id AS purchase_event_id,
               pe.street, pe.city, pe.state, pe.zip_code, pe.country,
               p.product_name, p.quantity, pe.purchase_date
        FROM purchase_events pe
        JOIN users u ON u.id = pe.user_id
        JOIN purchases p ON p.purchase_event_id = pe.id
        WHERE pe.purchase_date >= $1 AND pe.purchase_date < $2
        ORDER BY pe.purchase_date, pe.id, p.line_no
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(&state.pool)
    .await?;

    Ok(lines)
}

/// Write the CSV for the requested window and record it.
///
/// Without both dates the report holds only the header row. The file is in
/// its final place before the metadata row is inserted; if the insert fails
/// the file is removed again.
pub async fn generate_report(
    state: &AppState,
    admin: &AdminUser,
    query: ReportRangeQuery,
) -> AppResult<Report> {
    let range = ReportRange::from_query(query.from_date.as_deref(), query.to_date.as_deref())?;
    let rows: Vec<Vec<String>> = match range {
        Some(range) => load_report_lines(state, &range)
            .await?
            .into_iter()
            .map(ReportLine::into_row)
            .collect(),
        None => Vec::new(),
    };

    let path = state.reports.write(Utc::now(), &rows).await?;
    let file_path = path.to_string_lossy().into_owned();

    let inserted = ReportActive {
        id: Set(Uuid::new_v4()),
        file_path: Set(file_path),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    let report = match inserted {
        Ok(report) => report,
        Err(err) => {
            if let Err(cleanup) = state.reports.remove(&path).await {
                tracing::warn!(
                    error = %cleanup,
                    path = %path.display(),
                    "orphan report file left behind"
                );
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        admin_id = %admin.user_id,
        report_id = %report.id,
        rows = rows.len(),
        "report generated"
    );
    Ok(report.into())
}

pub async fn list_reports(state: &AppState, _admin: &AdminUser) -> AppResult<Vec<Report>> {
    let reports = Reports::find()
        .order_by_desc(ReportCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Report::from)
        .collect();
    Ok(reports)
}

async fn find_report(state: &AppState, id: Uuid) -> AppResult<Report> {
    Reports::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Report::from)
        .ok_or_else(|| AppError::not_found(REPORT_MISSING))
}

pub async fn view_report(state: &AppState, _admin: &AdminUser, id: Uuid) -> AppResult<ReportView> {
    let report = find_report(state, id).await?;
    let rows = state.reports.read_rows(Path::new(&report.file_path)).await?;
    Ok(ReportView { report, rows })
}

pub async fn download_report(
    state: &AppState,
    _admin: &AdminUser,
    id: Uuid,
) -> AppResult<ReportDownload> {
    let report = find_report(state, id).await?;
    let path = Path::new(&report.file_path);
    let bytes = state.reports.read_bytes(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("report_{id}.csv"));
    Ok(ReportDownload { file_name, bytes })
}

/// Remove the file (if still present) and the row together.
pub async fn delete_report(state: &AppState, admin: &AdminUser, id: Uuid) -> AppResult<()> {
    let report = Reports::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Report not found."))?;

    state.reports.remove(Path::new(&report.file_path)).await?;
    Reports::delete_by_id(report.id).exec(&state.orm).await?;

    tracing::info!(admin_id = %admin.user_id, report_id = %id, "report deleted");
    Ok(())
}

pub async fn delete_all_reports(state: &AppState, admin: &AdminUser) -> AppResult<usize> {
    let reports = Reports::find().all(&state.orm).await?;
    let count = reports.len();
    for report in reports {
        state.reports.remove(Path::new(&report.file_path)).await?;
        Reports::delete_by_id(report.id).exec(&state.orm).await?;
    }

    tracing::info!(admin_id = %admin.user_id, count, "all reports deleted");
    Ok(count)
}
