use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Report;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportRangeQuery {
    /// First day included, `YYYY-MM-DD`.
    pub from_date: Option<String>,
    /// Last day included, `YYYY-MM-DD`.
    pub to_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportView {
    pub report: Report,
    pub rows: Vec<Vec<String>>,
}

/// Raw bytes of a report file plus the name offered to the browser.
#[derive(Debug)]
pub struct ReportDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
