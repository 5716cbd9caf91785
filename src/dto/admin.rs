use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Report;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardPurchase {
    pub id: Uuid,
    pub purchase_event_id: Uuid,
    pub user_email: String,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub purchases: Vec<DashboardPurchase>,
    pub reports: Vec<Report>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAdminForm {
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PurgeCounts {
    pub purchases: u64,
    pub purchase_events: u64,
}
