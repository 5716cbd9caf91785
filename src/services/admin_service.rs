use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::admin::{Dashboard, DashboardPurchase, PurgeCounts},
    entity::{
        purchase_events::Entity as PurchaseEvents,
        purchases::Entity as Purchases,
        reports::{Column as ReportCol, Entity as Reports},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AdminUser, AuthUser},
    models::{Report, User},
    services::auth_service::hash_password,
    state::AppState,
};

/// The admin gate. Reads the flag from the database on every call so a
/// revoked admin loses access immediately.
pub async fn authorize_admin(state: &AppState, user: &AuthUser) -> AppResult<AdminUser> {
    let account = Users::find_by_id(user.user_id).one(&state.orm).await?;
    match account {
        Some(account) if account.is_admin => Ok(AdminUser::confirmed(account.id, account.email)),
        _ => Err(AppError::Forbidden("Admin access required.".into())),
    }
}

#[derive(FromRow)]
struct DashboardRow {
    id: Uuid,
    purchase_event_id: Uuid,
    user_email: String,
    product_id: Option<Uuid>,
    product_name: String,
    quantity: i32,
    purchase_date: chrono::DateTime<Utc>,
}

pub async fn dashboard(state: &AppState, _admin: &AdminUser) -> AppResult<Dashboard> {
    let rows = sqlx::query_as::<_, DashboardRow>(
        r#"
        SELECT p.id, p.purchase_event_id, u.email AS user_email, p.product_id,
               p.product_name, p.quantity, pe.purchase_date
        FROM purchases p
        JOIN purchase_events pe ON pe.id = p.purchase_event_id
        JOIN users u ON u.id = pe.user_id
        ORDER BY pe.purchase_date DESC, p.line_no
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let purchases = rows
        .into_iter()
        .map(|row| DashboardPurchase {
            id: row.id,
            purchase_event_id: row.purchase_event_id,
            user_email: row.user_email,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            purchase_date: row.purchase_date,
        })
        .collect();

    let reports = Reports::find()
        .order_by_desc(ReportCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Report::from)
        .collect();

    Ok(Dashboard { purchases, reports })
}

/// Grant or revoke admin rights. Only reachable by an existing admin.
pub async fn set_admin_flag(
    state: &AppState,
    admin: &AdminUser,
    user_id: Uuid,
    is_admin: bool,
) -> AppResult<User> {
    if admin.user_id == user_id && !is_admin {
        return Err(AppError::Validation(
            "You cannot revoke your own admin rights.".into(),
        ));
    }

    let account = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    let mut active: UserActive = account.into();
    active.is_admin = Set(is_admin);
    let account = active.update(&state.orm).await?;

    tracing::info!(
        admin_id = %admin.user_id,
        user_id = %account.id,
        is_admin,
        "admin flag changed"
    );
    Ok(account.into())
}

/// Out-of-band provisioning used at startup and by the seed binary: creates
/// the account if needed and makes sure it carries the admin flag. A
/// non-admin account promoted here gets the provisioning password.
pub async fn provision_admin(state: &AppState, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();
    let existing = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let account = match existing {
        Some(account) if account.is_admin => account,
        Some(account) => {
            tracing::warn!(user_id = %account.id, "promoting existing account; password reset");
            let mut active: UserActive = account.into();
            active.is_admin = Set(true);
            active.password_hash = Set(hash_password(password)?);
            active.update(&state.orm).await?
        }
        None => {
            UserActive {
                id: Set(Uuid::new_v4()),
                email: Set(email),
                password_hash: Set(hash_password(password)?),
                is_admin: Set(true),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    tracing::info!(user_id = %account.id, "admin account provisioned");
    Ok(account.into())
}

/// Remove every purchase line and purchase event.
pub async fn delete_all_purchases(state: &AppState, admin: &AdminUser) -> AppResult<PurgeCounts> {
    let txn = state.orm.begin().await?;
    let purchases = Purchases::delete_many().exec(&txn).await?.rows_affected;
    let purchase_events = PurchaseEvents::delete_many().exec(&txn).await?.rows_affected;
    txn.commit().await?;

    tracing::info!(admin_id = %admin.user_id, purchases, purchase_events, "purchases purged");
    Ok(PurgeCounts {
        purchases,
        purchase_events,
    })
}
