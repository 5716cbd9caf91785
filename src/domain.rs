//! Validated values built at the boundary between request input and storage.
//!
//! Every row the services write goes through one of these constructors, so
//! the invariants (non-negative money, quantities of at least one, required
//! address fields) are checked in one place instead of at each call site.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductCondition {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    #[serde(rename = "Used")]
    Used,
}

impl ProductCondition {
    pub const ALL: [ProductCondition; 3] = [
        ProductCondition::New,
        ProductCondition::LikeNew,
        ProductCondition::Used,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCondition::New => "New",
            ProductCondition::LikeNew => "Like New",
            ProductCondition::Used => "Used",
        }
    }
}

impl fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCondition {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown condition: {s}")))
    }
}

/// Highest listing price, in cents (one billion in whole units).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Highest quantity a cart or purchase line may carry.
pub const MAX_QUANTITY: i32 = 10_000;

/// Reject `value` when it is longer than the column that stores it.
fn check_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters."
        )));
    }
    Ok(())
}

fn price_too_high() -> AppError {
    AppError::Validation("Price cannot exceed 1000000000.00.".into())
}

/// Parse a decimal price such as `20`, `20.5` or `20.00` into cents.
pub fn parse_price_cents(raw: &str) -> AppResult<i64> {
    let invalid = || AppError::Validation(format!("Invalid price: {raw}"));
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('-') || raw.starts_with('+') {
        return Err(invalid());
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };
    if frac.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || (whole.is_empty() && frac.is_empty())
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| price_too_high())?
    };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(price_too_high)?;
    if cents > MAX_PRICE_CENTS {
        return Err(price_too_high());
    }
    Ok(cents)
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// A cart or purchase quantity, between one and [`MAX_QUANTITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i32) -> AppResult<Self> {
        if value < 1 {
            return Err(AppError::Validation(
                "Quantity must be at least 1.".to_string(),
            ));
        }
        if value > MAX_QUANTITY {
            return Err(AppError::Validation(format!(
                "Quantity cannot exceed {MAX_QUANTITY}."
            )));
        }
        Ok(Self(value))
    }

    pub fn one() -> Self {
        Self(1)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub condition: ProductCondition,
    pub image_filename: String,
}

impl NewProduct {
    pub fn new(
        name: &str,
        description: &str,
        price_cents: i64,
        condition: ProductCondition,
        image_filename: &str,
    ) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Product name is required.".into()));
        }
        check_length("Product name", name, 100)?;
        if price_cents < 0 {
            return Err(AppError::Validation("Price cannot be negative.".into()));
        }
        if price_cents > MAX_PRICE_CENTS {
            return Err(price_too_high());
        }
        if image_filename.is_empty() {
            return Err(AppError::Validation(
                "Failed to list the product. Please try again.".into(),
            ));
        }
        check_length("Image file name", image_filename, 100)?;
        Ok(Self {
            name: name.to_string(),
            description: description.trim().to_string(),
            price_cents,
            condition,
            image_filename: image_filename.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: Option<String>,
    pub label: Option<String>,
}

impl NewAddress {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        street: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
        zip_code: Option<&str>,
        country: Option<&str>,
        phone_number: Option<&str>,
        label: Option<&str>,
    ) -> AppResult<Self> {
        fn required(value: Option<&str>) -> AppResult<String> {
            match value.map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(AppError::Validation(
                    "Please fill all required fields.".to_string(),
                )),
            }
        }
        fn optional(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let address = Self {
            street: required(street)?,
            city: required(city)?,
            state: required(state)?,
            zip_code: required(zip_code)?,
            country: required(country)?,
            phone_number: optional(phone_number),
            label: optional(label),
        };

        check_length("Street", &address.street, 200)?;
        check_length("City", &address.city, 100)?;
        check_length("State", &address.state, 100)?;
        check_length("Zip code", &address.zip_code, 20)?;
        check_length("Country", &address.country, 100)?;
        if let Some(phone) = &address.phone_number {
            check_length("Phone number", phone, 30)?;
        }
        if let Some(label) = &address.label {
            check_length("Label", label, 50)?;
        }
        Ok(address)
    }
}

/// The address fields copied onto a purchase event at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AddressSnapshot {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: Option<String>,
}

impl AddressSnapshot {
    /// Single-line form used in report rows; components are not escaped.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }
}

/// A purchase line ready to be written under a purchase event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLineDraft {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: Quantity,
}

impl PurchaseLineDraft {
    pub fn new(
        product_id: Uuid,
        product_name: &str,
        unit_price_cents: i64,
        quantity: i32,
    ) -> AppResult<Self> {
        if unit_price_cents < 0 {
            return Err(AppError::Validation(format!(
                "Product {product_id} has a negative price"
            )));
        }
        let quantity = Quantity::new(quantity).map_err(|_| {
            AppError::Validation(format!(
                "Cart line for product {product_id} has invalid quantity {quantity}"
            ))
        })?;
        Ok(Self {
            product_id,
            product_name: product_name.to_string(),
            unit_price_cents,
            quantity,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(email: &str, password: &str, confirm_password: &str) -> AppResult<Self> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "Please enter a valid email address.".into(),
            ));
        }
        check_length("Email", &email, 150)?;
        if password.is_empty() {
            return Err(AppError::Validation("Password is required.".into()));
        }
        if password != confirm_password {
            return Err(AppError::Validation("Passwords do not match!".into()));
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }
}

/// Half-open `[start, end)` window of purchase dates covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportRange {
    /// Returns `Ok(None)` unless both bounds are present; that case yields
    /// an empty report rather than an error.
    pub fn from_query(from_date: Option<&str>, to_date: Option<&str>) -> AppResult<Option<Self>> {
        let (Some(from), Some(to)) = (
            from_date.filter(|s| !s.trim().is_empty()),
            to_date.filter(|s| !s.trim().is_empty()),
        ) else {
            return Ok(None);
        };

        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDateFormat)?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDateFormat)?;
        let to = to
            .checked_add_days(Days::new(1))
            .ok_or(AppError::InvalidDateFormat)?;

        Ok(Some(Self {
            start: from.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: to.and_time(chrono::NaiveTime::MIN).and_utc(),
        }))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Reduce an uploaded filename to a safe basename made of ASCII letters,
/// digits, `.`, `_` and `-`. Returns an empty string when nothing is left.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}
