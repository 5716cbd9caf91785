use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(total: i64) -> Self {
        Self { total: Some(total) }
    }

    pub fn empty() -> Self {
        Self { total: None }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// A redirect carrying a one-shot message for the page it lands on.
#[derive(Debug, Clone)]
pub struct Notice {
    pub to: String,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(to: &str, message: impl Into<String>) -> Self {
        Self {
            to: to.to_string(),
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(to: &str, message: impl Into<String>) -> Self {
        Self {
            to: to.to_string(),
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Target URL with the notice appended; an empty message adds nothing.
    pub fn location(&self) -> String {
        if self.message.is_empty() {
            return self.to.clone();
        }
        let sep = if self.to.contains('?') { '&' } else { '?' };
        format!(
            "{}{}notice={}&level={}",
            self.to,
            sep,
            urlencoding::encode(&self.message),
            self.level.as_str()
        )
    }
}

impl IntoResponse for Notice {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

/// Only same-site relative paths are accepted as post-login destinations.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}
