use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    domain::Registration,
    dto::auth::{LoginForm, RegisterForm},
    middleware::auth::{clear_session, session_cookie},
    response::{Notice, safe_next},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect with notice; session cookie set on success")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());
    let registration =
        match Registration::new(&form.email, &form.password, &form.confirm_password) {
            Ok(registration) => registration,
            Err(err) => return err.into_notice(&next).into_response(),
        };

    match auth_service::register_user(&state, registration).await {
        Ok(session) => (
            jar.add(session_cookie(session.token)),
            Notice::success(&next, "Registration successful! You are now logged in."),
        )
            .into_response(),
        Err(err) => err.into_notice(&next).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect with notice; session cookie set on success")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());
    match auth_service::login_user(&state, &form.email, &form.password).await {
        Ok(session) => (
            jar.add(session_cookie(session.token)),
            Notice::success(&next, "Login successful!"),
        )
            .into_response(),
        Err(err) => {
            let sep = if next.contains('?') { '&' } else { '?' };
            err.into_notice(&format!("{next}{sep}login_failed=true"))
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/logout",
    responses(
        (status = 303, description = "Session cleared")
    ),
    tag = "Auth"
)]
pub async fn logout(jar: CookieJar) -> Response {
    (
        clear_session(jar),
        Notice::success("/", "You have been logged out."),
    )
        .into_response()
}
