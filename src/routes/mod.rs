use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::Operator;
use crate::session::{SessionState, SessionStatus};

pub mod categories;
pub mod listings;
pub mod main;
pub mod ratings;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Referer of the request when present, otherwise `fallback`.
pub fn back_or<'a>(request: &'a HttpRequest, fallback: &'a str) -> &'a str {
    request
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(fallback)
}

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: &SessionStatus,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &session.operator());
    context.insert("current_page", current_page);
    context
}

/// Operator claimed by the identity cookie. The identity id holds the
/// operator as JSON.
fn claimed_operator(request: &HttpRequest) -> Option<Operator> {
    let id = request.get_identity().ok()?.id().ok()?;
    match serde_json::from_str::<Operator>(&id) {
        Ok(operator) => Some(operator),
        Err(e) => {
            log::warn!("Discarding unreadable identity cookie: {e}");
            None
        }
    }
}

/// A cookie only counts while its operator is registered in [`SessionState`].
fn session_from_request(request: &HttpRequest) -> SessionStatus {
    match request.app_data::<web::Data<SessionState>>() {
        Some(sessions) => sessions.status_of(claimed_operator(request)),
        None => {
            log::error!("Session registry is not configured");
            SessionStatus::SignedOut
        }
    }
}

impl FromRequest for SessionStatus {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(session_from_request(request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn redirect_sets_location() {
        let response = redirect("/dashboard");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/dashboard"
        );
    }

    #[test]
    fn back_or_prefers_referer() {
        let request = TestRequest::default()
            .insert_header((header::REFERER, "/dashboard?tab=active"))
            .to_http_request();
        assert_eq!(back_or(&request, "/dashboard"), "/dashboard?tab=active");

        let request = TestRequest::default().to_http_request();
        assert_eq!(back_or(&request, "/dashboard"), "/dashboard");
    }

    #[test]
    fn requests_without_session_registry_are_signed_out() {
        let request = TestRequest::default().to_http_request();
        assert_eq!(session_from_request(&request), SessionStatus::SignedOut);
    }
}
