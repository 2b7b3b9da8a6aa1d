use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{LoginForm, LoginFormPayload};
use crate::identity::RestIdentityProvider;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{
    INVALID_CREDENTIALS, landing, login as login_service, logout as logout_service,
};
use crate::session::{DASHBOARD_PATH, LANDING_PATH, RouteDecision, SessionState, SessionStatus};

#[get("/")]
pub async fn index(
    session: SessionStatus,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match landing(&session) {
        RouteDecision::Redirect(location) => redirect(location),
        RouteDecision::Render => {
            let context = base_context(&flash_messages, &session, "login");
            render_template(&tera, "main/login.html", &context)
        }
    }
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    provider: web::Data<RestIdentityProvider>,
    sessions: web::Data<SessionState>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejected login form: {e}");
            FlashMessage::error(INVALID_CREDENTIALS).send();
            return redirect(LANDING_PATH);
        }
    };

    let operator = match login_service(payload, provider.get_ref(), sessions.get_ref()).await {
        Ok(operator) => operator,
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(LANDING_PATH);
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error(INVALID_CREDENTIALS).send();
            return redirect(LANDING_PATH);
        }
    };

    let identity_id = match serde_json::to_string(&operator) {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to encode operator identity: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = Identity::login(&request.extensions(), identity_id) {
        log::error!("Failed to attach identity to session: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    redirect(DASHBOARD_PATH)
}

#[post("/logout")]
pub async fn logout(
    session: SessionStatus,
    identity: Option<Identity>,
    sessions: web::Data<SessionState>,
) -> impl Responder {
    logout_service(&session, sessions.get_ref());
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect(LANDING_PATH)
}

/// Unknown routes land on the landing page, which forwards signed-in
/// operators to the dashboard.
pub async fn not_found() -> impl Responder {
    redirect(LANDING_PATH)
}
