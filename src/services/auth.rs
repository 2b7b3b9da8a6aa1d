use crate::domain::auth::Operator;
use crate::forms::auth::LoginFormPayload;
use crate::identity::{IdentityError, IdentityProvider};
use crate::services::{ServiceError, ServiceResult};
use crate::session::{Page, RouteDecision, SessionState, SessionStatus, resolve};

/// Shown for every failed sign-in, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Correo o contraseña incorrectos.";

pub async fn login<P>(
    payload: LoginFormPayload,
    provider: &P,
    sessions: &SessionState,
) -> ServiceResult<Operator>
where
    P: IdentityProvider + ?Sized,
{
    match provider.sign_in(&payload.credentials).await {
        Ok(operator) => {
            log::info!("Operator {} signed in", operator.email);
            sessions.sign_in(operator.clone());
            Ok(operator)
        }
        Err(IdentityError::InvalidCredentials) => {
            log::warn!("Rejected sign-in for {}", payload.credentials.email);
            Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => {
            log::error!("Identity provider failed: {e}");
            Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()))
        }
    }
}

pub fn logout(session: &SessionStatus, sessions: &SessionState) {
    if let Some(operator) = session.operator() {
        if sessions.sign_out(operator) {
            log::info!("Operator {} signed out", operator.email);
        }
    }
}

/// What `GET /` shows for the current session.
pub fn landing(session: &SessionStatus) -> RouteDecision {
    resolve(Page::Landing, session)
}
