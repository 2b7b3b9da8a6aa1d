use crate::domain::auth::Operator;
use crate::session::SessionStatus;

pub mod auth;
pub mod categories;
pub mod errors;
pub mod listings;
pub mod ratings;
pub mod uploads;

pub use errors::{ServiceError, ServiceResult};

/// Returns the signed-in operator or [`ServiceError::Unauthorized`].
pub fn require_operator(session: &SessionStatus) -> ServiceResult<&Operator> {
    session.operator().ok_or(ServiceError::Unauthorized)
}
