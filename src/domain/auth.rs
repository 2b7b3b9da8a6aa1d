use serde::{Deserialize, Serialize};

/// Operator identity returned by the identity provider after sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Operator {
    /// Provider-assigned user id.
    pub uid: String,
    pub email: String,
}
