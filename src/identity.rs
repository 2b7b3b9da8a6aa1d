//! Identity provider collaborator: email + password in, operator out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::auth::Operator;
use crate::models::config::IdentityConfig;

/// Email and password as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Operator, IdentityError>;
}

/// Password sign-in over the provider's REST endpoint.
#[derive(Clone)]
pub struct RestIdentityProvider {
    client: reqwest::Client,
    sign_in_url: String,
    api_key: String,
}

impl RestIdentityProvider {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            sign_in_url: config.sign_in_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
}

#[async_trait(?Send)]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Operator, IdentityError> {
        let response = self
            .client
            .post(&self.sign_in_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email: &credentials.email,
                password: &credentials.password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::InvalidCredentials);
        }

        let body: SignInResponse = response.json().await?;
        Ok(Operator {
            uid: body.local_id,
            email: body.email,
        })
    }
}
