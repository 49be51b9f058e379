//! # Identity Check
//!
//! Login is a single remote call: credentials go out, a profile comes back.
//! The caller then attaches the role chosen at login (see
//! [`Profile::with_role`]); the identity service knows nothing about roles.
//!
//! One attempt per login, no retry, no backoff.

use crate::error::{PanelzError, Result};
use crate::model::{id_repr, Role, User};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_IDENTITY_URL: &str = "https://dummyjson.com/auth/login";

const TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The profile returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Profile {
    pub fn with_role(self, role: Role) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            image: self.image,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
        }
    }
}

pub trait IdentityProvider {
    fn authenticate(&self, credentials: &Credentials) -> Result<Profile>;
}

/// Identity check over HTTP: `POST {username, password}` as JSON.
pub struct HttpIdentity {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpIdentity {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| PanelzError::Identity(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IdentityProvider for HttpIdentity {
    fn authenticate(&self, credentials: &Credentials) -> Result<Profile> {
        debug!(endpoint = %self.endpoint, username = %credentials.username, "identity check");
        let response = self
            .client
            .post(&self.endpoint)
            .json(credentials)
            .send()
            .map_err(|e| PanelzError::Identity(e.to_string()))?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "identity check rejected");
            return Err(PanelzError::Identity("Invalid credentials".to_string()));
        }

        response
            .json::<Profile>()
            .map_err(|e| PanelzError::Identity(format!("unexpected response: {}", e)))
    }
}

/// Accepts exactly one username/password pair. For tests and offline demos.
pub struct StaticIdentity {
    credentials: Credentials,
    profile: Profile,
}

impl StaticIdentity {
    pub fn new(credentials: Credentials, profile: Profile) -> Self {
        Self {
            credentials,
            profile,
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn authenticate(&self, credentials: &Credentials) -> Result<Profile> {
        if credentials.username == self.credentials.username
            && credentials.password == self.credentials.password
        {
            Ok(self.profile.clone())
        } else {
            Err(PanelzError::Identity("Invalid credentials".to_string()))
        }
    }
}
