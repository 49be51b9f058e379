use crate::model::Role;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelzError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid {kind}: {reason}")]
    Validation { kind: &'static str, reason: String },

    #[error("{kind} {id} is still referenced by {count} interview(s)")]
    InUse {
        kind: &'static str,
        id: String,
        count: usize,
    },

    #[error("Not logged in (run `panelz login` first)")]
    NotLoggedIn,

    #[error("Role {role} cannot access {view}")]
    Forbidden { role: Role, view: String },

    #[error("Login failed: {0}")]
    Identity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl PanelzError {
    pub fn validation(kind: &'static str, reason: impl Into<String>) -> Self {
        PanelzError::Validation {
            kind,
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PanelzError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PanelzError>;
