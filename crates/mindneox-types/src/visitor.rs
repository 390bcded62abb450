//! Visitor identity types.
//!
//! A visitor is whoever is using the chat surface. Anonymous visitors have no
//! `Visitor` at all; signed-in visitors carry the identifier handed out by the
//! authentication provider.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Stable identifier of a signed-in visitor, as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(pub String);

impl VisitorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signed-in visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: VisitorId,
    /// Name shown in greetings; falls back to the id when absent.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Visitor {
    /// Create a visitor with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: VisitorId::new(id),
            display_name: None,
            email: None,
        }
    }

    /// Name to address the visitor by.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}
