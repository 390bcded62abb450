//! Local sign-in session.
//!
//! Stands in for the authentication provider: the signed-in visitor is kept
//! in memory and, when a path is given, mirrored to `session.json` so it
//! survives restarts. Implements `IdentityProvider` from `mindneox-core`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use mindneox_core::identity::IdentityProvider;
use mindneox_types::error::IdentityError;
use mindneox_types::visitor::Visitor;
use tracing::{debug, info, warn};

use crate::filesystem::write_atomic;

/// Default file name inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

pub struct SessionIdentity {
    current: RwLock<Option<Visitor>>,
    path: Option<PathBuf>,
}

#[cfg(test)]
impl SessionIdentity {
    /// An anonymous, memory-only session.
    pub fn anonymous() -> Self {
        Self {
            current: RwLock::new(None),
            path: None,
        }
    }

    /// A memory-only session already signed in as `visitor`.
    pub fn signed_in(visitor: Visitor) -> Self {
        Self {
            current: RwLock::new(Some(visitor)),
            path: None,
        }
    }
}

impl SessionIdentity {
    /// Load the session stored at `path`.
    ///
    /// A missing file means anonymous. An unreadable or corrupt file is
    /// logged and also treated as anonymous.
    pub fn load(path: PathBuf) -> Self {
        let current = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Visitor>(&content) {
                Ok(visitor) => {
                    debug!(visitor = %visitor.id, "session restored");
                    Some(visitor)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt session file, continuing anonymously");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session file, continuing anonymously");
                None
            }
        };

        Self {
            current: RwLock::new(current),
            path: Some(path),
        }
    }

    /// Session stored at `{data_dir}/session.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::load(data_dir.join(SESSION_FILE_NAME))
    }

    /// Sign in as `visitor`, persisting the session when file-backed.
    pub fn sign_in(&self, visitor: Visitor) -> Result<(), IdentityError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&visitor)
                .map_err(|e| IdentityError::Persist(e.to_string()))?;
            write_atomic(path, &json)
                .map_err(|e| IdentityError::Persist(format!("{}: {e}", path.display())))?;
        }

        info!(visitor = %visitor.id, "signed in");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(visitor);
        Ok(())
    }

    /// Sign out. Signing out while anonymous is a no-op.
    pub fn sign_out(&self) -> Result<(), IdentityError> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(IdentityError::Persist(format!("{}: {e}", path.display())));
                }
            }
        }

        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(visitor) = previous {
            info!(visitor = %visitor.id, "signed out");
        }
        Ok(())
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_visitor(&self) -> Option<Visitor> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_anonymous_by_default() {
        let identity = SessionIdentity::anonymous();
        assert!(!identity.is_authenticated());
        assert!(identity.current_visitor().is_none());
    }

    #[test]
    fn test_sign_in_and_out_in_memory() {
        let identity = SessionIdentity::anonymous();
        identity.sign_in(Visitor::new("user_1")).unwrap();
        assert!(identity.is_authenticated());

        identity.sign_out().unwrap();
        assert!(!identity.is_authenticated());

        // Second sign-out is harmless.
        identity.sign_out().unwrap();
    }

    #[test]
    fn test_session_persists_across_loads() {
        let dir = tempdir().unwrap();
        let mut visitor = Visitor::new("user_1");
        visitor.display_name = Some("Ada".to_string());
        SessionIdentity::in_data_dir(dir.path())
            .sign_in(visitor.clone())
            .unwrap();

        let reloaded = SessionIdentity::in_data_dir(dir.path());
        assert_eq!(reloaded.current_visitor(), Some(visitor));

        reloaded.sign_out().unwrap();
        assert!(!dir.path().join(SESSION_FILE_NAME).exists());
        assert!(!SessionIdentity::in_data_dir(dir.path()).is_authenticated());
    }

    #[test]
    fn test_sign_in_replaces_session_without_leftovers() {
        let dir = tempdir().unwrap();
        let identity = SessionIdentity::in_data_dir(dir.path());
        identity.sign_in(Visitor::new("user_1")).unwrap();
        identity.sign_in(Visitor::new("user_2")).unwrap();

        let reloaded = SessionIdentity::in_data_dir(dir.path());
        assert_eq!(reloaded.current_visitor().unwrap().id.as_str(), "user_2");
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_failed_sign_in_keeps_previous_session() {
        let dir = tempdir().unwrap();
        let identity = SessionIdentity::in_data_dir(dir.path());
        identity.sign_in(Visitor::new("user_1")).unwrap();
        std::fs::create_dir(dir.path().join("session.json.tmp")).unwrap();

        assert!(identity.sign_in(Visitor::new("user_2")).is_err());
        assert_eq!(identity.current_visitor().unwrap().id.as_str(), "user_1");
        let reloaded = SessionIdentity::in_data_dir(dir.path());
        assert_eq!(reloaded.current_visitor().unwrap().id.as_str(), "user_1");
    }

    #[test]
    fn test_corrupt_session_is_anonymous() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE_NAME), "not json").unwrap();
        assert!(!SessionIdentity::in_data_dir(dir.path()).is_authenticated());
    }

    #[test]
    fn test_signed_in_constructor() {
        let identity = SessionIdentity::signed_in(Visitor::new("user_9"));
        assert_eq!(identity.current_visitor().unwrap().id.as_str(), "user_9");
    }
}
