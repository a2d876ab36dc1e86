/*!
 * Session provider for DaVinci Resolve's scripting environment.
 *
 * Resolve exposes scripting through a vendor-supplied module whose location
 * is advertised by two environment variables. This provider runs the same
 * set of checks the host documents for script authors, in order, and only
 * then asks the binding for a named application session. Every failure is a
 * user-actionable configuration error; nothing here is retried.
 */

use std::env;
use std::path::PathBuf;

use log::debug;

use crate::errors::SessionError;
use crate::hosts::{HostSession, ScriptBinding, SessionProvider};

/// Environment variable pointing at the host scripting runtime library
pub const SCRIPT_LIB_VAR: &str = "RESOLVE_SCRIPT_LIB";

/// Environment variable pointing at the host scripting API directory
pub const SCRIPT_API_VAR: &str = "RESOLVE_SCRIPT_API";

/// Application name requested from the scripting binding
pub const APP_NAME: &str = "Resolve";

/// Validated script environment: both locations present
#[derive(Debug, Clone)]
pub struct ScriptEnv {
    /// Path to the scripting runtime library
    pub script_lib: PathBuf,

    /// Path to the scripting API directory
    pub script_api: PathBuf,
}

impl ScriptEnv {
    /// Read and validate the script environment.
    ///
    /// Fails fast on the first missing variable, before any attempt to
    /// touch the binding: partial acquisition is never allowed.
    pub fn from_env() -> Result<Self, SessionError> {
        let script_lib = require_var(SCRIPT_LIB_VAR)?;
        let script_api = require_var(SCRIPT_API_VAR)?;
        Ok(ScriptEnv {
            script_lib,
            script_api,
        })
    }

    /// Check that the advertised script library actually exists on disk
    pub fn check_script_lib(&self) -> Result<(), SessionError> {
        if self.script_lib.exists() {
            Ok(())
        } else {
            Err(SessionError::BindingUnavailable {
                reason: format!(
                    "script library '{}' does not exist; check your {} setting",
                    self.script_lib.display(),
                    SCRIPT_LIB_VAR
                ),
            })
        }
    }
}

fn require_var(var: &'static str) -> Result<PathBuf, SessionError> {
    match env::var_os(var) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(SessionError::EnvironmentNotConfigured { var }),
    }
}

/// Session provider that validates the script environment and requests a
/// named application session from an injected scripting binding
#[derive(Debug)]
pub struct ResolveSessionProvider {
    binding: Option<Box<dyn ScriptBinding>>,
    app: String,
}

impl ResolveSessionProvider {
    /// Provider with no binding registered; acquisition will report the
    /// binding as unavailable once the environment checks pass
    pub fn new() -> Self {
        ResolveSessionProvider {
            binding: None,
            app: APP_NAME.to_string(),
        }
    }

    /// Provider using the given scripting binding
    pub fn with_binding(binding: Box<dyn ScriptBinding>) -> Self {
        ResolveSessionProvider {
            binding: Some(binding),
            app: APP_NAME.to_string(),
        }
    }

    /// Request sessions for a different application name
    pub fn for_app(mut self, app: &str) -> Self {
        self.app = app.to_string();
        self
    }
}

impl Default for ResolveSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for ResolveSessionProvider {
    fn acquire(&self) -> Result<Box<dyn HostSession>, SessionError> {
        // Environment first; a missing variable must prevent any binding
        // access at all.
        let script_env = ScriptEnv::from_env()?;
        script_env.check_script_lib()?;

        let binding = self
            .binding
            .as_ref()
            .ok_or_else(|| SessionError::BindingUnavailable {
                reason: format!(
                    "no scripting binding registered; the vendor module is only \
                     loadable from within the {} scripting console",
                    self.app
                ),
            })?;

        debug!(
            "script environment ok (lib: {}, api: {}), requesting '{}' session",
            script_env.script_lib.display(),
            script_env.script_api.display(),
            self.app
        );

        match binding.script_app(&self.app) {
            Some(session) => {
                debug!("host session object: {:?}", session);
                Ok(session)
            }
            None => Err(SessionError::SessionUnavailable {
                app: self.app.clone(),
            }),
        }
    }
}
