//! Process-wide application context.
//!
//! Bundles what a host sets up once at startup: the configuration, the tracing
//! pipeline and the authenticator. Everything else lives in
//! [`BrowserState`](crate::BrowserState), one per view.

use crate::access::{AuthError, Authenticator, Credentials, DenyAll, Session};
use crate::observability::{init_tracing, TracingGuard};
use crate::Config;
use opentelemetry::trace::TraceResult;
use std::sync::Arc;

/// Configuration, tracing and authentication for one process.
pub struct AppContext {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    tracing: Option<TracingGuard>,
}

impl AppContext {
    /// Installs tracing for `config` and keeps the authenticator.
    ///
    /// Tracing is best effort: when it cannot be installed the context still
    /// works, just without exported spans.
    pub fn init(config: Config, authenticator: Arc<dyn Authenticator>) -> Self {
        let guard = init_tracing(&config);
        tracing::debug!(traced = guard.is_some(), "application context initialized");
        Self {
            config,
            authenticator,
            tracing: guard,
        }
    }

    /// A context without tracing. Useful in tests and embedded hosts that
    /// install their own subscriber.
    #[must_use]
    pub fn untraced(config: Config, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            config,
            authenticator,
            tracing: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn trace_file(&self) -> Option<&std::path::Path> {
        self.tracing.as_ref().map(TracingGuard::trace_file)
    }

    /// Delegates to the configured [`Authenticator`].
    ///
    /// # Errors
    ///
    /// Returns whatever the authenticator rejects the credentials with.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let _span = tracing::debug_span!("authenticate", user = %credentials.username).entered();
        let result = self.authenticator.authenticate(credentials);
        if let Err(e) = &result {
            tracing::info!(error = %e, "authentication failed");
        }
        result
    }

    /// Flushes and tears down tracing.
    ///
    /// # Errors
    ///
    /// Returns the error reported while flushing or shutting down the tracer
    /// provider.
    pub fn shutdown(self) -> TraceResult<()> {
        match self.tracing {
            Some(guard) => guard.shutdown(),
            None => Ok(()),
        }
    }
}

impl Default for AppContext {
    /// Default configuration, no tracing, nobody admitted.
    fn default() -> Self {
        Self::untraced(Config::default(), Arc::new(DenyAll))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("tracing", &self.tracing)
            .finish_non_exhaustive()
    }
}
