//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{DataStore, IdentityProvider, SupabaseClient};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the
/// configuration and the two backend collaborators.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    identity: Arc<dyn IdentityProvider>,
    data: Arc<dyn DataStore>,
}

impl AppState {
    /// Create application state backed by the configured Supabase project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, reqwest::Error> {
        let supabase = Arc::new(SupabaseClient::new(&config.supabase)?);
        Ok(Self::with_backends(config, supabase.clone(), supabase))
    }

    /// Create application state with explicit collaborators.
    #[must_use]
    pub fn with_backends(
        config: StorefrontConfig,
        identity: Arc<dyn IdentityProvider>,
        data: Arc<dyn DataStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                data,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get a shared handle to the row store, for work spawned off the request.
    #[must_use]
    pub fn data(&self) -> Arc<dyn DataStore> {
        Arc::clone(&self.inner.data)
    }
}
