//! Page chrome shared by every template: language, direction and labels.

use easyshop_core::Locale;
use easyshop_core::locale::Labels;
use tower_sessions::Session;

use crate::models::session_keys;

/// Per-request header settings.
#[derive(Debug, Clone, Copy)]
pub struct Chrome {
    pub locale: Locale,
    pub labels: Labels,
}

impl Chrome {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            labels: locale.labels(),
        }
    }

    /// Read the visitor's language from the session, defaulting to English.
    pub async fn load(session: &Session) -> Self {
        let locale = session
            .get::<Locale>(session_keys::LOCALE)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read locale from session");
                None
            })
            .unwrap_or_default();
        Self::new(locale)
    }

    #[must_use]
    pub const fn lang(&self) -> &'static str {
        self.locale.tag()
    }

    #[must_use]
    pub const fn dir(&self) -> &'static str {
        self.locale.direction()
    }
}
