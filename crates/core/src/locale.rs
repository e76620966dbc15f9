//! Header labels in the two languages the storefront ships.

use serde::{Deserialize, Serialize};

/// Display language for page chrome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    /// The other language.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::En => Self::Ar,
            Self::Ar => Self::En,
        }
    }

    /// BCP 47 tag for the `lang` attribute.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Value of the document `dir` attribute.
    #[must_use]
    pub const fn direction(self) -> &'static str {
        match self {
            Self::En => "ltr",
            Self::Ar => "rtl",
        }
    }

    #[must_use]
    pub const fn labels(self) -> Labels {
        match self {
            Self::En => Labels {
                search_placeholder: "Search products...",
                welcome: "Welcome",
                best_sellers: "🔥 Best Sellers",
                sign_out: "Sign out",
                switch_language: "العربية",
            },
            Self::Ar => Labels {
                search_placeholder: "ابحث عن المنتجات...",
                welcome: "مرحبًا",
                best_sellers: "🔥 الأكثر مبيعًا",
                sign_out: "تسجيل الخروج",
                switch_language: "English",
            },
        }
    }
}

/// Translated header strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub search_placeholder: &'static str,
    pub welcome: &'static str,
    pub best_sellers: &'static str,
    pub sign_out: &'static str,
    /// Label of the language switch, written in the *other* language.
    pub switch_language: &'static str,
}
