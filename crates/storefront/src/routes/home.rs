//! Home page route handler.
//!
//! The page mount starts two things at once: the content hydrator (spawned)
//! and the session gate (awaited here). Nothing renders until the gate
//! resolves. A redirect ends the mount, which discards the hydration result.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use easyshop_core::catalog::Listing;
use easyshop_core::{Mount, Product, ViewState};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::filters;
use crate::middleware::resolve_viewer;
use crate::routes::chrome::Chrome;
use crate::services::{ContentHydrator, GateOutcome};
use crate::state::AppState;

/// Star glyph repeated once per rating point.
const STAR: &str = "⭐";

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Product search term.
    #[serde(default)]
    pub q: String,
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub stars: String,
    pub star_count: u8,
    pub is_favorite: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let star_count = product.display_stars();
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            stars: STAR.repeat(usize::from(star_count)),
            star_count,
            is_favorite: product.is_favorite.unwrap_or(false),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub view: ViewState,
    pub products: Vec<ProductCard>,
    pub hero_image: String,
    pub showing_placeholders: bool,
}

impl HomeTemplate {
    fn new(chrome: Chrome, view: ViewState, listing: &Listing) -> Self {
        let products = listing
            .visible_products(view.search_term())
            .iter()
            .map(ProductCard::from)
            .collect();
        Self {
            chrome,
            products,
            hero_image: listing.hero_image().to_string(),
            showing_placeholders: listing.is_placeholder(),
            view,
        }
    }
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> Result<Response, AppError> {
    let mount = Mount::new();
    let mut view = ViewState::new(query.q);
    let hydration = ContentHydrator::new(state.data()).spawn(mount.liveness());

    let outcome = match resolve_viewer(&state, &session).await {
        Ok(GateOutcome::Redirect(destination)) => {
            mount.unmount();
            hydration.abort();
            return Ok(Redirect::to(destination.path()).into_response());
        }
        Ok(outcome) => outcome,
        Err(e) => {
            mount.unmount();
            hydration.abort();
            return Err(e);
        }
    };
    view.resolve_session(outcome.session_view());

    let listing = match hydration.await {
        Ok(Some(listing)) => listing,
        Ok(None) => Listing::default(),
        Err(e) => {
            warn!(error = %e, "Content task failed");
            Listing::default()
        }
    };

    let chrome = Chrome::load(&session).await;
    Ok(HomeTemplate::new(chrome, view, &listing).into_response())
}
