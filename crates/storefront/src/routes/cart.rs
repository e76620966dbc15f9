//! Cart page route handler.
//!
//! There is no cart entity behind the page yet. Signed-in visitors see the
//! header with the fixed badge count and an empty cart body.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use easyshop_core::ViewState;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::RequireViewer;
use crate::routes::chrome::Chrome;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub chrome: Chrome,
    pub view: ViewState,
}

/// Display the cart page.
pub async fn show(RequireViewer(viewer): RequireViewer, session: Session) -> impl IntoResponse {
    let mut view = ViewState::new("");
    view.resolve_session(viewer.session);

    CartTemplate {
        chrome: Chrome::load(&session).await,
        view,
    }
}
