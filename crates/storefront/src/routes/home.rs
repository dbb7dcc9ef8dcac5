//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use serendib_core::Product;
use tower_sessions::Session;
use tracing::instrument;

use super::chat::{ChatMessageView, load_transcript, message_views};
use super::products::render_product_grid;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_LIMIT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured_grid: String,
    pub categories: Vec<String>,
    pub session_id: String,
    pub messages: Vec<ChatMessageView>,
}

/// Highest rated products first; ties keep catalog order.
fn featured(products: &[Product]) -> Vec<&Product> {
    let mut ranked: Vec<&Product> = products.iter().collect();
    ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
    ranked.truncate(FEATURED_LIMIT);
    ranked
}

/// Display home page: featured products and the chat panel.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let transcript = load_transcript(&session).await?;

    Ok(HomeTemplate {
        featured_grid: render_product_grid(featured(catalog.products()))?,
        categories: catalog.categories().into_iter().map(String::from).collect(),
        session_id: transcript.session_id().to_string(),
        messages: message_views(&transcript),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serendib_core::{Catalog, ProductId};

    use super::*;

    #[test]
    fn test_featured_picks_top_rated() {
        let catalog = Catalog::builtin().unwrap();
        let picks = featured(catalog.products());

        assert_eq!(picks.len(), FEATURED_LIMIT);
        assert!(picks.iter().zip(picks.iter().skip(1)).all(|(a, b)| a.rating >= b.rating));
        assert!(picks.iter().all(|p| p.id != ProductId::new(8)));
    }
}
