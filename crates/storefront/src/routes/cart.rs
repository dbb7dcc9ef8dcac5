//! Cart route handlers.
//!
//! Cart keys are stored in the session; the cart itself is a JSON blob under
//! the data directory. Form posts redirect back to the cart page, and
//! `GET /api/cart` returns the same data as JSON.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use serendib_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::services::{CartService, CartSummary, cart_key};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: u32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&CartSummary> for CartView {
    fn from(cart: &CartSummary) -> Self {
        Self {
            items: cart
                .entries
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.as_u32(),
                    name: line.name.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity,
                    price: line.unit_price.display(),
                    line_price: line.line_total.display(),
                })
                .collect(),
            total: cart.total.display(),
            item_count: cart.count,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: u32,
    /// Signed change in quantity; defaults to 1.
    pub quantity: Option<i64>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: u32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let key = cart_key(&session).await?;
    let cart = CartService::new(&state).view(key).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add an item, or change its quantity by a signed delta.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let key = cart_key(&session).await?;
    let delta = form.quantity.unwrap_or(1);
    let cart = CartService::new(&state)
        .add(key, ProductId::new(form.product_id), delta)
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", form.product_id.to_string()),
            ("delta", delta.to_string()),
        ],
    );
    tracing::info!(product_id = form.product_id, delta, count = cart.count, "Cart updated");

    Ok(Redirect::to("/cart"))
}

/// Set an item's quantity; zero removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let key = cart_key(&session).await?;
    CartService::new(&state)
        .set_quantity(key, ProductId::new(form.product_id), form.quantity)
        .await?;

    Ok(Redirect::to("/cart"))
}

/// Remove an item.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    let key = cart_key(&session).await?;
    CartService::new(&state)
        .remove(key, ProductId::new(form.product_id))
        .await?;

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let key = cart_key(&session).await?;
    CartService::new(&state).clear(key).await?;

    Ok(Redirect::to("/cart"))
}

/// Get cart count badge fragment.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let key = cart_key(&session).await?;
    let cart = CartService::new(&state).view(key).await?;

    Ok(CartCountTemplate { count: cart.count })
}

/// Cart contents as JSON.
#[instrument(skip(state, session))]
pub async fn summary(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let key = cart_key(&session).await?;
    let cart = CartService::new(&state).view(key).await?;

    Ok(Json(cart))
}
