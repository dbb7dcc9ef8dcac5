//! Product route handlers and the product grid renderer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serendib_core::{Product, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Number of related products shown on a detail page.
const RELATED_LIMIT: usize = 4;

/// Product display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub rating: String,
    pub stars: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category.clone(),
            rating: product.rating.to_string(),
            stars: product.rating.star_string(),
        }
    }
}

/// Product grid fragment.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductView>,
}

/// Render products as the grid fragment used on every listing.
///
/// Pure: the output depends only on the products given, in order.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_product_grid<'a, I>(products: I) -> askama::Result<String>
where
    I: IntoIterator<Item = &'a Product>,
{
    ProductGridTemplate {
        products: products.into_iter().map(ProductView::from).collect(),
    }
    .render()
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Category filter link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub name: String,
    pub active: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub grid: String,
    pub categories: Vec<CategoryLink>,
    pub selected: Option<String>,
    pub product_count: usize,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub related_grid: String,
    pub has_related: bool,
}

/// Display product listing page, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let selected = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let products: Vec<&Product> = match &selected {
        Some(category) => catalog.in_category(category),
        None => catalog.products().iter().collect(),
    };

    Ok(ProductsIndexTemplate {
        grid: render_product_grid(products.iter().copied())?,
        categories: catalog
            .categories()
            .into_iter()
            .map(|name| CategoryLink {
                active: selected
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(name)),
                name: name.to_string(),
            })
            .collect(),
        product_count: products.len(),
        selected,
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let product = catalog
        .get(ProductId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

    let related: Vec<&Product> = catalog
        .in_category(&product.category)
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(RELATED_LIMIT)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductView::from(product),
        has_related: !related.is_empty(),
        related_grid: render_product_grid(related)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serendib_core::Catalog;

    use super::*;

    #[test]
    fn test_grid_renders_each_product() {
        let catalog = Catalog::builtin().unwrap();
        let html = render_product_grid(catalog.products()).unwrap();

        assert_eq!(html.matches("class=\"product-card\"").count(), catalog.len());
        assert!(html.contains("LKR 1850.00"));
        assert!(html.contains("href=\"/products/1\""));
    }

    #[test]
    fn test_grid_escapes_names() {
        let json = r#"[{"id": 1, "name": "<b>Tea</b>", "price": {"amount": "1.00", "currency_code": "LKR"},
            "image": "/x.png", "category": "Tea", "rating": 4.0}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let html = render_product_grid(catalog.products()).unwrap();

        assert!(!html.contains("<b>Tea</b>"));
        assert!(html.contains("&#60;b&#62;Tea") || html.contains("&lt;b&gt;Tea"));
    }

    #[test]
    fn test_empty_grid_shows_placeholder() {
        let html = render_product_grid(std::iter::empty()).unwrap();
        assert!(html.contains("No products found"));
        assert!(!html.contains("product-card"));
    }

    #[test]
    fn test_product_view_formats_rating() {
        let catalog = Catalog::builtin().unwrap();
        let scarf = catalog.get(ProductId::new(8)).unwrap();
        let view = ProductView::from(scarf);

        assert_eq!(view.price, "LKR 2750.50");
        assert_eq!(view.rating, "3.9");
        assert_eq!(view.stars, "★★★★☆");
    }
}
