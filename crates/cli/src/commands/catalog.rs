//! Catalog listing.

use serendib_core::Catalog;

/// Print the catalog, optionally limited to one category.
#[allow(clippy::print_stdout)]
pub fn list(catalog: &Catalog, category: Option<&str>) {
    let products = match category {
        Some(category) => catalog.in_category(category),
        None => catalog.products().iter().collect(),
    };

    if products.is_empty() {
        println!("No products found.");
        return;
    }

    for product in products {
        println!(
            "{:>4}  {:<44} {:<12} {:>14}  {} {}",
            product.id.as_u32(),
            product.name,
            product.category,
            product.price.display(),
            product.rating.star_string(),
            product.rating
        );
    }
}
