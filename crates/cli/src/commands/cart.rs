//! Local cart management.
//!
//! Operates on the same file layout the storefront uses, so a cart saved
//! here can be inspected or edited from the terminal.
//!
//! ```bash
//! serendib cart add 1 --quantity 2
//! serendib cart set 3 0
//! serendib cart show
//! ```

use std::path::Path;
use std::sync::Arc;

use serendib_core::{CartError, CartStore, Catalog, ProductId, SessionId};
use serendib_storefront::LocalStorage;

/// A cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add { product_id: ProductId, delta: i64 },
    Set { product_id: ProductId, quantity: u32 },
    Remove { product_id: ProductId },
    Clear,
}

/// Apply `action` to the cart stored under `dir` for `key`, then print it.
///
/// # Errors
///
/// Returns the cart error if the operation is rejected or storage fails.
pub fn run(
    catalog: Catalog,
    dir: &Path,
    key: &SessionId,
    action: CartAction,
) -> Result<(), CartError> {
    let mut cart = CartStore::open(Arc::new(catalog), LocalStorage::new(dir, key))?;
    apply(&mut cart, action)?;
    print_cart(&cart);
    Ok(())
}

fn apply(cart: &mut CartStore<LocalStorage>, action: CartAction) -> Result<(), CartError> {
    match action {
        CartAction::Show => {}
        CartAction::Add { product_id, delta } => {
            let quantity = cart.add(product_id, delta)?;
            tracing::debug!(%product_id, delta, quantity, "Added");
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            cart.set_quantity(product_id, quantity)?;
        }
        CartAction::Remove { product_id } => {
            if !cart.remove(product_id)? {
                tracing::info!(%product_id, "Product was not in the cart");
            }
        }
        CartAction::Clear => cart.clear()?,
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartStore<LocalStorage>) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:>4}  {:<44} {:>4} x {:>14} = {:>14}",
            line.product.id.as_u32(),
            line.product.name,
            line.quantity,
            line.product.price.display(),
            line.line_total.display()
        );
    }
    println!("{} item(s), total {}", cart.count(), cart.total());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_persist_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let key = SessionId::parse("local").unwrap();
        let tea = ProductId::new(1);

        run(
            Catalog::builtin().unwrap(),
            dir.path(),
            &key,
            CartAction::Add {
                product_id: tea,
                delta: 2,
            },
        )
        .unwrap();

        let cart = CartStore::open(
            Arc::new(Catalog::builtin().unwrap()),
            LocalStorage::new(dir.path(), &key),
        )
        .unwrap();
        assert_eq!(cart.quantity(tea), 2);
    }

    #[test]
    fn test_unknown_product_fails() {
        let dir = tempfile::tempdir().unwrap();
        let key = SessionId::parse("local").unwrap();

        let err = run(
            Catalog::builtin().unwrap(),
            dir.path(),
            &key,
            CartAction::Set {
                product_id: ProductId::new(77),
                quantity: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CartError::UnknownProduct(_)));
    }
}
