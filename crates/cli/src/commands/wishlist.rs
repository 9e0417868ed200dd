//! Wishlist commands.

use std::io::Write;

use mosso_core::ProductId;
use mosso_storefront::catalog::WishlistSummary;

use super::{CliError, Workspace};

/// # Errors
///
/// Returns `CliError::Output` if writing fails.
pub fn show(workspace: &Workspace, out: &mut impl Write) -> Result<(), CliError> {
    let wishlist = workspace.context.wishlist().wishlist();
    let summary = WishlistSummary::build(&wishlist, &workspace.catalog);

    if summary.products.is_empty() {
        writeln!(out, "Your wishlist is empty.")?;
        return Ok(());
    }
    for product in &summary.products {
        writeln!(
            out,
            "{:>4}  {:<24} {:>9}  {}",
            product.id.as_i32(),
            product.name,
            product.price.display(),
            product.style
        )?;
    }
    Ok(())
}

/// # Errors
///
/// Returns `CliError` if the product is unknown or storage fails.
pub fn toggle(
    workspace: &Workspace,
    out: &mut impl Write,
    product_id: ProductId,
) -> Result<(), CliError> {
    workspace.require_product(product_id)?;
    let added = workspace.context.wishlist().toggle(product_id)?;
    if added {
        writeln!(out, "Added product {product_id} to the wishlist.")?;
    } else {
        writeln!(out, "Removed product {product_id} from the wishlist.")?;
    }
    Ok(())
}
