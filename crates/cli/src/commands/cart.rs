//! Cart commands.

use std::io::Write;

use mosso_core::{Cart, ProductId};
use mosso_storefront::catalog::CartSummary;

use super::{CliError, Workspace};

/// Print cart lines, the subtotal and the badge count.
///
/// # Errors
///
/// Returns `CliError::Output` if writing fails.
pub fn show(workspace: &Workspace, out: &mut impl Write) -> Result<(), CliError> {
    let cart = workspace.context.cart().cart();
    print_cart(workspace, out, &cart)
}

/// # Errors
///
/// Returns `CliError` if the product is unknown or storage fails.
pub fn add(
    workspace: &Workspace,
    out: &mut impl Write,
    product_id: ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    workspace.require_product(product_id)?;
    let cart = workspace.context.cart().add_to_cart(product_id, quantity)?;
    print_cart(workspace, out, &cart)
}

/// # Errors
///
/// Returns `CliError` if storage fails.
pub fn remove(
    workspace: &Workspace,
    out: &mut impl Write,
    product_id: ProductId,
) -> Result<(), CliError> {
    let cart = workspace.context.cart().remove_from_cart(product_id)?;
    print_cart(workspace, out, &cart)
}

/// # Errors
///
/// Returns `CliError` if storage fails.
pub fn set(
    workspace: &Workspace,
    out: &mut impl Write,
    product_id: ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    let cart = workspace
        .context
        .cart()
        .update_quantity(product_id, quantity)?;
    print_cart(workspace, out, &cart)
}

/// # Errors
///
/// Returns `CliError` if storage fails.
pub fn clear(workspace: &Workspace, out: &mut impl Write) -> Result<(), CliError> {
    let cart = workspace.context.cart().clear_cart()?;
    print_cart(workspace, out, &cart)
}

fn print_cart(workspace: &Workspace, out: &mut impl Write, cart: &Cart) -> Result<(), CliError> {
    let summary = CartSummary::build(cart, &workspace.catalog);
    if summary.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    for line in &summary.lines {
        writeln!(
            out,
            "{:>4}  {:<24} {:>3} x {:>9} = {:>10}",
            line.product.id.as_i32(),
            line.product.name,
            line.quantity,
            line.product.price.display(),
            line.line_total_display,
        )?;
    }
    writeln!(out, "Subtotal: {}", summary.subtotal_display)?;
    writeln!(out, "Items: {}", summary.count)?;
    Ok(())
}
