//! Catalog commands.

use std::io::Write;

use mosso_core::ProductStyle;

use super::{CliError, Workspace};

/// Print one page of the catalog.
///
/// # Errors
///
/// Returns `CliError::UnknownStyle` for an unrecognized style filter.
pub fn list(
    workspace: &Workspace,
    out: &mut impl Write,
    style: Option<&str>,
    page: usize,
) -> Result<(), CliError> {
    let style = style
        .map(|raw| {
            raw.parse::<ProductStyle>()
                .map_err(|_| CliError::UnknownStyle(raw.to_string()))
        })
        .transpose()?;

    let listing = workspace.catalog.page(style, page);
    for product in &listing.products {
        writeln!(
            out,
            "{:>4}  {:<24} {:>9}  {}",
            product.id.as_i32(),
            product.name,
            product.price.display(),
            product.style
        )?;
    }
    writeln!(
        out,
        "Page {} of {} ({} products)",
        listing.page,
        listing.total_pages.max(1),
        listing.total_products
    )?;
    Ok(())
}
