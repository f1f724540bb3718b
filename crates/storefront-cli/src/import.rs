use std::path::Path;

use anyhow::Context;

pub(crate) async fn run_import(source: &Path, destination: &Path) -> anyhow::Result<()> {
    let report = storefront_import::import_catalog(source, destination)
        .await
        .with_context(|| {
            format!(
                "importing {} into {}",
                source.display(),
                destination.display()
            )
        })?;

    println!(
        "imported {} products into {}{}",
        report.imported,
        destination.display(),
        if report.truncated {
            " (feed truncated at the catalog cap)"
        } else {
            ""
        }
    );
    Ok(())
}
