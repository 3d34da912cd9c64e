//! Creational patterns: Singleton, Factory Method, Abstract Factory, Builder
//!
//! Run with: cargo run --bin p1_creational

use anyhow::{bail, Result};
use pattern_catalog::catalog::{self, Category};
use pattern_catalog::{logging, CatalogConfig, DemoContext};

fn main() -> Result<()> {
    logging::init_logger(std::env::var_os("PATTERN_CATALOG_VERBOSE").is_some());
    let ctx = DemoContext::new(CatalogConfig::load(None)?);

    let summary = catalog::run_all(&ctx, Some(Category::Creational));
    if !summary.is_success() {
        bail!("{} of {} demos failed: {:?}", summary.failed.len(), summary.ran, summary.failed);
    }
    Ok(())
}
