//! Behavioral patterns: Chain of Responsibility, Command, Iterator, Mediator, Template Method, Visitor, Strategy
//!
//! Run with: cargo run --bin p3_behavioral

use anyhow::{bail, Result};
use pattern_catalog::catalog::{self, Category};
use pattern_catalog::{logging, CatalogConfig, DemoContext};

fn main() -> Result<()> {
    logging::init_logger(std::env::var_os("PATTERN_CATALOG_VERBOSE").is_some());
    let ctx = DemoContext::new(CatalogConfig::load(None)?);

    let summary = catalog::run_all(&ctx, Some(Category::Behavioral));
    if !summary.is_success() {
        bail!("{} of {} demos failed: {:?}", summary.failed.len(), summary.ran, summary.failed);
    }
    Ok(())
}
