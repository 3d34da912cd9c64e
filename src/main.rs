//! `pattern-catalog`: list and run the design pattern demos.
//!
//! ```bash
//! pattern-catalog list --category functional
//! pattern-catalog run builder visitor
//! pattern-catalog all --no-color
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use pattern_catalog::catalog::{self, Category};
use pattern_catalog::{logging, CatalogConfig, DemoContext};
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Runnable catalogue of design patterns in Rust")]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with runner settings
    #[clap(long, env = "PATTERN_CATALOG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Plain output even on a terminal
    #[clap(long, global = true)]
    no_color: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// List the available demos
    List {
        #[clap(long)]
        category: Option<Category>,
    },

    /// Run the named demos in order
    Run {
        #[clap(required = true)]
        names: Vec<String>,
    },

    /// Run every demo, or every demo in one category
    All {
        #[clap(long)]
        category: Option<Category>,
    },
}

fn list(category: Option<Category>) {
    for group in Category::ALL.into_iter().filter(|c| category.map_or(true, |wanted| wanted == *c)) {
        println!("{}", group.as_str().bold());
        for demo in catalog::by_category(group) {
            println!("  {:<24} {}", demo.name, demo.summary);
        }
    }
}

fn main() -> Result<()> {
    let app = App::parse();
    logging::init_logger(app.global.verbose);

    let mut config = CatalogConfig::load(app.global.config.as_deref()).with_context(|| match &app.global.config {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "invalid configuration in environment".to_string(),
    })?;
    if app.global.no_color {
        config.color = false;
    }
    tracing::debug!(?config, "configuration loaded");
    let ctx = DemoContext::new(config);

    match app.command {
        SubCommands::List { category } => list(category),
        SubCommands::Run { names } => {
            // Resolve everything up front so a typo fails before any output.
            let demos = names
                .iter()
                .map(|name| catalog::find(name))
                .collect::<pattern_catalog::Result<Vec<_>>>()?;
            for demo in demos {
                catalog::run_demo(demo, &ctx).with_context(|| format!("demo '{}' failed", demo.name))?;
                println!();
            }
        }
        SubCommands::All { category } => {
            let summary = catalog::run_all(&ctx, category);
            if !summary.is_success() {
                for (name, err) in &summary.failed {
                    eprintln!("{} {name}: {err}", "failed".red());
                }
                bail!("{} of {} demos failed", summary.failed.len(), summary.ran);
            }
            println!("{}", format!("{} demos ran", summary.ran).green());
        }
    }

    Ok(())
}
