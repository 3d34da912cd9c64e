//! Registry of every demo plus the sequential runner behind the binaries.

use crate::config::CatalogConfig;
use crate::error::{PatternError, Result};
use crate::{behavioral, creational, functional, structural};
use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Creational,
    Structural,
    Behavioral,
    Functional,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Creational,
        Category::Structural,
        Category::Behavioral,
        Category::Functional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Creational => "creational",
            Category::Structural => "structural",
            Category::Behavioral => "behavioral",
            Category::Functional => "functional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "creational" => Ok(Category::Creational),
            "structural" => Ok(Category::Structural),
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            "functional" => Ok(Category::Functional),
            other => Err(PatternError::UnknownCategory(other.to_string())),
        }
    }
}

/// What a demo gets to see: the configuration and a couple of printing
/// helpers. Nothing else is shared between demos.
pub struct DemoContext {
    pub config: CatalogConfig,
}

impl DemoContext {
    pub fn new(config: CatalogConfig) -> Self {
        colored::control::set_override(config.color);
        Self { config }
    }

    pub fn latency(&self) -> Duration {
        self.config.latency()
    }

    pub fn heading(&self, title: &str) {
        println!("{}", format!("=== {title} ===").bold().cyan());
    }

    pub fn section(&self, title: &str) {
        println!("\n{}", format!("--- {title} ---").yellow());
    }

    /// Current-thread runtime for the handful of async demos.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        Ok(runtime)
    }
}

pub type DemoFn = fn(&DemoContext) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub category: Category,
    pub summary: &'static str,
    pub run: DemoFn,
}

impl fmt::Debug for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demo")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

macro_rules! demo {
    ($name:literal, $category:ident, $summary:literal, $run:path) => {
        Demo {
            name: $name,
            category: Category::$category,
            summary: $summary,
            run: $run,
        }
    };
}

static REGISTRY: &[Demo] = &[
    demo!("singleton", Creational, "One lazily-built instance per process", creational::singleton::demo),
    demo!("factory-method", Creational, "Database drivers chosen from a connection URL", creational::factory_method::demo),
    demo!("abstract-factory", Creational, "Matching storage and queue families", creational::abstract_factory::demo),
    demo!("builder", Creational, "Mutable query builder and typestate user builder", creational::builder::demo),
    demo!("adapter", Structural, "Legacy SOAP and JSON gateways behind one payment trait", structural::adapter::demo),
    demo!("bridge", Structural, "Notifications decoupled from delivery channels", structural::bridge::demo),
    demo!("composite", Structural, "File system tree treated uniformly", structural::composite::demo),
    demo!("decorator", Structural, "Logging, caching and auth layers around a service", structural::decorator::demo),
    demo!("facade", Structural, "One call to place an order across four subsystems", structural::facade::demo),
    demo!("flyweight", Structural, "Shared tree kinds in a large forest", structural::flyweight::demo),
    demo!("proxy", Structural, "Caching, rate-limiting and access proxies for a slow price API", structural::proxy::demo),
    demo!("chain-of-responsibility", Behavioral, "Support escalation and sign-up validation", behavioral::chain::demo),
    demo!("command", Behavioral, "Bank ledger with undo and redo", behavioral::command::demo),
    demo!("iterator", Behavioral, "Pre-order, post-order and level-order tree traversal", behavioral::iterator::demo),
    demo!("mediator", Behavioral, "Chat room routing messages between users", behavioral::mediator::demo),
    demo!("template-method", Behavioral, "CSV, HTML, Markdown and JSON report exporters", behavioral::template_method::demo),
    demo!("visitor", Behavioral, "Evaluate, print and count an expression tree", behavioral::visitor::demo),
    demo!("strategy", Behavioral, "Swappable checkout discounts", behavioral::strategy::demo),
    demo!("maybe", Functional, "Maybe/Option for safe nested lookups", functional::maybe::demo),
    demo!("reader", Functional, "Reader for dependency injection", functional::reader::demo),
    demo!("functional-factory", Functional, "Closure factories and a constructor registry", functional::factory::demo),
    demo!("compose", Functional, "Function composition and higher-order decorators", functional::compose::demo),
    demo!("command-queue", Functional, "Queues of deferred sync and async commands", functional::command_queue::demo),
];

pub fn registry() -> &'static [Demo] {
    REGISTRY
}

pub fn find(name: &str) -> Result<&'static Demo> {
    let wanted = name.trim().to_ascii_lowercase();
    REGISTRY
        .iter()
        .find(|demo| demo.name == wanted)
        .ok_or_else(|| PatternError::UnknownDemo(name.to_string()))
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static Demo> {
    REGISTRY.iter().filter(move |demo| demo.category == category)
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub ran: usize,
    pub failed: Vec<(&'static str, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn run_demo(demo: &Demo, ctx: &DemoContext) -> Result<()> {
    tracing::debug!(demo = demo.name, category = %demo.category, "running demo");
    ctx.heading(&format!("{} ({})", demo.name, demo.category));
    (demo.run)(ctx)
}

/// Runs every demo (or one category) in registry order. A failing demo is
/// recorded and the run moves on.
pub fn run_all(ctx: &DemoContext, filter: Option<Category>) -> RunSummary {
    let mut summary = RunSummary::default();
    for demo in REGISTRY
        .iter()
        .filter(|demo| filter.map_or(true, |c| demo.category == c))
    {
        summary.ran += 1;
        if let Err(err) = run_demo(demo, ctx) {
            tracing::error!(demo = demo.name, error = %err, "demo failed");
            summary.failed.push((demo.name, err.to_string()));
        }
        println!();
    }
    summary
}
