//! # Design Patterns Catalogue
//!
//! Runnable, self-contained demonstrations of the classic object-oriented
//! patterns and their functional counterparts, written the way Rust
//! expresses them.
//!
//! ## Creational
//! - Singleton (`OnceLock`, `lazy_static!` pool)
//! - Factory Method (database drivers from a connection URL)
//! - Abstract Factory (storage + queue families)
//! - Builder (mutable query builder, typestate user builder)
//!
//! ## Structural
//! - Adapter, Bridge, Composite, Decorator, Facade, Flyweight, Proxy
//!
//! ## Behavioral
//! - Chain of Responsibility, Command, Iterator, Mediator,
//!   Template Method, Visitor, Strategy
//!
//! ## Functional
//! - Maybe, Reader, functional factories, composition decorators,
//!   command queues
//!
//! Run any demo with:
//! ```bash
//! cargo run -- run iterator
//! cargo run -- all --category structural
//! cargo run --bin p3_behavioral
//! ```

pub mod behavioral;
pub mod catalog;
pub mod config;
pub mod creational;
pub mod error;
pub mod functional;
pub mod logging;
pub mod structural;

pub use catalog::{Category, Demo, DemoContext};
pub use config::CatalogConfig;
pub use error::{PatternError, Result};
