//! Functional takes on the classic patterns: optional values as a type,
//! dependency injection through a reader, closures as factories and
//! decorators, and queues of deferred work.

pub mod command_queue;
pub mod compose;
pub mod factory;
pub mod maybe;
pub mod reader;
