//! Behavioral patterns: how responsibilities and messages move between
//! objects.

pub mod chain;
pub mod command;
pub mod iterator;
pub mod mediator;
pub mod strategy;
pub mod template_method;
pub mod visitor;
