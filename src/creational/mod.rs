//! Creational patterns: how instances come into existence.

pub mod abstract_factory;
pub mod builder;
pub mod factory_method;
pub mod singleton;
