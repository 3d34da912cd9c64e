//! Factories without factory classes: functions that return closures, and
//! a registry of constructor fns keyed by name.

use crate::catalog::DemoContext;
use crate::error::Result;
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Each call returns the next value; state lives in the closure.
pub fn make_counter(start: i64) -> impl FnMut() -> i64 {
    let mut next = start;
    move || {
        let current = next;
        next += 1;
        current
    }
}

pub fn make_multiplier(k: i64) -> impl Fn(i64) -> i64 {
    move |x| x * k
}

pub fn make_greeter(prefix: &str) -> impl Fn(&str) -> String {
    let prefix = prefix.to_string();
    move |name: &str| format!("{prefix}, {name}!")
}

pub trait Shape {
    fn name(&self) -> &'static str;
    fn area(&self) -> f64;
}

pub struct Circle {
    pub radius: f64,
}

impl Shape for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

pub struct Square {
    pub side: f64,
}

impl Shape for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn area(&self) -> f64 {
        self.side * self.side
    }
}

/// Equilateral.
pub struct Triangle {
    pub side: f64,
}

impl Shape for Triangle {
    fn name(&self) -> &'static str {
        "triangle"
    }

    fn area(&self) -> f64 {
        3f64.sqrt() / 4.0 * self.side * self.side
    }
}

pub type ShapeCtor = fn(f64) -> Box<dyn Shape>;

pub struct ShapeRegistry {
    ctors: BTreeMap<String, ShapeCtor>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        let mut registry = Self { ctors: BTreeMap::new() };
        registry.register("circle", |size| Box::new(Circle { radius: size }));
        registry.register("square", |size| Box::new(Square { side: size }));
        registry
    }
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any constructor already registered under `name`.
    pub fn register(&mut self, name: &str, ctor: ShapeCtor) {
        tracing::debug!(shape = name, "registering constructor");
        self.ctors.insert(name.to_ascii_lowercase(), ctor);
    }

    pub fn create(&self, name: &str, size: f64) -> Option<Box<dyn Shape>> {
        self.ctors.get(&name.to_ascii_lowercase()).map(|ctor| ctor(size))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Closure factories");
    let mut ticket = make_counter(100);
    let issued: Vec<i64> = (0..3).map(|_| ticket()).collect();
    println!("tickets: {issued:?}");

    let double = make_multiplier(2);
    let triple = make_multiplier(3);
    println!("double(21) = {}, triple(7) = {}", double(21), triple(7));

    let greeters = [make_greeter("Hello"), make_greeter("Welcome back")];
    for greet in &greeters {
        println!("{}", greet("Ferris"));
    }

    ctx.section("Shape registry");
    let mut registry = ShapeRegistry::new();
    registry.register("triangle", |size| Box::new(Triangle { side: size }));
    for name in ["circle", "Square", "triangle", "hexagon"] {
        match registry.create(name, 2.0) {
            Some(shape) => println!("{:<8} area {:.3}", shape.name(), shape.area()),
            None => println!("{name:<8} not registered (known: {})", registry.names().collect::<Vec<_>>().join(", ")),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let mut a = make_counter(0);
        let mut b = make_counter(10);
        assert_eq!((a(), a(), a()), (0, 1, 2));
        assert_eq!(b(), 10);
        assert_eq!(a(), 3);
    }

    #[test]
    fn test_multiplier_and_greeter() {
        assert_eq!(make_multiplier(-4)(5), -20);
        assert_eq!(make_greeter("Hi")("Sam"), "Hi, Sam!");
    }

    #[test]
    fn test_registry_create() {
        let registry = ShapeRegistry::new();
        let square = registry.create("SQUARE", 3.0).unwrap();
        assert_eq!(square.name(), "square");
        assert_eq!(square.area(), 9.0);
        assert!((registry.create("circle", 1.0).unwrap().area() - PI).abs() < 1e-12);
        assert!(registry.create("triangle", 1.0).is_none());
    }

    #[test]
    fn test_register_adds_and_replaces() {
        let mut registry = ShapeRegistry::new();
        registry.register("triangle", |size| Box::new(Triangle { side: size }));
        assert!(registry.create("triangle", 2.0).is_some());

        registry.register("square", |size| Box::new(Square { side: size * 2.0 }));
        assert_eq!(registry.create("square", 1.0).unwrap().area(), 4.0);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["circle", "square", "triangle"]);
    }
}
