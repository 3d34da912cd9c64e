//! Visitor: operations over an expression tree live in visitors, not in
//! the node types. Adding "count the nodes" touches no `Expr` code.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

pub fn num(n: f64) -> Expr {
    Expr::Num(n)
}

pub fn var(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(Box::new(a), Box::new(b))
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(Box::new(a), Box::new(b))
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(Box::new(a))
}

pub trait Visitor {
    type Output;

    fn visit_num(&mut self, n: f64) -> Self::Output;
    fn visit_var(&mut self, name: &str) -> Self::Output;
    fn visit_add(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_mul(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_neg(&mut self, a: &Expr) -> Self::Output;
}

impl Expr {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Num(n) => visitor.visit_num(*n),
            Expr::Var(name) => visitor.visit_var(name),
            Expr::Add(a, b) => visitor.visit_add(a, b),
            Expr::Mul(a, b) => visitor.visit_mul(a, b),
            Expr::Neg(a) => visitor.visit_neg(a),
        }
    }
}

pub struct Evaluator<'a> {
    pub env: &'a HashMap<String, f64>,
}

impl Visitor for Evaluator<'_> {
    type Output = Result<f64>;

    fn visit_num(&mut self, n: f64) -> Result<f64> {
        Ok(n)
    }

    fn visit_var(&mut self, name: &str) -> Result<f64> {
        self.env
            .get(name)
            .copied()
            .ok_or_else(|| PatternError::UnknownVariable(name.to_string()))
    }

    fn visit_add(&mut self, a: &Expr, b: &Expr) -> Result<f64> {
        Ok(a.accept(self)? + b.accept(self)?)
    }

    fn visit_mul(&mut self, a: &Expr, b: &Expr) -> Result<f64> {
        Ok(a.accept(self)? * b.accept(self)?)
    }

    fn visit_neg(&mut self, a: &Expr) -> Result<f64> {
        Ok(-a.accept(self)?)
    }
}

/// Fully parenthesised infix.
pub struct Printer;

impl Visitor for Printer {
    type Output = String;

    fn visit_num(&mut self, n: f64) -> String {
        n.to_string()
    }

    fn visit_var(&mut self, name: &str) -> String {
        name.to_string()
    }

    fn visit_add(&mut self, a: &Expr, b: &Expr) -> String {
        format!("({} + {})", a.accept(self), b.accept(self))
    }

    fn visit_mul(&mut self, a: &Expr, b: &Expr) -> String {
        format!("({} * {})", a.accept(self), b.accept(self))
    }

    fn visit_neg(&mut self, a: &Expr) -> String {
        let inner = a.accept(self);
        if inner.starts_with('-') {
            format!("-({inner})")
        } else {
            format!("-{inner}")
        }
    }
}

/// Stateful visitor: accumulates instead of returning.
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub nodes: usize,
    pub variables: Vec<String>,
}

impl Visitor for NodeCounter {
    type Output = ();

    fn visit_num(&mut self, _n: f64) {
        self.nodes += 1;
    }

    fn visit_var(&mut self, name: &str) {
        self.nodes += 1;
        if !self.variables.iter().any(|v| v == name) {
            self.variables.push(name.to_string());
        }
    }

    fn visit_add(&mut self, a: &Expr, b: &Expr) {
        self.nodes += 1;
        a.accept(self);
        b.accept(self);
    }

    fn visit_mul(&mut self, a: &Expr, b: &Expr) {
        self.nodes += 1;
        a.accept(self);
        b.accept(self);
    }

    fn visit_neg(&mut self, a: &Expr) {
        self.nodes += 1;
        a.accept(self);
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    // (x + 2) * -(y * 3)
    let expr = mul(add(var("x"), num(2.0)), neg(mul(var("y"), num(3.0))));

    ctx.section("Printer");
    println!("{}", expr.accept(&mut Printer));

    ctx.section("Evaluator");
    let env: HashMap<String, f64> = [("x".to_string(), 4.0), ("y".to_string(), 0.5)].into_iter().collect();
    println!("with x=4, y=0.5: {}", expr.accept(&mut Evaluator { env: &env })?);

    let partial: HashMap<String, f64> = [("x".to_string(), 1.0)].into_iter().collect();
    match expr.accept(&mut Evaluator { env: &partial }) {
        Ok(v) => println!("unexpected value {v}"),
        Err(err) => println!("with only x: {err}"),
    }

    ctx.section("NodeCounter");
    let mut counter = NodeCounter::default();
    expr.accept(&mut counter);
    println!("{} nodes, variables {:?}", counter.nodes, counter.variables);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expr {
        mul(add(var("x"), num(2.0)), neg(mul(var("y"), num(3.0))))
    }

    #[test]
    fn test_evaluate() {
        let env: HashMap<String, f64> = [("x".into(), 4.0), ("y".into(), 0.5)].into_iter().collect();
        assert_eq!(sample().accept(&mut Evaluator { env: &env }).unwrap(), -9.0);
    }

    #[test]
    fn test_unknown_variable() {
        let env = HashMap::new();
        let err = sample().accept(&mut Evaluator { env: &env }).unwrap_err();
        assert!(matches!(err, PatternError::UnknownVariable(ref v) if v == "x"));
    }

    #[test]
    fn test_print() {
        assert_eq!(sample().accept(&mut Printer), "((x + 2) * -(y * 3))");
        assert_eq!(num(1.5).accept(&mut Printer), "1.5");
    }

    #[test]
    fn test_print_double_negation() {
        assert_eq!(neg(num(-2.0)).accept(&mut Printer), "-(-2)");
        assert_eq!(neg(neg(num(2.0))).accept(&mut Printer), "-(-2)");
        assert_eq!(neg(num(2.0)).accept(&mut Printer), "-2");
    }

    #[test]
    fn test_count() {
        let mut counter = NodeCounter::default();
        sample().accept(&mut counter);
        assert_eq!(counter.nodes, 8);
        assert_eq!(counter.variables, ["x", "y"]);
    }
}
