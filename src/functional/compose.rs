//! Decorator and Chain, the functional way: behaviour is added by wrapping
//! one function in another.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;

/// `g` after `f`.
pub fn compose<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |x: A| g(f(x))
}

pub type Step<T> = Box<dyn Fn(T) -> T>;

/// Runs the steps left to right. An empty pipeline is the identity.
pub fn pipeline<T>(steps: Vec<Step<T>>) -> impl Fn(T) -> T {
    move |input: T| steps.iter().fold(input, |acc, step| step(acc))
}

pub fn logged<A, B, F>(name: &str, f: F) -> impl Fn(A) -> B
where
    A: std::fmt::Debug,
    B: std::fmt::Debug,
    F: Fn(A) -> B,
{
    let name = name.to_string();
    move |input: A| {
        let shown = format!("{input:?}");
        let output = f(input);
        tracing::debug!(function = %name, input = %shown, output = ?output, "call");
        println!("  [{name}] {shown} -> {output:?}");
        output
    }
}

/// Caches results by argument. `f` must be pure for this to be sound.
pub struct Memoized<A, R, F> {
    f: F,
    cache: RefCell<HashMap<A, R>>,
    hits: Cell<usize>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Eq + Hash + Clone,
    R: Clone,
    F: Fn(&A) -> R,
{
    pub fn call(&self, arg: A) -> R {
        if let Some(hit) = self.cache.borrow().get(&arg) {
            self.hits.set(self.hits.get() + 1);
            return hit.clone();
        }
        let value = (self.f)(&arg);
        self.cache.borrow_mut().insert(arg, value.clone());
        value
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

pub fn memoize<A, R, F>(f: F) -> Memoized<A, R, F>
where
    A: Eq + Hash + Clone,
    R: Clone,
    F: Fn(&A) -> R,
{
    Memoized {
        f,
        cache: RefCell::new(HashMap::new()),
        hits: Cell::new(0),
    }
}

/// Wraps a fallible operation so each call makes up to `times` attempts
/// and returns the last error if all of them fail.
pub fn retry<T, F>(times: u32, mut f: F) -> impl FnMut() -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let attempts = times.max(1);
    move || {
        let mut attempt = 1;
        loop {
            match f() {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts => return Err(err),
                Err(err) => {
                    tracing::debug!(attempt, max = attempts, error = %err, "retrying");
                    println!("  attempt {attempt}/{attempts} failed: {err}");
                    attempt += 1;
                }
            }
        }
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("compose and pipeline");
    let shout = compose(|s: &str| s.trim().to_string(), |s: String| s.to_uppercase());
    println!("{}", shout("  hello  "));

    let steps: Vec<Step<String>> = vec![
        Box::new(|s: String| s.to_lowercase()),
        Box::new(|s: String| s.split_whitespace().collect::<Vec<_>>().join("-")),
        Box::new(|s: String| s.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect::<String>()),
    ];
    let slugify = pipeline(steps);
    println!("{}", slugify("Design Patterns, in Rust!".to_string()));

    ctx.section("logged");
    let square = logged("square", |x: i64| x * x);
    square(7);
    square(-3);

    ctx.section("memoize");
    let slow_fib = memoize(|n: &u64| {
        let (mut a, mut b) = (0u64, 1u64);
        for _ in 0..*n {
            (a, b) = (b, a.wrapping_add(b));
        }
        a
    });
    for n in [10, 50, 10, 90, 50] {
        println!("fib({n}) = {}", slow_fib.call(n));
    }
    println!("cache hits: {}, entries: {}", slow_fib.hits(), slow_fib.cached());

    ctx.section("retry");
    let mut calls = 0;
    let mut flaky = retry(3, move || {
        calls += 1;
        if calls < 3 {
            Err(PatternError::Validation(format!("transient failure #{calls}")))
        } else {
            Ok(format!("succeeded on call {calls}"))
        }
    });
    println!("{}", flaky()?);

    let mut hopeless = retry(2, || -> Result<()> { Err(PatternError::Validation("service down".into())) });
    if let Err(err) = hopeless() {
        println!("gave up: {err}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_order() {
        let f = compose(|x: i32| x + 1, |x: i32| x * 10);
        assert_eq!(f(1), 20);
    }

    #[test]
    fn test_pipeline() {
        let steps: Vec<Step<i32>> = vec![Box::new(|x| x + 1), Box::new(|x| x * 2), Box::new(|x| x - 3)];
        assert_eq!(pipeline(steps)(4), 7);
        assert_eq!(pipeline(Vec::<Step<i32>>::new())(4), 4);
    }

    #[test]
    fn test_logged_is_transparent() {
        let f = logged("len", |s: &str| s.len());
        assert_eq!(f("four"), 4);
    }

    #[test]
    fn test_memoize_counts_hits() {
        let calls = Cell::new(0);
        let double = memoize(|x: &i32| {
            calls.set(calls.get() + 1);
            x * 2
        });
        assert_eq!(double.call(2), 4);
        assert_eq!(double.call(2), 4);
        assert_eq!(double.call(3), 6);
        assert_eq!(calls.get(), 2);
        assert_eq!(double.hits(), 1);
        assert_eq!(double.cached(), 2);
    }

    #[test]
    fn test_retry_until_success() {
        let mut attempts = 0;
        let mut op = retry(5, || {
            attempts += 1;
            if attempts < 4 {
                Err(PatternError::Validation("nope".into()))
            } else {
                Ok(attempts)
            }
        });
        assert_eq!(op().unwrap(), 4);
    }

    #[test]
    fn test_retry_gives_up() {
        let mut attempts = 0;
        {
            let mut op = retry(3, || -> Result<()> {
                attempts += 1;
                Err(PatternError::Validation(format!("fail {attempts}")))
            });
            let err = op().unwrap_err();
            assert_eq!(err.to_string(), PatternError::Validation("fail 3".into()).to_string());
        }
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_retry_zero_still_tries_once() {
        let mut op = retry(0, || Ok::<_, PatternError>(1));
        assert_eq!(op().unwrap(), 1);
    }
}
