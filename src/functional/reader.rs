//! Reader: computations that need an environment are built first and run
//! later with `run(&env)`. Dependency injection without passing the
//! environment through every call by hand.

use crate::catalog::DemoContext;
use crate::error::Result;

/// A computation from `&E` to `A`.
pub struct Reader<'a, E, A> {
    run: Box<dyn Fn(&E) -> A + 'a>,
}

impl<'a, E: 'a, A: 'a> Reader<'a, E, A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&E) -> A + 'a,
    {
        Self { run: Box::new(f) }
    }

    /// Ignores the environment.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |_| value.clone())
    }

    pub fn map<B: 'a, F>(self, f: F) -> Reader<'a, E, B>
    where
        F: Fn(A) -> B + 'a,
    {
        Reader::new(move |env| f((self.run)(env)))
    }

    /// The second computation sees the same environment as the first.
    pub fn and_then<B: 'a, F>(self, f: F) -> Reader<'a, E, B>
    where
        F: Fn(A) -> Reader<'a, E, B> + 'a,
    {
        Reader::new(move |env| f((self.run)(env)).run(env))
    }

    pub fn run(&self, env: &E) -> A {
        (self.run)(env)
    }
}

impl<'a, E: Clone + 'a> Reader<'a, E, E> {
    /// Hands back (a clone of) the environment itself.
    pub fn ask() -> Self {
        Self::new(|env: &E| env.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Env {
    pub app_name: String,
    pub locale: String,
    pub db_host: String,
    pub db_port: u16,
    pub debug: bool,
}

impl Env {
    pub fn production() -> Self {
        Self {
            app_name: "catalog".into(),
            locale: "en".into(),
            db_host: "db.internal".into(),
            db_port: 5432,
            debug: false,
        }
    }

    pub fn development() -> Self {
        Self {
            locale: "fr".into(),
            db_host: "localhost".into(),
            db_port: 5433,
            debug: true,
            ..Self::production()
        }
    }
}

pub fn greeting<'a>(user: &'a str) -> Reader<'a, Env, String> {
    Reader::new(move |env: &Env| {
        let hello = match env.locale.as_str() {
            "fr" => "Bonjour",
            "es" => "Hola",
            _ => "Hello",
        };
        format!("{hello}, {user}! Welcome to {}.", env.app_name)
    })
}

pub fn connection_string<'a>() -> Reader<'a, Env, String> {
    Reader::<Env, Env>::ask().map(|env| {
        let mut url = format!("postgres://{}:{}/{}", env.db_host, env.db_port, env.app_name);
        if env.debug {
            url.push_str("?log_statements=true");
        }
        url
    })
}

/// Both readers composed into one; still nothing has looked at an `Env`.
pub fn startup_banner<'a>(user: &'a str) -> Reader<'a, Env, String> {
    greeting(user).and_then(|hello| connection_string().map(move |conn| format!("{hello} (db: {conn})")))
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let banner = startup_banner("Ferris");

    for (label, env) in [("production", Env::production()), ("development", Env::development())] {
        ctx.section(label);
        println!("{}", banner.run(&env));
    }

    ctx.section("pure ignores the environment");
    let constant: Reader<Env, u32> = Reader::pure(42);
    println!("{} / {}", constant.run(&Env::production()), constant.run(&Env::development()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_returns_environment() {
        let env = Env::development();
        assert_eq!(Reader::<Env, Env>::ask().run(&env), env);
    }

    #[test]
    fn test_same_reader_different_envs() {
        let reader = greeting("Sam");
        assert_eq!(reader.run(&Env::production()), "Hello, Sam! Welcome to catalog.");
        assert_eq!(reader.run(&Env::development()), "Bonjour, Sam! Welcome to catalog.");
    }

    #[test]
    fn test_connection_string() {
        assert_eq!(connection_string().run(&Env::production()), "postgres://db.internal:5432/catalog");
        assert_eq!(
            connection_string().run(&Env::development()),
            "postgres://localhost:5433/catalog?log_statements=true"
        );
    }

    #[test]
    fn test_and_then_threads_env() {
        let reader = Reader::<i32, i32>::ask().and_then(|x| Reader::new(move |env: &i32| x + env));
        assert_eq!(reader.run(&5), 10);
        assert_eq!(Reader::<i32, i32>::pure(1).map(|x| x * 3).run(&100), 3);
    }

    #[test]
    fn test_banner() {
        let banner = startup_banner("Ferris").run(&Env::production());
        assert!(banner.starts_with("Hello, Ferris!"));
        assert!(banner.ends_with("(db: postgres://db.internal:5432/catalog)"));
    }
}
