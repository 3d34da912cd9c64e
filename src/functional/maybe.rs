//! Maybe: a hand-written optional type next to `Option`, so the chaining
//! methods are visible. Both sides do the same user -> address -> city
//! lookup without a single null check.
//!
//! Laws the tests pin down:
//! - `Maybe::Just(a).and_then(f) == f(a)`
//! - `m.and_then(Maybe::Just) == m`

use crate::catalog::DemoContext;
use crate::error::Result;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maybe<T> {
    Just(T),
    Nothing,
}

impl<T> Maybe<T> {
    pub fn is_just(&self) -> bool {
        matches!(self, Maybe::Just(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Maybe<U> {
        match self {
            Maybe::Just(value) => Maybe::Just(f(value)),
            Maybe::Nothing => Maybe::Nothing,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Maybe<U>>(self, f: F) -> Maybe<U> {
        match self {
            Maybe::Just(value) => f(value),
            Maybe::Nothing => Maybe::Nothing,
        }
    }

    pub fn filter<P: FnOnce(&T) -> bool>(self, predicate: P) -> Maybe<T> {
        match self {
            Maybe::Just(value) if predicate(&value) => Maybe::Just(value),
            _ => Maybe::Nothing,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Maybe::Just(value) => value,
            Maybe::Nothing => default,
        }
    }

    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Just(value) => Maybe::Just(value),
            Maybe::Nothing => Maybe::Nothing,
        }
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Maybe::Just(v),
            None => Maybe::Nothing,
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        match value {
            Maybe::Just(v) => Some(v),
            Maybe::Nothing => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Address {
    pub street: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub address: Option<Address>,
}

#[derive(Debug, Default)]
pub struct Directory {
    users: HashMap<u32, Profile>,
}

impl Directory {
    pub fn sample() -> Self {
        let mut users = HashMap::new();
        users.insert(
            1,
            Profile {
                name: "Ada".into(),
                address: Some(Address {
                    street: "12 Analytical Way".into(),
                    city: Some("London".into()),
                }),
            },
        );
        users.insert(
            2,
            Profile {
                name: "Grace".into(),
                address: Some(Address {
                    street: "1 Harbor Rd".into(),
                    city: None,
                }),
            },
        );
        users.insert(
            3,
            Profile {
                name: "Linus".into(),
                address: None,
            },
        );
        Self { users }
    }

    pub fn find(&self, id: u32) -> Maybe<&Profile> {
        Maybe::from(self.users.get(&id))
    }

    /// Same chain written with `Maybe`.
    pub fn city_of(&self, id: u32) -> Maybe<String> {
        self.find(id)
            .and_then(|user| Maybe::from(user.address.as_ref()))
            .and_then(|address| Maybe::from(address.city.clone()))
            .filter(|city| !city.is_empty())
    }

    /// And with the standard library.
    pub fn city_of_std(&self, id: u32) -> Option<String> {
        let user = self.users.get(&id)?;
        let city = user.address.as_ref()?.city.as_ref()?;
        Some(city.clone()).filter(|c| !c.is_empty())
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let directory = Directory::sample();

    ctx.section("Maybe");
    for id in 1..=4 {
        let name = directory.find(id).map(|u| u.name.clone()).unwrap_or("<no user>".into());
        let city = directory.city_of(id).unwrap_or("unknown".into());
        println!("user {id} ({name}): {city}");
    }

    ctx.section("Option");
    for id in 1..=4 {
        let city = directory.city_of_std(id).unwrap_or_else(|| "unknown".into());
        println!("user {id}: {city}");
    }

    ctx.section("Converting");
    let parsed = Maybe::from("42".parse::<i32>().ok());
    let back: Option<i32> = parsed.map(|n| n * 2).into();
    println!("\"42\" -> {parsed:?} -> doubled back into {back:?}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half(n: i32) -> Maybe<i32> {
        if n % 2 == 0 {
            Maybe::Just(n / 2)
        } else {
            Maybe::Nothing
        }
    }

    #[test]
    fn test_monad_laws() {
        assert_eq!(Maybe::Just(8).and_then(half), half(8));
        assert_eq!(Maybe::Just(3).and_then(Maybe::Just), Maybe::Just(3));
        assert_eq!(Maybe::<i32>::Nothing.and_then(Maybe::Just), Maybe::Nothing);
        assert_eq!(
            Maybe::Just(8).and_then(half).and_then(half),
            Maybe::Just(8).and_then(|x| half(x).and_then(half))
        );
    }

    #[test]
    fn test_map_filter_unwrap() {
        assert_eq!(Maybe::Just(2).map(|x| x + 1), Maybe::Just(3));
        assert_eq!(Maybe::Just(2).filter(|x| *x > 5), Maybe::Nothing);
        assert_eq!(Maybe::Nothing.unwrap_or(7), 7);
        assert!(Maybe::Just(()).is_just());
        assert!(!Maybe::<()>::Nothing.is_just());
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Maybe::from(Some(1)), Maybe::Just(1));
        assert_eq!(Maybe::<i32>::from(None), Maybe::Nothing);
        let back: Option<&str> = Maybe::Just("x").into();
        assert_eq!(back, Some("x"));
    }

    #[test]
    fn test_lookup_paths_agree() {
        let directory = Directory::sample();
        for id in 0..5 {
            let via_maybe: Option<String> = directory.city_of(id).into();
            assert_eq!(via_maybe, directory.city_of_std(id), "user {id}");
        }
        assert_eq!(directory.city_of(1), Maybe::Just("London".to_string()));
        assert_eq!(directory.city_of(2), Maybe::Nothing);
        assert_eq!(directory.city_of(3), Maybe::Nothing);
    }
}
