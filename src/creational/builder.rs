//! Builder, twice.
//!
//! `QueryBuilder` is the mutable (`&mut self`) flavour and checks its input
//! when `build()` runs. `UserBuilder` is a typestate builder: `build()` only
//! exists after a valid email has been supplied.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use itertools::Itertools;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    columns: Vec<String>,
    table: Option<String>,
    conditions: Vec<(String, String)>,
    order_by: Option<(String, bool)>,
    limit: Option<usize>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, column: impl Into<String>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn where_eq(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, ascending: bool) -> &mut Self {
        self.order_by = Some((column.into(), ascending));
        self
    }

    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(&self) -> Result<String> {
        let table = self
            .table
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PatternError::Validation("query needs a table (call .from())".into()))?;

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.iter().join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {table}");
        if !self.conditions.is_empty() {
            let clause = self
                .conditions
                .iter()
                .map(|(column, value)| format!("{column} = '{}'", value.replace('\'', "''")))
                .join(" AND ");
            sql.push_str(&format!(" WHERE {clause}"));
        }
        if let Some((column, ascending)) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {column} {}", if *ascending { "ASC" } else { "DESC" }));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(sql)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub roles: Vec<String>,
}

pub struct NoEmail;
/// Holds the validated address, so a built `User` always has one.
pub struct HasEmail(String);

pub struct UserBuilder<State> {
    name: String,
    age: Option<u8>,
    roles: Vec<String>,
    state: State,
}

impl UserBuilder<NoEmail> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            roles: Vec::new(),
            state: NoEmail,
        }
    }

    pub fn email(self, email: impl Into<String>) -> Result<UserBuilder<HasEmail>> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(PatternError::InvalidEmail(email));
        }
        Ok(UserBuilder {
            name: self.name,
            age: self.age,
            roles: self.roles,
            state: HasEmail(email),
        })
    }

    /// Preset for the most common configuration.
    pub fn admin(name: impl Into<String>, email: impl Into<String>) -> Result<UserBuilder<HasEmail>> {
        Self::new(name).role("admin").role("user").email(email)
    }
}

impl<State> UserBuilder<State> {
    pub fn age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

impl UserBuilder<HasEmail> {
    pub fn build(self) -> User {
        User {
            name: self.name,
            email: self.state.0,
            age: self.age,
            roles: if self.roles.is_empty() {
                vec!["user".to_string()]
            } else {
                self.roles
            },
        }
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Mutable query builder");
    let mut query = QueryBuilder::new();
    query
        .select("id")
        .select("name")
        .from("users")
        .where_eq("status", "active")
        .where_eq("last_name", "O'Brien")
        .order_by("name", true)
        .limit(10);
    println!("{}", query.build()?);

    // Reuse: clone and tweak without touching the original.
    let mut count = query.clone();
    count.limit(1);
    println!("{}", count.build()?);

    match QueryBuilder::new().select("id").build() {
        Ok(sql) => println!("Unexpected: {sql}"),
        Err(err) => println!("Missing table: {err}"),
    }

    ctx.section("Typestate user builder");
    let user = UserBuilder::new("Ada").age(36).email("ada@example.com")?.build();
    println!("{user:?}");

    let admin = UserBuilder::admin("Grace", "grace@navy.mil")?.build();
    println!("{admin:?}");

    // UserBuilder::new("NoMail").build(); // does not compile: no build() before email()
    match UserBuilder::new("Bob").email("bob-at-example") {
        Ok(_) => println!("Unexpected: accepted a bad email"),
        Err(err) => println!("Rejected: {err}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_star() {
        let sql = QueryBuilder::new().from("orders").build().unwrap();
        assert_eq!(sql, "SELECT * FROM orders");
    }

    #[test]
    fn test_query_full() {
        let sql = QueryBuilder::new()
            .select("id")
            .select("total")
            .from("orders")
            .where_eq("customer", "O'Hara")
            .order_by("total", false)
            .limit(5)
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, total FROM orders WHERE customer = 'O''Hara' ORDER BY total DESC LIMIT 5"
        );
    }

    #[test]
    fn test_query_requires_table() {
        assert!(matches!(QueryBuilder::new().build(), Err(PatternError::Validation(_))));
        assert!(QueryBuilder::new().from("  ").build().is_err());
    }

    #[test]
    fn test_user_builder_default_role() {
        let user = UserBuilder::new("Ada").email("ada@example.com").unwrap().build();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.roles, vec!["user"]);
        assert_eq!(user.age, None);
    }

    #[test]
    fn test_user_builder_rejects_bad_email() {
        let err = UserBuilder::new("Bob").email("nope").err().unwrap();
        assert!(matches!(err, PatternError::InvalidEmail(ref e) if e == "nope"));
    }

    #[test]
    fn test_admin_preset() {
        let admin = UserBuilder::admin("Grace", "grace@navy.mil").unwrap().age(40).build();
        assert_eq!(admin.roles, vec!["admin", "user"]);
        assert_eq!(admin.age, Some(40));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("missing-domain@"));
        assert!(!is_valid_email("two@@example.com"));
    }
}
