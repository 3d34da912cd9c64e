//! Chain of Responsibility, in both of its usual Rust shapes.
//!
//! * Support escalation: a linked chain, each handler owns its successor and
//!   decides whether to handle or pass along.
//! * Sign-up validation: a flat `Vec<Box<dyn Validator>>` walked in order,
//!   stopping at the first failure.

use crate::catalog::DemoContext;
use crate::creational::builder::is_valid_email;
use crate::error::{PatternError, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: u32,
    pub summary: String,
    pub severity: Severity,
}

pub trait SupportHandler {
    fn name(&self) -> &str;
    fn max_severity(&self) -> Severity;
    fn next(&self) -> Option<&dyn SupportHandler>;

    fn handle(&self, ticket: &Ticket) -> Option<String> {
        if ticket.severity <= self.max_severity() {
            return Some(format!("{} resolved #{} ({})", self.name(), ticket.id, ticket.summary));
        }
        tracing::debug!(handler = self.name(), ticket = ticket.id, "escalating");
        self.next()?.handle(ticket)
    }
}

pub struct SupportLevel {
    name: String,
    max: Severity,
    next: Option<Box<dyn SupportHandler>>,
}

impl SupportLevel {
    pub fn new(name: impl Into<String>, max: Severity) -> Self {
        Self {
            name: name.into(),
            max,
            next: None,
        }
    }

    pub fn then(mut self, next: impl SupportHandler + 'static) -> Self {
        self.next = Some(Box::new(next));
        self
    }
}

impl SupportHandler for SupportLevel {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_severity(&self) -> Severity {
        self.max
    }

    fn next(&self) -> Option<&dyn SupportHandler> {
        self.next.as_deref()
    }
}

/// Front desk -> engineer -> manager. Nobody owns `Critical`.
pub fn support_chain() -> SupportLevel {
    SupportLevel::new("Front desk", Severity::Low).then(
        SupportLevel::new("Engineer", Severity::Medium).then(SupportLevel::new("Manager", Severity::High)),
    )
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub trait Validator {
    fn validate(&self, form: &SignupForm) -> Result<()>;
}

pub struct Required;

impl Validator for Required {
    fn validate(&self, form: &SignupForm) -> Result<()> {
        for (field, value) in [("username", &form.username), ("email", &form.email), ("password", &form.password)] {
            if value.trim().is_empty() {
                return Err(PatternError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

pub struct EmailFormat;

impl Validator for EmailFormat {
    fn validate(&self, form: &SignupForm) -> Result<()> {
        if is_valid_email(&form.email) {
            Ok(())
        } else {
            Err(PatternError::InvalidEmail(form.email.clone()))
        }
    }
}

pub struct PasswordStrength {
    pub min_len: usize,
}

impl Validator for PasswordStrength {
    fn validate(&self, form: &SignupForm) -> Result<()> {
        let pw = &form.password;
        if pw.chars().count() < self.min_len {
            return Err(PatternError::Validation(format!(
                "password must be at least {} characters",
                self.min_len
            )));
        }
        if !pw.chars().any(|c| c.is_ascii_digit()) || !pw.chars().any(|c| c.is_alphabetic()) {
            return Err(PatternError::Validation("password needs letters and digits".into()));
        }
        Ok(())
    }
}

pub struct UniqueUsername {
    pub taken: HashSet<String>,
}

impl Validator for UniqueUsername {
    fn validate(&self, form: &SignupForm) -> Result<()> {
        if self.taken.contains(&form.username.to_lowercase()) {
            return Err(PatternError::Validation(format!("username '{}' is taken", form.username)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ValidationChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn validate(&self, form: &SignupForm) -> Result<()> {
        self.validators.iter().try_for_each(|v| v.validate(form))
    }
}

pub fn signup_chain() -> ValidationChain {
    ValidationChain::new()
        .with(Required)
        .with(EmailFormat)
        .with(PasswordStrength { min_len: 8 })
        .with(UniqueUsername {
            taken: ["admin", "root"].into_iter().map(String::from).collect(),
        })
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Support escalation");
    let chain = support_chain();
    let tickets = [
        (Severity::Low, "password reset"),
        (Severity::Medium, "export job stuck"),
        (Severity::High, "billing double charge"),
        (Severity::Critical, "datacenter on fire"),
    ];
    for (id, (severity, summary)) in tickets.into_iter().enumerate() {
        let ticket = Ticket {
            id: id as u32 + 100,
            summary: summary.into(),
            severity,
        };
        match chain.handle(&ticket) {
            Some(outcome) => println!("{outcome}"),
            None => println!("#{} ({:?}) fell off the end of the chain", ticket.id, ticket.severity),
        }
    }

    ctx.section("Sign-up validation");
    let validator = signup_chain();
    let forms = [
        ("ada", "ada@example.com", "engine42x"),
        ("", "x@example.com", "whatever1"),
        ("bob", "bob[at]example", "hunter22x"),
        ("carol", "carol@example.com", "short1"),
        ("dave", "dave@example.com", "lettersonly"),
        ("Admin", "admin@example.com", "correct4horse"),
    ];
    for (username, email, password) in forms {
        let form = SignupForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };
        match validator.validate(&form) {
            Ok(()) => println!("{username:>6}: accepted"),
            Err(err) => println!("{username:>6}: {err}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(severity: Severity) -> Ticket {
        Ticket {
            id: 1,
            summary: "s".into(),
            severity,
        }
    }

    #[test]
    fn test_each_level_handles_its_severity() {
        let chain = support_chain();
        assert!(chain.handle(&ticket(Severity::Low)).unwrap().starts_with("Front desk"));
        assert!(chain.handle(&ticket(Severity::Medium)).unwrap().starts_with("Engineer"));
        assert!(chain.handle(&ticket(Severity::High)).unwrap().starts_with("Manager"));
    }

    #[test]
    fn test_unhandled_ticket() {
        assert!(support_chain().handle(&ticket(Severity::Critical)).is_none());
    }

    fn form(username: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup_chain().validate(&form("ada", "ada@example.com", "engine42x")).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        // Both the email and the password are bad; the email check runs first.
        let err = signup_chain().validate(&form("x", "bad", "1")).unwrap_err();
        assert!(matches!(err, PatternError::InvalidEmail(_)));
    }

    #[test]
    fn test_individual_rules() {
        let chain = signup_chain();
        assert!(chain.validate(&form("", "a@b.co", "abcdefg1")).is_err());
        assert!(chain.validate(&form("erin", "a@b.co", "abc1")).is_err());
        assert!(chain.validate(&form("erin", "a@b.co", "abcdefgh")).is_err());
        assert!(chain.validate(&form("ROOT", "a@b.co", "abcdefg1")).is_err());
    }

    #[test]
    fn test_empty_chain_accepts_everything() {
        assert!(ValidationChain::new().validate(&SignupForm::default()).is_ok());
    }
}
