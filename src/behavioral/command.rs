//! Command: ledger operations as objects that can be executed, undone and
//! redone. `CommandHistory` owns two stacks; executing something new
//! throws the redo stack away.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Account {
    pub owner: String,
    pub balance: i64,
    pub journal: Vec<String>,
}

impl Account {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }
}

pub trait Command {
    fn execute(&mut self, account: &mut Account) -> Result<()>;
    fn undo(&mut self, account: &mut Account);
    fn describe(&self) -> String;
}

pub struct Deposit {
    pub amount: i64,
}

impl Command for Deposit {
    fn execute(&mut self, account: &mut Account) -> Result<()> {
        account.balance += self.amount;
        account.journal.push(format!("+{}", self.amount));
        Ok(())
    }

    fn undo(&mut self, account: &mut Account) {
        account.balance -= self.amount;
        account.journal.push(format!("undo +{}", self.amount));
    }

    fn describe(&self) -> String {
        format!("deposit {}", self.amount)
    }
}

pub struct Withdraw {
    pub amount: i64,
}

impl Command for Withdraw {
    fn execute(&mut self, account: &mut Account) -> Result<()> {
        if account.balance < self.amount {
            return Err(PatternError::InsufficientFunds {
                balance: account.balance,
                requested: self.amount,
            });
        }
        account.balance -= self.amount;
        account.journal.push(format!("-{}", self.amount));
        Ok(())
    }

    fn undo(&mut self, account: &mut Account) {
        account.balance += self.amount;
        account.journal.push(format!("undo -{}", self.amount));
    }

    fn describe(&self) -> String {
        format!("withdraw {}", self.amount)
    }
}

/// Runs its parts in order; if one fails, the ones already applied are
/// rolled back so the macro is all-or-nothing.
pub struct MacroCommand {
    pub label: String,
    pub parts: Vec<Box<dyn Command>>,
}

impl Command for MacroCommand {
    fn execute(&mut self, account: &mut Account) -> Result<()> {
        for i in 0..self.parts.len() {
            if let Err(err) = self.parts[i].execute(account) {
                for done in self.parts[..i].iter_mut().rev() {
                    done.undo(account);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&mut self, account: &mut Account) {
        for part in self.parts.iter_mut().rev() {
            part.undo(account);
        }
    }

    fn describe(&self) -> String {
        format!("{} ({} steps)", self.label, self.parts.len())
    }
}

#[derive(Default)]
pub struct CommandHistory {
    done: Vec<Box<dyn Command>>,
    undone: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failed commands are not recorded.
    pub fn execute(&mut self, mut command: Box<dyn Command>, account: &mut Account) -> Result<()> {
        command.execute(account)?;
        tracing::debug!(command = %command.describe(), balance = account.balance, "executed");
        self.done.push(command);
        self.undone.clear();
        Ok(())
    }

    pub fn undo(&mut self, account: &mut Account) -> Result<String> {
        let mut command = self.done.pop().ok_or(PatternError::NothingToUndo)?;
        command.undo(account);
        let description = command.describe();
        self.undone.push(command);
        Ok(description)
    }

    /// A redo that fails leaves the command on the redo stack.
    pub fn redo(&mut self, account: &mut Account) -> Result<String> {
        let mut command = self.undone.pop().ok_or(PatternError::NothingToRedo)?;
        if let Err(err) = command.execute(account) {
            self.undone.push(command);
            return Err(err);
        }
        let description = command.describe();
        self.done.push(command);
        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let mut account = Account::new("ada");
    let mut history = CommandHistory::new();

    ctx.section("Execute");
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(Deposit { amount: 100 }),
        Box::new(Withdraw { amount: 30 }),
        Box::new(Withdraw { amount: 500 }),
        Box::new(MacroCommand {
            label: "pay rent".into(),
            parts: vec![Box::new(Deposit { amount: 20 }), Box::new(Withdraw { amount: 80 })],
        }),
    ];
    for command in commands {
        let description = command.describe();
        match history.execute(command, &mut account) {
            Ok(()) => println!("{description:<24} balance = {}", account.balance),
            Err(err) => println!("{description:<24} failed: {err}"),
        }
    }

    ctx.section("Undo / redo");
    while history.can_undo() {
        let what = history.undo(&mut account)?;
        println!("undo {what:<19} balance = {}", account.balance);
    }
    if let Err(err) = history.undo(&mut account) {
        println!("undo again: {err}");
    }
    let what = history.redo(&mut account)?;
    println!("redo {what:<19} balance = {}", account.balance);

    history.execute(Box::new(Deposit { amount: 5 }), &mut account)?;
    println!("new command clears redo: can_redo = {}", history.can_redo());
    println!("journal: {}", account.journal.join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_restores_balance() {
        let mut account = Account::new("t");
        let mut history = CommandHistory::new();
        history.execute(Box::new(Deposit { amount: 50 }), &mut account).unwrap();
        history.execute(Box::new(Withdraw { amount: 20 }), &mut account).unwrap();
        assert_eq!(account.balance, 30);

        assert_eq!(history.undo(&mut account).unwrap(), "withdraw 20");
        assert_eq!(account.balance, 50);
        history.undo(&mut account).unwrap();
        assert_eq!(account.balance, 0);
        assert!(matches!(history.undo(&mut account), Err(PatternError::NothingToUndo)));
    }

    #[test]
    fn test_redo_and_redo_cleared() {
        let mut account = Account::new("t");
        let mut history = CommandHistory::new();
        history.execute(Box::new(Deposit { amount: 10 }), &mut account).unwrap();
        history.undo(&mut account).unwrap();
        history.redo(&mut account).unwrap();
        assert_eq!(account.balance, 10);

        history.undo(&mut account).unwrap();
        history.execute(Box::new(Deposit { amount: 1 }), &mut account).unwrap();
        assert!(matches!(history.redo(&mut account), Err(PatternError::NothingToRedo)));
    }

    #[test]
    fn test_failed_redo_keeps_command() {
        let mut account = Account::new("t");
        let mut history = CommandHistory::new();
        history.execute(Box::new(Deposit { amount: 50 }), &mut account).unwrap();
        history.execute(Box::new(Withdraw { amount: 50 }), &mut account).unwrap();
        history.undo(&mut account).unwrap();
        account.balance = 0;

        let err = history.redo(&mut account).unwrap_err();
        assert!(matches!(err, PatternError::InsufficientFunds { balance: 0, requested: 50 }));
        assert!(history.can_redo());

        account.balance = 50;
        assert_eq!(history.redo(&mut account).unwrap(), "withdraw 50");
        assert_eq!(account.balance, 0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_failed_command_not_recorded() {
        let mut account = Account::new("t");
        let mut history = CommandHistory::new();
        let err = history
            .execute(Box::new(Withdraw { amount: 1 }), &mut account)
            .unwrap_err();
        assert!(matches!(err, PatternError::InsufficientFunds { balance: 0, requested: 1 }));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_macro_is_all_or_nothing() {
        let mut account = Account::new("t");
        let mut failing = MacroCommand {
            label: "m".into(),
            parts: vec![Box::new(Deposit { amount: 10 }), Box::new(Withdraw { amount: 50 })],
        };
        assert!(failing.execute(&mut account).is_err());
        assert_eq!(account.balance, 0);

        let mut ok = MacroCommand {
            label: "m".into(),
            parts: vec![Box::new(Deposit { amount: 60 }), Box::new(Withdraw { amount: 50 })],
        };
        ok.execute(&mut account).unwrap();
        assert_eq!(account.balance, 10);
        ok.undo(&mut account);
        assert_eq!(account.balance, 0);
    }
}
