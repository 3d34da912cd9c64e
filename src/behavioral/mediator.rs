//! Mediator: users never talk to each other directly. Every message goes
//! through `ChatRoom`, whose dispatch is a single `match` on the message
//! kind.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Broadcast(String),
    Direct { to: String, text: String },
    /// Sent by the room itself (joins, leaves).
    System(String),
}

#[derive(Debug, Default)]
pub struct Inbox {
    pub messages: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ChatRoom {
    users: BTreeMap<String, Inbox>,
    delivered: usize,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and changes nothing if `name` is already a member.
    pub fn join(&mut self, name: &str) -> bool {
        if self.users.contains_key(name) {
            return false;
        }
        self.route(None, Message::System(format!("{name} joined")));
        self.users.insert(name.to_string(), Inbox::default());
        true
    }

    pub fn leave(&mut self, name: &str) -> Result<()> {
        self.users
            .remove(name)
            .ok_or_else(|| PatternError::UnknownUser(name.to_string()))?;
        self.route(None, Message::System(format!("{name} left")));
        Ok(())
    }

    pub fn send(&mut self, from: &str, message: Message) -> Result<usize> {
        if !self.users.contains_key(from) {
            return Err(PatternError::UnknownUser(from.to_string()));
        }
        if let Message::Direct { to, .. } = &message {
            if !self.users.contains_key(to) {
                return Err(PatternError::UnknownUser(to.clone()));
            }
        }
        Ok(self.route(Some(from), message))
    }

    /// Returns how many inboxes received the message.
    fn route(&mut self, from: Option<&str>, message: Message) -> usize {
        let mut count = 0;
        match message {
            Message::Broadcast(text) => {
                let sender = from.unwrap_or("room");
                for (name, inbox) in self.users.iter_mut().filter(|(name, _)| Some(name.as_str()) != from) {
                    tracing::debug!(from = sender, to = %name, "broadcast");
                    inbox.messages.push(format!("{sender}: {text}"));
                    count += 1;
                }
            }
            Message::Direct { to, text } => {
                if let Some(inbox) = self.users.get_mut(&to) {
                    inbox.messages.push(format!("{} (private): {text}", from.unwrap_or("room")));
                    count = 1;
                }
            }
            Message::System(text) => {
                for inbox in self.users.values_mut() {
                    inbox.messages.push(format!("* {text}"));
                    count += 1;
                }
            }
        }
        self.delivered += count;
        count
    }

    pub fn inbox(&self, name: &str) -> Result<&[String]> {
        self.users
            .get(name)
            .map(|inbox| inbox.messages.as_slice())
            .ok_or_else(|| PatternError::UnknownUser(name.to_string()))
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let mut room = ChatRoom::new();

    ctx.section("Traffic");
    for name in ["alice", "bob", "carol"] {
        room.join(name);
    }
    if !room.join("bob") {
        println!("bob is already in the room");
    }
    room.send("alice", Message::Broadcast("standup in 5".into()))?;
    room.send("bob", Message::Direct {
        to: "carol".into(),
        text: "can you take notes?".into(),
    })?;
    room.leave("alice")?;

    for (from, message) in [
        ("mallory", Message::Broadcast("hi".into())),
        ("bob", Message::Direct { to: "alice".into(), text: "where did you go?".into() }),
    ] {
        if let Err(err) = room.send(from, message) {
            println!("rejected: {err}");
        }
    }

    ctx.section("Inboxes");
    let members: Vec<String> = room.members().map(String::from).collect();
    for name in members {
        println!("{name}:");
        for line in room.inbox(&name)? {
            println!("  {line}");
        }
    }
    println!("messages delivered: {}", room.delivered());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ChatRoom {
        let mut room = ChatRoom::new();
        room.join("a");
        room.join("b");
        room.join("c");
        room
    }

    #[test]
    fn test_broadcast_skips_sender() {
        let mut room = room();
        assert_eq!(room.send("a", Message::Broadcast("hi".into())).unwrap(), 2);
        assert!(room.inbox("a").unwrap().iter().all(|m| !m.contains("a: hi")));
        assert_eq!(room.inbox("b").unwrap().last().unwrap(), "a: hi");
    }

    #[test]
    fn test_direct_reaches_one_user() {
        let mut room = room();
        let delivered = room
            .send("a", Message::Direct { to: "c".into(), text: "psst".into() })
            .unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(room.inbox("c").unwrap().last().unwrap(), "a (private): psst");
        assert!(!room.inbox("b").unwrap().iter().any(|m| m.contains("psst")));
    }

    #[test]
    fn test_unknown_users() {
        let mut room = room();
        assert!(matches!(room.send("z", Message::Broadcast("x".into())), Err(PatternError::UnknownUser(_))));
        assert!(room
            .send("a", Message::Direct { to: "z".into(), text: "x".into() })
            .is_err());
        assert!(room.leave("z").is_err());
    }

    #[test]
    fn test_rejoin_is_a_no_op() {
        let mut room = room();
        room.send("b", Message::Broadcast("hello".into())).unwrap();
        assert!(!room.join("a"));
        assert_eq!(room.inbox("a").unwrap(), ["* b joined", "* c joined", "b: hello"]);
        assert!(!room.inbox("c").unwrap().iter().any(|m| m == "* a joined"));
    }

    #[test]
    fn test_joins_and_leaves_are_announced() {
        let mut room = room();
        // "a" saw b and c join (its own join happened before it was a member)
        assert_eq!(room.inbox("a").unwrap(), ["* b joined", "* c joined"]);
        room.leave("c").unwrap();
        assert_eq!(room.inbox("b").unwrap().last().unwrap(), "* c left");
        assert!(room.inbox("c").is_err());
        assert_eq!(room.members().collect::<Vec<_>>(), ["a", "b"]);
    }
}
