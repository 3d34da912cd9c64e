//! Bridge: what is said (`Notification`) varies independently of how it
//! is delivered (`Channel`). Two notifications × three channels without six
//! types.

use crate::catalog::DemoContext;
use crate::error::Result;

pub const SMS_LIMIT: usize = 160;

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub channel: &'static str,
    pub recipient: String,
    pub body: String,
}

pub trait Channel {
    fn name(&self) -> &'static str;
    fn deliver(&self, subject: &str, body: &str) -> Delivery;
}

pub struct EmailChannel {
    pub address: String,
}

impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn deliver(&self, subject: &str, body: &str) -> Delivery {
        Delivery {
            channel: self.name(),
            recipient: self.address.clone(),
            body: format!("Subject: {subject}\n\n{body}"),
        }
    }
}

pub struct SmsChannel {
    pub phone: String,
}

impl Channel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    fn deliver(&self, subject: &str, body: &str) -> Delivery {
        let text = format!("{subject}: {body}");
        let body = if text.chars().count() > SMS_LIMIT {
            let mut cut: String = text.chars().take(SMS_LIMIT - 3).collect();
            cut.push_str("...");
            cut
        } else {
            text
        };
        Delivery {
            channel: self.name(),
            recipient: self.phone.clone(),
            body,
        }
    }
}

pub struct ChatChannel {
    pub room: String,
}

impl Channel for ChatChannel {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn deliver(&self, subject: &str, body: &str) -> Delivery {
        Delivery {
            channel: self.name(),
            recipient: format!("#{}", self.room),
            body: format!("*{subject}*\n> {body}"),
        }
    }
}

/// The abstraction side holds a channel instead of inheriting from one.
pub trait Notification {
    fn channel(&self) -> &dyn Channel;
    fn subject(&self) -> String;
    fn body(&self) -> String;

    fn send(&self) -> Delivery {
        let delivery = self.channel().deliver(&self.subject(), &self.body());
        tracing::debug!(channel = delivery.channel, recipient = %delivery.recipient, "notification sent");
        delivery
    }
}

pub struct Alert {
    pub service: String,
    pub error_rate: f64,
    pub channel: Box<dyn Channel>,
}

impl Notification for Alert {
    fn channel(&self) -> &dyn Channel {
        self.channel.as_ref()
    }

    fn subject(&self) -> String {
        format!("ALERT {}", self.service.to_uppercase())
    }

    fn body(&self) -> String {
        format!("Error rate at {:.1}% for {}", self.error_rate * 100.0, self.service)
    }
}

pub struct Reminder {
    pub title: String,
    pub when: String,
    pub notes: String,
    pub channel: Box<dyn Channel>,
}

impl Notification for Reminder {
    fn channel(&self) -> &dyn Channel {
        self.channel.as_ref()
    }

    fn subject(&self) -> String {
        format!("Reminder: {}", self.title)
    }

    fn body(&self) -> String {
        format!("{} at {}. {}", self.title, self.when, self.notes)
    }
}

fn channels() -> Vec<Box<dyn Channel>> {
    vec![
        Box::new(EmailChannel {
            address: "oncall@example.com".into(),
        }),
        Box::new(SmsChannel {
            phone: "+1-555-0100".into(),
        }),
        Box::new(ChatChannel { room: "ops".into() }),
    ]
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Alert over every channel");
    for channel in channels() {
        let alert = Alert {
            service: "checkout".into(),
            error_rate: 0.072,
            channel,
        };
        let delivery = alert.send();
        println!("[{} -> {}] {}", delivery.channel, delivery.recipient, delivery.body.replace('\n', " | "));
    }

    ctx.section("Long reminder over every channel");
    for channel in channels() {
        let reminder = Reminder {
            title: "Quarterly planning".into(),
            when: "Thursday 10:00".into(),
            notes: "Bring the roadmap draft, the hiring plan, the budget spreadsheet and the list of \
                    incidents from last quarter so we can prioritise reliability work properly."
                .into(),
            channel,
        };
        let delivery = reminder.send();
        println!(
            "[{}] {} chars: {}",
            delivery.channel,
            delivery.body.chars().count(),
            delivery.body.replace('\n', " | ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_notification_with_any_channel() {
        for channel in channels() {
            let name = channel.name();
            let alert = Alert {
                service: "api".into(),
                error_rate: 0.5,
                channel,
            };
            let delivery = alert.send();
            assert_eq!(delivery.channel, name);
            assert!(delivery.body.contains("50.0%"));
        }
    }

    #[test]
    fn test_sms_is_truncated() {
        let reminder = Reminder {
            title: "x".into(),
            when: "now".into(),
            notes: "y".repeat(500),
            channel: Box::new(SmsChannel { phone: "1".into() }),
        };
        let delivery = reminder.send();
        assert_eq!(delivery.body.chars().count(), SMS_LIMIT);
        assert!(delivery.body.ends_with("..."));
    }

    #[test]
    fn test_short_sms_untouched() {
        let sms = SmsChannel { phone: "1".into() };
        assert_eq!(sms.deliver("Hi", "there").body, "Hi: there");
    }

    #[test]
    fn test_chat_format() {
        let chat = ChatChannel { room: "dev".into() };
        let delivery = chat.deliver("Deploy", "done");
        assert_eq!(delivery.recipient, "#dev");
        assert_eq!(delivery.body, "*Deploy*\n> done");
    }
}
