//! Adapter: two incompatible payment clients behind one trait.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub provider: &'static str,
    pub transaction_id: String,
    pub amount_cents: u64,
    pub currency: String,
}

/// What the checkout code expects.
pub trait PaymentProcessor {
    fn charge(&self, amount_cents: u64, currency: &str) -> Result<Receipt>;
}

/// Third-party SOAP client. Speaks XML strings only and answers in decimal
/// units. Amounts over 10 000.00 are declined.
pub struct LegacySoapClient {
    pub merchant: String,
}

impl LegacySoapClient {
    pub fn send_envelope(&self, envelope: &str) -> String {
        tracing::debug!(merchant = %self.merchant, "SOAP envelope sent");
        let amount: f64 = extract_tag(envelope, "Amount")
            .and_then(|a| a.parse().ok())
            .unwrap_or(0.0);
        let status = if amount > 10_000.0 { "DECLINED" } else { "APPROVED" };
        format!(
            "<soap:Envelope><soap:Body><ChargeResponse><status>{status}</status>\
             <txn>SOAP-{:08}</txn></ChargeResponse></soap:Body></soap:Envelope>",
            (amount * 100.0).round() as u64
        )
    }
}

/// Newer REST-ish gateway. Takes and returns JSON values.
pub struct ModernJsonGateway;

impl ModernJsonGateway {
    pub fn post(&self, body: Value) -> Value {
        let cents = body["amount"].as_u64().unwrap_or(0);
        let currency = body["currency"].as_str().unwrap_or("");
        if currency != "USD" && currency != "EUR" {
            return json!({ "status": "declined", "reason": format!("unsupported currency {currency}") });
        }
        json!({ "status": "succeeded", "id": format!("ch_{cents:06}") })
    }
}

fn extract_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

pub struct SoapPaymentAdapter {
    client: LegacySoapClient,
}

impl SoapPaymentAdapter {
    pub fn new(client: LegacySoapClient) -> Self {
        Self { client }
    }
}

impl PaymentProcessor for SoapPaymentAdapter {
    fn charge(&self, amount_cents: u64, currency: &str) -> Result<Receipt> {
        if amount_cents == 0 {
            return Err(PatternError::PaymentDeclined("amount must be positive".into()));
        }
        let envelope = format!(
            "<Charge><Merchant>{}</Merchant><Amount>{}.{:02}</Amount><Currency>{}</Currency></Charge>",
            self.client.merchant,
            amount_cents / 100,
            amount_cents % 100,
            currency
        );
        let reply = self.client.send_envelope(&envelope);
        match extract_tag(&reply, "status") {
            Some("APPROVED") => Ok(Receipt {
                provider: "soap",
                transaction_id: extract_tag(&reply, "txn").unwrap_or_default().to_string(),
                amount_cents,
                currency: currency.to_string(),
            }),
            Some(status) => Err(PatternError::PaymentDeclined(format!("SOAP status {status}"))),
            None => Err(PatternError::PaymentDeclined("malformed SOAP reply".into())),
        }
    }
}

pub struct JsonPaymentAdapter {
    gateway: ModernJsonGateway,
}

impl JsonPaymentAdapter {
    pub fn new(gateway: ModernJsonGateway) -> Self {
        Self { gateway }
    }
}

impl PaymentProcessor for JsonPaymentAdapter {
    fn charge(&self, amount_cents: u64, currency: &str) -> Result<Receipt> {
        if amount_cents == 0 {
            return Err(PatternError::PaymentDeclined("amount must be positive".into()));
        }
        let reply = self.gateway.post(json!({ "amount": amount_cents, "currency": currency }));
        if reply["status"] == "declined" {
            let reason = reply["reason"].as_str().unwrap_or("declined").to_string();
            return Err(PatternError::PaymentDeclined(reason));
        }
        Ok(Receipt {
            provider: "json",
            transaction_id: reply["id"].as_str().unwrap_or_default().to_string(),
            amount_cents,
            currency: currency.to_string(),
        })
    }
}

fn checkout(processor: &dyn PaymentProcessor, amount_cents: u64, currency: &str) {
    match processor.charge(amount_cents, currency) {
        Ok(receipt) => println!(
            "  charged {}.{:02} {} via {} (txn {})",
            receipt.amount_cents / 100,
            receipt.amount_cents % 100,
            receipt.currency,
            receipt.provider,
            receipt.transaction_id
        ),
        Err(err) => println!("  {err}"),
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let processors: Vec<(&str, Box<dyn PaymentProcessor>)> = vec![
        (
            "Legacy SOAP client",
            Box::new(SoapPaymentAdapter::new(LegacySoapClient {
                merchant: "ACME-01".into(),
            })),
        ),
        ("Modern JSON gateway", Box::new(JsonPaymentAdapter::new(ModernJsonGateway))),
    ];

    for (label, processor) in &processors {
        ctx.section(label);
        checkout(processor.as_ref(), 4_999, "USD");
        checkout(processor.as_ref(), 2_000_000, "USD");
        checkout(processor.as_ref(), 1_250, "JPY");
        checkout(processor.as_ref(), 0, "EUR");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soap() -> SoapPaymentAdapter {
        SoapPaymentAdapter::new(LegacySoapClient { merchant: "M".into() })
    }

    #[test]
    fn test_soap_adapter_translates_amounts() {
        let receipt = soap().charge(4_999, "USD").unwrap();
        assert_eq!(receipt.provider, "soap");
        assert_eq!(receipt.transaction_id, "SOAP-00004999");
    }

    #[test]
    fn test_soap_adapter_declines_large_amounts() {
        let err = soap().charge(1_000_001, "USD").unwrap_err();
        assert!(matches!(err, PatternError::PaymentDeclined(_)));
    }

    #[test]
    fn test_json_adapter() {
        let adapter = JsonPaymentAdapter::new(ModernJsonGateway);
        let receipt = adapter.charge(1_250, "EUR").unwrap();
        assert_eq!(receipt.transaction_id, "ch_001250");

        let err = adapter.charge(1_250, "JPY").unwrap_err();
        assert!(err.to_string().contains("unsupported currency JPY"));
    }

    #[test]
    fn test_zero_amount_rejected_by_both() {
        let adapter = JsonPaymentAdapter::new(ModernJsonGateway);
        assert!(adapter.charge(0, "USD").is_err());
        assert!(soap().charge(0, "USD").is_err());
    }

    #[test]
    fn test_extract_tag() {
        assert_eq!(extract_tag("<a><b>x</b></a>", "b"), Some("x"));
        assert_eq!(extract_tag("<a></a>", "b"), None);
    }
}
