//! Facade: `OrderFacade::place_order` hides four subsystems and the order
//! in which they must be driven (reserve, charge, ship, notify) including
//! the compensation when the charge fails.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct Inventory {
    stock: HashMap<String, (u32, u64)>,
}

impl Inventory {
    pub fn with_item(mut self, sku: &str, quantity: u32, unit_price_cents: u64) -> Self {
        self.stock.insert(sku.to_string(), (quantity, unit_price_cents));
        self
    }

    pub fn available(&self, sku: &str) -> u32 {
        self.stock.get(sku).map_or(0, |(qty, _)| *qty)
    }

    /// Takes `quantity` units out of stock and returns the line total.
    pub fn reserve(&mut self, sku: &str, quantity: u32) -> Result<u64> {
        let available = self.available(sku);
        match self.stock.get_mut(sku) {
            Some((qty, price)) if *qty >= quantity => {
                *qty -= quantity;
                Ok(*price * u64::from(quantity))
            }
            _ => Err(PatternError::OutOfStock {
                sku: sku.to_string(),
                requested: quantity,
                available,
            }),
        }
    }

    pub fn release(&mut self, sku: &str, quantity: u32) {
        if let Some((qty, _)) = self.stock.get_mut(sku) {
            *qty += quantity;
        }
    }
}

/// Declines every card ending in 0000.
#[derive(Debug, Default)]
pub struct PaymentGateway {
    pub charges: Vec<(String, u64)>,
}

impl PaymentGateway {
    pub fn charge(&mut self, card: &str, amount_cents: u64) -> Result<String> {
        if card.ends_with("0000") {
            return Err(PatternError::PaymentDeclined(format!(
                "card ending {} was declined",
                &card[card.len().saturating_sub(4)..]
            )));
        }
        let id = format!("pay_{}", self.charges.len() + 1);
        self.charges.push((id.clone(), amount_cents));
        Ok(id)
    }
}

#[derive(Debug, Default)]
pub struct Shipping {
    next_tracking: u32,
}

impl Shipping {
    pub fn schedule(&mut self, order_id: &Uuid) -> String {
        self.next_tracking += 1;
        tracing::debug!(%order_id, "shipment scheduled");
        format!("TRK{:06}", self.next_tracking)
    }
}

#[derive(Debug, Default)]
pub struct Mailer {
    pub outbox: Vec<String>,
}

impl Mailer {
    pub fn send(&mut self, message: String) {
        self.outbox.push(message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub order_id: Uuid,
    pub payment_id: String,
    pub tracking: String,
    pub total_cents: u64,
}

pub struct OrderFacade {
    pub inventory: Inventory,
    pub payments: PaymentGateway,
    pub shipping: Shipping,
    pub mailer: Mailer,
}

impl OrderFacade {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            payments: PaymentGateway::default(),
            shipping: Shipping::default(),
            mailer: Mailer::default(),
        }
    }

    pub fn place_order(&mut self, sku: &str, quantity: u32, card: &str) -> Result<Confirmation> {
        let total_cents = self.inventory.reserve(sku, quantity)?;

        let payment_id = match self.payments.charge(card, total_cents) {
            Ok(id) => id,
            Err(err) => {
                self.inventory.release(sku, quantity);
                return Err(err);
            }
        };

        let order_id = Uuid::new_v4();
        let tracking = self.shipping.schedule(&order_id);
        self.mailer.send(format!(
            "Order {order_id}: {quantity} x {sku}, tracking {tracking}"
        ));

        Ok(Confirmation {
            order_id,
            payment_id,
            tracking,
            total_cents,
        })
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let inventory = Inventory::default()
        .with_item("KB-01", 5, 8_900)
        .with_item("MS-02", 1, 2_500);
    let mut shop = OrderFacade::new(inventory);

    ctx.section("One call per order");
    let attempts = [
        ("KB-01", 2, "4242424242424242"),
        ("MS-02", 3, "4242424242424242"),
        ("KB-01", 1, "4000000000000000"),
        ("MS-02", 1, "5555555555554444"),
    ];
    for (sku, qty, card) in attempts {
        match shop.place_order(sku, qty, card) {
            Ok(c) => println!(
                "{qty} x {sku}: ok, total {}.{:02}, {} / {}",
                c.total_cents / 100,
                c.total_cents % 100,
                c.payment_id,
                c.tracking
            ),
            Err(err) => println!("{qty} x {sku}: {err}"),
        }
    }

    ctx.section("Subsystem state afterwards");
    println!("KB-01 left: {}", shop.inventory.available("KB-01"));
    println!("MS-02 left: {}", shop.inventory.available("MS-02"));
    println!("Charges: {}", shop.payments.charges.len());
    for mail in &shop.mailer.outbox {
        println!("Mail: {mail}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> OrderFacade {
        OrderFacade::new(Inventory::default().with_item("A", 3, 1_000))
    }

    #[test]
    fn test_successful_order_touches_every_subsystem() {
        let mut shop = shop();
        let confirmation = shop.place_order("A", 2, "4111111111111111").unwrap();

        assert_eq!(confirmation.total_cents, 2_000);
        assert_eq!(confirmation.tracking, "TRK000001");
        assert_eq!(shop.inventory.available("A"), 1);
        assert_eq!(shop.payments.charges.len(), 1);
        assert_eq!(shop.mailer.outbox.len(), 1);
    }

    #[test]
    fn test_out_of_stock() {
        let mut shop = shop();
        let err = shop.place_order("A", 4, "4111111111111111").unwrap_err();
        assert!(matches!(err, PatternError::OutOfStock { available: 3, .. }));

        let err = shop.place_order("nope", 1, "4111111111111111").unwrap_err();
        assert!(matches!(err, PatternError::OutOfStock { available: 0, .. }));
    }

    #[test]
    fn test_declined_payment_releases_stock() {
        let mut shop = shop();
        let err = shop.place_order("A", 2, "4000000000000000").unwrap_err();
        assert!(matches!(err, PatternError::PaymentDeclined(_)));
        assert_eq!(shop.inventory.available("A"), 3);
        assert!(shop.mailer.outbox.is_empty());
    }

    #[test]
    fn test_order_ids_are_unique() {
        let mut shop = shop();
        let a = shop.place_order("A", 1, "4111111111111111").unwrap();
        let b = shop.place_order("A", 1, "4111111111111111").unwrap();
        assert_ne!(a.order_id, b.order_id);
    }
}
