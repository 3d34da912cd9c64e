//! Strategy: `Checkout` delegates discount rules to a swappable object.
//! Closures are strategies too (`FnDiscount`).

use crate::catalog::DemoContext;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub sku: String,
    pub unit_cents: u64,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(sku: &str, unit_cents: u64, quantity: u32) -> Self {
        Self {
            sku: sku.to_string(),
            unit_cents,
            quantity,
        }
    }

    pub fn subtotal(&self) -> u64 {
        self.unit_cents * u64::from(self.quantity)
    }
}

pub trait DiscountStrategy {
    fn name(&self) -> String;
    /// Discount in cents for the whole cart.
    fn discount(&self, items: &[LineItem]) -> u64;
}

pub struct NoDiscount;

impl DiscountStrategy for NoDiscount {
    fn name(&self) -> String {
        "no discount".into()
    }

    fn discount(&self, _items: &[LineItem]) -> u64 {
        0
    }
}

pub struct Percentage(pub u8);

impl DiscountStrategy for Percentage {
    fn name(&self) -> String {
        format!("{}% off", self.0)
    }

    fn discount(&self, items: &[LineItem]) -> u64 {
        let subtotal: u64 = items.iter().map(LineItem::subtotal).sum();
        subtotal * u64::from(self.0.min(100)) / 100
    }
}

pub struct FixedAmount(pub u64);

impl DiscountStrategy for FixedAmount {
    fn name(&self) -> String {
        format!("{}.{:02} off", self.0 / 100, self.0 % 100)
    }

    fn discount(&self, _items: &[LineItem]) -> u64 {
        self.0
    }
}

/// Buy `buy`, get `free` of the same SKU free.
pub struct BuyXGetY {
    pub buy: u32,
    pub free: u32,
}

impl DiscountStrategy for BuyXGetY {
    fn name(&self) -> String {
        format!("buy {} get {} free", self.buy, self.free)
    }

    fn discount(&self, items: &[LineItem]) -> u64 {
        let group = self.buy + self.free;
        if group == 0 {
            return 0;
        }
        items
            .iter()
            .map(|item| u64::from(item.quantity / group * self.free) * item.unit_cents)
            .sum()
    }
}

pub struct FnDiscount<F> {
    label: String,
    rule: F,
}

impl<F: Fn(&[LineItem]) -> u64> FnDiscount<F> {
    pub fn new(label: impl Into<String>, rule: F) -> Self {
        Self {
            label: label.into(),
            rule,
        }
    }
}

impl<F: Fn(&[LineItem]) -> u64> DiscountStrategy for FnDiscount<F> {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn discount(&self, items: &[LineItem]) -> u64 {
        (self.rule)(items)
    }
}

pub struct Checkout {
    items: Vec<LineItem>,
    strategy: Box<dyn DiscountStrategy>,
}

impl Checkout {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            items,
            strategy: Box::new(NoDiscount),
        }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn DiscountStrategy>) {
        self.strategy = strategy;
    }

    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Never negative, whatever the strategy claims.
    pub fn total(&self) -> u64 {
        self.subtotal().saturating_sub(self.strategy.discount(&self.items))
    }

    pub fn strategy_name(&self) -> String {
        self.strategy.name()
    }
}

fn cents(amount: u64) -> String {
    format!("{}.{:02}", amount / 100, amount % 100)
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let mut checkout = Checkout::new(vec![
        LineItem::new("coffee", 450, 3),
        LineItem::new("bagel", 300, 2),
        LineItem::new("juice", 525, 1),
    ]);

    ctx.section("Same cart, different strategies");
    let strategies: Vec<Box<dyn DiscountStrategy>> = vec![
        Box::new(NoDiscount),
        Box::new(Percentage(10)),
        Box::new(FixedAmount(500)),
        Box::new(BuyXGetY { buy: 2, free: 1 }),
        Box::new(FixedAmount(10_000)),
        Box::new(FnDiscount::new("happy hour: drinks half price", |items| {
            items
                .iter()
                .filter(|i| matches!(i.sku.as_str(), "coffee" | "juice"))
                .map(|i| i.subtotal() / 2)
                .sum()
        })),
    ];

    println!("subtotal: {}", cents(checkout.subtotal()));
    for strategy in strategies {
        checkout.set_strategy(strategy);
        println!("{:<32} total {}", checkout.strategy_name(), cents(checkout.total()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Vec<LineItem> {
        vec![LineItem::new("a", 1_000, 3), LineItem::new("b", 500, 1)]
    }

    #[test]
    fn test_strategies() {
        let items = cart();
        assert_eq!(NoDiscount.discount(&items), 0);
        assert_eq!(Percentage(10).discount(&items), 350);
        assert_eq!(Percentage(250).discount(&items), 3_500);
        assert_eq!(BuyXGetY { buy: 2, free: 1 }.discount(&items), 1_000);
        assert_eq!(BuyXGetY { buy: 0, free: 0 }.discount(&items), 0);
    }

    #[test]
    fn test_swap_at_runtime() {
        let mut checkout = Checkout::new(cart());
        assert_eq!(checkout.total(), 3_500);
        checkout.set_strategy(Box::new(FixedAmount(500)));
        assert_eq!(checkout.total(), 3_000);
    }

    #[test]
    fn test_total_never_negative() {
        let mut checkout = Checkout::new(cart());
        checkout.set_strategy(Box::new(FixedAmount(1_000_000)));
        assert_eq!(checkout.total(), 0);
    }

    #[test]
    fn test_closure_strategy() {
        let mut checkout = Checkout::new(cart());
        checkout.set_strategy(Box::new(FnDiscount::new("flat 1", |_| 1)));
        assert_eq!(checkout.total(), 3_499);
        assert_eq!(checkout.strategy_name(), "flat 1");
    }
}
