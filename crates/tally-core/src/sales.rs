//! Order and invoice totals.
//!
//! Line items, a single discount, an optional tax rate, and the payments
//! recorded against an order.

use serde::{Deserialize, Serialize};

/// One line on an order or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product the line refers to.
    pub product_id: String,

    /// Display text.
    #[serde(default)]
    pub description: String,

    /// Price per unit.
    pub unit_price: f64,

    /// Number of units.
    pub quantity: u32,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        description: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            description: description.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// Price times quantity.
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Discount applied to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Discount {
    /// Percentage of the subtotal, clamped to 0..=100.
    Percentage(f64),
    /// Fixed amount.
    Fixed(f64),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Percentage(0.0)
    }
}

impl Discount {
    /// Discount amount for a given subtotal.
    pub fn amount(&self, subtotal: f64) -> f64 {
        match *self {
            Discount::Percentage(p) => subtotal * p.clamp(0.0, 100.0) / 100.0,
            Discount::Fixed(v) => v,
        }
    }
}

/// Computed totals for a set of line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Compute subtotal, discount, tax and total.
    ///
    /// Tax is charged on the discounted subtotal.
    pub fn compute(items: &[LineItem], discount: Discount, tax_rate_percent: f64) -> Self {
        let subtotal: f64 = items.iter().map(LineItem::total).sum();
        let discount = discount.amount(subtotal);
        let tax = (subtotal - discount) * tax_rate_percent / 100.0;
        Self {
            subtotal,
            discount,
            tax,
            total: subtotal - discount + tax,
        }
    }
}

/// A payment recorded against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub method: String,
    pub amount: f64,
}

/// An order being composed: items, discount, tax rate and payments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub discount: Discount,

    #[serde(default)]
    pub tax_rate: f64,

    #[serde(default)]
    pub payments: Vec<Payment>,

    #[serde(skip)]
    next_payment_id: u64,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, merging with an existing line.
    pub fn add_product(&mut self, product_id: &str, description: &str, unit_price: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity += 1;
            return;
        }
        self.items.push(LineItem::new(product_id, description, unit_price));
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Record a payment. Returns its id, or None if the method is blank, the
    /// amount is not positive or the id space is exhausted.
    pub fn add_payment(&mut self, method: &str, amount: f64) -> Option<u64> {
        if method.trim().is_empty() || !is_positive(amount) {
            return None;
        }
        let after_existing = match self.payments.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1)?,
            None => 0,
        };
        let id = after_existing.max(self.next_payment_id);
        self.next_payment_id = id.saturating_add(1);
        self.payments.push(Payment {
            id,
            method: method.to_string(),
            amount,
        });
        Some(id)
    }

    /// Remove a payment by id.
    pub fn remove_payment(&mut self, id: u64) {
        self.payments.retain(|p| p.id != id);
    }

    /// Change the amount of a recorded payment.
    ///
    /// Returns false if no payment has the id or the amount is not positive.
    pub fn update_payment(&mut self, id: u64, amount: f64) -> bool {
        if !is_positive(amount) {
            return false;
        }
        match self.payments.iter_mut().find(|p| p.id == id) {
            Some(payment) => {
                payment.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Totals for the current items, discount and tax rate.
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items, self.discount, self.tax_rate)
    }

    /// Sum of recorded payments.
    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Amount still owed. Negative when overpaid.
    pub fn remaining(&self) -> f64 {
        self.totals().total - self.total_paid()
    }
}

fn is_positive(amount: f64) -> bool {
    !amount.is_nan() && amount > 0.0
}
