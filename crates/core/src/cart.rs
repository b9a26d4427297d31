//! Cart lines, quantity bounds and derived totals.
//!
//! [`Cart`] is the only place that mutates a line set. It keeps two
//! invariants no matter how it was built or decoded:
//!
//! - at most one line per product id
//! - every quantity lies in `MIN_QUANTITY..=MAX_QUANTITY`
//!
//! Totals are always derived from the lines, never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// Smallest quantity a line can hold. Lines leave the cart by removal only.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line can hold.
pub const MAX_QUANTITY: u32 = 99;

/// Clamp an arbitrary quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    let clamped = quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
    u32::try_from(clamped).unwrap_or(MIN_QUANTITY)
}

/// One product's entry in the cart.
///
/// Title, price and image are snapshots taken when the line was created; the
/// cart never revalidates them against the live feed. The product id is
/// stored under `id` to match carts written by earlier storefront versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: clamp_quantity(i64::from(quantity)),
        }
    }

    /// `price × quantity`, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Unit price in the store currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::store(self.price)
    }
}

/// Aggregates derived from a line set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of quantities, shown in header badges.
    pub item_count: u32,
    /// Sum of `price × quantity`.
    pub subtotal: Decimal,
    /// Always zero; no discount codes exist.
    pub discount: Decimal,
    /// Always zero; shipping is arranged during the handoff.
    pub shipping: Decimal,
    /// `max(0, subtotal - discount + shipping)`.
    pub total: Decimal,
}

/// Compute totals for any line collection. Order of lines does not matter.
///
/// Sums saturate instead of overflowing, so a stored line with an absurd
/// price still yields a cart.
#[must_use]
pub fn compute_totals(lines: &[CartLine]) -> CartTotals {
    let item_count = lines
        .iter()
        .fold(0_u32, |acc, line| acc.saturating_add(line.quantity));
    let subtotal = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total()));
    let discount = Decimal::ZERO;
    let shipping = Decimal::ZERO;
    let total = subtotal
        .saturating_sub(discount)
        .saturating_add(shipping)
        .max(Decimal::ZERO);

    CartTotals {
        item_count,
        subtotal,
        discount,
        shipping,
        total,
    }
}

/// The visitor's cart: an ordered line set keyed by product id.
///
/// Decoding goes through [`Cart::from_lines`], so stored data that breaks the
/// invariants (duplicate ids, out-of-range quantities) is repaired on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from raw lines, merging duplicate ids and clamping
    /// quantities. The first occurrence of an id keeps its snapshot fields.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            match cart.line_mut(line.product_id) {
                Some(existing) => {
                    existing.quantity = clamp_quantity(
                        i64::from(existing.quantity) + i64::from(line.quantity),
                    );
                }
                None => {
                    line.quantity = clamp_quantity(i64::from(line.quantity));
                    cart.lines.push(line);
                }
            }
        }
        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    /// Add `quantity` of a product and return the line's new quantity.
    ///
    /// Increments the existing line when there is one, otherwise appends a
    /// snapshot line. The resulting quantity is clamped to the bounds.
    pub fn add(&mut self, product: &Product, quantity: u32) -> u32 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = clamp_quantity(i64::from(line.quantity) + i64::from(quantity));
            return line.quantity;
        }
        let line = CartLine::snapshot(product, quantity);
        let quantity = line.quantity;
        self.lines.push(line);
        quantity
    }

    /// Shift a line's quantity by `delta`, clamped to the bounds.
    ///
    /// Returns `false` when the product is not in the cart.
    pub fn adjust(&mut self, product_id: ProductId, delta: i64) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        line.quantity = clamp_quantity(i64::from(line.quantity).saturating_add(delta));
        true
    }

    /// Remove a product's line. Returns `false` when it was not present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.lines)
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.totals().item_count
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
