//! Products as served by the read-only product feed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Image values starting with this prefix name a CSS gradient placeholder
/// rather than a photo URL.
pub const GRADIENT_IMAGE_PREFIX: &str = "gradient";

/// A purchasable item from the catalog.
///
/// Field names follow the feed's camelCase JSON. `price` and
/// `original_price` travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    /// Pre-discount price, shown struck through when higher than `price`.
    #[serde(default)]
    pub original_price: Option<Decimal>,
    /// Photo URL or a gradient placeholder tag.
    pub image: String,
    pub category: String,
    /// Merchandising label such as `Yeni` or `Sinirli Stok`.
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Informational only; nothing in the storefront decrements it.
    #[serde(default)]
    pub stock: Option<i32>,
}

impl Product {
    /// Price in the store currency.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::store(self.price)
    }

    /// Whether `image` is a real photo URL.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        !self.image.is_empty() && !self.image.starts_with(GRADIENT_IMAGE_PREFIX)
    }

    /// Whole-percent saving against `original_price`, if there is one.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= self.price || original.is_zero() {
            return None;
        }
        let percent = original
            .checked_sub(self.price)?
            .checked_div(original)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round();
        u32::try_from(percent.mantissa()).ok().filter(|p| *p > 0)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
