//! Customer details, order records and the checkout handoff message.
//!
//! Orders are not processed here. Checkout snapshots the cart into an
//! [`OrderRecord`] and formats it as a message for the merchant's messaging
//! channel; payment happens outside the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Cart, CartLine, CartTotals};
use crate::types::Price;

/// Errors that can occur when validating [`CustomerDetails`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The email is present but malformed.
    #[error("email must look like name@domain")]
    InvalidEmail,
}

/// Contact and delivery details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Province and district.
    #[serde(default)]
    pub city: String,
    pub address: String,
}

impl CustomerDetails {
    /// Check the fields the merchant needs to follow up on an order.
    ///
    /// # Errors
    ///
    /// Returns an error if name, phone or address is blank, or if a non-empty
    /// email has no local part or domain.
    pub fn validate(&self) -> Result<(), CustomerError> {
        if self.full_name.trim().is_empty() {
            return Err(CustomerError::MissingField("full name"));
        }
        if self.phone.trim().is_empty() {
            return Err(CustomerError::MissingField("phone"));
        }
        if self.address.trim().is_empty() {
            return Err(CustomerError::MissingField("address"));
        }

        let email = self.email.trim();
        if !email.is_empty() {
            match email.split_once('@') {
                Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
                _ => return Err(CustomerError::InvalidEmail),
            }
        }

        Ok(())
    }
}

/// A snapshot of the cart at the moment the visitor proceeded to checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
    pub customer: CustomerDetails,
}

impl OrderRecord {
    /// Snapshot a cart into a new order with a random id.
    #[must_use]
    pub fn from_cart(cart: &Cart, customer: CustomerDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            items: cart.lines().to_vec(),
            totals: cart.totals(),
            customer,
        }
    }

    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.totals.item_count
    }

    /// `Title x2, Other x1`.
    #[must_use]
    pub fn item_summary(&self) -> String {
        self.items
            .iter()
            .map(|line| format!("{} x{}", line.title, line.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The message handed to the merchant's messaging channel.
    #[must_use]
    pub fn handoff_message(&self) -> String {
        let customer = &self.customer;
        format!(
            "Merhaba, siparis vermek istiyorum.\n\n\
             Ad Soyad: {}\n\
             Telefon: {}\n\
             E-posta: {}\n\
             Il/Ilce: {}\n\
             Adres: {}\n\n\
             Urunler: {}\n\
             Toplam: {}",
            customer.full_name,
            customer.phone,
            customer.email,
            customer.city,
            customer.address,
            self.item_summary(),
            Price::store(self.totals.total).display(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductId};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn product(id: i32, title: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            price: price.parse().unwrap(),
            original_price: None,
            image: String::new(),
            category: "supplement".to_string(),
            badge: None,
            tags: Vec::new(),
            stock: None,
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            full_name: "Ayse Yilmaz".to_string(),
            phone: "05551112233".to_string(),
            email: "ayse@example.com".to_string(),
            city: "Istanbul/Kadikoy".to_string(),
            address: "Moda Cad. 1".to_string(),
        }
    }

    fn order() -> OrderRecord {
        let mut cart = Cart::new();
        cart.add(&product(1, "Whey Protein Isolate", "899.00"), 3);
        cart.add(&product(2, "Omega 3", "329.00"), 1);
        let created_at = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        OrderRecord::from_cart(&cart, customer(), created_at)
    }

    #[test]
    fn test_validate_accepts_complete_details() {
        assert!(customer().validate().is_ok());
    }

    #[test]
    fn test_validate_allows_empty_email_and_city() {
        let details = CustomerDetails {
            email: String::new(),
            city: String::new(),
            ..customer()
        };
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_validate_required_fields() {
        let details = CustomerDetails {
            full_name: "   ".to_string(),
            ..customer()
        };
        assert_eq!(
            details.validate(),
            Err(CustomerError::MissingField("full name"))
        );

        let details = CustomerDetails {
            phone: String::new(),
            ..customer()
        };
        assert_eq!(details.validate(), Err(CustomerError::MissingField("phone")));

        let details = CustomerDetails {
            address: String::new(),
            ..customer()
        };
        assert_eq!(
            details.validate(),
            Err(CustomerError::MissingField("address"))
        );
    }

    #[test]
    fn test_validate_email_shape() {
        for email in ["no-at-symbol", "@domain.com", "user@"] {
            let details = CustomerDetails {
                email: email.to_string(),
                ..customer()
            };
            assert_eq!(details.validate(), Err(CustomerError::InvalidEmail));
        }
    }

    #[test]
    fn test_order_snapshots_cart() {
        let order = order();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.item_count(), 4);
        assert_eq!(order.totals.total, "3026.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_item_summary() {
        assert_eq!(order().item_summary(), "Whey Protein Isolate x3, Omega 3 x1");
    }

    #[test]
    fn test_handoff_message() {
        let expected = "Merhaba, siparis vermek istiyorum.\n\n\
                        Ad Soyad: Ayse Yilmaz\n\
                        Telefon: 05551112233\n\
                        E-posta: ayse@example.com\n\
                        Il/Ilce: Istanbul/Kadikoy\n\
                        Adres: Moda Cad. 1\n\n\
                        Urunler: Whey Protein Isolate x3, Omega 3 x1\n\
                        Toplam: ₺3.026";
        assert_eq!(order().handoff_message(), expected);
    }

    #[test]
    fn test_order_record_json_shape() {
        let order = order();
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["createdAt"], "2026-01-05T12:00:00Z");
        assert_eq!(value["customer"]["fullName"], "Ayse Yilmaz");
        assert_eq!(value["totals"]["itemCount"], 4);
        assert_eq!(value["items"][0]["id"], 1);

        let decoded: OrderRecord = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, order);
    }
}
