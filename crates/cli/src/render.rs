//! Plain-text rendering of catalog, cart and order views.

use std::fmt::Write;

use naturprime_core::{CartTotals, CatalogView, OrderRecord, Price, Product};
use naturprime_storefront::{CartSnapshot, Handoff};

/// One catalog row: id, title, price, struck price and badge.
pub fn product_row(product: &Product) -> String {
    let mut row = format!("#{:<4} {:<36} {:>8}", product.id, product.title, product.price());
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent()) {
        let _ = write!(row, "  (was {}, -{percent}%)", Price::store(original));
    }
    if let Some(badge) = &product.badge {
        let _ = write!(row, "  [{badge}]");
    }
    row
}

pub fn catalog(view: &CatalogView<'_>) -> String {
    match view {
        CatalogView::Loading => "Loading products...\n".to_string(),
        CatalogView::Ready(products) if products.is_empty() => {
            "No products match your filters.\n".to_string()
        }
        CatalogView::Ready(products) => {
            let mut out = String::new();
            for product in products {
                let _ = writeln!(out, "{}", product_row(product));
            }
            let noun = if products.len() == 1 { "product" } else { "products" };
            let _ = writeln!(out, "\n{} {noun}", products.len());
            out
        }
    }
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.title, product.id);
    let _ = writeln!(out, "Price:    {}", product.price());
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent()) {
        let _ = writeln!(out, "Was:      {} (-{percent}%)", Price::store(original));
    }
    let _ = writeln!(out, "Category: {}", product.category);
    if let Some(badge) = &product.badge {
        let _ = writeln!(out, "Badge:    {badge}");
    }
    if !product.tags.is_empty() {
        let _ = writeln!(out, "Tags:     {}", product.tags.join(", "));
    }
    if let Some(stock) = product.stock {
        let _ = writeln!(out, "Stock:    {stock}");
    }
    if product.has_photo() {
        let _ = writeln!(out, "Image:    {}", product.image);
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out
}

fn totals(out: &mut String, totals: &CartTotals) {
    let _ = writeln!(out, "Items:    {}", totals.item_count);
    let _ = writeln!(out, "Subtotal: {}", Price::store(totals.subtotal));
    let _ = writeln!(out, "Discount: {}", Price::store(totals.discount));
    let _ = writeln!(out, "Shipping: {}", Price::store(totals.shipping));
    let _ = writeln!(out, "Total:    {}", Price::store(totals.total));
}

pub fn cart(snapshot: &CartSnapshot) -> String {
    if snapshot.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in snapshot.cart.lines() {
        let _ = writeln!(
            out,
            "#{:<4} {:<36} {:>2} x {:>8} = {:>9}",
            line.product_id,
            line.title,
            line.quantity,
            line.unit_price(),
            Price::store(line.line_total()),
        );
    }
    out.push('\n');
    totals(&mut out, &snapshot.totals);
    out
}

pub fn order(order: &OrderRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(out, "Placed:   {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Customer: {}", order.customer.full_name);
    let _ = writeln!(out, "Products: {}", order.item_summary());
    totals(&mut out, &order.totals);
    out
}

pub fn handoff(handoff: &Handoff) -> String {
    let mut out = order(&handoff.order);
    let _ = writeln!(out, "\nSend the order on WhatsApp:\n{}", handoff.link);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use naturprime_core::{Cart, CatalogQuery, ProductId};

    fn product() -> Product {
        Product {
            id: ProductId::new(3),
            title: "Whey Protein Isolate".to_string(),
            description: "Hizli emilen protein".to_string(),
            price: "899.00".parse().unwrap(),
            original_price: Some("1199.00".parse().unwrap()),
            image: "gradient-gold".to_string(),
            category: "protein".to_string(),
            badge: Some("Yeni".to_string()),
            tags: vec!["Premium".to_string()],
            stock: Some(100),
        }
    }

    #[test]
    fn test_product_row() {
        let row = product_row(&product());
        assert!(row.starts_with("#3"));
        assert!(row.contains("Whey Protein Isolate"));
        assert!(row.contains("₺899"));
        assert!(row.contains("(was ₺1.199, -25%)"));
        assert!(row.ends_with("[Yeni]"));
    }

    #[test]
    fn test_catalog_states() {
        assert_eq!(catalog(&CatalogView::Loading), "Loading products...\n");

        let products = vec![product()];
        let none = CatalogQuery::new().with_search("kreatin");
        assert_eq!(
            catalog(&CatalogView::build(Some(products.as_slice()), &none)),
            "No products match your filters.\n"
        );

        let all = catalog(&CatalogView::build(Some(products.as_slice()), &CatalogQuery::new()));
        assert!(all.ends_with("\n1 product\n"));
    }

    #[test]
    fn test_product_detail_hides_gradient_image() {
        let detail = product_detail(&product());
        assert!(detail.contains("Was:      ₺1.199 (-25%)"));
        assert!(detail.contains("Tags:     Premium"));
        assert!(!detail.contains("Image:"));
    }

    #[test]
    fn test_cart() {
        let mut cart = Cart::new();
        cart.add(&product(), 3);
        let snapshot = CartSnapshot {
            revision: 1,
            totals: cart.totals(),
            cart,
        };

        let out = super::cart(&snapshot);
        assert!(out.contains(" 3 x     ₺899 =    ₺2.697"));
        assert!(out.contains("Items:    3"));
        assert!(out.contains("Shipping: ₺0"));
        assert!(out.ends_with("Total:    ₺2.697\n"));

        assert_eq!(super::cart(&CartSnapshot::default()), "Your cart is empty.\n");
    }
}
