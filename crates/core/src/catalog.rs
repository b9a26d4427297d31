//! Catalog query engine.
//!
//! Turns the product feed plus the visitor's search box, chip selection, price
//! ceiling and sort choice into the list the catalog page shows. Pure and
//! cheap enough to run on every keystroke.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Feed order. No popularity signal exists yet.
    #[default]
    Popularity,
    /// Newest first, using descending id as the recency proxy.
    New,
    /// Feed order. No sales signal exists yet.
    Bestseller,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// Parse from URL parameter value. Unknown values fall back to
    /// [`SortMode::Popularity`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "new" | "newest" => Self::New,
            "bestseller" | "best-seller" => Self::Bestseller,
            "price-asc" | "price-ascending" | "priceAsc" | "price_asc" => Self::PriceAsc,
            "price-desc" | "price-descending" | "priceDesc" | "price_desc" => Self::PriceDesc,
            _ => Self::Popularity,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::New => "new",
            Self::Bestseller => "bestseller",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Comparator for this mode, or `None` when the filtered order is kept.
    fn comparator(self) -> Option<fn(&Product, &Product) -> Ordering> {
        match self {
            Self::Popularity | Self::Bestseller => None,
            Self::New => Some(newest_first),
            Self::PriceAsc => Some(cheapest_first),
            Self::PriceDesc => Some(priciest_first),
        }
    }
}

fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.id.cmp(&a.id)
}

fn cheapest_first(a: &Product, b: &Product) -> Ordering {
    a.price.cmp(&b.price)
}

fn priciest_first(a: &Product, b: &Product) -> Ordering {
    b.price.cmp(&a.price)
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick-select chip narrowing the catalog by badge.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum ChipFilter {
    #[default]
    All,
    /// Keep products whose badge equals this label, ignoring case.
    Badge(String),
}

impl ChipFilter {
    /// Parse a chip label. Blank input and `all` select every product.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Badge(label.to_string())
        }
    }

    #[must_use]
    pub fn matches(&self, badge: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Badge(label) => {
                badge.is_some_and(|badge| badge.to_lowercase() == label.to_lowercase())
            }
        }
    }
}

/// Filter and sort criteria for the catalog view.
///
/// All filters combine with logical AND.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Free text matched against title and description, ignoring case.
    pub search: String,
    pub chip: ChipFilter,
    /// Inclusive price ceiling.
    pub max_price: Option<Decimal>,
    pub sort: SortMode,
}

impl CatalogQuery {
    /// A query that keeps everything in feed order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_chip(mut self, chip: ChipFilter) -> Self {
        self.chip = chip;
        self
    }

    #[must_use]
    pub const fn with_max_price(mut self, max_price: Option<Decimal>) -> Self {
        self.max_price = max_price;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a single product passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.chip.matches(product.badge.as_deref())
            && self.max_price.is_none_or(|max| product.price <= max)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.title.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    /// Produce the visible product list. The input is left untouched.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut result: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        if let Some(compare) = self.sort.comparator() {
            // Stable, so equal keys keep their feed order.
            result.sort_by(|a, b| compare(a, b));
        }
        result
    }
}

/// What the catalog page renders: still waiting on the feed, or a (possibly
/// empty) result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView<'a> {
    Loading,
    Ready(Vec<&'a Product>),
}

impl<'a> CatalogView<'a> {
    /// Build the view from a feed that may not have arrived yet.
    #[must_use]
    pub fn build(feed: Option<&'a [Product]>, query: &CatalogQuery) -> Self {
        feed.map_or(Self::Loading, |products| Self::Ready(query.apply(products)))
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded, but nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Ready(products) if products.is_empty())
    }

    #[must_use]
    pub fn products(&self) -> &[&'a Product] {
        match self {
            Self::Loading => &[],
            Self::Ready(products) => products,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ProductId;
    use proptest::prelude::*;

    fn product(id: i32, title: &str, price: i64, badge: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: format!("{title} aciklamasi"),
            price: Decimal::new(price, 0),
            original_price: None,
            image: "gradient-gold".to_string(),
            category: "supplement".to_string(),
            badge: badge.map(String::from),
            tags: Vec::new(),
            stock: Some(100),
        }
    }

    fn feed() -> Vec<Product> {
        vec![
            product(1, "Whey Protein Isolate", 899, Some("Yeni")),
            product(2, "Creatine Monohydrate", 1249, Some("Cok Satan")),
            product(3, "Testosterone Booster", 649, None),
            product(4, "Omega 3", 329, Some("yeni")),
        ]
    }

    fn prices(products: &[&Product]) -> Vec<i64> {
        products
            .iter()
            .map(|p| i64::try_from(p.price.mantissa()).unwrap())
            .collect()
    }

    #[test]
    fn test_sort_by_price() {
        let feed = feed();
        let asc = CatalogQuery::new().with_sort(SortMode::PriceAsc).apply(&feed);
        assert_eq!(prices(&asc), vec![329, 649, 899, 1249]);

        let desc = CatalogQuery::new().with_sort(SortMode::PriceDesc).apply(&feed);
        assert_eq!(prices(&desc), vec![1249, 899, 649, 329]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let feed = vec![
            product(1, "Whey Protein Isolate", 899, None),
            product(2, "Testosterone Booster", 649, None),
        ];
        let result = CatalogQuery::new().with_search("whey").apply(&feed);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Whey Protein Isolate");

        let result = CatalogQuery::new().with_search("WHEY").apply(&feed);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_search_matches_description() {
        let feed = feed();
        let result = CatalogQuery::new().with_search("OMEGA 3 ACIK").apply(&feed);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, ProductId::new(4));
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let feed = feed();
        assert_eq!(CatalogQuery::new().with_search("").apply(&feed).len(), 4);
        // Whitespace is matched literally, not treated as an empty box.
        assert!(CatalogQuery::new().with_search("   ").apply(&feed).is_empty());
    }

    #[test]
    fn test_search_whitespace_is_significant() {
        let mut whey = product(1, "Whey Protein Isolate", 899, None);
        whey.description = String::new();
        let feed = vec![whey];

        assert!(CatalogQuery::new().with_search("isolate ").apply(&feed).is_empty());
        assert_eq!(CatalogQuery::new().with_search(" isolate").apply(&feed).len(), 1);
    }

    #[test]
    fn test_newest_first() {
        let feed = feed();
        let result = CatalogQuery::new().with_sort(SortMode::New).apply(&feed);
        let ids: Vec<i32> = result.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_popularity_and_bestseller_keep_feed_order() {
        let feed = feed();
        for sort in [SortMode::Popularity, SortMode::Bestseller] {
            let result = CatalogQuery::new().with_sort(sort).apply(&feed);
            let ids: Vec<i32> = result.iter().map(|p| p.id.as_i32()).collect();
            assert_eq!(ids, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_chip_matches_badge_ignoring_case() {
        let feed = feed();
        let result = CatalogQuery::new()
            .with_chip(ChipFilter::parse("YENI"))
            .apply(&feed);
        let ids: Vec<i32> = result.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 4]);

        let all = CatalogQuery::new().with_chip(ChipFilter::parse("all")).apply(&feed);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_price_ceiling_is_inclusive() {
        let feed = feed();
        let result = CatalogQuery::new()
            .with_max_price(Some(Decimal::new(649, 0)))
            .apply(&feed);
        assert_eq!(prices(&result), vec![649, 329]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let feed = feed();
        let result = CatalogQuery::new()
            .with_chip(ChipFilter::parse("yeni"))
            .with_max_price(Some(Decimal::new(500, 0)))
            .apply(&feed);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, ProductId::new(4));
    }

    #[test]
    fn test_empty_result_is_not_loading() {
        let feed = feed();
        let query = CatalogQuery::new().with_search("kreatin tozu yok");
        let view = CatalogView::build(Some(feed.as_slice()), &query);
        assert!(view.is_empty());
        assert!(!view.is_loading());

        let view = CatalogView::build(None, &query);
        assert!(view.is_loading());
        assert!(!view.is_empty());
        assert!(view.products().is_empty());
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!(SortMode::parse("priceAsc"), SortMode::PriceAsc);
        assert_eq!(SortMode::parse("price-desc"), SortMode::PriceDesc);
        assert_eq!(SortMode::parse("new"), SortMode::New);
        assert_eq!(SortMode::parse("bestseller"), SortMode::Bestseller);
        assert_eq!(SortMode::parse("whatever"), SortMode::Popularity);
        assert_eq!(SortMode::parse(SortMode::PriceAsc.as_str()), SortMode::PriceAsc);
    }

    fn arb_feed() -> impl Strategy<Value = Vec<Product>> {
        let badge = prop_oneof![Just(None), Just(Some("Yeni")), Just(Some("Cok Satan"))];
        prop::collection::vec(("[a-zA-Z ]{0,12}", 1_i64..5_000, badge), 0..24).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (title, price, badge))| {
                    product(i32::try_from(i).unwrap(), &title, price, badge)
                })
                .collect()
        })
    }

    fn arb_query() -> impl Strategy<Value = CatalogQuery> {
        let sort = prop_oneof![
            Just(SortMode::Popularity),
            Just(SortMode::New),
            Just(SortMode::Bestseller),
            Just(SortMode::PriceAsc),
            Just(SortMode::PriceDesc),
        ];
        let chip = prop_oneof![Just("all"), Just("yeni"), Just("cok satan")];
        ("[a-z]{0,2}", chip, prop::option::of(1_i64..5_000), sort).prop_map(
            |(search, chip, max, sort)| {
                CatalogQuery::new()
                    .with_search(search)
                    .with_chip(ChipFilter::parse(chip))
                    .with_max_price(max.map(|m| Decimal::new(m, 0)))
                    .with_sort(sort)
            },
        )
    }

    proptest! {
        #[test]
        fn test_filtering_is_idempotent(feed in arb_feed(), query in arb_query()) {
            let once: Vec<Product> = query.apply(&feed).into_iter().cloned().collect();
            let twice: Vec<Product> = query.apply(&once).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_sorting_is_a_permutation(feed in arb_feed(), query in arb_query()) {
            let sort_only = CatalogQuery::new().with_sort(query.sort);
            let mut sorted: Vec<i32> = sort_only.apply(&feed).iter().map(|p| p.id.as_i32()).collect();
            let mut original: Vec<i32> = feed.iter().map(|p| p.id.as_i32()).collect();
            sorted.sort_unstable();
            original.sort_unstable();
            prop_assert_eq!(sorted, original);
        }

        #[test]
        fn test_filtered_result_only_shrinks(feed in arb_feed(), query in arb_query()) {
            let result = query.apply(&feed);
            prop_assert!(result.len() <= feed.len());
            for product in result {
                prop_assert!(query.matches(product));
            }
        }

        #[test]
        fn test_price_sorts_are_inverse(prices in prop::collection::btree_set(1_i64..100_000, 0..24)) {
            let feed: Vec<Product> = prices
                .into_iter()
                .rev()
                .enumerate()
                .map(|(i, price)| product(i32::try_from(i).unwrap(), "Urun", price, None))
                .collect();
            let asc: Vec<i32> = CatalogQuery::new()
                .with_sort(SortMode::PriceAsc)
                .apply(&feed)
                .iter()
                .map(|p| p.id.as_i32())
                .collect();
            let mut desc: Vec<i32> = CatalogQuery::new()
                .with_sort(SortMode::PriceDesc)
                .apply(&feed)
                .iter()
                .map(|p| p.id.as_i32())
                .collect();
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }
    }
}
