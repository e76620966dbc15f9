//! Products, banners and the rules for what a listing page shows.
//!
//! Live rows come from the hosted row store. When a fetch yields nothing the
//! page still renders a stable grid: four synthetic products and one static
//! banner.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{BannerId, Price, ProductId, Rating};

/// Row cap for the products fetch.
pub const PRODUCTS_PAGE_SIZE: u32 = 20;

/// Row cap for the banners fetch.
pub const BANNERS_PAGE_SIZE: u32 = 5;

/// Number of placeholder products rendered when no live rows exist.
pub const PLACEHOLDER_COUNT: usize = 4;

/// Stars shown for a product without a (non-zero) rating.
pub const DEFAULT_STARS: u8 = 4;

/// Static hero image used when no banner rows exist.
pub const FALLBACK_BANNER_URL: &str = "/static/banners/banner1.jpg";

/// Row store table holding products.
pub const PRODUCTS_TABLE: &str = "products";

/// Row store table holding banners.
pub const BANNERS_TABLE: &str = "banners";

/// A product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl Product {
    /// Build the `index`-th placeholder product (zero-based).
    ///
    /// Placeholder `i` is named `Top Product {i+1}` and priced `(i+1) * 20`.
    #[must_use]
    pub fn placeholder(index: u32) -> Self {
        let position = index + 1;
        Self {
            id: ProductId::new(i64::from(index)),
            name: format!("Top Product {position}"),
            price: Price::from_units(position * 20),
            image_url: format!("https://via.placeholder.com/300x200?text=Top+{position}"),
            rating: Rating::new(DEFAULT_STARS).ok(),
            is_favorite: None,
        }
    }

    /// Number of stars to draw: the rating if present and non-zero, else 4.
    #[must_use]
    pub fn display_stars(&self) -> u8 {
        self.rating
            .map(Rating::stars)
            .filter(|&stars| stars > 0)
            .unwrap_or(DEFAULT_STARS)
    }

    /// Case-insensitive substring match of `needle` against the name.
    ///
    /// `needle` must already be lowercased.
    fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// A banner row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub image_url: String,
}

/// The fixed placeholder sequence shown when no live products exist.
#[must_use]
pub fn placeholder_products() -> Vec<Product> {
    (0..PLACEHOLDER_COUNT as u32).map(Product::placeholder).collect()
}

/// The products a page holds: the live list when it has rows, otherwise the
/// placeholders.
#[must_use]
pub fn shelf(live: &[Product]) -> Cow<'_, [Product]> {
    if live.is_empty() {
        Cow::Owned(placeholder_products())
    } else {
        Cow::Borrowed(live)
    }
}

/// Filter `products` by a case-insensitive substring of the name.
///
/// The term is matched as typed, spaces included. Only an empty term
/// returns every product unchanged.
#[must_use]
pub fn filter_by_name<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    if term.is_empty() {
        return products.iter().collect();
    }
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|product| product.name_contains(&needle))
        .collect()
}

/// Image URL for the page hero: the first banner, or the static fallback.
#[must_use]
pub fn hero_image(banners: &[Banner]) -> &str {
    banners
        .first()
        .map_or(FALLBACK_BANNER_URL, |banner| banner.image_url.as_str())
}

/// Live listing data merged into a mounted page.
///
/// Both lists start empty. A failed or empty fetch leaves its list empty,
/// and the render policy above takes over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub products: Vec<Product>,
    pub banners: Vec<Banner>,
}

impl Listing {
    /// The products to render for `search_term`.
    #[must_use]
    pub fn visible_products(&self, search_term: &str) -> Vec<Product> {
        let held = shelf(&self.products);
        filter_by_name(&held, search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether the page is showing placeholder products.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.products.is_empty()
    }

    /// Hero image for the page.
    #[must_use]
    pub fn hero_image(&self) -> &str {
        hero_image(&self.banners)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_units(10),
            image_url: format!("https://cdn.example.com/{id}.png"),
            rating: None,
            is_favorite: None,
        }
    }

    #[test]
    fn test_placeholders_are_four_with_fixed_prices() {
        let placeholders = placeholder_products();
        assert_eq!(placeholders.len(), 4);

        let prices: Vec<String> = placeholders.iter().map(|p| p.price.to_string()).collect();
        assert_eq!(prices, vec!["$ 20", "$ 40", "$ 60", "$ 80"]);

        let names: Vec<&str> = placeholders.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Top Product 1", "Top Product 2", "Top Product 3", "Top Product 4"]
        );
        assert_eq!(
            placeholders[2].image_url,
            "https://via.placeholder.com/300x200?text=Top+3"
        );
    }

    #[test]
    fn test_shelf_uses_placeholders_only_when_empty() {
        assert_eq!(shelf(&[]).len(), PLACEHOLDER_COUNT);

        let live = vec![product(9, "Kettle")];
        let held = shelf(&live);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].name, "Kettle");
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let products = vec![
            product(1, "Wireless Mouse"),
            product(2, "Mouse Pad"),
            product(3, "Keyboard"),
        ];
        let hits = filter_by_name(&products, "mOUSE");
        let ids: Vec<i64> = hits.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filter_empty_term_is_identity() {
        let products = vec![product(1, "B"), product(2, "A")];
        let all = filter_by_name(&products, "");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "B");
        assert_eq!(all[1].name, "A");
    }

    #[test]
    fn test_filter_keeps_surrounding_spaces() {
        let products = vec![product(1, "Lamp"), product(2, "Desk Lamp")];

        let ids = |term: &str| -> Vec<i64> {
            filter_by_name(&products, term)
                .iter()
                .map(|p| p.id.as_i64())
                .collect()
        };

        assert_eq!(ids(" "), vec![2]);
        assert_eq!(ids(" lamp"), vec![2]);
        assert!(ids("lamp ").is_empty());
    }

    #[test]
    fn test_filter_whitespace_term_without_match_is_empty() {
        let products = vec![product(1, "Lamp")];
        assert!(filter_by_name(&products, " ").is_empty());
    }

    #[test]
    fn test_filter_applies_to_placeholders() {
        let listing = Listing::default();
        let visible = listing.visible_products("product 3");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Top Product 3");
    }

    #[test]
    fn test_filter_with_no_match_on_live_list_is_empty() {
        let listing = Listing {
            products: vec![product(1, "Lamp")],
            banners: vec![],
        };
        assert!(listing.visible_products("sofa").is_empty());
        assert!(!listing.is_placeholder());
    }

    #[test]
    fn test_display_stars_defaults_to_four() {
        let mut p = product(1, "Lamp");
        assert_eq!(p.display_stars(), 4);

        p.rating = Some(Rating::new(0).unwrap());
        assert_eq!(p.display_stars(), 4);

        p.rating = Some(Rating::new(2).unwrap());
        assert_eq!(p.display_stars(), 2);
    }

    #[test]
    fn test_hero_image_fallback() {
        assert_eq!(hero_image(&[]), FALLBACK_BANNER_URL);

        let banners = vec![
            Banner {
                id: BannerId::new(1),
                image_url: "https://cdn.example.com/sale.jpg".to_string(),
            },
            Banner {
                id: BannerId::new(2),
                image_url: "https://cdn.example.com/other.jpg".to_string(),
            },
        ];
        assert_eq!(hero_image(&banners), "https://cdn.example.com/sale.jpg");
    }

    #[test]
    fn test_product_row_deserializes() {
        let row = serde_json::json!({
            "id": 3,
            "name": "Desk Lamp",
            "price": 24.5,
            "image_url": "https://cdn.example.com/lamp.png",
            "rating": 5,
            "is_favorite": true,
            "created_at": "2025-01-01T00:00:00Z"
        });
        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price.to_string(), "$ 24.5");
        assert_eq!(product.display_stars(), 5);
        assert_eq!(product.is_favorite, Some(true));
    }

    #[test]
    fn test_product_row_with_negative_price_is_rejected() {
        let row = serde_json::json!({
            "id": 3,
            "name": "Broken",
            "price": -1,
            "image_url": "x"
        });
        assert!(serde_json::from_value::<Product>(row).is_err());
    }
}
