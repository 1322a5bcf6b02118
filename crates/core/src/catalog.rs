//! Catalog filtering over the product list.
//!
//! The backend has no search endpoint; the full list is fetched and filtered
//! here. Two matchers exist: the listing page filter (search over name and
//! description plus an optional category) and the header's quick search, which
//! also matches on category.

use crate::Product;

/// How many products the home page features.
pub const FEATURED_COUNT: usize = 3;

/// How many quick-search results the dropdown shows before linking to the listing.
pub const SUGGESTION_LIMIT: usize = 5;

/// Filters applied on the product listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    search: String,
    category: String,
}

impl ProductFilter {
    /// Build a filter from raw query values. Surrounding whitespace is ignored.
    #[must_use]
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        Self {
            search: search.map(str::trim).unwrap_or_default().to_string(),
            category: category.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    /// The search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }

    /// The selected category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        (!self.category.is_empty()).then_some(self.category.as_str())
    }

    /// Whether any filter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.search().is_some() || self.category().is_some()
    }

    /// Whether `product` passes both filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search().is_none_or(|term| {
            let term = term.to_lowercase();
            contains_lower(&product.name, &term) || contains_lower(&product.description, &term)
        });
        let matches_category = self
            .category()
            .is_none_or(|category| product.category.to_lowercase() == category.to_lowercase());

        matches_search && matches_category
    }

    /// Products passing the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(&product.category);
        }
    }
    seen
}

/// The products shown on the home page.
#[must_use]
pub fn featured(products: &[Product]) -> &[Product] {
    products.get(..FEATURED_COUNT).unwrap_or(products)
}

/// Outcome of a header quick search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickSearch<'a> {
    /// Every matching product.
    pub results: Vec<&'a Product>,
    /// False when the query was blank and no search ran.
    pub has_searched: bool,
}

impl<'a> QuickSearch<'a> {
    /// The results shown in the dropdown.
    #[must_use]
    pub fn suggestions(&self) -> &[&'a Product] {
        self.results
            .get(..SUGGESTION_LIMIT)
            .unwrap_or(&self.results)
    }

    /// Whether there are more matches than the dropdown shows.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.results.len() > SUGGESTION_LIMIT
    }
}

/// Match `query` against name, description, and category.
#[must_use]
pub fn quick_search<'a>(products: &'a [Product], query: &str) -> QuickSearch<'a> {
    let query = query.trim();
    if query.is_empty() {
        return QuickSearch::default();
    }

    let needle = query.to_lowercase();
    let results = products
        .iter()
        .filter(|p| {
            contains_lower(&p.name, &needle)
                || contains_lower(&p.description, &needle)
                || contains_lower(&p.category, &needle)
        })
        .collect();

    QuickSearch {
        results,
        has_searched: true,
    }
}

fn contains_lower(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
