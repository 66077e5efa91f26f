use serde::Serialize;

/// One product card scraped from a category page.
///
/// Field order matters: it is the CSV column order, and the header row is
/// derived from these names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Count of filled star icons on the card, 0..=5 on this site.
    pub rating: u32,
    pub num_of_reviews: u32,
}

impl Product {
    /// CSV header, in struct field order.
    pub const FIELDS: [&'static str; 5] =
        ["title", "description", "price", "rating", "num_of_reviews"];
}
