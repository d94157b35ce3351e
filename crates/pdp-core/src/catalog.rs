//! The catalog record for the product on display.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Static description of one product.
///
/// Built once at startup and never mutated afterwards. `images` is in display
/// order, which is also thumbnail order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Brand shown in the page header.
    pub brand: String,
    /// Selling price in whole currency units.
    pub price: u64,
    /// Price before discount, shown struck through.
    pub original_price: u64,
    /// Average rating in `0.0..=5.0`.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub review_count: u32,
    /// Long description.
    pub description: String,
    /// Image URLs; never empty.
    pub images: Vec<String>,
}

impl Product {
    /// Start building a product.
    pub fn builder(name: impl Into<String>) -> ProductBuilder {
        ProductBuilder::new(name)
    }

    /// Check the record's invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        if self.images.is_empty() {
            return Err(CatalogError::NoImages);
        }
        if let Some(index) = self.images.iter().position(|url| url.trim().is_empty()) {
            return Err(CatalogError::EmptyImageUrl(index));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(CatalogError::RatingOutOfRange(self.rating));
        }
        if self.original_price < self.price {
            return Err(CatalogError::OriginalBelowPrice {
                price: self.price,
                original: self.original_price,
            });
        }
        Ok(())
    }

    /// Number of images in the gallery.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Image URL at `index`, if any.
    pub fn image(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(String::as_str)
    }

    /// Check if the product is discounted.
    pub fn is_on_sale(&self) -> bool {
        self.original_price > self.price
    }

    /// Discount off the original price, rounded to the nearest whole percent.
    pub fn discount_percent(&self) -> Option<u8> {
        if !self.is_on_sale() || self.original_price == 0 {
            return None;
        }
        let saved = (self.original_price - self.price) as u128;
        let original = self.original_price as u128;
        let percent = (saved * 100 + original / 2) / original;
        Some(percent.min(100) as u8)
    }

    /// The watch shown by the demo page.
    pub fn classic_leather_watch() -> Self {
        Self {
            name: "Classic Leather Watch".to_string(),
            brand: "Timeless Co.".to_string(),
            price: 12499,
            original_price: 24999,
            rating: 4.5,
            review_count: 128,
            description: "Experience the perfect blend of classic design and modern functionality. \
                This exquisite timepiece features a genuine leather strap, a scratch-resistant \
                sapphire crystal face, and precision quartz movement for unparalleled accuracy. \
                Water-resistant up to 50 meters."
                .to_string(),
            images: vec![
                "https://placehold.co/600x600/E2E8F0/4A5568?text=Watch+Face".to_string(),
                "https://placehold.co/600x600/CBD5E0/4A5568?text=Side+View".to_string(),
                "https://placehold.co/600x600/BEE3F8/2C5282?text=Strap+Detail".to_string(),
                "https://placehold.co/600x600/A0AEC0/2D3748?text=On+Wrist".to_string(),
            ],
        }
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::classic_leather_watch()
    }
}

/// Fluent builder that validates on `build`.
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    /// Create a builder with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            product: Product {
                name: name.into(),
                brand: String::new(),
                price: 0,
                original_price: 0,
                rating: 0.0,
                review_count: 0,
                description: String::new(),
                images: Vec::new(),
            },
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.product.brand = brand.into();
        self
    }

    /// Set the selling price; the original price follows unless set later.
    pub fn price(mut self, price: u64) -> Self {
        self.product.price = price;
        if self.product.original_price < price {
            self.product.original_price = price;
        }
        self
    }

    pub fn original_price(mut self, original_price: u64) -> Self {
        self.product.original_price = original_price;
        self
    }

    pub fn rating(mut self, rating: f64, review_count: u32) -> Self {
        self.product.rating = rating;
        self.product.review_count = review_count;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.product.description = description.into();
        self
    }

    /// Append an image URL.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.product.images.push(url.into());
        self
    }

    /// Validate and return the product.
    pub fn build(self) -> Result<Product, CatalogError> {
        self.product.validate()?;
        Ok(self.product)
    }
}
