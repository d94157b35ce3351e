//! Widget error types.

use thiserror::Error;

/// Errors raised while building a catalog record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The product has no images.
    #[error("Product must have at least one image")]
    NoImages,

    /// An image URL is blank.
    #[error("Image {0} has an empty URL")]
    EmptyImageUrl(usize),

    /// Rating outside [0, 5] or not a number.
    #[error("Rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),

    /// Original price lower than the selling price.
    #[error("Original price {original} is below price {price}")]
    OriginalBelowPrice { price: u64, original: u64 },

    /// A required text field is missing.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse failure.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown currency code.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown number locale.
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Semantically invalid value.
    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// Embedded catalog record is invalid.
    #[error("Invalid product record: {0}")]
    Catalog(#[from] CatalogError),
}

/// Top-level error for widget construction.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Invalid catalog record.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
