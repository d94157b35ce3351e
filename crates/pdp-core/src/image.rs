//! Image sources with one-shot fallback on load failure.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Placeholder for a main image that failed to load.
pub const MAIN_PLACEHOLDER: &str = "https://placehold.co/600x600/FEE2E2/B91C1C?text=Image+Error";

/// Placeholder for a thumbnail that failed to load.
pub const THUMBNAIL_PLACEHOLDER: &str = "https://placehold.co/80x80/FEE2E2/B91C1C?text=Error";

/// Resolves which URL an image element should display.
///
/// The first reported failure swaps in the fallback. Every later failure is
/// ignored, so an unreachable placeholder cannot cause a retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    primary: String,
    fallback: String,
    failed: bool,
}

impl ImageSource {
    /// Create a resolver for `primary` with `fallback` as the substitute.
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
            failed: false,
        }
    }

    /// URL currently displayed.
    pub fn resolve(&self) -> &str {
        if self.failed {
            &self.fallback
        } else {
            &self.primary
        }
    }

    /// Record a load failure. Returns `true` only when this call substituted
    /// the fallback.
    pub fn report_failure(&mut self) -> bool {
        if self.failed {
            return false;
        }
        self.failed = true;
        true
    }

    /// Whether the fallback is in use.
    pub fn is_substituted(&self) -> bool {
        self.failed
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Which image element failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum ImageSlot {
    /// The large image for the image at this index.
    Main(usize),
    /// The thumbnail button for the image at this index.
    Thumbnail(usize),
}

impl ImageSlot {
    pub fn index(&self) -> usize {
        match self {
            ImageSlot::Main(i) | ImageSlot::Thumbnail(i) => *i,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageSlot::Main(_) => "main",
            ImageSlot::Thumbnail(_) => "thumbnail",
        }
    }
}

/// Resolvers for every main view and thumbnail of a product.
///
/// Each image keeps its own failure memory, so switching to another image
/// after a failure still gets a fresh substitution if that one fails too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    main: Vec<ImageSource>,
    thumbnails: Vec<ImageSource>,
}

impl Gallery {
    /// Build resolvers for `product` using the given placeholders.
    pub fn new(product: &Product, main_placeholder: &str, thumbnail_placeholder: &str) -> Self {
        Self {
            main: product
                .images
                .iter()
                .map(|url| ImageSource::new(url.as_str(), main_placeholder))
                .collect(),
            thumbnails: product
                .images
                .iter()
                .map(|url| ImageSource::new(url.as_str(), thumbnail_placeholder))
                .collect(),
        }
    }

    /// Build resolvers with the stock placeholders.
    pub fn with_default_placeholders(product: &Product) -> Self {
        Self::new(product, MAIN_PLACEHOLDER, THUMBNAIL_PLACEHOLDER)
    }

    /// Resolver for a slot.
    pub fn source(&self, slot: ImageSlot) -> Option<&ImageSource> {
        match slot {
            ImageSlot::Main(i) => self.main.get(i),
            ImageSlot::Thumbnail(i) => self.thumbnails.get(i),
        }
    }

    /// URL to display for a slot.
    pub fn resolve(&self, slot: ImageSlot) -> Option<&str> {
        self.source(slot).map(ImageSource::resolve)
    }

    /// Record a failure for a slot. Returns `true` if a substitution happened.
    pub fn report_failure(&mut self, slot: ImageSlot) -> bool {
        let source = match slot {
            ImageSlot::Main(i) => self.main.get_mut(i),
            ImageSlot::Thumbnail(i) => self.thumbnails.get_mut(i),
        };
        source.map(ImageSource::report_failure).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_primary_until_failure() {
        let source = ImageSource::new("a.png", "fallback.png");
        assert_eq!(source.resolve(), "a.png");
        assert!(!source.is_substituted());
    }

    #[test]
    fn test_substitutes_exactly_once() {
        let mut source = ImageSource::new("a.png", "fallback.png");
        assert!(source.report_failure());
        assert_eq!(source.resolve(), "fallback.png");

        // The placeholder itself failing must not trigger another swap.
        assert!(!source.report_failure());
        assert!(!source.report_failure());
        assert_eq!(source.resolve(), "fallback.png");
    }

    #[test]
    fn test_gallery_slots_are_independent() {
        let product = Product::classic_leather_watch();
        let mut gallery = Gallery::with_default_placeholders(&product);

        assert!(gallery.report_failure(ImageSlot::Main(0)));
        assert_eq!(gallery.resolve(ImageSlot::Main(0)), Some(MAIN_PLACEHOLDER));
        assert_eq!(
            gallery.resolve(ImageSlot::Thumbnail(0)),
            Some(product.images[0].as_str())
        );
        assert_eq!(
            gallery.resolve(ImageSlot::Main(1)),
            Some(product.images[1].as_str())
        );

        assert!(gallery.report_failure(ImageSlot::Thumbnail(2)));
        assert_eq!(
            gallery.resolve(ImageSlot::Thumbnail(2)),
            Some(THUMBNAIL_PLACEHOLDER)
        );
    }

    #[test]
    fn test_unknown_slot() {
        let product = Product::classic_leather_watch();
        let mut gallery = Gallery::with_default_placeholders(&product);
        assert_eq!(gallery.resolve(ImageSlot::Main(9)), None);
        assert!(!gallery.report_failure(ImageSlot::Thumbnail(9)));
        assert_eq!(gallery.len(), 4);
    }

    #[test]
    fn test_slot_serialization() {
        let json = serde_json::to_string(&ImageSlot::Thumbnail(2)).unwrap();
        assert_eq!(json, r#"{"kind":"thumbnail","index":2}"#);
        assert_eq!(ImageSlot::Main(1).label(), "main");
    }
}
