//! Render-ready projection of the widget.
//!
//! [`ProductView`] is everything a renderer needs, already formatted. Both
//! the Leptos component and the static HTML sections consume it, so the two
//! cannot drift apart on labels or prices.

use serde::Serialize;

use crate::catalog::Product;
use crate::image::{Gallery, ImageSlot};
use crate::money::CurrencyFormatter;
use crate::rating::{review_label, star_glyphs, StarGlyph, STAR_COUNT};
use crate::state::ViewState;

/// One image element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
}

/// One thumbnail button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailView {
    pub index: usize,
    pub src: String,
    pub alt: String,
    pub selected: bool,
}

/// The "added to cart" banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub visible: bool,
    pub message: String,
}

/// Fully formatted widget content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub brand: String,
    pub name: String,
    pub description: String,
    pub main_image: ImageView,
    pub thumbnails: Vec<ThumbnailView>,
    pub stars: [StarGlyph; STAR_COUNT],
    pub review_label: String,
    pub price: String,
    /// Struck-through price; only present while on sale.
    pub original_price: Option<String>,
    /// e.g. "50% OFF".
    pub discount_badge: Option<String>,
    pub quantity: u32,
    pub decrement_enabled: bool,
    pub cart_badge: Option<u64>,
    pub notification: NotificationView,
}

impl ProductView {
    /// Project the current state.
    pub fn project(
        product: &Product,
        state: &ViewState,
        gallery: &Gallery,
        formatter: &CurrencyFormatter,
        notification_message: &str,
    ) -> Self {
        let selected = state.selected_image_index;
        let main_src = gallery
            .resolve(ImageSlot::Main(selected))
            .or_else(|| product.image(selected))
            .unwrap_or_default()
            .to_string();

        let thumbnails = (0..product.image_count())
            .map(|index| ThumbnailView {
                index,
                src: gallery
                    .resolve(ImageSlot::Thumbnail(index))
                    .unwrap_or_default()
                    .to_string(),
                alt: thumbnail_alt(index),
                selected: index == selected,
            })
            .collect();

        let (original_price, discount_badge) = match product.discount_percent() {
            Some(percent) => (
                Some(formatter.format(product.original_price)),
                Some(format!("{}% OFF", percent)),
            ),
            None => (None, None),
        };

        Self {
            brand: product.brand.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            main_image: ImageView {
                src: main_src,
                alt: main_alt(&product.name, selected),
            },
            thumbnails,
            stars: star_glyphs(product.rating),
            review_label: review_label(product.review_count),
            price: formatter.format(product.price),
            original_price,
            discount_badge,
            quantity: state.quantity,
            decrement_enabled: state.can_decrement(),
            cart_badge: state.cart_badge(),
            notification: NotificationView {
                visible: state.notification_visible,
                message: notification_message.to_string(),
            },
        }
    }

    /// Serialize as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Alt text of the main image, numbered from 1.
pub fn main_alt(name: &str, index: usize) -> String {
    format!("{} - View {}", name, index + 1)
}

/// Alt text of a thumbnail, numbered from 1.
pub fn thumbnail_alt(index: usize) -> String {
    format!("Thumbnail {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MAIN_PLACEHOLDER;
    use crate::money::{Currency, NumberLocale};
    use crate::state::{Event, Rules};

    fn inr() -> CurrencyFormatter {
        CurrencyFormatter::new(Currency::INR, NumberLocale::EnIn)
    }

    #[test]
    fn test_initial_projection() {
        let product = Product::classic_leather_watch();
        let gallery = Gallery::with_default_placeholders(&product);
        let view = ProductView::project(
            &product,
            &ViewState::new(),
            &gallery,
            &inr(),
            "Added to cart!",
        );

        assert_eq!(view.brand, "Timeless Co.");
        assert_eq!(view.main_image.src, product.images[0]);
        assert_eq!(view.main_image.alt, "Classic Leather Watch - View 1");
        assert_eq!(view.thumbnails.len(), 4);
        assert!(view.thumbnails[0].selected);
        assert_eq!(view.thumbnails[3].alt, "Thumbnail 4");
        assert_eq!(view.price, "₹12,499");
        assert_eq!(view.original_price.as_deref(), Some("₹24,999"));
        assert_eq!(view.discount_badge.as_deref(), Some("50% OFF"));
        assert_eq!(view.review_label, "(128 reviews)");
        assert_eq!(view.quantity, 1);
        assert!(!view.decrement_enabled);
        assert_eq!(view.cart_badge, None);
        assert!(!view.notification.visible);
    }

    #[test]
    fn test_projection_follows_state() {
        let product = Product::classic_leather_watch();
        let rules = Rules::for_product(&product);
        let mut gallery = Gallery::with_default_placeholders(&product);
        gallery.report_failure(ImageSlot::Main(2));

        let state = [
            Event::SelectImage(2),
            Event::Increment,
            Event::AddToCart,
        ]
        .into_iter()
        .fold(ViewState::new(), |s, e| s.apply(e, &rules).state);

        let view = ProductView::project(&product, &state, &gallery, &inr(), "Added to cart!");
        assert_eq!(view.main_image.src, MAIN_PLACEHOLDER);
        assert_eq!(view.main_image.alt, "Classic Leather Watch - View 3");
        assert!(view.thumbnails[2].selected);
        assert_eq!(view.thumbnails[2].src, product.images[2]);
        assert!(view.decrement_enabled);
        assert_eq!(view.cart_badge, Some(2));
        assert!(view.notification.visible);
    }

    #[test]
    fn test_no_sale_hides_strike_price() {
        let product = Product::builder("Mug")
            .brand("Kiln")
            .price(499)
            .image("mug.png")
            .build()
            .unwrap();
        let gallery = Gallery::with_default_placeholders(&product);
        let view = ProductView::project(&product, &ViewState::new(), &gallery, &inr(), "ok");

        assert_eq!(view.price, "₹499");
        assert_eq!(view.original_price, None);
        assert_eq!(view.discount_badge, None);
    }

    #[test]
    fn test_json_shape() {
        let product = Product::classic_leather_watch();
        let gallery = Gallery::with_default_placeholders(&product);
        let view = ProductView::project(&product, &ViewState::new(), &gallery, &inr(), "ok");
        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();

        assert_eq!(json["stars"][4], "half");
        assert_eq!(json["thumbnails"][1]["selected"], false);
        assert_eq!(json["cart_badge"], serde_json::Value::Null);
    }
}
