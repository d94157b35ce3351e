//! Product details: name, rating, price, description, and cart controls.

use pdp_core::rating::StarGlyph;
use pdp_core::view::ProductView;

use super::escape_html;

/// Render the details column.
pub fn render_details(view: &ProductView) -> String {
    let sale_info = match (&view.original_price, &view.discount_badge) {
        (Some(original), Some(badge)) => format!(
            r#"<span class="price-original">{}</span>
            <span class="price-discount">{}</span>"#,
            escape_html(original),
            escape_html(badge)
        ),
        _ => String::new(),
    };

    let decrement_disabled = if view.decrement_enabled { "" } else { " disabled" };

    format!(
        r#"<section class="pdp-details" data-section="details">
    <h1 class="pdp-name">{name}</h1>
    <div class="pdp-rating">
        <span class="rating-stars">{stars}</span>
        <span class="pdp-review-count">{reviews}</span>
    </div>
    <div class="pdp-price">
        <span class="price-current">{price}</span>
        {sale_info}
    </div>
    <p class="pdp-description">{description}</p>
    <div class="pdp-actions">
        <div class="pdp-stepper">
            <button type="button" class="qty-btn" data-action="decrement"{decrement_disabled}>-</button>
            <span class="qty-value">{quantity}</span>
            <button type="button" class="qty-btn" data-action="increment">+</button>
        </div>
        <button type="button" class="btn-add-to-cart" data-action="add-to-cart">Add to Cart</button>
    </div>
</section>"#,
        name = escape_html(&view.name),
        stars = render_stars(&view.stars),
        reviews = escape_html(&view.review_label),
        price = escape_html(&view.price),
        sale_info = sale_info,
        description = escape_html(&view.description),
        decrement_disabled = decrement_disabled,
        quantity = view.quantity
    )
}

/// Render a star row as spans.
pub fn render_stars(stars: &[StarGlyph]) -> String {
    stars
        .iter()
        .map(|glyph| format!(r#"<span class="{}">{}</span>"#, glyph.css_class(), glyph.as_char()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdp_core::prelude::*;

    fn widget() -> Controller<VirtualScheduler> {
        Controller::mount_virtual(&WidgetConfig::default(), StructuredLogger::disabled()).unwrap()
    }

    #[test]
    fn test_initial_details() {
        let html = render_details(&widget().view());

        assert!(html.contains(r#"<span class="price-current">₹12,499</span>"#));
        assert!(html.contains(r#"<span class="price-original">₹24,999</span>"#));
        assert!(html.contains("50% OFF"));
        assert!(html.contains("(128 reviews)"));
        assert!(html.contains(r#"data-action="decrement" disabled>"#));
        assert!(html.contains(r#"<span class="qty-value">1</span>"#));
        assert_eq!(html.matches("star--full").count(), 4);
        assert_eq!(html.matches("star--half").count(), 1);
    }

    #[test]
    fn test_decrement_enabled_above_one() {
        let mut w = widget();
        w.increment();
        let html = render_details(&w.view());

        assert!(html.contains(r#"data-action="decrement">"#));
        assert!(html.contains(r#"<span class="qty-value">2</span>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let product = Product::builder("Mug <Large>")
            .brand("Kiln & Co")
            .price(499)
            .description("\"Holds\" 350ml")
            .image("mug.png")
            .build()
            .unwrap();
        let config = WidgetConfig::default().with_product(product);
        let view = Controller::mount_virtual(&config, StructuredLogger::disabled())
            .unwrap()
            .view();
        let html = render_details(&view);

        assert!(html.contains("Mug &lt;Large&gt;"));
        assert!(html.contains("&quot;Holds&quot; 350ml"));
        assert!(!html.contains("price-original"));
    }
}
