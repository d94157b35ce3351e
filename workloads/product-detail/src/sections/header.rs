//! Page header with brand and cart badge.

use pdp_core::view::ProductView;

use super::escape_html;

/// Render the header. The badge is omitted while the cart is empty.
pub fn render_header(view: &ProductView) -> String {
    let badge = match view.cart_badge {
        Some(count) => format!(r#"<span class="pdp-cart-badge">{}</span>"#, count),
        None => String::new(),
    };

    format!(
        r#"<header class="pdp-header" data-section="header">
    <span class="pdp-brand">{brand}</span>
    <div class="pdp-cart" aria-label="Cart">Cart{badge}</div>
</header>"#,
        brand = escape_html(&view.brand),
        badge = badge
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdp_core::prelude::*;

    #[test]
    fn test_badge_only_when_cart_has_items() {
        let mut widget =
            Controller::mount_virtual(&WidgetConfig::default(), StructuredLogger::disabled())
                .unwrap();
        assert!(!render_header(&widget.view()).contains("pdp-cart-badge"));

        widget.add_to_cart();
        let html = render_header(&widget.view());
        assert!(html.contains(r#"<span class="pdp-cart-badge">1</span>"#));
        assert!(html.contains("Timeless Co."));
    }
}
