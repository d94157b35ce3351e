//! "Added to cart" banner.

use pdp_core::view::ProductView;

use super::escape_html;

/// Render the banner, or nothing while it is hidden.
pub fn render_notification(view: &ProductView) -> String {
    if !view.notification.visible {
        return String::new();
    }
    format!(
        r#"<div class="pdp-notification" role="status" data-section="notification">{}</div>"#,
        escape_html(&view.notification.message)
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use pdp_core::prelude::*;

    #[test]
    fn test_visible_only_after_add() {
        let mut widget =
            Controller::mount_virtual(&WidgetConfig::default(), StructuredLogger::disabled())
                .unwrap();
        assert_eq!(render_notification(&widget.view()), "");

        widget.add_to_cart();
        assert!(render_notification(&widget.view()).contains("Added to cart!"));

        widget.advance(Duration::from_millis(3000));
        assert_eq!(render_notification(&widget.view()), "");
    }
}
