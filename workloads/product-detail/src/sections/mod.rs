//! Section renderers for the static product detail snapshot.
//!
//! Each renderer turns part of a [`ProductView`] into an HTML fragment.
//! `render_page` stitches them into a standalone document.

mod details;
mod gallery;
mod header;
mod notification;

pub use details::*;
pub use gallery::*;
pub use header::*;
pub use notification::*;

use pdp_core::view::ProductView;

/// Render a complete HTML document for `view`.
pub fn render_page(view: &ProductView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
    <div class="pdp">
{header}
        <main class="pdp-main">
{gallery}
{details}
        </main>
{notification}
    </div>
</body>
</html>
"#,
        title = escape_html(&format!("{} | {}", view.name, view.brand)),
        styles = PDP_STYLES,
        header = render_header(view),
        gallery = render_gallery(view),
        details = render_details(view),
        notification = render_notification(view),
    )
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Stylesheet shared by the snapshot and the Leptos component.
pub const PDP_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f9fafb; color: #1f2937; }
.pdp { max-width: 1100px; margin: 0 auto; padding: 1.5rem; }

/* Header */
.pdp-header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 0; }
.pdp-brand { font-weight: 700; font-size: 1.25rem; }
.pdp-cart { position: relative; font-weight: 600; }
.pdp-cart-badge { position: absolute; top: -0.6rem; right: -1rem; background: #dc2626; color: white; border-radius: 9999px; font-size: 0.75rem; padding: 0.1rem 0.45rem; }

/* Gallery */
.pdp-main { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; background: white; padding: 2rem; border-radius: 8px; }
.pdp-image-main { width: 100%; aspect-ratio: 1; object-fit: cover; border-radius: 8px; }
.pdp-thumbnails { display: flex; gap: 0.5rem; margin-top: 1rem; }
.pdp-thumbnail { border: 2px solid transparent; border-radius: 6px; padding: 0; background: none; cursor: pointer; }
.pdp-thumbnail--selected { border-color: #4f46e5; }
.pdp-thumbnail img { width: 80px; height: 80px; object-fit: cover; border-radius: 4px; display: block; }

/* Details */
.pdp-name { font-size: 2rem; margin: 0 0 0.5rem; }
.pdp-rating { display: flex; align-items: center; gap: 0.5rem; color: #f59e0b; }
.pdp-review-count { color: #6b7280; font-size: 0.9rem; }
.pdp-price { margin: 1rem 0; }
.price-current { font-size: 2rem; font-weight: bold; color: #111827; }
.price-original { text-decoration: line-through; color: #6b7280; margin-left: 0.75rem; }
.price-discount { background: #dcfce7; color: #166534; padding: 0.2rem 0.5rem; border-radius: 4px; margin-left: 0.5rem; font-weight: 600; }
.pdp-description { line-height: 1.6; color: #4b5563; }
.pdp-actions { display: flex; gap: 1rem; align-items: center; margin-top: 1.5rem; }
.pdp-stepper { display: flex; align-items: center; border: 1px solid #d1d5db; border-radius: 6px; }
.qty-btn { width: 2.5rem; height: 2.5rem; border: none; background: none; font-size: 1.25rem; cursor: pointer; }
.qty-btn:disabled { color: #d1d5db; cursor: not-allowed; }
.qty-value { min-width: 2.5rem; text-align: center; font-weight: 600; }
.btn-add-to-cart { flex: 1; background: #4f46e5; color: white; border: none; border-radius: 6px; padding: 0.75rem 1.5rem; font-size: 1rem; font-weight: 600; cursor: pointer; }

/* Notification */
.pdp-notification { position: fixed; bottom: 1.5rem; right: 1.5rem; background: #16a34a; color: white; padding: 0.75rem 1.25rem; border-radius: 6px; box-shadow: 0 4px 12px rgba(0,0,0,0.15); }
"#;
