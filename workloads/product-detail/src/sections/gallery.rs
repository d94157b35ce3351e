//! Image gallery renderer.

use pdp_core::view::{ProductView, ThumbnailView};

use super::escape_html;

/// Render the main image and the thumbnail strip.
pub fn render_gallery(view: &ProductView) -> String {
    let thumbnails: String = view.thumbnails.iter().map(render_thumbnail).collect();

    format!(
        r#"<section class="pdp-gallery" data-section="gallery">
    <img src="{src}" alt="{alt}" class="pdp-image-main">
    <div class="pdp-thumbnails">{thumbnails}</div>
</section>"#,
        src = escape_html(&view.main_image.src),
        alt = escape_html(&view.main_image.alt),
        thumbnails = thumbnails
    )
}

fn render_thumbnail(thumb: &ThumbnailView) -> String {
    let class = if thumb.selected {
        "pdp-thumbnail pdp-thumbnail--selected"
    } else {
        "pdp-thumbnail"
    };

    format!(
        r#"<button type="button" class="{class}" data-index="{index}" aria-pressed="{selected}"><img src="{src}" alt="{alt}"></button>"#,
        class = class,
        index = thumb.index,
        selected = thumb.selected,
        src = escape_html(&thumb.src),
        alt = escape_html(&thumb.alt)
    )
}
