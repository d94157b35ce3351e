//! Product detail widget - front end.
//!
//! Two renderers over the same `ProductView` projection:
//! - `app` - the interactive Leptos component (`ProductDetailPage`)
//! - `sections` - string renderers for a static HTML snapshot

pub mod app;
pub mod sections;

pub use app::{App, ProductDetailPage};
pub use sections::render_page;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
