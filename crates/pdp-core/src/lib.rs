//! Core of the product detail widget.
//!
//! This crate holds everything about the widget that is not rendering:
//!
//! - **Catalog**: The product record and its validation
//! - **State**: `ViewState`, events and their pure transitions
//! - **Timers**: `HideScheduler` backends for the notification banner
//! - **Images**: One-shot placeholder fallback per image element
//! - **Formatting**: Currency grouping, star glyphs, review labels
//! - **Controller**: A mounted widget driven by events
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pdp_core::prelude::*;
//!
//! let mut widget =
//!     Controller::mount_virtual(&WidgetConfig::default(), StructuredLogger::disabled()).unwrap();
//!
//! widget.select_thumbnail(2);
//! widget.increment();
//! widget.add_to_cart();
//! assert_eq!(widget.view().cart_badge, Some(2));
//! assert!(widget.view().notification.visible);
//!
//! widget.advance(Duration::from_millis(3000));
//! assert!(!widget.view().notification.visible);
//! ```

pub mod error;
pub mod money;

pub mod catalog;
pub mod config;
pub mod controller;
pub mod image;
pub mod rating;
pub mod state;
pub mod timer;
pub mod view;

pub use error::{CatalogError, ConfigError, WidgetError};
pub use money::{format_currency, Currency, CurrencyFormatter, NumberLocale};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, ConfigError, WidgetError};
    pub use crate::money::{format_currency, Currency, CurrencyFormatter, NumberLocale};

    pub use crate::catalog::{Product, ProductBuilder};
    pub use crate::config::WidgetConfig;
    pub use crate::controller::Controller;
    pub use crate::image::{Gallery, ImageSlot, ImageSource};
    pub use crate::rating::{review_label, star_glyphs, StarGlyph};
    pub use crate::state::{
        Effect, Event, NotificationPolicy, Rejection, Rules, TimerId, Transition, ViewState,
    };
    #[cfg(feature = "tokio")]
    pub use crate::timer::TokioScheduler;
    pub use crate::timer::{HideScheduler, VirtualScheduler};
    pub use crate::view::ProductView;

    pub use pdp_observability::StructuredLogger;
}
