//! Interactive Leptos component.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos_meta::*;

use pdp_core::config::WidgetConfig;
use pdp_core::image::{Gallery, ImageSlot};
use pdp_core::state::{Effect, Event, Rules, TimerId, ViewState};
use pdp_core::view::{thumbnail_alt, ProductView};
use pdp_observability::StructuredLogger;

use crate::sections::PDP_STYLES;

type TimerHandles = StoredValue<HashMap<TimerId, TimeoutHandle>>;

// ============================================================================
// App Component
// ============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Classic Leather Watch | Timeless Co."/>
        <Meta name="description" content="Product detail page"/>
        <Style>{PDP_STYLES}</Style>
        <ProductDetailPage/>
    }
}

/// The widget. Renders the demo product unless a config is passed.
#[component]
pub fn ProductDetailPage(#[prop(optional)] config: Option<WidgetConfig>) -> impl IntoView {
    let config = config.unwrap_or_default();

    match config.validate() {
        Ok(()) => view! { <ProductDetail config=config/> }.into_any(),
        Err(e) => view! {
            <div class="pdp-error">
                <p>"Unable to load product information: " {e.to_string()}</p>
            </div>
        }
        .into_any(),
    }
}

// ============================================================================
// Widget
// ============================================================================

#[component]
fn ProductDetail(config: WidgetConfig) -> impl IntoView {
    let product = config.product();
    let rules = config.rules_for(&product);
    let formatter = config.currency.formatter().unwrap_or_default();
    let message = config.notification.message.clone();
    let image_count = product.image_count();

    let state = RwSignal::new(ViewState::new());
    let gallery = RwSignal::new(Gallery::new(
        &product,
        &config.images.main_placeholder,
        &config.images.thumbnail_placeholder,
    ));
    let timers: TimerHandles = StoredValue::new(HashMap::new());
    let logger = StoredValue::new(config.logger());
    let product = StoredValue::new(product);

    logger.with_value(|l| {
        l.info_builder("Widget mounted")
            .field("product", product.with_value(|p| p.name.clone()))
            .field("policy", rules.policy.as_str())
            .emit()
    });

    let view_model = Memo::new(move |_| {
        let state = state.get();
        gallery.with(|gallery| {
            product.with_value(|product| {
                ProductView::project(product, &state, gallery, &formatter, &message)
            })
        })
    });

    let dispatch = move |event: Event| dispatch_event(event, state, timers, logger, rules);

    let report_failure = move |slot: ImageSlot| {
        let fresh = gallery.with_untracked(|g| {
            g.source(slot)
                .map(|source| !source.is_substituted())
                .unwrap_or(false)
        });
        if fresh {
            gallery.update(|g| {
                g.report_failure(slot);
            });
            logger.with_value(|l| {
                l.warn_builder("Image failed to load, using placeholder")
                    .field("slot", slot.label())
                    .field_u64("index", slot.index() as u64)
                    .emit()
            });
        }
    };

    on_cleanup(move || {
        let cancelled = timers
            .try_update_value(|handles| {
                let count = handles.len();
                for (_, handle) in handles.drain() {
                    handle.clear();
                }
                count
            })
            .unwrap_or(0);
        logger.try_with_value(|l| {
            l.info_builder("Widget unmounted")
                .field_u64("cancelled_timers", cancelled as u64)
                .emit()
        });
    });

    let initial = view_model.get_untracked();
    let stars = initial
        .stars
        .iter()
        .map(|glyph| view! { <span class=glyph.css_class()>{glyph.as_char().to_string()}</span> })
        .collect_view();

    let sale_info = initial
        .original_price
        .clone()
        .zip(initial.discount_badge.clone())
        .map(|(original, badge)| {
            view! {
                <span class="price-original">{original}</span>
                <span class="price-discount">{badge}</span>
            }
        });

    let thumbnails = (0..image_count)
        .map(|index| {
            let thumb = move || view_model.with(|v| v.thumbnails.get(index).cloned());
            view! {
                <button
                    type="button"
                    class=move || {
                        if thumb().map(|t| t.selected).unwrap_or(false) {
                            "pdp-thumbnail pdp-thumbnail--selected"
                        } else {
                            "pdp-thumbnail"
                        }
                    }
                    aria-pressed=move || thumb().map(|t| t.selected).unwrap_or(false).to_string()
                    on:click=move |_| dispatch(Event::SelectImage(index))
                >
                    <img
                        src=move || thumb().map(|t| t.src).unwrap_or_default()
                        alt=thumbnail_alt(index)
                        on:error=move |_| report_failure(ImageSlot::Thumbnail(index))
                    />
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="pdp">
            <header class="pdp-header">
                <span class="pdp-brand">{initial.brand.clone()}</span>
                <div class="pdp-cart" aria-label="Cart">
                    "Cart"
                    {move || view_model.with(|v| v.cart_badge).map(|count| view! {
                        <span class="pdp-cart-badge">{count.to_string()}</span>
                    })}
                </div>
            </header>

            <main class="pdp-main">
                <section class="pdp-gallery">
                    <img
                        class="pdp-image-main"
                        src=move || view_model.with(|v| v.main_image.src.clone())
                        alt=move || view_model.with(|v| v.main_image.alt.clone())
                        on:error=move |_| {
                            let index = state.with_untracked(|s| s.selected_image_index);
                            report_failure(ImageSlot::Main(index));
                        }
                    />
                    <div class="pdp-thumbnails">{thumbnails}</div>
                </section>

                <section class="pdp-details">
                    <h1 class="pdp-name">{initial.name.clone()}</h1>
                    <div class="pdp-rating">
                        <span class="rating-stars">{stars}</span>
                        <span class="pdp-review-count">{initial.review_label.clone()}</span>
                    </div>
                    <div class="pdp-price">
                        <span class="price-current">{initial.price.clone()}</span>
                        {sale_info}
                    </div>
                    <p class="pdp-description">{initial.description.clone()}</p>
                    <div class="pdp-actions">
                        <div class="pdp-stepper">
                            <button
                                type="button"
                                class="qty-btn"
                                disabled=move || !view_model.with(|v| v.decrement_enabled)
                                on:click=move |_| dispatch(Event::Decrement)
                            >
                                "-"
                            </button>
                            <span class="qty-value">
                                {move || view_model.with(|v| v.quantity.to_string())}
                            </span>
                            <button
                                type="button"
                                class="qty-btn"
                                on:click=move |_| dispatch(Event::Increment)
                            >
                                "+"
                            </button>
                        </div>
                        <button
                            type="button"
                            class="btn-add-to-cart"
                            on:click=move |_| dispatch(Event::AddToCart)
                        >
                            "Add to Cart"
                        </button>
                    </div>
                </section>
            </main>

            {move || view_model.with(|v| {
                v.notification.visible.then(|| {
                    let message = v.notification.message.clone();
                    view! { <div class="pdp-notification" role="status">{message}</div> }
                })
            })}
        </div>
    }
}

/// Apply an event to the signal and carry out its timer effects.
fn dispatch_event(
    event: Event,
    state: RwSignal<ViewState>,
    timers: TimerHandles,
    logger: StoredValue<StructuredLogger>,
    rules: Rules,
) {
    let transition = state.get_untracked().apply(event, &rules);

    if let Some(rejection) = transition.rejection {
        logger.with_value(|l| {
            l.debug_builder("Event rejected")
                .field("event", event.name())
                .field("reason", rejection.to_string())
                .emit()
        });
        return;
    }

    state.set(transition.state);
    for effect in transition.effects {
        match effect {
            Effect::ScheduleHide { timer, after } => {
                let fire = move || {
                    timers.update_value(|handles| {
                        handles.remove(&timer);
                    });
                    dispatch_event(Event::HideNotification(timer), state, timers, logger, rules);
                };
                match set_timeout_with_handle(fire, after) {
                    Ok(handle) => timers.update_value(|handles| {
                        handles.insert(timer, handle);
                    }),
                    Err(_) => logger.with_value(|l| {
                        l.error_builder("Failed to schedule hide timer")
                            .field("timer", timer.to_string())
                            .emit()
                    }),
                }
            }
            Effect::CancelHide(timer) => {
                let handle = timers
                    .try_update_value(|handles| handles.remove(&timer))
                    .flatten();
                if let Some(handle) = handle {
                    handle.clear();
                }
            }
        }
    }

    logger.with_value(|l| {
        l.debug_builder("Event applied")
            .field("event", event.name())
            .field_u64("cart_count", state.with_untracked(|s| s.cart_count))
            .emit()
    });
}
