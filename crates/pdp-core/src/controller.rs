//! A mounted widget instance.
//!
//! The [`Controller`] owns the state of one widget, feeds events through
//! [`ViewState::apply`], and carries out the resulting timer effects on a
//! [`HideScheduler`]. Hosts that are not Leptos (the CLI simulator, tests,
//! a server-side session) drive the widget through it.

use std::time::Duration;

use pdp_observability::StructuredLogger;

use crate::catalog::Product;
use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::image::{Gallery, ImageSlot};
use crate::money::CurrencyFormatter;
use crate::state::{Effect, Event, Rejection, Rules, TimerId, Transition, ViewState};
use crate::timer::{HideScheduler, VirtualScheduler};
use crate::view::ProductView;

/// One mounted product detail widget.
pub struct Controller<S: HideScheduler> {
    product: Product,
    rules: Rules,
    formatter: CurrencyFormatter,
    notification_message: String,
    state: ViewState,
    gallery: Gallery,
    scheduler: S,
    logger: StructuredLogger,
    mounted: bool,
}

impl<S: HideScheduler> Controller<S> {
    /// Validate `config` and mount a widget for its product.
    pub fn mount(
        config: &WidgetConfig,
        scheduler: S,
        logger: StructuredLogger,
    ) -> Result<Self, WidgetError> {
        config.validate()?;
        let product = config.product();
        product.validate()?;

        let rules = config.rules_for(&product);
        let gallery = Gallery::new(
            &product,
            &config.images.main_placeholder,
            &config.images.thumbnail_placeholder,
        );

        logger
            .info_builder("Widget mounted")
            .field("product", product.name.as_str())
            .field_u64("images", product.image_count() as u64)
            .field("policy", rules.policy.as_str())
            .duration_ms("notification_ms", rules.notification_duration)
            .emit();

        Ok(Self {
            formatter: config.currency.formatter()?,
            notification_message: config.notification.message.clone(),
            product,
            rules,
            state: ViewState::new(),
            gallery,
            scheduler,
            logger,
            mounted: true,
        })
    }

    /// Apply an event and run its timer effects.
    ///
    /// Returns the rejection, if the event was refused. After
    /// [`Controller::unmount`] every event is refused with
    /// [`Rejection::Unmounted`].
    pub fn dispatch(&mut self, event: Event) -> Option<Rejection> {
        if !self.mounted {
            self.logger
                .debug_builder("Event dropped after unmount")
                .field("event", event.name())
                .emit();
            return Some(Rejection::Unmounted);
        }

        let Transition {
            state,
            effects,
            rejection,
        } = self.state.apply(event, &self.rules);

        if let Some(rejection) = rejection {
            self.logger
                .debug_builder("Event rejected")
                .field("event", event.name())
                .field("reason", rejection.to_string())
                .emit();
            return Some(rejection);
        }

        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }

        if event == Event::AddToCart {
            self.logger
                .info_builder("Added to cart")
                .field_u64("quantity", u64::from(self.state.quantity))
                .field_u64("cart_count", self.state.cart_count)
                .emit();
        } else {
            self.logger
                .debug_builder("Event applied")
                .field("event", event.name())
                .field_u64("selected_image", self.state.selected_image_index as u64)
                .field_u64("quantity", u64::from(self.state.quantity))
                .field_bool("notification_visible", self.state.notification_visible)
                .emit();
        }
        None
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleHide { timer, after } => {
                self.scheduler.schedule(timer, after);
                self.logger
                    .debug_builder("Hide timer scheduled")
                    .field("timer", timer.to_string())
                    .duration_ms("after_ms", after)
                    .emit();
            }
            Effect::CancelHide(timer) => {
                let cancelled = self.scheduler.cancel(timer);
                self.logger
                    .debug_builder("Hide timer cancelled")
                    .field("timer", timer.to_string())
                    .field_bool("was_pending", cancelled)
                    .emit();
            }
        }
    }

    /// Feed a fired timer back in as an event.
    pub fn fire(&mut self, timer: TimerId) -> Option<Rejection> {
        self.logger
            .debug_builder("Hide timer fired")
            .field("timer", timer.to_string())
            .emit();
        self.dispatch(Event::HideNotification(timer))
    }

    /// Thumbnail click.
    pub fn select_thumbnail(&mut self, index: usize) -> Option<Rejection> {
        self.dispatch(Event::SelectImage(index))
    }

    pub fn increment(&mut self) -> Option<Rejection> {
        self.dispatch(Event::Increment)
    }

    pub fn decrement(&mut self) -> Option<Rejection> {
        self.dispatch(Event::Decrement)
    }

    pub fn add_to_cart(&mut self) -> Option<Rejection> {
        self.dispatch(Event::AddToCart)
    }

    /// An image element reported a load error.
    ///
    /// Returns `true` when the placeholder was substituted; repeat failures
    /// of the same slot are ignored.
    pub fn report_image_failure(&mut self, slot: ImageSlot) -> bool {
        let substituted = self.gallery.report_failure(slot);
        if substituted {
            self.logger
                .warn_builder("Image failed to load, using placeholder")
                .field("slot", slot.label())
                .field_u64("index", slot.index() as u64)
                .field("url", self.product.image(slot.index()).unwrap_or_default())
                .emit();
        }
        substituted
    }

    /// Tear the widget down and cancel its pending timers.
    ///
    /// Returns the number of timers cancelled. Idempotent.
    pub fn unmount(&mut self) -> usize {
        if !self.mounted {
            return 0;
        }
        self.mounted = false;
        let cancelled = self.scheduler.cancel_all();
        self.logger
            .info_builder("Widget unmounted")
            .field_u64("cancelled_timers", cancelled as u64)
            .field_u64("cart_count", self.state.cart_count)
            .emit();
        cancelled
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Render-ready projection of the current state.
    pub fn view(&self) -> ProductView {
        ProductView::project(
            &self.product,
            &self.state,
            &self.gallery,
            &self.formatter,
            &self.notification_message,
        )
    }
}

impl Controller<VirtualScheduler> {
    /// Mount on a fresh virtual clock.
    pub fn mount_virtual(
        config: &WidgetConfig,
        logger: StructuredLogger,
    ) -> Result<Self, WidgetError> {
        Self::mount(config, VirtualScheduler::new(), logger)
    }

    /// Advance the virtual clock and deliver every timer that came due.
    ///
    /// Returns the ids that fired, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let fired = self.scheduler.advance(by);
        for timer in &fired {
            self.fire(*timer);
        }
        fired
    }
}

#[cfg(feature = "tokio")]
impl Controller<crate::timer::TokioScheduler> {
    /// Wait for the next real timer and deliver it.
    ///
    /// Returns `None` once nothing is pending.
    pub async fn run_next_timer(&mut self) -> Option<TimerId> {
        let timer = self.scheduler.next_fired().await?;
        self.fire(timer);
        Some(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotificationPolicy;
    use pdp_observability::{InstanceId, LogCapture, LogLevel, LogSink};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn capturing_logger() -> (StructuredLogger, LogCapture) {
        let capture = LogCapture::new();
        let logger = StructuredLogger::new(InstanceId::from_string("test"))
            .with_min_level(LogLevel::Debug)
            .with_sink(LogSink::Memory(capture.clone()));
        (logger, capture)
    }

    fn mount(config: &WidgetConfig) -> Controller<VirtualScheduler> {
        Controller::mount_virtual(config, StructuredLogger::disabled()).unwrap()
    }

    #[test]
    fn test_mount_logs_product() {
        let (logger, capture) = capturing_logger();
        let controller = Controller::mount_virtual(&WidgetConfig::default(), logger).unwrap();

        assert!(controller.is_mounted());
        let mounted = capture.with_message("Widget mounted");
        assert_eq!(mounted.len(), 1);
        assert_eq!(
            mounted[0].field("product").and_then(|v| v.as_str()),
            Some("Classic Leather Watch")
        );
    }

    #[test]
    fn test_mount_rejects_invalid_config() {
        let config = WidgetConfig::default().with_notification_duration(Duration::ZERO);
        let result = Controller::mount_virtual(&config, StructuredLogger::disabled());
        assert!(matches!(result, Err(WidgetError::Config(_))));
    }

    #[test]
    fn test_add_to_cart_schedules_hide() {
        let mut controller = mount(&WidgetConfig::default());
        controller.increment();
        assert_eq!(controller.add_to_cart(), None);

        assert_eq!(controller.state().cart_count, 2);
        assert!(controller.state().notification_visible);
        assert_eq!(controller.scheduler().pending().len(), 1);

        assert!(controller.advance(ms(2999)).is_empty());
        assert!(controller.state().notification_visible);
        assert_eq!(controller.advance(ms(1)).len(), 1);
        assert!(!controller.state().notification_visible);
    }

    #[test]
    fn test_restart_policy_cancels_pending_timer() {
        let config = WidgetConfig::default().with_policy(NotificationPolicy::Restart);
        let mut controller = mount(&config);

        controller.add_to_cart();
        controller.advance(ms(2000));
        controller.add_to_cart();
        assert_eq!(controller.scheduler().pending().len(), 1);

        controller.advance(ms(1000));
        assert!(controller.state().notification_visible);
        controller.advance(ms(2000));
        assert!(!controller.state().notification_visible);
    }

    #[test]
    fn test_rejection_is_logged_not_applied() {
        let (logger, capture) = capturing_logger();
        let mut controller = Controller::mount_virtual(&WidgetConfig::default(), logger).unwrap();

        assert_eq!(controller.decrement(), Some(Rejection::DecrementDisabled));
        assert_eq!(controller.state().quantity, 1);
        assert_eq!(capture.with_message("Event rejected").len(), 1);
    }

    #[test]
    fn test_image_failure_warns_once() {
        let (logger, capture) = capturing_logger();
        let mut controller = Controller::mount_virtual(&WidgetConfig::default(), logger).unwrap();

        assert!(controller.report_image_failure(ImageSlot::Main(0)));
        assert!(!controller.report_image_failure(ImageSlot::Main(0)));
        assert_eq!(
            capture
                .with_message("Image failed to load, using placeholder")
                .len(),
            1
        );
        assert_eq!(
            controller.view().main_image.src,
            WidgetConfig::default().images.main_placeholder
        );
    }

    #[test]
    fn test_unmount_cancels_timers_and_drops_events() {
        let mut controller = mount(&WidgetConfig::default());
        controller.add_to_cart();
        controller.add_to_cart();

        assert_eq!(controller.unmount(), 2);
        assert_eq!(controller.unmount(), 0);
        assert!(controller.advance(ms(10_000)).is_empty());
        assert_eq!(controller.add_to_cart(), Some(Rejection::Unmounted));
        assert_eq!(controller.state().cart_count, 2);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_controller_hides_after_duration() {
        use crate::timer::TokioScheduler;

        let mut controller = Controller::mount(
            &WidgetConfig::default(),
            TokioScheduler::new(),
            StructuredLogger::disabled(),
        )
        .unwrap();

        controller.add_to_cart();
        let start = tokio::time::Instant::now();
        let fired = controller.run_next_timer().await;

        assert!(fired.is_some());
        assert!(start.elapsed() >= ms(3000));
        assert!(!controller.state().notification_visible);
        assert_eq!(controller.run_next_timer().await, None);
    }
}
