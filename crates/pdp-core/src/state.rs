//! View state and its pure transitions.
//!
//! Every user action is an [`Event`]. Applying an event to a [`ViewState`]
//! never mutates it in place: [`ViewState::apply`] returns a [`Transition`]
//! with the next state, the timer effects the host must carry out, and the
//! reason the event was refused, if it was.
//!
//! ```text
//!   click ──► Event ──► ViewState::apply(rules) ──► Transition
//!                                                   ├─ state    ──► re-render
//!                                                   ├─ effects  ──► HideScheduler
//!                                                   └─ rejection ─► log
//!   timer fires ──► Event::HideNotification(id) ──► (same path)
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// How long the "added to cart" notification stays up.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

/// What happens when "Add to Cart" is clicked while a hide timer is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPolicy {
    /// Every timer hides the notification when it fires, even if a later
    /// click re-showed it in the meantime.
    #[default]
    Independent,
    /// A new click cancels the pending timer; only the latest timer hides.
    Restart,
}

impl NotificationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPolicy::Independent => "independent",
            NotificationPolicy::Restart => "restart",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "independent" => Some(NotificationPolicy::Independent),
            "restart" => Some(NotificationPolicy::Restart),
            _ => None,
        }
    }
}

/// Identifier of one scheduled hide timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Fixed parameters the transitions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Number of gallery images; valid indices are `0..image_count`.
    pub image_count: usize,
    /// Delay before the notification hides.
    pub notification_duration: Duration,
    /// Re-entrancy policy for the hide timer.
    pub policy: NotificationPolicy,
}

impl Rules {
    /// Default rules for a product.
    pub fn for_product(product: &Product) -> Self {
        Self {
            image_count: product.image_count(),
            notification_duration: NOTIFICATION_DURATION,
            policy: NotificationPolicy::default(),
        }
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn with_policy(mut self, policy: NotificationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A user action or timer fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Thumbnail `index` was clicked.
    SelectImage(usize),
    /// "+" was clicked.
    Increment,
    /// "-" was clicked.
    Decrement,
    /// "Add to Cart" was clicked.
    AddToCart,
    /// A hide timer fired.
    HideNotification(TimerId),
}

impl Event {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SelectImage(_) => "select_image",
            Event::Increment => "increment",
            Event::Decrement => "decrement",
            Event::AddToCart => "add_to_cart",
            Event::HideNotification(_) => "hide_notification",
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fire `Event::HideNotification(timer)` once, after `after`.
    ScheduleHide { timer: TimerId, after: Duration },
    /// Drop a previously scheduled timer.
    CancelHide(TimerId),
}

/// Why an event left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Decrement is disabled at the minimum quantity.
    DecrementDisabled,
    /// Thumbnail index outside the gallery.
    ImageOutOfRange { index: usize, len: usize },
    /// A superseded timer fired under [`NotificationPolicy::Restart`].
    StaleTimer(TimerId),
    /// The widget is no longer mounted. Only the controller reports this.
    Unmounted,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DecrementDisabled => write!(f, "decrement disabled at minimum quantity"),
            Rejection::ImageOutOfRange { index, len } => {
                write!(f, "image index {} out of range (len {})", index, len)
            }
            Rejection::StaleTimer(id) => write!(f, "{} was superseded", id),
            Rejection::Unmounted => write!(f, "widget is unmounted"),
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: ViewState,
    /// Timer work for the host, in order.
    pub effects: Vec<Effect>,
    /// Set when the event was refused.
    pub rejection: Option<Rejection>,
}

impl Transition {
    fn applied(state: ViewState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            rejection: None,
        }
    }

    fn rejected(state: ViewState, rejection: Rejection) -> Self {
        Self {
            state,
            effects: Vec::new(),
            rejection: Some(rejection),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Minimum selectable quantity.
pub const MIN_QUANTITY: u32 = 1;

/// Mutable data behind the widget, owned by one mounted instance.
///
/// Invariants: `selected_image_index < image_count`, `quantity >= 1`, and
/// `cart_count` never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub selected_image_index: usize,
    pub quantity: u32,
    pub cart_count: u64,
    pub notification_visible: bool,
    /// Most recently scheduled hide timer that has not fired.
    #[serde(skip)]
    active_timer: Option<TimerId>,
    #[serde(skip)]
    next_timer: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// State of a freshly mounted widget.
    pub fn new() -> Self {
        Self {
            selected_image_index: 0,
            quantity: MIN_QUANTITY,
            cart_count: 0,
            notification_visible: false,
            active_timer: None,
            next_timer: 1,
        }
    }

    /// Whether the decrement control is enabled.
    pub fn can_decrement(&self) -> bool {
        self.quantity > MIN_QUANTITY
    }

    /// Cart badge value; hidden while the cart is empty.
    pub fn cart_badge(&self) -> Option<u64> {
        (self.cart_count > 0).then_some(self.cart_count)
    }

    /// Latest hide timer still pending.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.active_timer
    }

    /// Apply an event.
    pub fn apply(&self, event: Event, rules: &Rules) -> Transition {
        match event {
            Event::SelectImage(index) => self.select_image(index, rules),
            Event::Increment => self.increment(),
            Event::Decrement => self.decrement(),
            Event::AddToCart => self.add_to_cart(rules),
            Event::HideNotification(timer) => self.hide_notification(timer, rules),
        }
    }

    fn select_image(&self, index: usize, rules: &Rules) -> Transition {
        if index >= rules.image_count {
            return Transition::rejected(
                *self,
                Rejection::ImageOutOfRange {
                    index,
                    len: rules.image_count,
                },
            );
        }
        Transition::applied(Self {
            selected_image_index: index,
            ..*self
        })
    }

    fn increment(&self) -> Transition {
        Transition::applied(Self {
            quantity: self.quantity.saturating_add(1),
            ..*self
        })
    }

    fn decrement(&self) -> Transition {
        if !self.can_decrement() {
            return Transition::rejected(*self, Rejection::DecrementDisabled);
        }
        Transition::applied(Self {
            quantity: self.quantity - 1,
            ..*self
        })
    }

    fn add_to_cart(&self, rules: &Rules) -> Transition {
        let timer = TimerId(self.next_timer);
        let mut effects = Vec::with_capacity(2);

        if rules.policy == NotificationPolicy::Restart {
            if let Some(previous) = self.active_timer {
                effects.push(Effect::CancelHide(previous));
            }
        }
        effects.push(Effect::ScheduleHide {
            timer,
            after: rules.notification_duration,
        });

        Transition {
            state: Self {
                cart_count: self.cart_count.saturating_add(u64::from(self.quantity)),
                notification_visible: true,
                active_timer: Some(timer),
                next_timer: self.next_timer + 1,
                ..*self
            },
            effects,
            rejection: None,
        }
    }

    fn hide_notification(&self, timer: TimerId, rules: &Rules) -> Transition {
        let is_latest = self.active_timer == Some(timer);

        if rules.policy == NotificationPolicy::Restart && !is_latest {
            return Transition::rejected(*self, Rejection::StaleTimer(timer));
        }

        Transition::applied(Self {
            notification_visible: false,
            active_timer: if is_latest { None } else { self.active_timer },
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Rules {
        Rules::for_product(&Product::classic_leather_watch())
    }

    fn run(state: ViewState, events: &[Event], rules: &Rules) -> ViewState {
        events
            .iter()
            .fold(state, |s, e| s.apply(*e, rules).state)
    }

    fn scheduled_timer(transition: &Transition) -> TimerId {
        transition
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleHide { timer, .. } => Some(*timer),
                _ => None,
            })
            .expect("add to cart schedules a timer")
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert_eq!(state.selected_image_index, 0);
        assert_eq!(state.quantity, 1);
        assert_eq!(state.cart_count, 0);
        assert!(!state.notification_visible);
        assert!(!state.can_decrement());
        assert_eq!(state.cart_badge(), None);
    }

    #[test]
    fn test_select_image() {
        let rules = rules();
        let t = ViewState::new().apply(Event::SelectImage(2), &rules);
        assert_eq!(t.state.selected_image_index, 2);
        assert!(t.effects.is_empty());

        let again = t.state.apply(Event::SelectImage(2), &rules);
        assert_eq!(again.state, t.state);
        assert!(!again.is_rejected());
    }

    #[test]
    fn test_select_image_out_of_range() {
        let rules = rules();
        let t = ViewState::new().apply(Event::SelectImage(4), &rules);
        assert_eq!(t.state, ViewState::new());
        assert_eq!(
            t.rejection,
            Some(Rejection::ImageOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_increment_and_decrement() {
        let rules = rules();
        let state = run(
            ViewState::new(),
            &[Event::Increment, Event::Increment, Event::Decrement],
            &rules,
        );
        assert_eq!(state.quantity, 2);
        assert!(state.can_decrement());
    }

    #[test]
    fn test_decrement_disabled_at_one() {
        let t = ViewState::new().apply(Event::Decrement, &rules());
        assert_eq!(t.state.quantity, 1);
        assert_eq!(t.rejection, Some(Rejection::DecrementDisabled));
    }

    #[test]
    fn test_decrement_never_below_one() {
        let rules = rules();
        let mut state = ViewState::new();
        for _ in 0..10 {
            state = state.apply(Event::Decrement, &rules).state;
            assert!(state.quantity >= MIN_QUANTITY);
        }
        assert_eq!(state.quantity, 1);
    }

    #[test]
    fn test_increment_saturates() {
        let state = ViewState {
            quantity: u32::MAX,
            ..ViewState::new()
        };
        let t = state.apply(Event::Increment, &rules());
        assert_eq!(t.state.quantity, u32::MAX);
    }

    #[test]
    fn test_add_to_cart_adds_quantity() {
        let rules = rules();
        let state = run(ViewState::new(), &[Event::Increment, Event::Increment], &rules);
        let before = ViewState {
            cart_count: 5,
            ..state
        };

        let t = before.apply(Event::AddToCart, &rules);
        assert_eq!(t.state.cart_count, 8);
        assert_eq!(t.state.quantity, 3);
        assert!(t.state.notification_visible);
        assert_eq!(t.state.cart_badge(), Some(8));
        assert_eq!(
            t.effects,
            vec![Effect::ScheduleHide {
                timer: scheduled_timer(&t),
                after: NOTIFICATION_DURATION
            }]
        );
    }

    #[test]
    fn test_hide_notification() {
        let rules = rules();
        let shown = ViewState::new().apply(Event::AddToCart, &rules);
        let timer = scheduled_timer(&shown);

        let hidden = shown.state.apply(Event::HideNotification(timer), &rules);
        assert!(!hidden.state.notification_visible);
        assert_eq!(hidden.state.active_timer(), None);
        assert_eq!(hidden.state.cart_count, 1);
    }

    #[test]
    fn test_independent_policy_early_timer_hides() {
        let rules = rules().with_policy(NotificationPolicy::Independent);
        let first = ViewState::new().apply(Event::AddToCart, &rules);
        let second = first.state.apply(Event::AddToCart, &rules);

        // No cancellation under the independent policy.
        assert_eq!(second.effects.len(), 1);
        assert_ne!(scheduled_timer(&first), scheduled_timer(&second));

        let after_first_fire = second
            .state
            .apply(Event::HideNotification(scheduled_timer(&first)), &rules);
        assert!(!after_first_fire.state.notification_visible);
        assert!(!after_first_fire.is_rejected());
        // The later timer is still the active one.
        assert_eq!(
            after_first_fire.state.active_timer(),
            Some(scheduled_timer(&second))
        );
    }

    #[test]
    fn test_restart_policy_cancels_previous() {
        let rules = rules().with_policy(NotificationPolicy::Restart);
        let first = ViewState::new().apply(Event::AddToCart, &rules);
        let first_timer = scheduled_timer(&first);
        let second = first.state.apply(Event::AddToCart, &rules);
        let second_timer = scheduled_timer(&second);

        assert_eq!(second.effects[0], Effect::CancelHide(first_timer));
        assert_eq!(second.state.cart_count, 2);

        let stale = second
            .state
            .apply(Event::HideNotification(first_timer), &rules);
        assert!(stale.state.notification_visible);
        assert_eq!(stale.rejection, Some(Rejection::StaleTimer(first_timer)));

        let latest = stale
            .state
            .apply(Event::HideNotification(second_timer), &rules);
        assert!(!latest.state.notification_visible);
    }

    #[test]
    fn test_custom_duration() {
        let rules = rules().with_notification_duration(Duration::from_millis(500));
        let t = ViewState::new().apply(Event::AddToCart, &rules);
        assert!(matches!(
            t.effects[0],
            Effect::ScheduleHide { after, .. } if after == Duration::from_millis(500)
        ));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(NotificationPolicy::parse("Restart"), Some(NotificationPolicy::Restart));
        assert_eq!(NotificationPolicy::parse("nope"), None);
        assert_eq!(NotificationPolicy::default().as_str(), "independent");
    }
}
