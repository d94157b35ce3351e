//! Interaction scripts for `simulate` and `render --step`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pdp_core::controller::Controller;
use pdp_core::image::ImageSlot;
use pdp_core::state::Rejection;
use pdp_core::timer::HideScheduler;
use thiserror::Error;

/// One scripted interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Select(usize),
    Increment,
    Decrement,
    AddToCart,
    Wait(Duration),
    /// The main image currently shown fails to load.
    FailMain,
    FailThumbnail(usize),
    Unmount,
}

/// Errors from parsing a step.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StepError {
    #[error("Unknown step '{0}'")]
    Unknown(String),

    #[error("Step '{step}' needs a number, got '{value}'")]
    BadNumber { step: &'static str, value: String },
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match (name.to_lowercase().as_str(), arg) {
            ("select", Some(n)) => Ok(Step::Select(number("select", n)?)),
            ("inc" | "increment", None) => Ok(Step::Increment),
            ("dec" | "decrement", None) => Ok(Step::Decrement),
            ("add" | "add-to-cart", None) => Ok(Step::AddToCart),
            ("wait", Some(ms)) => Ok(Step::Wait(Duration::from_millis(number("wait", ms)?))),
            ("fail-main", None) => Ok(Step::FailMain),
            ("fail-thumb", Some(n)) => Ok(Step::FailThumbnail(number("fail-thumb", n)?)),
            ("unmount", None) => Ok(Step::Unmount),
            _ => Err(StepError::Unknown(s.to_string())),
        }
    }
}

fn number<T: FromStr>(step: &'static str, value: &str) -> Result<T, StepError> {
    value.trim().parse().map_err(|_| StepError::BadNumber {
        step,
        value: value.to_string(),
    })
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Select(i) => write!(f, "select:{}", i),
            Step::Increment => write!(f, "inc"),
            Step::Decrement => write!(f, "dec"),
            Step::AddToCart => write!(f, "add"),
            Step::Wait(d) => write!(f, "wait:{}", d.as_millis()),
            Step::FailMain => write!(f, "fail-main"),
            Step::FailThumbnail(i) => write!(f, "fail-thumb:{}", i),
            Step::Unmount => write!(f, "unmount"),
        }
    }
}

/// Parse every step, failing on the first bad one.
pub fn parse_steps(raw: &[String]) -> Result<Vec<Step>, StepError> {
    raw.iter().map(|s| s.parse()).collect()
}

/// What a non-wait step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Rejected(Rejection),
    ImageSubstituted(bool),
    Unmounted(usize),
}

/// Apply a step that does not involve time.
///
/// `Step::Wait` is clock-specific and left to the caller; it is reported as
/// applied here without effect.
pub fn apply_step<S: HideScheduler>(controller: &mut Controller<S>, step: Step) -> StepOutcome {
    let rejection = match step {
        Step::Select(i) => controller.select_thumbnail(i),
        Step::Increment => controller.increment(),
        Step::Decrement => controller.decrement(),
        Step::AddToCart => controller.add_to_cart(),
        Step::Wait(_) => None,
        Step::FailMain => {
            let index = controller.state().selected_image_index;
            return StepOutcome::ImageSubstituted(
                controller.report_image_failure(ImageSlot::Main(index)),
            );
        }
        Step::FailThumbnail(i) => {
            return StepOutcome::ImageSubstituted(
                controller.report_image_failure(ImageSlot::Thumbnail(i)),
            );
        }
        Step::Unmount => return StepOutcome::Unmounted(controller.unmount()),
    };

    match rejection {
        Some(rejection) => StepOutcome::Rejected(rejection),
        None => StepOutcome::Applied,
    }
}
