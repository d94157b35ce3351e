//! Widget instance identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one mounted widget instance.
///
/// A remount produces a fresh id, so log lines from a previous mount can be
/// told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a new instance ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("pdp-{:x}-{:x}", wall_clock_nanos(), seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// The browser target has no system clock; the counter alone keeps ids unique.
#[cfg(not(target_arch = "wasm32"))]
fn wall_clock_nanos() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn wall_clock_nanos() -> u64 {
    0
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
