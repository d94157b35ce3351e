//! Widget configuration.

use std::time::Duration;

use pdp_observability::{InstanceId, LogFormat, LogLevel, StructuredLogger};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::ConfigError;
use crate::image::{MAIN_PLACEHOLDER, THUMBNAIL_PLACEHOLDER};
use crate::money::{Currency, CurrencyFormatter, NumberLocale};
use crate::state::{NotificationPolicy, Rules, NOTIFICATION_DURATION};

/// Configuration for one product detail widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Notification banner behavior.
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Currency and number formatting.
    #[serde(default)]
    pub currency: CurrencyConfig,

    /// Image fallback placeholders.
    #[serde(default)]
    pub images: ImageConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog record to display; the demo watch when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl WidgetConfig {
    /// Load and validate config from a file (`.json` or TOML).
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it.
    pub fn read(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        if path.ends_with(".json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse TOML without validating.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON without validating.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification.duration_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "notification.duration_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.notification.message.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "notification.message",
                reason: "must not be empty".to_string(),
            });
        }
        self.currency.formatter()?;
        if self.images.main_placeholder.trim().is_empty()
            || self.images.thumbnail_placeholder.trim().is_empty()
        {
            return Err(ConfigError::Invalid {
                key: "images",
                reason: "placeholders must not be empty".to_string(),
            });
        }
        if let Some(product) = &self.product {
            product.validate()?;
        }
        Ok(())
    }

    /// The catalog record to display.
    pub fn product(&self) -> Product {
        self.product.clone().unwrap_or_default()
    }

    /// Transition rules for `product`.
    pub fn rules_for(&self, product: &Product) -> Rules {
        Rules::for_product(product)
            .with_notification_duration(self.notification.duration())
            .with_policy(self.notification.policy)
    }

    /// Logger for a newly mounted widget instance.
    pub fn logger(&self) -> StructuredLogger {
        StructuredLogger::new(InstanceId::generate())
            .with_component("product-detail")
            .with_min_level(self.logging.level)
            .with_format(self.logging.format)
    }

    /// Set the notification duration.
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the notification re-entrancy policy.
    pub fn with_policy(mut self, policy: NotificationPolicy) -> Self {
        self.notification.policy = policy;
        self
    }

    /// Set the currency pairing.
    pub fn with_currency(mut self, currency: Currency, locale: NumberLocale) -> Self {
        self.currency.code = currency.code().to_string();
        self.currency.locale = locale.tag().to_string();
        self
    }

    /// Set the product record.
    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    /// Set the minimum log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.logging.level = level;
        self
    }
}

/// Notification banner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long the banner stays visible, in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// What a second click does to a pending hide timer.
    #[serde(default)]
    pub policy: NotificationPolicy,

    /// Banner text.
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_duration_ms() -> u64 {
    NOTIFICATION_DURATION.as_millis() as u64
}

fn default_message() -> String {
    "Added to cart!".to_string()
}

impl NotificationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            policy: NotificationPolicy::default(),
            message: default_message(),
        }
    }
}

/// Currency display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// ISO currency code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Locale tag controlling digit grouping.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_currency_code() -> String {
    Currency::INR.code().to_string()
}

fn default_locale() -> String {
    NumberLocale::EnIn.tag().to_string()
}

impl CurrencyConfig {
    /// Resolve the configured pairing.
    pub fn formatter(&self) -> Result<CurrencyFormatter, ConfigError> {
        let currency = Currency::from_code(&self.code)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.code.clone()))?;
        let locale = NumberLocale::parse(&self.locale)
            .ok_or_else(|| ConfigError::UnknownLocale(self.locale.clone()))?;
        Ok(CurrencyFormatter::new(currency, locale))
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency_code(),
            locale: default_locale(),
        }
    }
}

/// Image fallback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_main_placeholder")]
    pub main_placeholder: String,

    #[serde(default = "default_thumbnail_placeholder")]
    pub thumbnail_placeholder: String,
}

fn default_main_placeholder() -> String {
    MAIN_PLACEHOLDER.to_string()
}

fn default_thumbnail_placeholder() -> String {
    THUMBNAIL_PLACEHOLDER.to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            main_placeholder: default_main_placeholder(),
            thumbnail_placeholder: default_thumbnail_placeholder(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}
