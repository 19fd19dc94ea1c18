//! Configuration types for the expression builder.

use chrono_tz::Tz;

/// Default number of fractional digits for geolocations.
pub const DEFAULT_GEO_PRECISION: usize = 12;

/// Configuration for the [`ExpressionBuilder`](crate::ExpressionBuilder).
///
/// # Example
///
/// ```rust
/// use solr_query::{BuilderConfig, ExpressionBuilder};
/// use chrono_tz::Tz;
///
/// let config = BuilderConfig::builder()
///     .with_default_timezone(Tz::Europe__Berlin)
///     .with_geo_precision(6)
///     .build();
///
/// let eb = ExpressionBuilder::with_config(config);
/// assert_eq!(eb.default_timezone(), Tz::Europe__Berlin);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuilderConfig {
    /// Timezone dates are converted to before rendering.
    pub default_timezone: Tz,
    /// Fractional digits used by `lat_long` when no precision is given.
    pub geo_precision: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_timezone: Tz::UTC,
            geo_precision: DEFAULT_GEO_PRECISION,
        }
    }
}

impl BuilderConfig {
    /// Creates a new builder for BuilderConfig.
    pub fn builder() -> BuilderConfigBuilder {
        BuilderConfigBuilder::default()
    }
}

/// Builder for BuilderConfig.
#[derive(Debug, Clone, Default)]
pub struct BuilderConfigBuilder {
    config: BuilderConfig,
}

impl BuilderConfigBuilder {
    /// Sets the default timezone.
    pub fn with_default_timezone(mut self, timezone: Tz) -> Self {
        self.config.default_timezone = timezone;
        self
    }

    /// Sets the default geolocation precision.
    pub fn with_geo_precision(mut self, precision: usize) -> Self {
        self.config.geo_precision = precision;
        self
    }

    /// Builds the BuilderConfig.
    pub fn build(self) -> BuilderConfig {
        self.config
    }
}
