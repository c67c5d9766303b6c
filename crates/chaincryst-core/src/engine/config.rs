use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CLASH_THRESHOLD: f64 = 2.0;
pub const DEFAULT_PADDING: f64 = 2.0;
pub const DEFAULT_CONTACT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_OUTPUT_EXTENSION: &str = "vasp";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How the planar offset between the two chains is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusPolicy {
    /// Derive the radius from the unit's in-plane bounding box.
    Auto,
    /// Use the given radius for every unit.
    Fixed(f64),
}

impl FromStr for RadiusPolicy {
    type Err = ConfigError;

    /// Parses `"auto"` (case-insensitive) or a positive, finite number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(RadiusPolicy::Auto);
        }
        let value: f64 = trimmed.parse().map_err(|_| ConfigError::InvalidValue {
            parameter: "radius",
            reason: format!("expected 'auto' or a number, got '{}'", s),
        })?;
        RadiusPolicy::fixed(value)
    }
}

impl RadiusPolicy {
    /// Creates a fixed radius policy, rejecting non-positive or non-finite values.
    pub fn fixed(value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "radius",
                reason: format!("must be a positive number, got {}", value),
            });
        }
        Ok(RadiusPolicy::Fixed(value))
    }
}

impl fmt::Display for RadiusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadiusPolicy::Auto => write!(f, "auto"),
            RadiusPolicy::Fixed(r) => write!(f, "{}", r),
        }
    }
}

/// Parameters of one crystal search, shared by every unit of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Samples per grid axis; the grid holds `n_samples³` candidates.
    pub n_samples: usize,
    pub radius: RadiusPolicy,
    /// Minimum admissible inter-chain atom distance, in Angstroms.
    pub clash_threshold: f64,
    /// Total in-plane vacuum added around an accepted crystal, in Angstroms.
    pub padding: f64,
    /// Distance below which atoms of an assembled crystal are reported as close contacts.
    pub contact_threshold: f64,
    /// File extension of generated structure files, without the dot.
    pub output_extension: String,
}

impl SearchConfig {
    /// Number of candidates evaluated per unit.
    pub fn candidates_per_unit(&self) -> usize {
        self.n_samples.pow(3)
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    n_samples: Option<usize>,
    radius: Option<RadiusPolicy>,
    clash_threshold: Option<f64>,
    padding: Option<f64>,
    contact_threshold: Option<f64>,
    output_extension: Option<String>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }
    pub fn radius(mut self, policy: RadiusPolicy) -> Self {
        self.radius = Some(policy);
        self
    }
    pub fn clash_threshold(mut self, threshold: f64) -> Self {
        self.clash_threshold = Some(threshold);
        self
    }
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }
    pub fn contact_threshold(mut self, threshold: f64) -> Self {
        self.contact_threshold = Some(threshold);
        self
    }
    pub fn output_extension(mut self, extension: &str) -> Self {
        self.output_extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let n_samples = self
            .n_samples
            .ok_or(ConfigError::MissingParameter("n_samples"))?;
        if n_samples < 2 {
            return Err(ConfigError::InvalidValue {
                parameter: "n_samples",
                reason: format!("at least 2 samples per axis are required, got {}", n_samples),
            });
        }
        let radius = self.radius.ok_or(ConfigError::MissingParameter("radius"))?;
        if let RadiusPolicy::Fixed(r) = radius {
            RadiusPolicy::fixed(r)?;
        }

        let clash_threshold = self.clash_threshold.unwrap_or(DEFAULT_CLASH_THRESHOLD);
        let padding = self.padding.unwrap_or(DEFAULT_PADDING);
        let contact_threshold = self.contact_threshold.unwrap_or(DEFAULT_CONTACT_THRESHOLD);
        for (parameter, value) in [
            ("clash_threshold", clash_threshold),
            ("padding", padding),
            ("contact_threshold", contact_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }

        let output_extension = self
            .output_extension
            .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string());
        if output_extension.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "output_extension",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(SearchConfig {
            n_samples,
            radius,
            clash_threshold,
            padding,
            contact_threshold,
            output_extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_documented_defaults() {
        let config = SearchConfigBuilder::new()
            .n_samples(5)
            .radius(RadiusPolicy::Auto)
            .build()
            .unwrap();

        assert_eq!(config.clash_threshold, 2.0);
        assert_eq!(config.padding, 2.0);
        assert_eq!(config.contact_threshold, 0.8);
        assert_eq!(config.output_extension, "vasp");
        assert_eq!(config.candidates_per_unit(), 125);
    }

    #[test]
    fn builder_requires_sample_count_and_radius() {
        let missing_n = SearchConfigBuilder::new().radius(RadiusPolicy::Auto).build();
        assert_eq!(missing_n, Err(ConfigError::MissingParameter("n_samples")));

        let missing_radius = SearchConfigBuilder::new().n_samples(3).build();
        assert_eq!(missing_radius, Err(ConfigError::MissingParameter("radius")));
    }

    #[test]
    fn builder_rejects_fewer_than_two_samples() {
        for n in [0, 1] {
            let result = SearchConfigBuilder::new()
                .n_samples(n)
                .radius(RadiusPolicy::Auto)
                .build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue {
                    parameter: "n_samples",
                    ..
                })
            ));
        }
        let two = SearchConfigBuilder::new()
            .n_samples(2)
            .radius(RadiusPolicy::Auto)
            .build();
        assert!(two.is_ok());
    }

    #[test]
    fn builder_rejects_negative_threshold() {
        let result = SearchConfigBuilder::new()
            .n_samples(3)
            .radius(RadiusPolicy::Auto)
            .clash_threshold(-1.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "clash_threshold",
                ..
            })
        ));
    }

    #[test]
    fn builder_strips_leading_dot_from_extension() {
        let config = SearchConfigBuilder::new()
            .n_samples(3)
            .radius(RadiusPolicy::Auto)
            .output_extension(".poscar")
            .build()
            .unwrap();
        assert_eq!(config.output_extension, "poscar");
    }

    #[test]
    fn radius_policy_parses_auto_and_numbers() {
        assert_eq!("auto".parse::<RadiusPolicy>(), Ok(RadiusPolicy::Auto));
        assert_eq!("AUTO".parse::<RadiusPolicy>(), Ok(RadiusPolicy::Auto));
        assert_eq!("6.5".parse::<RadiusPolicy>(), Ok(RadiusPolicy::Fixed(6.5)));
    }

    #[test]
    fn radius_policy_rejects_invalid_values() {
        assert!("near".parse::<RadiusPolicy>().is_err());
        assert!("0".parse::<RadiusPolicy>().is_err());
        assert!("-3.0".parse::<RadiusPolicy>().is_err());
        assert!("NaN".parse::<RadiusPolicy>().is_err());
    }

    #[test]
    fn radius_policy_display_round_trips() {
        assert_eq!(RadiusPolicy::Auto.to_string(), "auto");
        assert_eq!(RadiusPolicy::Fixed(6.5).to_string(), "6.5");
    }
}
