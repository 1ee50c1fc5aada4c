//! Precision levels and score classification.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum relevance a match must reach to be shown.
///
/// Variants are declared in threshold order, so the derived `Ord` agrees with
/// [`PrecisionLevel::threshold`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionLevel {
    /// Admit every match
    None,
    /// Admit loose matches
    Low,
    /// Admit only reasonably close matches
    #[default]
    Regular,
}

impl PrecisionLevel {
    /// All levels, lowest first.
    pub const ALL: [PrecisionLevel; 3] = [
        PrecisionLevel::None,
        PrecisionLevel::Low,
        PrecisionLevel::Regular,
    ];

    /// Minimum normalized score for this level.
    pub const fn threshold(self) -> u32 {
        match self {
            PrecisionLevel::None => 0,
            PrecisionLevel::Low => 20,
            PrecisionLevel::Regular => 50,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PrecisionLevel::None => "none",
            PrecisionLevel::Low => "low",
            PrecisionLevel::Regular => "regular",
        }
    }
}

impl fmt::Display for PrecisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrecisionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(PrecisionLevel::None),
            "low" => Ok(PrecisionLevel::Low),
            "regular" => Ok(PrecisionLevel::Regular),
            other => Err(format!(
                "invalid precision '{}' (expected one of: none, low, regular)",
                other
            )),
        }
    }
}

/// Outcome of classifying a raw score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Raw score when it clears the level, 0 otherwise.
    pub normalized: u32,
    pub passes: bool,
}

/// Classify `raw_score` against `level`.
pub fn classify(raw_score: u32, level: PrecisionLevel) -> Classification {
    let threshold = level.threshold();
    let normalized = if raw_score >= threshold { raw_score } else { 0 };
    Classification {
        normalized,
        passes: normalized >= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_thresholds() {
        for pair in PrecisionLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].threshold() < pair[1].threshold());
        }
    }

    #[test]
    fn test_default_is_regular() {
        assert_eq!(PrecisionLevel::default(), PrecisionLevel::Regular);
    }

    #[test]
    fn test_parse_and_display() {
        for level in PrecisionLevel::ALL {
            assert_eq!(level.to_string().parse::<PrecisionLevel>(), Ok(level));
        }
        assert_eq!("LOW".parse::<PrecisionLevel>(), Ok(PrecisionLevel::Low));
        assert!("high".parse::<PrecisionLevel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let yaml = serde_yaml::to_string(&PrecisionLevel::Low).unwrap();
        assert_eq!(yaml.trim(), "low");
        let level: PrecisionLevel = serde_yaml::from_str("regular").unwrap();
        assert_eq!(level, PrecisionLevel::Regular);
    }

    #[test]
    fn test_classify_at_threshold() {
        assert_eq!(
            classify(50, PrecisionLevel::Regular),
            Classification {
                normalized: 50,
                passes: true
            }
        );
        assert_eq!(
            classify(49, PrecisionLevel::Regular),
            Classification {
                normalized: 0,
                passes: false
            }
        );
    }

    #[test]
    fn test_zero_only_passes_none() {
        assert!(classify(0, PrecisionLevel::None).passes);
        assert!(!classify(0, PrecisionLevel::Low).passes);
        assert!(!classify(0, PrecisionLevel::Regular).passes);
    }

    #[test]
    fn test_classify_is_monotonic() {
        for raw in 0..200 {
            for (i, level) in PrecisionLevel::ALL.iter().enumerate() {
                if classify(raw, *level).passes {
                    for lower in &PrecisionLevel::ALL[..i] {
                        assert!(classify(raw, *lower).passes);
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalized_preserves_order() {
        for level in PrecisionLevel::ALL {
            for a in 0..150u32 {
                let b = a + 1;
                assert!(classify(b, level).normalized >= classify(a, level).normalized);
            }
        }
    }
}
