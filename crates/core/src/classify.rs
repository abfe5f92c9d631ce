use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{QuotaSnapshot, ResourceStatus, Tier};

pub const DEFAULT_GREEN_FLOOR: u64 = 700;
pub const DEFAULT_YELLOW_FLOOR: u64 = 300;

/// Breakpoints for the high-tier quota. Always `green_floor > yellow_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct Thresholds {
    green_floor: u64,
    yellow_floor: u64,
}

#[derive(Deserialize)]
struct RawThresholds {
    green_floor: u64,
    yellow_floor: u64,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = ThresholdError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Thresholds::new(raw.green_floor, raw.yellow_floor)
    }
}

/// Rejected threshold pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdError {
    pub green_floor: u64,
    pub yellow_floor: u64,
}

impl std::fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "green_floor ({}) must be greater than yellow_floor ({})",
            self.green_floor, self.yellow_floor
        )
    }
}

impl std::error::Error for ThresholdError {}

impl Thresholds {
    pub fn new(green_floor: u64, yellow_floor: u64) -> Result<Self, ThresholdError> {
        if green_floor <= yellow_floor {
            return Err(ThresholdError {
                green_floor,
                yellow_floor,
            });
        }
        Ok(Self {
            green_floor,
            yellow_floor,
        })
    }

    pub fn green_floor(&self) -> u64 {
        self.green_floor
    }

    pub fn yellow_floor(&self) -> u64 {
        self.yellow_floor
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            green_floor: DEFAULT_GREEN_FLOOR,
            yellow_floor: DEFAULT_YELLOW_FLOOR,
        }
    }
}

/// Maps the high-tier model's remaining quota to a tier. Absent counts as 0.
pub fn classify(
    high_quota: Option<u64>,
    thresholds: Thresholds,
    now: DateTime<Utc>,
) -> ResourceStatus {
    let high_quota = high_quota.unwrap_or(0);
    let (tier, recommendation, reasoning) = if high_quota > thresholds.green_floor {
        (Tier::Green, "use high-tier model freely", "quota abundant")
    } else if high_quota > thresholds.yellow_floor {
        (
            Tier::Yellow,
            "plan with high tier, execute with a cheaper tier",
            "quota moderate, conserve for reasoning tasks",
        )
    } else {
        (
            Tier::Red,
            "use cheapest/fallback tier only",
            "quota critically low",
        )
    };
    ResourceStatus {
        timestamp: now,
        high_quota,
        tier,
        recommendation: recommendation.to_string(),
        reasoning: reasoning.to_string(),
    }
}

pub fn status_for_snapshot(
    snapshot: &QuotaSnapshot,
    high_tier_model: &str,
    thresholds: Thresholds,
) -> ResourceStatus {
    let high_quota = snapshot
        .record(high_tier_model)
        .and_then(|record| record.remaining);
    classify(high_quota, thresholds, snapshot.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelQuotaRecord;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("ts")
            .with_timezone(&Utc)
    }

    fn tier_of(quota: u64, thresholds: Thresholds) -> Tier {
        classify(Some(quota), thresholds, now()).tier
    }

    #[test]
    fn classify_covers_each_band() {
        let thresholds = Thresholds::new(700, 300).expect("thresholds");
        for quota in [701, 900, u64::MAX] {
            assert_eq!(tier_of(quota, thresholds), Tier::Green, "quota {quota}");
        }
        for quota in [301, 500, 699] {
            assert_eq!(tier_of(quota, thresholds), Tier::Yellow, "quota {quota}");
        }
        for quota in [0, 1, 299] {
            assert_eq!(tier_of(quota, thresholds), Tier::Red, "quota {quota}");
        }
    }

    #[test]
    fn classify_boundaries_fall_into_lower_band() {
        let thresholds = Thresholds::new(700, 300).expect("thresholds");
        assert_eq!(tier_of(700, thresholds), Tier::Yellow);
        assert_eq!(tier_of(300, thresholds), Tier::Red);
    }

    #[test]
    fn classify_zero_yellow_floor() {
        let thresholds = Thresholds::new(10, 0).expect("thresholds");
        assert_eq!(tier_of(0, thresholds), Tier::Red);
        assert_eq!(tier_of(1, thresholds), Tier::Yellow);
        assert_eq!(tier_of(10, thresholds), Tier::Yellow);
        assert_eq!(tier_of(11, thresholds), Tier::Green);
    }

    #[test]
    fn classify_absent_quota_is_red() {
        let status = classify(None, Thresholds::default(), now());
        assert_eq!(status.tier, Tier::Red);
        assert_eq!(status.high_quota, 0);
        assert_eq!(status.recommendation, "use cheapest/fallback tier only");
    }

    #[test]
    fn thresholds_reject_inverted_floors() {
        assert!(Thresholds::new(300, 300).is_err());
        assert!(Thresholds::new(100, 300).is_err());
        let err = Thresholds::new(1, 2).unwrap_err();
        assert!(err.to_string().contains("green_floor (1)"));
    }

    #[test]
    fn thresholds_deserialize_validates() {
        let parsed: Result<Thresholds, _> =
            serde_json::from_str(r#"{"green_floor":10,"yellow_floor":20}"#);
        assert!(parsed.is_err());
        let parsed: Thresholds =
            serde_json::from_str(r#"{"green_floor":20,"yellow_floor":10}"#).expect("parse");
        assert_eq!(parsed.green_floor(), 20);
    }

    #[test]
    fn status_for_snapshot_uses_high_tier_record() {
        let snapshot = QuotaSnapshot {
            timestamp: now(),
            records: vec![
                ModelQuotaRecord {
                    identity: "Gemini 3 Flash".to_string(),
                    limit: Some(1000),
                    remaining: Some(900),
                    units: "credits".to_string(),
                },
                ModelQuotaRecord {
                    identity: "Gemini 3 Pro (High)".to_string(),
                    limit: Some(1000),
                    remaining: Some(450),
                    units: "credits".to_string(),
                },
            ],
            source: "state.vscdb".to_string(),
        };
        let status = status_for_snapshot(&snapshot, "Gemini 3 Pro (High)", Thresholds::default());
        assert_eq!(status.tier, Tier::Yellow);
        assert_eq!(status.high_quota, 450);
        assert_eq!(status.timestamp, now());

        let missing = status_for_snapshot(&snapshot, "Other", Thresholds::default());
        assert_eq!(missing.tier, Tier::Red);
    }

    #[test]
    fn classify_recommendation_text_per_tier() {
        let thresholds = Thresholds::default();
        let green = classify(Some(900), thresholds, now());
        assert_eq!(green.recommendation, "use high-tier model freely");
        assert_eq!(green.reasoning, "quota abundant");
        let yellow = classify(Some(500), thresholds, now());
        assert_eq!(
            yellow.recommendation,
            "plan with high tier, execute with a cheaper tier"
        );
        assert_eq!(yellow.reasoning, "quota moderate, conserve for reasoning tasks");
        let red = classify(Some(10), thresholds, now());
        assert_eq!(red.recommendation, "use cheapest/fallback tier only");
        assert_eq!(red.reasoning, "quota critically low");
    }
}
