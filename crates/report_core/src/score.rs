pub const MAX_SCORE: f64 = 100.0;

/// Colour band for a score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
    Unknown,
}

impl ScoreBand {
    /// Band used for parameter and finding badges.
    pub fn for_badge(score: Option<f64>) -> Self {
        Self::banded(score, 80.0)
    }

    /// Band used for the overall score gauge, which is stricter at the top.
    pub fn for_overall(score: Option<f64>) -> Self {
        Self::banded(score, 85.0)
    }

    fn banded(score: Option<f64>, strong_from: f64) -> Self {
        match score {
            Some(value) if value.is_finite() && value >= strong_from => Self::Strong,
            Some(value) if value.is_finite() && value >= 50.0 => Self::Moderate,
            Some(value) if value.is_finite() => Self::Weak,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Unknown => "unknown",
        }
    }
}

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_SCORE)
}

/// Rounds to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Integer shown on a badge: nearest integer, halves rounded up, clamped to the score range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn badge(value: f64) -> u32 {
    (clamp_score(value) + 0.5).floor() as u32
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}

/// Fraction of a circular gauge to fill, 0.0 when the score is missing.
pub fn gauge_ratio(score: Option<f64>) -> f64 {
    score.map_or(0.0, |value| clamp_score(value) / MAX_SCORE)
}

pub fn format_score(score: Option<f64>) -> String {
    score
        .filter(|value| value.is_finite())
        .map_or_else(|| "N/A".to_string(), |value| format!("{value:.0}"))
}
