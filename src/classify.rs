//! Pure classification rules over already-fetched analytics numbers.
//!
//! Thresholds are part of the product contract and are pinned by tests:
//! probability tiers are inclusive (`>=`), gap/pace tiers are exclusive
//! (`>`). Do not normalize the two styles.

use ratatui::style::Color;

use crate::api_fetch::TeamComparison;

/// Four-tier bucket for tournament probability and readiness scores.
/// Variants are declared worst-first so `Ord` tracks favorability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProbabilityTier {
    Poor,
    Fair,
    Good,
    Elite,
}

pub fn probability_tier(probability: f64) -> ProbabilityTier {
    if probability >= 0.8 {
        ProbabilityTier::Elite
    } else if probability >= 0.6 {
        ProbabilityTier::Good
    } else if probability >= 0.4 {
        ProbabilityTier::Fair
    } else {
        ProbabilityTier::Poor
    }
}

pub fn probability_tier_label(tier: ProbabilityTier) -> &'static str {
    match tier {
        ProbabilityTier::Elite => "ELITE",
        ProbabilityTier::Good => "GOOD",
        ProbabilityTier::Fair => "FAIR",
        ProbabilityTier::Poor => "POOR",
    }
}

pub fn probability_tier_color(tier: ProbabilityTier) -> Color {
    match tier {
        ProbabilityTier::Elite => Color::Green,
        ProbabilityTier::Good => Color::Blue,
        ProbabilityTier::Fair => Color::Yellow,
        ProbabilityTier::Poor => Color::Red,
    }
}

/// Three-band bucket for bubble-team probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BubbleBand {
    Fading,
    Tossup,
    Solid,
}

pub fn bubble_band(probability: f64) -> BubbleBand {
    if probability >= 0.6 {
        BubbleBand::Solid
    } else if probability >= 0.4 {
        BubbleBand::Tossup
    } else {
        BubbleBand::Fading
    }
}

pub fn bubble_band_label(band: BubbleBand) -> &'static str {
    match band {
        BubbleBand::Solid => "SOLID",
        BubbleBand::Tossup => "TOSSUP",
        BubbleBand::Fading => "FADING",
    }
}

pub fn bubble_band_color(band: BubbleBand) -> Color {
    match band {
        BubbleBand::Solid => Color::Green,
        BubbleBand::Tossup => Color::Yellow,
        BubbleBand::Fading => Color::Red,
    }
}

/// Five-tier bucket for national percentiles in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PercentileTier {
    Poor,
    BelowAverage,
    AboveAverage,
    VeryGood,
    Elite,
}

pub fn percentile_tier(percentile: f64) -> PercentileTier {
    if percentile >= 90.0 {
        PercentileTier::Elite
    } else if percentile >= 75.0 {
        PercentileTier::VeryGood
    } else if percentile >= 50.0 {
        PercentileTier::AboveAverage
    } else if percentile >= 25.0 {
        PercentileTier::BelowAverage
    } else {
        PercentileTier::Poor
    }
}

pub fn percentile_tier_label(tier: PercentileTier) -> &'static str {
    match tier {
        PercentileTier::Elite => "Elite",
        PercentileTier::VeryGood => "Very Good",
        PercentileTier::AboveAverage => "Above Average",
        PercentileTier::BelowAverage => "Below Average",
        PercentileTier::Poor => "Poor",
    }
}

pub fn percentile_tier_color(tier: PercentileTier) -> Color {
    match tier {
        PercentileTier::Elite => Color::Green,
        PercentileTier::VeryGood => Color::Blue,
        PercentileTier::AboveAverage => Color::Yellow,
        PercentileTier::BelowAverage => Color::LightRed,
        PercentileTier::Poor => Color::Red,
    }
}

/// Categorical risk level as supplied by the backend. Unrecognized labels
/// fall back to `Low`, matching how the dashboard always renders a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

pub fn risk_level(label: &str) -> RiskLevel {
    match label {
        "High" => RiskLevel::High,
        "Medium" => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

pub fn risk_level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::High => Color::Red,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::Low => Color::Green,
    }
}

pub fn potential_level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::High => Color::Magenta,
        RiskLevel::Medium => Color::Blue,
        RiskLevel::Low => Color::Gray,
    }
}

/// Composes the matchup insight sentences for a head-to-head comparison.
///
/// Five rule groups evaluate in fixed order and each emits one sentence;
/// the experience group is skipped when the backend sends no edge, so the
/// result always has four or five entries.
pub fn comparison_insights(comparison: &TeamComparison) -> Vec<String> {
    let mut sentences = Vec::with_capacity(5);
    let diffs = &comparison.key_differences;

    if comparison.win_probability > 0.7 {
        sentences.push(format!(
            "{} has a strong statistical advantage",
            comparison.winner_prediction
        ));
    } else if comparison.win_probability < 0.55 {
        sentences.push("Very close matchup - could go either way".to_string());
    } else {
        sentences.push(format!(
            "{} has a slight edge in this matchup",
            comparison.winner_prediction
        ));
    }

    // A positive gap favors team1.
    let gap = diffs.efficiency_gap;
    let favored = if gap > 0.0 {
        &comparison.team1
    } else {
        &comparison.team2
    };
    if gap.abs() > 15.0 {
        sentences.push(format!("Large efficiency gap favors {favored}"));
    } else if gap.abs() > 8.0 {
        sentences.push(format!("Notable efficiency gap favors {favored}"));
    } else {
        sentences.push("Teams are well-matched in overall efficiency".to_string());
    }

    let pace = diffs.pace_difference.abs();
    if pace > 8.0 {
        sentences.push("Major pace difference could create style clash".to_string());
    } else if pace > 4.0 {
        sentences.push("Significant pace difference could create style clash".to_string());
    } else {
        sentences.push("Similar playing styles should lead to a balanced game".to_string());
    }

    if diffs.offensive_advantage == diffs.defensive_advantage {
        sentences.push(format!(
            "{} has advantages on both ends of the court",
            diffs.offensive_advantage
        ));
    } else {
        sentences.push(format!(
            "Contrasting strengths: {} offense vs {} defense",
            diffs.offensive_advantage, diffs.defensive_advantage
        ));
    }

    if let Some(edge) = diffs.experience_edge.as_deref()
        && !edge.is_empty()
    {
        sentences.push(format!(
            "Experience could be a factor with {edge} having the veteran edge"
        ));
    }

    sentences
}
