use madness_terminal::api_fetch::{KeyDifferences, TeamComparison};
use madness_terminal::classify::{
    BubbleBand, PercentileTier, ProbabilityTier, RiskLevel, bubble_band, comparison_insights,
    percentile_tier, probability_tier, probability_tier_label, risk_level,
};

fn comparison(
    win_probability: f64,
    efficiency_gap: f64,
    pace_difference: f64,
    offensive: &str,
    defensive: &str,
    experience_edge: Option<&str>,
) -> TeamComparison {
    TeamComparison {
        team1: "Duke".to_string(),
        team2: "Houston".to_string(),
        winner_prediction: "Duke".to_string(),
        win_probability,
        key_differences: KeyDifferences {
            efficiency_gap,
            offensive_advantage: offensive.to_string(),
            defensive_advantage: defensive.to_string(),
            pace_difference,
            experience_edge: experience_edge.map(str::to_string),
        },
    }
}

#[test]
fn probability_tier_boundaries_are_inclusive() {
    assert_eq!(probability_tier(0.8), ProbabilityTier::Elite);
    assert_eq!(probability_tier(0.7999), ProbabilityTier::Good);
    assert_eq!(probability_tier(0.6), ProbabilityTier::Good);
    assert_eq!(probability_tier(0.5999), ProbabilityTier::Fair);
    assert_eq!(probability_tier(0.4), ProbabilityTier::Fair);
    assert_eq!(probability_tier(0.3999), ProbabilityTier::Poor);
    assert_eq!(probability_tier(0.0), ProbabilityTier::Poor);
    assert_eq!(probability_tier(1.0), ProbabilityTier::Elite);
}

#[test]
fn probability_tier_order_tracks_favorability() {
    assert!(ProbabilityTier::Poor < ProbabilityTier::Fair);
    assert!(ProbabilityTier::Fair < ProbabilityTier::Good);
    assert!(ProbabilityTier::Good < ProbabilityTier::Elite);
    assert_eq!(probability_tier_label(ProbabilityTier::Elite), "ELITE");
}

#[test]
fn bubble_band_boundaries_are_inclusive() {
    assert_eq!(bubble_band(0.6), BubbleBand::Solid);
    assert_eq!(bubble_band(0.5999), BubbleBand::Tossup);
    assert_eq!(bubble_band(0.4), BubbleBand::Tossup);
    assert_eq!(bubble_band(0.3999), BubbleBand::Fading);
}

#[test]
fn percentile_tier_boundaries_are_inclusive() {
    assert_eq!(percentile_tier(90.0), PercentileTier::Elite);
    assert_eq!(percentile_tier(89.9), PercentileTier::VeryGood);
    assert_eq!(percentile_tier(75.0), PercentileTier::VeryGood);
    assert_eq!(percentile_tier(74.9), PercentileTier::AboveAverage);
    assert_eq!(percentile_tier(50.0), PercentileTier::AboveAverage);
    assert_eq!(percentile_tier(49.9), PercentileTier::BelowAverage);
    assert_eq!(percentile_tier(25.0), PercentileTier::BelowAverage);
    assert_eq!(percentile_tier(24.9), PercentileTier::Poor);
}

#[test]
fn unknown_risk_labels_fall_back_to_low() {
    assert_eq!(risk_level("High"), RiskLevel::High);
    assert_eq!(risk_level("Medium"), RiskLevel::Medium);
    assert_eq!(risk_level("Low"), RiskLevel::Low);
    assert_eq!(risk_level("Extreme"), RiskLevel::Low);
    assert_eq!(risk_level(""), RiskLevel::Low);
}

#[test]
fn win_probability_sentence_picks_the_right_register() {
    let strong = comparison(0.71, 0.0, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&strong)[0],
        "Duke has a strong statistical advantage"
    );

    let close = comparison(0.5499, 0.0, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&close)[0],
        "Very close matchup - could go either way"
    );

    // Both boundaries are exclusive, so 0.55 and 0.7 land in the middle band.
    for wp in [0.55, 0.7] {
        let edge = comparison(wp, 0.0, 0.0, "Duke", "Houston", None);
        assert_eq!(
            comparison_insights(&edge)[0],
            "Duke has a slight edge in this matchup"
        );
    }
}

#[test]
fn efficiency_gap_sentence_uses_exclusive_thresholds() {
    let large = comparison(0.6, 15.01, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&large)[1],
        "Large efficiency gap favors Duke"
    );

    // A negative gap favors team2.
    let large_negative = comparison(0.6, -15.01, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&large_negative)[1],
        "Large efficiency gap favors Houston"
    );

    let notable = comparison(0.6, 15.0, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&notable)[1],
        "Notable efficiency gap favors Duke"
    );

    let matched = comparison(0.6, 8.0, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&matched)[1],
        "Teams are well-matched in overall efficiency"
    );

    let barely_notable = comparison(0.6, -8.01, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&barely_notable)[1],
        "Notable efficiency gap favors Houston"
    );
}

#[test]
fn pace_sentence_uses_exclusive_thresholds() {
    let major = comparison(0.6, 0.0, 8.01, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&major)[2],
        "Major pace difference could create style clash"
    );

    let significant = comparison(0.6, 0.0, -8.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&significant)[2],
        "Significant pace difference could create style clash"
    );

    let similar = comparison(0.6, 0.0, 4.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&similar)[2],
        "Similar playing styles should lead to a balanced game"
    );
}

#[test]
fn advantage_sentence_distinguishes_sweep_from_split() {
    let sweep = comparison(0.6, 0.0, 0.0, "Duke", "Duke", None);
    assert_eq!(
        comparison_insights(&sweep)[3],
        "Duke has advantages on both ends of the court"
    );

    let split = comparison(0.6, 0.0, 0.0, "Duke", "Houston", None);
    assert_eq!(
        comparison_insights(&split)[3],
        "Contrasting strengths: Duke offense vs Houston defense"
    );
}

#[test]
fn experience_sentence_is_optional() {
    let with_edge = comparison(0.6, 0.0, 0.0, "Duke", "Houston", Some("Houston"));
    let sentences = comparison_insights(&with_edge);
    assert_eq!(sentences.len(), 5);
    assert_eq!(
        sentences[4],
        "Experience could be a factor with Houston having the veteran edge"
    );

    let without = comparison(0.6, 0.0, 0.0, "Duke", "Houston", None);
    assert_eq!(comparison_insights(&without).len(), 4);

    let blank = comparison(0.6, 0.0, 0.0, "Duke", "Houston", Some(""));
    assert_eq!(comparison_insights(&blank).len(), 4);
}
