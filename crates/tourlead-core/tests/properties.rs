use proptest::prelude::*;
use tourlead_core::{
    score, simulate, BudgetQuery, Gender, IntentTier, LeadInput, VisitPurpose,
};

fn lead_strategy() -> impl Strategy<Value = LeadInput> {
    (
        prop::sample::select(Gender::ALL.to_vec()),
        10u8..=70,
        prop::sample::select(VisitPurpose::ALL.to_vec()),
        1u32..=400,
        prop::sample::select(vec![
            "",
            "duty-free shopping, no loss",
            "면세점 쇼핑",
            "경찰서에 분실 신고",
            "police said my bag was lost/stolen",
            "just temples and tea",
        ]),
        ".{0,40}",
    )
        .prop_map(|(gender, age, purpose, stay, base, noise)| LeadInput {
            gender,
            age,
            purpose,
            stay_duration_days: stay,
            post_text: format!("{base}{noise}"),
        })
}

proptest! {
    /// Scoring the same lead twice is bit-identical.
    #[test]
    fn score_is_deterministic(input in lead_strategy()) {
        let a = score(&input);
        let b = score(&input.clone());
        prop_assert_eq!(a.probability_percent.to_bits(), b.probability_percent.to_bits());
        prop_assert_eq!(a.topic_weights, b.topic_weights);
        prop_assert_eq!(a.tier, b.tier);
    }

    #[test]
    fn probability_stays_in_bounds(input in lead_strategy()) {
        let out = score(&input);
        prop_assert!((0.0..=100.0).contains(&out.probability_percent));
        for (_, w) in out.topic_weights.entries() {
            prop_assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn tier_follows_threshold(input in lead_strategy()) {
        let out = score(&input);
        let expected = if out.probability_percent > 70.0 {
            IntentTier::HighIntent
        } else {
            IntentTier::ModerateIntent
        };
        prop_assert_eq!(out.tier, expected);
    }

    /// Any stay at or past thirty days scores the same as exactly thirty.
    #[test]
    fn long_stays_saturate(input in lead_strategy(), extra in 0u32..1000) {
        let mut at_cap = input.clone();
        at_cap.stay_duration_days = 30;
        let mut beyond = input;
        beyond.stay_duration_days = 30 + extra;
        prop_assert_eq!(
            score(&at_cap).probability_percent.to_bits(),
            score(&beyond).probability_percent.to_bits()
        );
    }

    #[test]
    fn cost_saving_is_complement(pct in 1u8..=100) {
        let out = simulate(&BudgetQuery { target_percentile: pct });
        prop_assert_eq!(out.cost_saving_percent, 100 - pct);
        prop_assert!(out.efficiency_multiplier >= 1.0);
    }

    #[test]
    fn efficiency_never_increases(pct in 10u8..100) {
        let here = simulate(&BudgetQuery { target_percentile: pct });
        let next = simulate(&BudgetQuery { target_percentile: pct + 1 });
        prop_assert!(next.efficiency_multiplier <= here.efficiency_multiplier);
    }
}
