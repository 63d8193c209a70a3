//! Plain-text dashboard panels returned alongside structured tool output.

use std::fmt::Write as _;

use tourlead_core::{BudgetResult, ScoreResult};

const BAR_WIDTH: f64 = 20.0;

pub fn render_score(result: &ScoreResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subscription probability: {:.1}%", result.probability_percent);
    let _ = writeln!(out, "{}", result.tier.banner());
    out.push_str("Topic distribution:\n");
    for (topic, weight) in result.topic_weights.entries() {
        let _ = writeln!(out, "  {:<14} {:<20} {weight:.2}", topic.label(), bar(weight));
    }
    out
}

pub fn render_budget(result: &BudgetResult) -> String {
    format!(
        "Marketing efficiency vs. baseline: {:.1}x\nExpected marketing cost saving: {}%\n",
        result.efficiency_multiplier, result.cost_saving_percent
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(weight: f64) -> String {
    let cells = (weight.clamp(0.0, 1.0) * BAR_WIDTH).round() as usize;
    "#".repeat(cells)
}
