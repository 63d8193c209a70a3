use serde::Serialize;

pub const TITLE: &str = "Foreign Tourist Insurance Subscription Prediction Engine";

pub const INSIGHT: &str = "Model analysis shows that concentrating on the top 10% of leads \
with high Shopping (T1) and Risk (T4) interest is far more efficient than untargeted \
marketing to every visitor.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: &'static str,
    pub delta: &'static str,
}

static METRIC_CARDS: [MetricCard; 4] = [
    MetricCard {
        label: "Model AUC",
        value: "0.9996",
        delta: "+0.515",
    },
    MetricCard {
        label: "Precision",
        value: "1.000",
        delta: "Perfect",
    },
    MetricCard {
        label: "Marketing Lift",
        value: "10.0x",
        delta: "Top 10%",
    },
    MetricCard {
        label: "Targeting ROI",
        value: "90%",
        delta: "Cost Saving",
    },
];

/// Headline figures reported for the offline evaluation.
pub fn metric_cards() -> &'static [MetricCard] {
    &METRIC_CARDS
}

pub fn render_markdown() -> String {
    let mut out = format!("# {TITLE}\n\n| metric | value | delta |\n|---|---|---|\n");
    for card in metric_cards() {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            card.label, card.value, card.delta
        ));
    }
    out.push('\n');
    out.push_str(INSIGHT);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_lists_every_card() {
        let md = render_markdown();
        for card in metric_cards() {
            assert!(md.contains(card.label));
            assert!(md.contains(card.value));
        }
        assert!(md.ends_with(&format!("{INSIGHT}\n")));
    }
}
