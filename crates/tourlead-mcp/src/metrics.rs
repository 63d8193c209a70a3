use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug, Default, Clone)]
struct ToolMetric {
    ok: u64,
    err: u64,
    total_latency_ms: f64,
    max_latency_ms: f64,
}

/// Per-tool call counters. Observational only; never feeds back into scoring.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    tools: Mutex<HashMap<String, ToolMetric>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tool: &str, latency_ms: f64, is_error: bool) {
        let mut tools = self.tools.lock();
        let metric = tools.entry(tool.to_string()).or_default();
        if is_error {
            metric.err = metric.err.saturating_add(1);
        } else {
            metric.ok = metric.ok.saturating_add(1);
        }
        metric.total_latency_ms += latency_ms;
        metric.max_latency_ms = metric.max_latency_ms.max(latency_ms);
    }

    fn sorted(&self) -> Vec<(String, ToolMetric)> {
        let mut pairs = self
            .tools
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    /// Prometheus text exposition.
    pub fn render_text(&self) -> String {
        let tools = self.sorted();
        let mut out = String::new();
        out.push_str("# HELP tourlead_tool_calls_total Tool calls by outcome.\n");
        out.push_str("# TYPE tourlead_tool_calls_total counter\n");
        for (tool, m) in &tools {
            let _ = writeln!(
                out,
                "tourlead_tool_calls_total{{tool=\"{tool}\",status=\"ok\"}} {}",
                m.ok
            );
            let _ = writeln!(
                out,
                "tourlead_tool_calls_total{{tool=\"{tool}\",status=\"error\"}} {}",
                m.err
            );
        }
        out.push_str("# HELP tourlead_tool_latency_ms_max Slowest tool call.\n");
        out.push_str("# TYPE tourlead_tool_latency_ms_max gauge\n");
        for (tool, m) in &tools {
            let _ = writeln!(
                out,
                "tourlead_tool_latency_ms_max{{tool=\"{tool}\"}} {:.3}",
                m.max_latency_ms
            );
        }
        out
    }

    pub fn summary(&self) -> Value {
        let tools = self
            .sorted()
            .into_iter()
            .map(|(tool, m)| {
                let calls = m.ok + m.err;
                let avg = if calls == 0 {
                    0.0
                } else {
                    m.total_latency_ms / calls as f64
                };
                json!({
                    "tool": tool,
                    "ok": m.ok,
                    "error": m.err,
                    "avg_latency_ms": avg,
                    "max_latency_ms": m.max_latency_ms
                })
            })
            .collect::<Vec<_>>();
        json!({ "tools": tools })
    }
}
