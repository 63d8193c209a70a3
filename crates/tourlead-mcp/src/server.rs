use std::io::{self, BufRead, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{json, Value};
use tourlead_classify::{
    build_topic_classifier, ClassifierError, TopicClassifier, TopicClassifierConfig,
};
use tourlead_core::{summary, BudgetQuery, BudgetSimulator, LeadInput, LeadScorer};

use crate::config::ServiceConfig;
use crate::framing::{
    read_http_request, read_stdio_message, write_http_response, write_stdio_response, HttpRead,
    HttpRequest, HttpResponse, StdioMessage,
};
use crate::metrics::MetricsRegistry;
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, SERVER_ERROR,
};
use crate::render::{render_budget, render_score};

const DEFAULT_MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "tourlead-mcp";

const SUMMARY_URI: &str = "tourlead://dashboard/summary.md";
const POLICY_URI: &str = "tourlead://policy/current.json";

pub struct ScoringServer {
    scorer: LeadScorer,
    simulator: BudgetSimulator,
    classifier: Arc<dyn TopicClassifier>,
    metrics: MetricsRegistry,
}

impl ScoringServer {
    /// The scorer and the `lead_score` classifier share the configured lexicon.
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self, ClassifierError> {
        let lexicon = cfg.classifier.load_lexicon()?;
        let classifier = build_topic_classifier(TopicClassifierConfig::Keyword(lexicon.clone()))?;
        Ok(Self {
            scorer: LeadScorer::new(cfg.policy.scoring.clone(), lexicon),
            simulator: BudgetSimulator::new(cfg.policy.lift.clone()),
            classifier,
            metrics: MetricsRegistry::new(),
        })
    }

    /// Swaps in a different topic classifier for `lead_score` and `topic_classify`.
    pub fn with_classifier(self, classifier: Arc<dyn TopicClassifier>) -> Self {
        Self { classifier, ..self }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        if request.is_notification() && request.method.starts_with("notifications/") {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_MCP_PROTOCOL_VERSION);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                        "capabilities": {
                            "tools": {"listChanged": false},
                            "resources": {"subscribe": false, "listChanged": false}
                        }
                    }),
                )
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, tools_list_result()),
            "tools/call" => self.handle_tools_call(id, request.params),
            "resources/list" => JsonRpcResponse::success(id, resources_list_result()),
            "resources/read" => self.handle_resources_read(id, request.params),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found"),
        };

        Some(response)
    }

    fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let parsed: ToolsCallParams = match serde_json::from_value(params) {
            Ok(v) => v,
            Err(err) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
            }
        };

        let start = Instant::now();
        let response = match parsed.name.as_str() {
            "lead_score" => self.exec_lead_score(id, parsed.arguments),
            "budget_simulate" => self.exec_budget_simulate(id, parsed.arguments),
            "topic_classify" => self.exec_topic_classify(id, parsed.arguments),
            "dashboard_summary" => exec_dashboard_summary(id),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "unknown tool"),
        };
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.metrics
            .record(&parsed.name, latency_ms, response.is_error());
        tracing::debug!(
            tool = %parsed.name,
            latency_ms,
            error = response.is_error(),
            "tool call"
        );
        response
    }

    fn exec_lead_score(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let input: LeadInput = match parse_args(arguments) {
            Ok(v) => v,
            Err(resp) => return resp.with_id(id),
        };
        if let Err(err) = input.validate() {
            return JsonRpcResponse::error(id, INVALID_PARAMS, err.to_string());
        }
        let topics = match self.classifier.classify(&input.post_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(provider = self.classifier.name(), %err, "topic classification failed");
                return JsonRpcResponse::error(id, SERVER_ERROR, err.to_string());
            }
        };

        let result = self.scorer.score_with_topics(&input, topics);
        tool_success(id, &result, render_score(&result))
    }

    fn exec_budget_simulate(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let query: BudgetQuery = match parse_args(arguments) {
            Ok(v) => v,
            Err(resp) => return resp.with_id(id),
        };
        if let Err(err) = query.validate() {
            return JsonRpcResponse::error(id, INVALID_PARAMS, err.to_string());
        }

        let result = self.simulator.simulate(&query);
        tool_success(id, &result, render_budget(&result))
    }

    fn exec_topic_classify(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let args: TopicClassifyInput = match parse_args(arguments) {
            Ok(v) => v,
            Err(resp) => return resp.with_id(id),
        };
        match self.classifier.classify(&args.text) {
            Ok(weights) => {
                let text = weights
                    .entries()
                    .iter()
                    .map(|(topic, w)| format!("{}: {w:.2}", topic.label()))
                    .collect::<Vec<_>>()
                    .join("\n");
                tool_success(id, &weights, text)
            }
            Err(err) => JsonRpcResponse::error(id, SERVER_ERROR, err.to_string()),
        }
    }

    fn handle_resources_read(&self, id: Value, params: Value) -> JsonRpcResponse {
        let parsed: ResourceReadParams = match serde_json::from_value(params) {
            Ok(v) => v,
            Err(err) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
            }
        };

        let (mime_type, text) = match parsed.uri.as_str() {
            SUMMARY_URI => ("text/markdown", summary::render_markdown()),
            POLICY_URI => {
                let doc = json!({
                    "scoring": self.scorer.policy(),
                    "lift": self.simulator.curve(),
                    "lexicon": self.scorer.lexicon(),
                    "classifier": self.classifier.name()
                });
                match serde_json::to_string_pretty(&doc) {
                    Ok(text) => ("application/json", text),
                    Err(err) => {
                        return JsonRpcResponse::error(id, SERVER_ERROR, err.to_string());
                    }
                }
            }
            _ => return JsonRpcResponse::error(id, INVALID_PARAMS, "unknown resource uri"),
        };

        JsonRpcResponse::success(
            id,
            json!({
                "contents": [{
                    "uri": parsed.uri,
                    "mimeType": mime_type,
                    "text": text
                }]
            }),
        )
    }

    pub fn serve_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        self.serve_stream(&mut stdin.lock(), &mut io::stdout().lock())?;
        tracing::info!("stdin closed, stopping");
        Ok(())
    }

    /// Answers every message on `input` until it is exhausted. Each reply uses
    /// the framing of the message it answers.
    pub fn serve_stream<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        while let Some(message) = read_stdio_message(input)? {
            let (payload, frame) = match message {
                StdioMessage::Payload(payload, frame) => (payload, frame),
                StdioMessage::Rejected(err, frame) => {
                    tracing::warn!(%err, "rejected stdio frame");
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("invalid stdio frame: {err}"),
                    );
                    write_stdio_response(output, &response, frame)?;
                    continue;
                }
            };

            let response = match serde_json::from_slice::<JsonRpcRequest>(&payload) {
                Ok(request) => self.handle_request(request),
                Err(err) => Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {err}"),
                )),
            };
            if let Some(response) = response {
                write_stdio_response(output, &response, frame)?;
            }
        }
        Ok(())
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        tracing::info!(addr = %listener.local_addr()?, "http listening");
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = self.handle_http_connection(stream) {
                        tracing::warn!(%err, "http request error");
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "http accept error");
                }
            }
        }
        Ok(())
    }

    fn handle_http_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let mut reader = io::BufReader::new(stream.try_clone()?);
        let response = match read_http_request(&mut reader)? {
            HttpRead::Closed => return Ok(()),
            HttpRead::Rejected(response) => {
                tracing::warn!(status = response.status, "rejected http request");
                response
            }
            HttpRead::Request(req) => self.dispatch_http_request(&req),
        };
        write_http_response(&mut stream, &response)
    }

    fn dispatch_http_request(&self, req: &HttpRequest) -> HttpResponse {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/health") => return HttpResponse::json(200, &json!({"status": "ok"})),
            ("GET", "/metrics") => {
                return HttpResponse::text(
                    200,
                    "text/plain; version=0.0.4; charset=utf-8",
                    self.metrics.render_text(),
                );
            }
            ("GET", "/metrics/summary") => {
                return HttpResponse::json(200, &self.metrics.summary());
            }
            ("POST", "/mcp" | "/") => {}
            ("POST", _) => {
                return HttpResponse::json(
                    404,
                    &json!({"error": "not_found", "message": "use POST /mcp"}),
                );
            }
            _ => {
                return HttpResponse::json(
                    405,
                    &json!({
                        "error": "method_not_allowed",
                        "message": "supported endpoints: GET /health, GET /metrics, GET /metrics/summary, POST /mcp"
                    }),
                );
            }
        }

        let rpc: JsonRpcRequest = match serde_json::from_slice(&req.body) {
            Ok(v) => v,
            Err(err) => {
                let response =
                    JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {err}"));
                return HttpResponse::json(400, &response);
            }
        };
        match self.handle_request(rpc) {
            Some(response) => HttpResponse::json(200, &response),
            None => HttpResponse::empty(204),
        }
    }
}

fn exec_dashboard_summary(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "structuredContent": {
                "title": summary::TITLE,
                "metrics": summary::metric_cards(),
                "insight": summary::INSIGHT
            },
            "content": [{
                "type": "text",
                "text": summary::render_markdown()
            }]
        }),
    )
}

fn tool_success<T: serde::Serialize>(id: Value, structured: &T, text: String) -> JsonRpcResponse {
    match serde_json::to_value(structured) {
        Ok(structured) => JsonRpcResponse::success(
            id,
            json!({
                "structuredContent": structured,
                "content": [{"type": "text", "text": text}]
            }),
        ),
        Err(err) => JsonRpcResponse::error(id, SERVER_ERROR, err.to_string()),
    }
}

fn tools_list_result() -> Value {
    json!({
        "tools": [
            {
                "name": "lead_score",
                "description": "Score a foreign-tourist lead's insurance subscription probability from visit details and a social post.",
                "inputSchema": {
                    "type": "object",
                    "required": ["gender", "age", "purpose", "stay_duration_days"],
                    "properties": {
                        "gender": {"type": "string", "enum": ["female", "male", "여성", "남성"]},
                        "age": {"type": "integer", "minimum": 10, "maximum": 70},
                        "purpose": {"type": "string", "enum": ["shopping", "medical", "business", "other", "쇼핑/관광", "의료/시술", "비즈니스", "기타"]},
                        "stay_duration_days": {"type": "integer", "minimum": 1},
                        "post_text": {"type": "string"}
                    }
                }
            },
            {
                "name": "budget_simulate",
                "description": "Estimate marketing efficiency and cost saving when targeting the top X% of scored leads.",
                "inputSchema": {
                    "type": "object",
                    "required": ["target_percentile"],
                    "properties": {
                        "target_percentile": {"type": "integer", "minimum": 1, "maximum": 100}
                    }
                }
            },
            {
                "name": "topic_classify",
                "description": "Break a social post down into Shopping, Leisure, Medical and Risk interest weights.",
                "inputSchema": {
                    "type": "object",
                    "required": ["text"],
                    "properties": {
                        "text": {"type": "string"}
                    }
                }
            },
            {
                "name": "dashboard_summary",
                "description": "Headline model metrics and the targeting insight.",
                "inputSchema": {"type": "object", "properties": {}}
            }
        ]
    })
}

fn resources_list_result() -> Value {
    json!({
        "resources": [
            {
                "uri": SUMMARY_URI,
                "name": "dashboard/summary.md",
                "description": "Headline model metrics and targeting insight.",
                "mimeType": "text/markdown"
            },
            {
                "uri": POLICY_URI,
                "name": "policy/current.json",
                "description": "Scoring weights, lift curve and classifier in effect.",
                "mimeType": "application/json"
            }
        ]
    })
}

#[derive(Debug, Deserialize)]
struct ToolsCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct TopicClassifyInput {
    text: String,
}

fn parse_args<T: for<'de> Deserialize<'de>>(
    arguments: Option<Value>,
) -> Result<T, JsonRpcResponse> {
    let Some(args) = arguments else {
        return Err(JsonRpcResponse::error(
            Value::Null,
            INVALID_PARAMS,
            "missing tool arguments",
        ));
    };

    serde_json::from_value(args).map_err(|err| {
        JsonRpcResponse::error(
            Value::Null,
            INVALID_PARAMS,
            format!("invalid tool arguments: {err}"),
        )
    })
}
