use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{info, warn};

use crate::use_cases::{BillUseCase, DrawUseCase};

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, serde::Deserialize)]
struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc")]
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id: Some(id.unwrap_or(json!(1))),
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
            id,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

impl Tool {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

pub struct MCPHandler {
    bill_use_case: Arc<BillUseCase>,
    draw_use_case: Arc<DrawUseCase>,
}

impl MCPHandler {
    pub fn new(bill_use_case: Arc<BillUseCase>, draw_use_case: Arc<DrawUseCase>) -> Self {
        Self {
            bill_use_case,
            draw_use_case,
        }
    }

    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {} - Line: {}", e, line);
                    let error_response = JsonRpcResponse::failure(
                        None,
                        PARSE_ERROR,
                        "Parse error".to_string(),
                        Some(json!(e.to_string())),
                    );
                    writeln!(writer, "{}", serde_json::to_string(&error_response)?)?;
                    writer.flush()?;
                    continue;
                }
            };

            // Notifications get no response
            if request.id.is_none() || request.method.starts_with("notifications/") {
                if request.method == "notifications/initialized" {
                    info!("🎰 Client initialized");
                }
                continue;
            }

            let response = self.handle_request(request).await;
            writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            writer.flush()?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id).await,
            "tools/list" => self.handle_list_tools(request.id).await,
            "tools/call" => self.handle_call_tool(request.params, request.id).await,
            _ => JsonRpcResponse::failure(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
                None,
            ),
        }
    }

    async fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("🎰 Initializing lô đề MCP server");
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "lode-mcp-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    async fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.get_tools() }))
    }

    async fn handle_call_tool(&self, params: Option<Value>, id: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params".to_string(), None);
        };

        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return JsonRpcResponse::failure(
                id,
                INVALID_PARAMS,
                "Missing tool name".to_string(),
                None,
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        let arguments_map: HashMap<String, Value> =
            serde_json::from_value(arguments).unwrap_or_default();

        match self.execute_tool(tool_name, &arguments_map).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": content
                        }
                    ]
                }),
            ),
            Err(e) => {
                warn!(tool = tool_name, "tool failed: {:#}", e);
                JsonRpcResponse::failure(
                    id,
                    INTERNAL_ERROR,
                    format!("Tool execution error: {:#}", e),
                    None,
                )
            }
        }
    }

    async fn execute_tool(
        &self,
        tool_name: &str,
        arguments: &HashMap<String, Value>,
    ) -> Result<String> {
        match tool_name {
            "parse_bill" => self.bill_use_case.parse_bill(arguments).await,
            "calculate_revenue" => self.bill_use_case.calculate_revenue(arguments).await,
            "calculate_payout" => self.bill_use_case.calculate_payout(arguments).await,
            "calculate_profit" => self.bill_use_case.calculate_profit(arguments).await,
            "calculate_bill" => self.bill_use_case.calculate_bill(arguments).await,
            "settle_day" => self.bill_use_case.settle_day(arguments).await,
            "parse_draw" => self.draw_use_case.parse_draw(arguments).await,
            "draw_schedule" => self.draw_use_case.draw_schedule(arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", tool_name)),
        }
    }

    fn get_tools(&self) -> Vec<Tool> {
        let lines_schema = json!({
            "type": "array",
            "description": "Parsed wager lines, as returned by parse_bill",
            "items": {"type": "object"}
        });
        let text_schema = json!({
            "type": "string",
            "description": "Free-form bill text, one wager per line"
        });
        let draw_schema = json!({
            "description": "Draw result: operator-entered result text, or a parsed draw object from parse_draw",
            "type": ["string", "object"]
        });

        vec![
            Tool::new(
                "parse_bill",
                "Parse free-form bill text into wager lines",
                json!({
                    "type": "object",
                    "properties": { "text": text_schema },
                    "required": ["text"]
                }),
            ),
            Tool::new(
                "calculate_revenue",
                "Compute the revenue (tiền thu) of a bill, rounded up to 1000 VND per line",
                json!({
                    "type": "object",
                    "properties": { "text": text_schema, "lines": lines_schema }
                }),
            ),
            Tool::new(
                "calculate_payout",
                "Compute the payout (tiền trả) of a bill against a draw result",
                json!({
                    "type": "object",
                    "properties": {
                        "text": text_schema,
                        "lines": lines_schema,
                        "draw": draw_schema
                    },
                    "required": ["draw"]
                }),
            ),
            Tool::new(
                "calculate_profit",
                "Net profit or loss from total revenue and total payout (VND)",
                json!({
                    "type": "object",
                    "properties": {
                        "total_revenue": {"type": "integer", "description": "Total revenue in VND"},
                        "total_payout": {"type": "integer", "description": "Total payout in VND"}
                    },
                    "required": ["total_revenue", "total_payout"]
                }),
            ),
            Tool::new(
                "calculate_bill",
                "Revenue of a bill, plus payout and profit when a draw result is given",
                json!({
                    "type": "object",
                    "properties": {
                        "text": text_schema,
                        "lines": lines_schema,
                        "draw": draw_schema
                    }
                }),
            ),
            Tool::new(
                "parse_draw",
                "Parse draw result text into hit lists and head/tail digits",
                json!({
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "Draw result text, prize numbers in any layout"}
                    },
                    "required": ["text"]
                }),
            ),
            Tool::new(
                "settle_day",
                "Settle every bill of a day against one draw result",
                json!({
                    "type": "object",
                    "properties": {
                        "bills": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "customer": {"type": "string"},
                                    "date": {"type": "string", "description": "Date in YYYY-MM-DD format"},
                                    "text": text_schema,
                                    "lines": lines_schema
                                },
                                "required": ["customer", "date"]
                            }
                        },
                        "draw": draw_schema
                    },
                    "required": ["bills", "draw"]
                }),
            ),
            Tool::new(
                "draw_schedule",
                "Stations drawing on a given date, by region",
                json!({
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "description": "Date in YYYY-MM-DD format"}
                    },
                    "required": ["date"]
                }),
            ),
        ]
    }
}

pub fn stdio() -> (BufReader<io::Stdin>, io::Stdout) {
    (BufReader::new(io::stdin()), io::stdout())
}
