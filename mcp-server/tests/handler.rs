use lode_lib::PriceTable;
use lode_mcp::{BillUseCase, DrawUseCase, MCPHandler};
use serde_json::{Value, json};
use std::sync::Arc;

fn handler() -> MCPHandler {
    let table = Arc::new(PriceTable::default());
    MCPHandler::new(
        Arc::new(BillUseCase::new(table)),
        Arc::new(DrawUseCase::new()),
    )
}

async fn exchange(requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    handler().serve(input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

async fn call_tool(name: &str, arguments: Value) -> Value {
    let responses = exchange(&[json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })])
    .await;
    assert_eq!(responses.len(), 1);
    responses.into_iter().next().unwrap()
}

/// The JSON payload inside a successful tool response.
fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let responses = exchange(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    ])
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "lode-mcp-server");

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "parse_bill",
            "calculate_revenue",
            "calculate_payout",
            "calculate_profit",
            "calculate_bill",
            "parse_draw",
            "settle_day",
            "draw_schedule"
        ]
    );
}

#[tokio::test]
async fn test_parse_bill() {
    let response = call_tool("parse_bill", json!({"text": "23 45 67 bl2 10d 1dai\n23 bd 5d hn"})).await;
    let payload = tool_payload(&response);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["count"], 2);
    assert_eq!(payload["lines"][0]["play_type"], "BAO_LO_2");
    assert_eq!(payload["lines"][0]["station_scope"], "MOT_DAI");
    assert_eq!(payload["lines"][1]["play_type"], "BAO_DAO_2");
    assert_eq!(payload["lines"][1]["station_scope"], "HA_NOI");
}

#[tokio::test]
async fn test_calculate_revenue_from_text() {
    let response = call_tool("calculate_revenue", json!({"text": "23 45 67 bl2 10d 1dai"})).await;
    let payload = tool_payload(&response);
    assert_eq!(payload["total"], 432_000);
    assert_eq!(payload["total_text"], "432.000đ");
    assert_eq!(payload["total_short"], "432K");
}

#[tokio::test]
async fn test_calculate_revenue_from_lines() {
    let response = call_tool(
        "calculate_revenue",
        json!({"lines": [
            {"numbers": ["23"], "points": 5, "play_type": "BAO_DAO_2", "station_scope": "HA_NOI"}
        ]}),
    )
    .await;
    assert_eq!(tool_payload(&response)["total"], 216_000);
}

#[tokio::test]
async fn test_calculate_payout_with_draw_text() {
    let response = call_tool(
        "calculate_payout",
        json!({
            "lines": [
                {"numbers": ["12", "34", "56"], "points": 1, "play_type": "DA_VONG"},
                {"numbers": ["99"], "points": 1, "play_type": "BAO_LO_2"}
            ],
            "draw": "23 45 12 34 56 123423"
        }),
    )
    .await;
    let payload = tool_payload(&response);
    assert_eq!(payload["total"], 3 * 730_000);
    assert_eq!(payload["total_short"], "2.2tr");
    assert_eq!(payload["winning_lines"], json!([1]));
}

#[tokio::test]
async fn test_calculate_profit() {
    let response = call_tool(
        "calculate_profit",
        json!({"total_revenue": 1_000_000, "total_payout": 1_000_000}),
    )
    .await;
    let payload = tool_payload(&response);
    assert_eq!(payload["summary"]["outcome"], "PROFIT");
    assert_eq!(payload["text"], "LỜI 0đ");
}

#[tokio::test]
async fn test_calculate_bill_without_draw() {
    let response = call_tool("calculate_bill", json!({"text": "23 10d"})).await;
    let payload = tool_payload(&response);
    assert_eq!(payload["report"]["revenue"]["total"], 144_000);
    assert!(payload["report"].get("payout").is_none());
    assert_eq!(payload["text"], Value::Null);
}

#[tokio::test]
async fn test_settle_day() {
    let response = call_tool(
        "settle_day",
        json!({
            "bills": [
                {"customer": "anh Tư", "date": "2024-06-13", "text": "12 1d"},
                {"customer": "chị Ba", "date": "2024-06-13", "text": "55 10d\n77 10d"}
            ],
            "draw": "99912 34"
        }),
    )
    .await;
    let payload = tool_payload(&response);
    let settlement = &payload["settlement"];
    assert_eq!(settlement["bills"][0]["payout"], 74_000);
    assert_eq!(settlement["total"]["total_revenue"], 15_000 + 288_000);
    assert_eq!(settlement["total"]["outcome"], "PROFIT");
}

#[tokio::test]
async fn test_parse_draw_and_schedule() {
    let payload = tool_payload(&call_tool("parse_draw", json!({"text": "ĐB: 987654\nG8: 23"})).await);
    assert_eq!(payload["draw"]["head"], "5");
    assert_eq!(payload["draw"]["tail"], "4");

    let payload = tool_payload(&call_tool("draw_schedule", json!({"date": "2024-06-13"})).await);
    assert_eq!(payload["weekday"], "Thu");
    assert_eq!(payload["south"], json!(["TÂY NINH", "AN GIANG", "BÌNH THUẬN"]));
}

#[tokio::test]
async fn test_tool_errors() {
    let response = call_tool("calculate_revenue", json!({})).await;
    assert_eq!(response["error"]["code"], -32603);
    assert!(
        response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Missing text or lines parameter")
    );

    let response = call_tool(
        "calculate_revenue",
        json!({"lines": [{"numbers": [], "points": 1, "play_type": "BAO_LO_2"}]}),
    )
    .await;
    assert!(response["error"]["message"].as_str().unwrap().contains("line 1"));

    let response = call_tool("no_such_tool", json!({})).await;
    assert_eq!(response["error"]["code"], -32603);
}

#[tokio::test]
async fn test_protocol_errors() {
    let mut output = Vec::new();
    handler()
        .serve("not json\n".as_bytes(), &mut output)
        .await
        .unwrap();
    let response: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(response["error"]["code"], -32700);

    let responses = exchange(&[
        json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call"}),
    ])
    .await;
    assert_eq!(responses[0]["error"]["code"], -32601);
    assert_eq!(responses[0]["id"], 3);
    assert_eq!(responses[1]["error"]["code"], -32602);
}
