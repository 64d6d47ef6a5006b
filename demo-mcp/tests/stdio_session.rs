// End-to-end sessions against a fully wired server

use std::sync::Arc;
use std::time::Duration;
use demo_mcp::config::Settings;
use demo_mcp::models::notes::NotesStore;
use demo_mcp::server::McpServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Run a whole session: send every request, close the input, collect output
async fn run_session(settings: &Settings, requests: Vec<Value>) -> Vec<Value> {
    let server = Arc::new(McpServer::from_settings(settings).unwrap());
    let (mut to_server, server_in) = tokio::io::duplex(64 * 1024);
    let (server_out, from_server) = tokio::io::duplex(64 * 1024);
    let serving = tokio::spawn(server.serve(server_in, server_out, CancellationToken::new()));

    let mut lines = BufReader::new(from_server).lines();
    let mut responses = Vec::new();
    for request in requests {
        let expects_reply = request.get("id").is_some();
        to_server.write_all(format!("{}\n", request).as_bytes()).await.unwrap();
        if expects_reply {
            let line = tokio::time::timeout(Duration::from_secs(10), lines.next_line())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            responses.push(serde_json::from_str(&line).unwrap());
        }
    }

    drop(to_server);
    assert!(lines.next_line().await.unwrap().is_none());
    serving.await.unwrap().unwrap();
    responses
}

fn settings(dir: &tempfile::TempDir, api_base: String) -> Settings {
    let mut settings = Settings::default();
    settings.storage.notes_file = dir.path().join("data").join("notes.json");
    settings.search.api_base = api_base;
    settings.search.timeout_secs = 1;
    settings
}

fn initialize() -> Vec<Value> {
    vec![
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize",
               "params": {"protocolVersion": "2025-03-26", "clientInfo": {"name": "it"}}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    ]
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": "tools/call",
           "params": {"name": name, "arguments": arguments}})
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_groceries_and_todo_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, "http://127.0.0.1:9".to_string());

    let mut requests = initialize();
    requests.push(call(1, "add_note", json!({"title": "Groceries", "content": "Milk, eggs"})));
    requests.push(call(2, "add_note", json!({"title": "Todo", "content": "Call Alice"})));
    requests.push(call(3, "list_notes", json!({})));
    requests.push(call(4, "add_note", json!({"title": "t"})));
    requests.push(json!({"jsonrpc": "2.0", "id": 5, "method": "resources/read",
                         "params": {"uri": "notes://all"}}));

    let responses = run_session(&settings, requests).await;
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "demo-server");
    assert_eq!(text(&responses[1]), "Note added successfully! ID: 1");
    assert_eq!(text(&responses[2]), "Note added successfully! ID: 2");

    let listing = text(&responses[3]);
    let groceries = listing.find("ID: 1\nTitle: Groceries\nContent: Milk, eggs").unwrap();
    let todo = listing.find("ID: 2\nTitle: Todo\nContent: Call Alice").unwrap();
    assert!(groceries < todo);

    assert_eq!(responses[4]["id"], 4);
    assert_eq!(responses[4]["error"]["kind"], "InvalidArguments");

    let resource: Vec<Value> =
        serde_json::from_str(responses[5]["result"]["contents"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(resource.len(), 2);

    let restarted = NotesStore::new(settings.storage.notes_file.clone());
    let titles: Vec<String> = restarted.load().await.into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Groceries", "Todo"]);
}

#[tokio::test]
async fn test_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, "http://127.0.0.1:9".to_string());

    let mut requests = initialize();
    requests.push(json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}));
    requests.push(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));

    let responses = run_session(&settings, requests).await;
    let uris: Vec<&str> = responses[1]["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert_eq!(uris, vec!["notes://all", "weather://current", "system://info"]);

    let tools = responses[2]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["add_note", "list_notes", "get_weather", "search_github"]);
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["title", "content"]));
}

#[tokio::test]
async fn test_search_timeout_degrades_to_text() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stall = tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let (socket, _) = listener.accept().await.unwrap();
            held.push(socket);
        }
    });

    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, format!("http://{}", addr));

    let mut requests = initialize();
    requests.push(call(1, "search_github", json!({"query": "rust"})));
    let responses = run_session(&settings, requests).await;
    stall.abort();

    assert!(responses[1].get("error").is_none());
    assert!(text(&responses[1]).starts_with("Error searching GitHub: request timed out"));
}

#[tokio::test]
async fn test_search_success_through_dispatcher() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("GET", "/search/repositories")
        .match_query(mockito::Matcher::UrlEncoded("per_page".into(), "5".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"items": [
                {"full_name": "tokio-rs/tokio", "description": "A runtime", "stargazers_count": 25000},
                {"full_name": "serde-rs/serde", "description": null, "stargazers_count": 9000}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, upstream.url());

    let mut requests = initialize();
    requests.push(call(1, "search_github", json!({"query": "async"})));
    let responses = run_session(&settings, requests).await;

    assert_eq!(
        text(&responses[1]),
        "Top GitHub repositories for 'async':\n\n\
         • tokio-rs/tokio - A runtime (⭐ 25000)\n\
         • serde-rs/serde - No description (⭐ 9000)"
    );
}
