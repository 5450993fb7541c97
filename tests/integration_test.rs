//! Integration tests for the Zabbix clients
//!
//! The first group runs against in-process stand-ins (mockito for the API,
//! local TCP listeners for the sender and agent protocols).
//!
//! The `#[ignore]` group needs real services:
//! - `ZABBIX_URL`, `ZABBIX_USER`, `ZABBIX_PASSWORD` for the API
//! - `ZABBIX_SERVER` for the sender (trapper item `test.key` on host `test-host`)
//! - `ZABBIX_AGENT` for the agent
//!
//! Run them with: `cargo test --test integration_test -- --ignored`

use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use zabbix_client::{
    config::{AgentConfig, ApiConfig, SenderConfig},
    error::{AgentError, SenderError},
    prelude::*,
    sender::{build_packet, HEADER_SIZE},
};

const PATH: &str = "/api_jsonrpc.php";

fn env_or_skip(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            eprintln!("Skipping test: {} not set", name);
            None
        }
    }
}

#[tokio::test]
async fn test_api_session_with_typed_accessors() {
    let mut server = Server::new_async().await;

    let version = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({"method": "apiinfo.version"})))
        .with_body(r#"{"jsonrpc":"2.0","result":"7.0.5","id":1}"#)
        .expect(1)
        .create_async()
        .await;

    let login = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({
            "method": "user.login",
            "params": {"username": "Admin", "password": "zabbix"}
        })))
        .with_body(r#"{"jsonrpc":"2.0","result":"session70","id":2}"#)
        .create_async()
        .await;

    let groups = server
        .mock("POST", PATH)
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "method": "hostgroup.get",
            "auth": "session70",
            "params": {"output": "extend", "limit": "100"}
        })))
        .with_body(json!({
            "jsonrpc": "2.0",
            "result": [
                {"groupid": "2", "name": "Linux servers"},
                {"groupid": "4", "name": "Zabbix servers"}
            ],
            "id": 3
        }).to_string())
        .create_async()
        .await;

    let mut config = ApiConfig::with_url(format!("{}{}", server.url(), PATH));
    config.timeout_secs = 2;
    let mut api = ApiClient::new(config).unwrap();

    api.login("Admin", "zabbix").await.unwrap();
    let result = api.host_groups_get(Params::new()).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[1].name, "Zabbix servers");
    assert_eq!(api.version_info().unwrap().major, 7);

    version.assert_async().await;
    login.assert_async().await;
    groups.assert_async().await;
}

#[tokio::test]
async fn test_api_token_from_config_uses_bearer_on_new_servers() {
    let mut server = Server::new_async().await;

    let _version = server
        .mock("POST", PATH)
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({"method": "apiinfo.version"})))
        .with_body(r#"{"jsonrpc":"2.0","result":"7.2.0","id":1}"#)
        .create_async()
        .await;

    let history = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer api-token")
        .match_body(Matcher::PartialJson(json!({
            "method": "history.get",
            "params": {"history": "0", "itemids": ["23296"]}
        })))
        .with_body(r#"{"jsonrpc":"2.0","result":[{"itemid":"23296","clock":"1351090996","value":"0.0850","ns":"563157632"}],"id":2}"#)
        .create_async()
        .await;

    let mut config = ApiConfig::with_url(format!("{}{}", server.url(), PATH));
    config.token = Some(secrecy::Secret::new("api-token".to_string()));
    let api = ApiClient::new(config).unwrap();

    let mut params = Params::new();
    params.insert("itemids".to_string(), json!(["23296"]));
    let items = api.history_get(params).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].clock, "1351090996");
    history.assert_async().await;
}

#[tokio::test]
async fn test_sender_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut header = [0u8; HEADER_SIZE];
        socket.read_exact(&mut header).await.unwrap();
        let length = u64::from_le_bytes(header[5..].try_into().unwrap());
        let mut body = vec![0u8; length as usize];
        socket.read_exact(&mut body).await.unwrap();

        let reply = build_packet(br#"{"response":"success","info":"processed: 2; failed: 0; total: 2; seconds spent: 0.000040"}"#);
        socket.write_all(&reply).await.unwrap();
        body
    });

    let sender = Sender::new(SenderConfig {
        server: "127.0.0.1".to_string(),
        port,
        timeout_secs: 2,
    });

    let response = sender
        .send_batch(&[
            SenderData::new("web01", "app.requests", "12"),
            SenderData::new("web01", "app.latency", "0.25"),
        ])
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.summary().unwrap().total, 2);

    let body: serde_json::Value = serde_json::from_slice(&server.await.unwrap()).unwrap();
    assert_eq!(body[0]["key"], "app.requests");
    assert_eq!(body[1]["value"], "0.25");
    assert_eq!(body[0]["clock"], body[1]["clock"]);
}

#[tokio::test]
async fn test_sender_empty_batch() {
    let sender = Sender::new(SenderConfig::default());
    let err = sender.send_batch(&[]).await.unwrap_err();

    assert!(matches!(err, ZabbixError::Sender(SenderError::EmptyBatch)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_agent_multi_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };

            let mut reader = BufReader::new(socket);
            let mut key = String::new();
            reader.read_line(&mut key).await.unwrap();

            let reply = match key.trim_end() {
                "agent.ping" => "1\n",
                "agent.version" => "7.0.5\n",
                _ => "ZBX_NOTSUPPORTED\0Unsupported item key.\n",
            };

            let mut socket = reader.into_inner();
            socket.write_all(reply.as_bytes()).await.unwrap();
        }
    });

    let agent = AgentClient::new(AgentConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_secs: 2,
    });

    let values = agent.get_values(&["agent.ping", "agent.version"]).await.unwrap();
    assert_eq!(values["agent.version"], "7.0.5");

    let err = agent
        .get_values(&["agent.ping", "vfs.fs.size[/nonexistent]"])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("vfs.fs.size[/nonexistent]"));
    match err {
        ZabbixError::Agent(AgentError::KeysFailed { values, failures }) => {
            assert_eq!(values.keys().collect::<Vec<_>>(), vec!["agent.ping"]);
            assert!(failures[0].1.is_remote());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
#[ignore] // Requires a Zabbix frontend
async fn test_live_api_login() {
    let (url, user, password) = match (
        env_or_skip("ZABBIX_URL"),
        env_or_skip("ZABBIX_USER"),
        env_or_skip("ZABBIX_PASSWORD"),
    ) {
        (Some(url), Some(user), Some(password)) => (url, user, password),
        _ => return,
    };

    let mut api = ApiClient::from_url(url).expect("Failed to create API client");
    let version = api.ensure_version().await.expect("Failed to detect version");
    println!("API version: {}", version);

    api.login(&user, &password).await.expect("Failed to log in");

    let mut params = Params::new();
    params.insert("limit".to_string(), json!(1));
    let hosts = api.hosts_get(params).await.expect("host.get failed");
    assert!(hosts.len() <= 1);
}

#[tokio::test]
#[ignore] // Requires a Zabbix server with a trapper item
async fn test_live_sender() {
    let server = match env_or_skip("ZABBIX_SERVER") {
        Some(server) => server,
        None => return,
    };

    let sender = Sender::with_address(server, 0).with_timeout(Duration::from_secs(10));
    let response = sender
        .send(SenderData::new("test-host", "test.key", "123"))
        .await
        .expect("Failed to send data");

    assert_eq!(response.response, "success");
}

#[tokio::test]
#[ignore] // Requires a Zabbix agent
async fn test_live_agent() {
    let host = match env_or_skip("ZABBIX_AGENT") {
        Some(host) => host,
        None => return,
    };

    let agent = AgentClient::with_address(host, 0).with_timeout(Duration::from_secs(10));
    let values = agent
        .get_values(&["system.uptime", "system.hostname"])
        .await
        .expect("Failed to get values");

    assert_eq!(values.len(), 2);
}
