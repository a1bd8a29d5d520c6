//! Canned REST backend for integration tests.
//!
//! Serves one scripted response per connection, in order, and records the raw
//! text of every request it received.

#![allow(dead_code)]

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use pushkind_matters::models::config::ClientConfig;

pub struct CannedBackend {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl CannedBackend {
    /// Starts a backend answering each request with the next `(status, body)`.
    pub async fn start(responses: Vec<(u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let responses: Vec<(u16, String)> = responses
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            }
            requests
        });

        Self { addr, handle }
    }

    /// Backend answering a single request.
    pub async fn once(status: u16, body: &str) -> Self {
        Self::start(vec![(status, body)]).await
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_url: format!("http://{}/api", self.addr),
            token_dir: String::new(),
            request_timeout_secs: 5,
        }
    }

    /// Waits for every scripted response to be served.
    pub async fn requests(self) -> Vec<String> {
        self.handle.await.unwrap()
    }
}

/// Configuration pointing at a port nothing listens on.
pub async fn unreachable_config() -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ClientConfig {
        api_url: format!("http://{addr}/api"),
        token_dir: String::new(),
        request_timeout_secs: 5,
    }
}

/// Configuration pointing at a listener that reads requests and never
/// answers, with a one second request timeout.
pub async fn silent_config() -> (ClientConfig, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut stream, _)) = listener.accept().await {
            read_request(&mut stream).await;
            held.push(stream);
        }
    });
    let config = ClientConfig {
        api_url: format!("http://{addr}/api"),
        token_dir: String::new(),
        request_timeout_secs: 1,
    };
    (config, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);
        if let Some(end) = find_header_end(&raw) {
            let headers = String::from_utf8_lossy(&raw[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

pub fn customer_json(id: i32, name: &str, email: &str, phone: &str) -> String {
    format!(
        r#"{{"id":{id},"name":"{name}","email":"{email}","phone":"{phone}","created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}}"#
    )
}

pub fn matter_json(id: i32, owner: i32, state: &str) -> String {
    format!(
        r#"{{"id":{id},"title":"Matter {id}","state":"{state}","due_date":"2024-06-30","created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z","user_id":{owner}}}"#
    )
}
