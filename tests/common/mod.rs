//! Shared utilities for integration testing.
//!
//! Spins up programmable mock upstreams (spreadsheet API, SMS gateway) on
//! local TCP ports and a real FeeFlow server wired to them.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use feeflow::config::AppConfig;
use feeflow::http::HttpServer;

/// One request observed by a mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable mock upstream.
///
/// `respond` maps (method, decoded path) to (status, JSON body). Every
/// request is also captured in the returned log.
pub async fn start_mock_upstream<F>(respond: F) -> (SocketAddr, RequestLog)
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let respond = respond.clone();
            let log = log_clone.clone();
            tokio::spawn(async move {
                loop {
                    let request = match read_request(&mut socket).await {
                        Some(r) => r,
                        None => break,
                    };
                    let path = percent_decode(&request.path);
                    let (status, body) = respond(&request.method, &path);
                    log.lock().unwrap().push(RecordedRequest {
                        method: request.method.clone(),
                        path,
                        body: request.body.clone(),
                    });

                    let status_text = match status {
                        200 => "200 OK",
                        400 => "400 Bad Request",
                        404 => "404 Not Found",
                        500 => "500 Internal Server Error",
                        _ => "200 OK",
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                        status_text,
                        body.len(),
                        body
                    );
                    if socket.write_all(response.as_bytes()).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    (addr, log)
}

struct RawRequest {
    method: String,
    path: String,
    body: String,
}

/// Read one HTTP/1.1 request off the socket (headers + Content-Length body).
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RawRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let content_length: usize = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0);

    let mut body_bytes = buf[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body_bytes.extend_from_slice(&chunk[..n]);
    }

    Some(RawRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body_bytes).to_string(),
    })
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Minimal percent-decoding, enough for A1 ranges in paths.
fn percent_decode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&path[i + 1..i + 3], 16) {
                out.push(byte as char);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    out
}

/// JSON body of a sheets `values` GET response.
pub fn values_response(rows: &[&[&str]]) -> String {
    let values: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    serde_json::json!({ "values": values }).to_string()
}

/// Start a FeeFlow server wired to the given mock upstreams.
///
/// Returns the server's base URL.
pub async fn start_server(sheets_addr: SocketAddr, sms_addr: Option<SocketAddr>) -> String {
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.sheets.api_base = format!("http://{}/v4", sheets_addr);
    config.sheets.spreadsheet_id = "test-sheet".to_string();
    config.sheets.api_key = "test-key".to_string();
    config.session.secret = "integration-test-secret".to_string();
    config.rate_limit.enabled = false;
    if let Some(addr) = sms_addr {
        config.sms.api_base = format!("http://{}/api", addr);
        config.sms.api_key = "sms-key".to_string();
        config.sms.username = "sms-user".to_string();
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    format!("http://{}", addr)
}

/// Extract the cookie pair ("name=value") from a login response.
pub fn session_cookie(res: &reqwest::Response) -> String {
    res.headers()
        .get("set-cookie")
        .and_then(|h| h.to_str().ok())
        .and_then(|c| c.split(';').next())
        .expect("response carries a session cookie")
        .to_string()
}
