#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use ipclassify::Endpoints;

/// Minimal HTTP/1.1 geolocation service answering from a fixed table.
pub struct StubService {
    pub endpoints: Endpoints,
    hits: Arc<Mutex<Vec<(String, String)>>>,
}

#[derive(Clone)]
enum Reply {
    Found { province: String, isp: String },
    Raw(String),
}

#[derive(Default)]
pub struct StubServiceBuilder {
    replies: HashMap<String, Reply>,
}

impl StubServiceBuilder {
    pub fn found(mut self, ip: &str, province: &str, isp: &str) -> Self {
        self.replies.insert(
            ip.to_string(),
            Reply::Found {
                province: province.to_string(),
                isp: isp.to_string(),
            },
        );
        self
    }

    /// Serve `body` verbatim for `ip`.
    pub fn raw(mut self, ip: &str, body: &str) -> Self {
        self.replies.insert(ip.to_string(), Reply::Raw(body.to_string()));
        self
    }

    pub async fn start(self) -> StubService {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let replies = Arc::new(self.replies);
        let hits = Arc::new(Mutex::new(Vec::new()));

        let task_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let replies = Arc::clone(&replies);
                let hits = Arc::clone(&task_hits);

                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let url = Url::parse(&format!("http://stub{}", target)).unwrap();
                    let ip = url
                        .query_pairs()
                        .find(|(key, _)| key == "ip")
                        .map(|(_, value)| value.into_owned())
                        .unwrap_or_default();
                    hits.lock().push((url.path().to_string(), ip.clone()));

                    let body = match replies.get(&ip) {
                        Some(Reply::Found { province, isp }) => serde_json::json!({
                            "ip": ip,
                            "country": "China",
                            "province": province,
                            "city": province,
                            "isp": isp,
                            "ret": 1,
                        })
                        .to_string(),
                        Some(Reply::Raw(body)) => body.clone(),
                        None => serde_json::json!({ "ip": ip, "ret": 0, "reason": "not found" })
                            .to_string(),
                    };

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        StubService {
            endpoints: Endpoints {
                ipv4: format!("http://{}/ipv4", addr),
                ipv6: format!("http://{}/ipv6", addr),
            },
            hits,
        }
    }
}

impl StubService {
    pub fn builder() -> StubServiceBuilder {
        StubServiceBuilder::default()
    }

    /// Every request seen so far as `(path, ip)`.
    pub fn hits(&self) -> Vec<(String, String)> {
        self.hits.lock().clone()
    }
}
