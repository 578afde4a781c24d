use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::Value;

/// Canned catalog answers keyed by search query and work key.
#[derive(Debug, Clone, Default)]
pub struct CatalogStubConfig {
    searches: HashMap<String, Vec<Value>>,
    search_status: Option<u16>,
    works: HashMap<String, Value>,
}

#[allow(dead_code)]
impl CatalogStubConfig {
    pub fn with_search(mut self, query: &str, docs: Vec<Value>) -> Self {
        self.searches.insert(query.to_owned(), docs);
        self
    }

    /// Every search answers with `status` and no body.
    pub fn with_search_status(mut self, status: u16) -> Self {
        self.search_status = Some(status);
        self
    }

    pub fn with_work(mut self, key: &str, body: Value) -> Self {
        self.works.insert(key.to_owned(), body);
        self
    }
}

pub struct CatalogStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl CatalogStub {
    pub fn spawn(config: CatalogStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalog stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                seen.lock().expect("lock request log").push(path.clone());

                let (status, body) = respond_to(&config, &path);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock request log").clone()
    }

    pub fn search_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|path| path.starts_with("/search.json"))
            .count()
    }

    pub fn detail_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|path| !path.starts_with("/search.json"))
            .count()
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond_to(config: &CatalogStubConfig, path: &str) -> (u16, String) {
    let Ok(url) = url::Url::parse(&format!("http://stub{path}")) else {
        return (400, "bad request".to_owned());
    };

    if url.path() == "/search.json" {
        if let Some(status) = config.search_status {
            return (status, "{}".to_owned());
        }
        let query = url
            .query_pairs()
            .find(|(name, _)| name == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        let docs = config.searches.get(&query).cloned().unwrap_or_default();
        let body = serde_json::json!({
            "numFound": docs.len(),
            "start": 0,
            "docs": docs,
        });
        return (200, body.to_string());
    }

    let key = url.path().trim_end_matches(".json");
    match config.works.get(key) {
        Some(body) => (200, body.to_string()),
        None => (404, r#"{"error":"notfound"}"#.to_owned()),
    }
}
