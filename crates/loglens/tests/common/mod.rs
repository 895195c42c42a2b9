//! In-process stand-in for the container-management API.

use regex::Regex;
use std::sync::{Arc, Mutex};
use std::thread;
use tiny_http::{Header, Method, Request, Response, Server};

pub struct FakeBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    server: Arc<Server>,
}

impl FakeBackend {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind fake backend"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("fake backend listens on an IP address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker_server = Arc::clone(&server);
        let worker_requests = Arc::clone(&requests);
        thread::spawn(move || {
            let router = Router::new();
            for request in worker_server.incoming_requests() {
                worker_requests
                    .lock()
                    .unwrap()
                    .push(format!("{} {}", request.method(), request.url()));
                router.handle(request);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            server,
        }
    }

    /// Every request seen so far, as "METHOD /path?query".
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

struct Router {
    container: Regex,
    logs: Regex,
    stats: Regex,
    containers: Regex,
    lifecycle: Regex,
    restart: Regex,
}

impl Router {
    fn new() -> Self {
        Self {
            container: Regex::new(r"^/container/([^/?]+)$").unwrap(),
            logs: Regex::new(r"^/container-logs/([^/?]+)\?page=(\d+)$").unwrap(),
            stats: Regex::new(r"^/container-stats/([^/?]+)$").unwrap(),
            containers: Regex::new(r"^/containers\?filter=(all|running|stopped)$").unwrap(),
            lifecycle: Regex::new(r"^/container-(start|stop)/([^/?]+)$").unwrap(),
            restart: Regex::new(r"^/container/([^/?]+)/restart$").unwrap(),
        }
    }

    fn handle(&self, request: Request) {
        let url = request.url().to_string();
        let method = request.method().clone();

        if let Some(caps) = self.logs.captures(&url) {
            let page: u32 = caps[2].parse().unwrap_or(1);
            return respond_text(request, &log_page(&caps[1], page));
        }
        if let Some(caps) = self.stats.captures(&url) {
            if &caps[1] == "broken" {
                return respond_error(request, 500);
            }
            return respond_json(request, STATS);
        }
        if let Some(caps) = self.containers.captures(&url) {
            return match &caps[1] {
                "running" => respond_json(request, r#"{"containers":[]}"#),
                "stopped" => respond_json(request, r#"{"containers":null}"#),
                _ => respond_json(request, CONTAINERS),
            };
        }
        if let Some(caps) = self.lifecycle.captures(&url) {
            return match &caps[1] {
                "start" => respond_json(request, r#"{"message":"Container started"}"#),
                _ => respond_json(request, "{}"),
            };
        }
        if self.restart.is_match(&url) && method == Method::Post {
            return respond_json(request, "{}");
        }
        if let Some(caps) = self.container.captures(&url) {
            let id = caps[1].to_string();
            return match (method, id.as_str()) {
                (Method::Delete, "busy") => respond_error(request, 409),
                (Method::Delete, _) => respond_json(request, "{}"),
                (_, "broken") => respond_error(request, 500),
                (_, _) => respond_json(request, &container_detail(&id)),
            };
        }

        match url.as_str() {
            "/images" => respond_json(request, "null"),
            "/volumes" => respond_json(request, VOLUMES),
            "/dashboard" => respond_json(request, DASHBOARD),
            _ => respond_error(request, 404),
        }
    }
}

/// `web` has two pages; `quiet` has none.
fn log_page(id: &str, page: u32) -> String {
    match (id, page) {
        ("web", 1) => (1..=5).map(|i| format!("new {}\n", i)).collect(),
        ("web", 2) => (1..=5).map(|i| format!("old {}\r\n", i)).collect(),
        ("quiet", _) => "\n\n".to_string(),
        _ => r#"{"logs":""}"#.to_string(),
    }
}

fn container_detail(id: &str) -> String {
    format!(
        r#"{{"ID":"{}","Image":"nginx:latest","Created":"2024-03-01T10:00:00Z","Ports":"80/tcp","Status":"running"}}"#,
        id
    )
}

const CONTAINERS: &str = r#"{"containers":[
    {"ID":"0123456789abcdef0123","Names":["/web"],"Image":"nginx:latest","State":"running"},
    {"ID":"fedcba9876543210fedc","Names":null,"Image":"redis:7","State":"exited"}
]}"#;

const VOLUMES: &str = r#"[
    {"Name":"pgdata","Driver":"local","Scope":"local","Mounted":"/var/lib/docker/volumes/pgdata/_data","Labels":null}
]"#;

const DASHBOARD: &str = r#"{"totalContainers":2,"totalRunningContainers":1,"containers":[
    {"ID":"0123456789abcdef0123","Names":["/web"],"Image":"nginx:latest","State":"running"},
    {"ID":"fedcba9876543210fedc","Names":["/cache"],"Image":"redis:7","State":"exited"}
]}"#;

const STATS: &str = r#"{"cpu_usage":{"total_usage":1200,"usage_in_usermode":800,"system_cpu_usage":90000},
    "memory_usage":{"usage":524288,"limit":1048576}}"#;

fn respond_json(request: Request, body: &str) {
    let mut response = Response::from_string(body);
    response.add_header(
        Header::from_bytes(b"Content-Type".as_slice(), b"application/json".as_slice()).unwrap(),
    );
    let _ = request.respond(response);
}

fn respond_text(request: Request, body: &str) {
    let _ = request.respond(Response::from_string(body));
}

fn respond_error(request: Request, code: u16) {
    let _ = request.respond(Response::from_string("error").with_status_code(code));
}
