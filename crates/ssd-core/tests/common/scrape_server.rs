//! Minimal HTTP/1.1 server serving scripted routes for integration tests.
//!
//! Routes are keyed by exact path+query. Each route can fail its first N
//! requests with a 500, or advertise the full body length and cut the
//! connection halfway through, to exercise retry and cleanup paths.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Route {
    pub body: Vec<u8>,
    /// Respond 500 to this many requests before serving the body.
    pub fail_first: u32,
    /// Send the full Content-Length but only half the body, then drop
    /// the connection (simulates a mid-stream failure).
    pub cut_body: bool,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            fail_first: 0,
            cut_body: false,
        }
    }

    pub fn flaky(body: impl Into<Vec<u8>>, fail_first: u32) -> Self {
        Self {
            body: body.into(),
            fail_first,
            cut_body: false,
        }
    }

    pub fn cut(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            fail_first: 0,
            cut_body: true,
        }
    }
}

struct RouteState {
    route: Route,
    hits: u32,
    failures_left: u32,
}

/// Handle to a running fixture server. The accept loop runs until the
/// process exits.
pub struct ScrapeServer {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, RouteState>>>,
}

/// Starts a server on an ephemeral port serving `routes`, keyed by
/// path+query (e.g. `/ugc/101/full/`).
pub fn start(routes: Vec<(String, Route)>) -> ScrapeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let map: Arc<Mutex<HashMap<String, RouteState>>> = Arc::new(Mutex::new(
        routes
            .into_iter()
            .map(|(path, route)| {
                let failures_left = route.fail_first;
                (
                    path,
                    RouteState {
                        route,
                        hits: 0,
                        failures_left,
                    },
                )
            })
            .collect(),
    ));
    let shared = Arc::clone(&map);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &shared));
        }
    });
    ScrapeServer {
        base_url: format!("http://127.0.0.1:{}", port),
        routes: map,
    }
}

impl ScrapeServer {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registers (or replaces) a route after startup; handy when route
    /// bodies need the server's own base URL.
    pub fn add_route(&self, path: impl Into<String>, route: Route) {
        let failures_left = route.fail_first;
        self.routes.lock().unwrap().insert(
            path.into(),
            RouteState {
                route,
                hits: 0,
                failures_left,
            },
        );
    }

    /// Number of requests a route has received so far (404s not counted).
    pub fn hits(&self, path: &str) -> u32 {
        self.routes
            .lock()
            .unwrap()
            .get(path)
            .map(|s| s.hits)
            .unwrap_or(0)
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Mutex<HashMap<String, RouteState>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match parse_request_path(request) {
        Some(p) => p,
        None => return,
    };

    enum Reply {
        NotFound,
        Fail,
        Body { body: Vec<u8>, cut: bool },
    }

    let reply = {
        let mut map = routes.lock().unwrap();
        match map.get_mut(&path) {
            None => Reply::NotFound,
            Some(state) => {
                state.hits += 1;
                if state.failures_left > 0 {
                    state.failures_left -= 1;
                    Reply::Fail
                } else {
                    Reply::Body {
                        body: state.route.body.clone(),
                        cut: state.route.cut_body,
                    }
                }
            }
        }
    };

    match reply {
        Reply::NotFound => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
        Reply::Fail => {
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
        Reply::Body { body, cut } => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            if cut {
                let half = body.len() / 2;
                let _ = stream.write_all(&body[..half]);
                // Dropping the stream here closes the socket mid-body.
            } else {
                let _ = stream.write_all(&body);
            }
        }
    }
}

/// Returns the path+query of a GET request line, e.g. `/a/b?x=1`.
fn parse_request_path(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    Some(parts.next()?.to_string())
}
