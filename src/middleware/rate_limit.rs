use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const MAX_TRACKED_CLIENTS: usize = 10_000;

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<IpAddr, WindowState>,
    last_sweep: Instant,
}

impl Windows {
    fn sweep(&mut self, now: Instant) {
        self.clients
            .retain(|_, window| now.duration_since(window.start) < WINDOW);
        self.last_sweep = now;
    }
}

/// Fixed one-second window per client address.
///
/// The address is the peer of the TCP connection. `X-Forwarded-For` is only
/// honoured when `trust_forwarded_for` is set, i.e. behind a known proxy.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    trust_forwarded_for: bool,
    windows: Arc<Mutex<Windows>>,
}

impl RateLimiter {
    pub fn new(rps: u32, trust_forwarded_for: bool) -> Self {
        Self {
            rps: rps.max(1),
            trust_forwarded_for,
            windows: Arc::new(Mutex::new(Windows {
                clients: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    fn allow(&self, client: IpAddr) -> bool {
        self.allow_at(client, Instant::now())
    }

    fn allow_at(&self, client: IpAddr, now: Instant) -> bool {
        let Ok(mut windows) = self.windows.lock() else {
            // poisoned: fail open
            return true;
        };
        if now.duration_since(windows.last_sweep) >= SWEEP_INTERVAL {
            windows.sweep(now);
        }
        if !windows.clients.contains_key(&client) && windows.clients.len() >= MAX_TRACKED_CLIENTS {
            windows.sweep(now);
            if windows.clients.len() >= MAX_TRACKED_CLIENTS {
                return false;
            }
        }

        let window = windows.clients.entry(client).or_insert(WindowState {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= WINDOW {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }

    fn client_of(&self, req: &Request<Body>) -> Option<IpAddr> {
        if self.trust_forwarded_for {
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .and_then(|value| value.trim().parse::<IpAddr>().ok());
            if forwarded.is_some() {
                return forwarded;
            }
        }
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // No peer address outside a real listener (in-process routers).
    let Some(client) = limiter.client_of(&req) else {
        return next.run(req).await;
    };
    if !limiter.allow(client) {
        tracing::warn!(client = %client, "Public rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/public/jobs");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        req
    }

    #[test]
    fn limits_each_client_independently() {
        let limiter = RateLimiter::new(2, false);
        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
        assert!(limiter.allow(ip(2)));
    }

    #[test]
    fn window_resets_after_a_second() {
        let limiter = RateLimiter::new(1, false);
        let start = Instant::now();
        assert!(limiter.allow_at(ip(1), start));
        assert!(!limiter.allow_at(ip(1), start));
        assert!(limiter.allow_at(ip(1), start + WINDOW));
    }

    #[test]
    fn forwarded_header_ignored_unless_trusted() {
        let req = request_from("192.0.2.7:5000", Some("203.0.113.9"));
        assert_eq!(
            RateLimiter::new(5, false).client_of(&req),
            Some("192.0.2.7".parse().unwrap())
        );
        assert_eq!(
            RateLimiter::new(5, true).client_of(&req),
            Some("203.0.113.9".parse().unwrap())
        );

        let spoofed = request_from("192.0.2.7:5000", Some("not-an-ip"));
        assert_eq!(
            RateLimiter::new(5, true).client_of(&spoofed),
            Some("192.0.2.7".parse().unwrap())
        );
    }

    #[test]
    fn tracked_clients_are_capped_and_swept() {
        let limiter = RateLimiter::new(1, false);
        let start = Instant::now();
        for n in 0..MAX_TRACKED_CLIENTS as u32 {
            assert!(limiter.allow_at(IpAddr::from(n.to_be_bytes()), start));
        }
        let newcomer = IpAddr::from([255, 255, 255, 255]);
        assert!(!limiter.allow_at(newcomer, start));

        // stale windows are dropped once they expire
        assert!(limiter.allow_at(newcomer, start + WINDOW));
        let tracked = limiter.windows.lock().unwrap().clients.len();
        assert_eq!(tracked, 1);
    }
}
