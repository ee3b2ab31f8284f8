use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::warn;

/// Throttle for scoring calls from live editors.
///
/// A dashboard that rescores a draft on every keystroke can flood the server
/// with `score_content` calls. All gated tools share one bucket per server: it
/// holds at most `rps` calls and refills at `rps` per second, so a burst of
/// typing is absorbed and a sustained flood is turned away until the editor
/// pauses.
#[derive(Clone)]
pub struct RateLimiter {
    rps: u32,
    state: std::sync::Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    tokens: f64,
    last: Instant,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Option<Self> {
        (rps > 0).then(|| Self {
            rps,
            state: std::sync::Arc::new(Mutex::new(State {
                tokens: rps as f64,
                last: Instant::now(),
            })),
        })
    }

    /// `RATE_LIMIT_RPS`; unset, unparsable or zero disables limiting.
    pub fn from_env() -> Option<Self> {
        let rps = std::env::var("RATE_LIMIT_RPS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())?;
        Self::new(rps)
    }

    pub fn rps(&self) -> u32 {
        self.rps
    }

    pub async fn check(&self) -> Result<(), String> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(state.last);
        state.last = now;

        let refill = (elapsed.as_secs_f64() * self.rps as f64).min(self.rps as f64);
        state.tokens = (state.tokens + refill).min(self.rps as f64);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return Ok(());
        }

        let wait = Duration::from_secs_f64((1.0 - state.tokens) / self.rps as f64);
        warn!(rps = self.rps, retry_ms = wait.as_millis() as u64, "scoring call throttled");
        Err(format!(
            "scoring requests are arriving faster than RATE_LIMIT_RPS={} allows; \
debounce editor rescoring and retry in ~{}ms",
            self.rps,
            wait.as_millis()
        ))
    }
}
