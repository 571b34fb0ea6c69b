//! Circuit breaker implementation.
//!
//! Only infrastructure failures (see [`CatalogError::should_trip_circuit_breaker`])
//! count against the breaker. A corrupt payload or a validation error says
//! nothing about whether the backend is reachable.

use catalog_core::{CatalogError, CatalogResult};
use parking_lot::Mutex;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected without touching the backend.
    Open,
    /// A limited number of probe calls are let through.
    HalfOpen,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening the circuit.
    pub failure_threshold: u32,
    /// Successful probes needed to close the circuit from half-open.
    pub success_threshold: u32,
    /// How long the circuit stays open before probing.
    pub reset_timeout: Duration,
    /// Concurrent probes allowed while half-open.
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 1,
            reset_timeout: Duration::from_secs(30),
            half_open_max_calls: 1,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    probe_successes: u32,
    probes_in_flight: u32,
    /// When the circuit opened, or when the current half-open window started.
    since: Option<Instant>,
}

/// Circuit breaker for protecting against a failing dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                probe_successes: 0,
                probes_in_flight: 0,
                since: None,
            }),
        }
    }

    /// Returns the current state of the circuit breaker.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Executes `f` under circuit breaker protection.
    ///
    /// Returns [`CatalogError::CircuitBreakerOpen`] without calling `f` when
    /// the circuit is open.
    pub async fn call<F, Fut, T>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        if !self.try_acquire() {
            return Err(CatalogError::CircuitBreakerOpen(self.name.clone()));
        }

        let result = f().await;
        match &result {
            Err(e) if e.should_trip_circuit_breaker() => self.record_failure(),
            _ => self.record_success(),
        }
        result
    }

    fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner.since.map_or(Duration::MAX, |t| t.elapsed());
                if elapsed < self.config.reset_timeout {
                    return false;
                }
                inner.state = CircuitState::HalfOpen;
                inner.probe_successes = 0;
                inner.probes_in_flight = 1;
                inner.since = Some(Instant::now());
                debug!("Circuit breaker '{}' transitioning to half-open", self.name);
                true
            }
            CircuitState::HalfOpen => {
                // A probe whose future was dropped never reports back; start a
                // fresh window once the previous one has gone stale.
                let stale = inner
                    .since
                    .map_or(true, |t| t.elapsed() >= self.config.reset_timeout);
                if stale {
                    inner.probes_in_flight = 0;
                    inner.since = Some(Instant::now());
                }
                if inner.probes_in_flight < self.config.half_open_max_calls {
                    inner.probes_in_flight += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn record_success(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => inner.consecutive_failures = 0,
            CircuitState::HalfOpen => {
                inner.probes_in_flight = inner.probes_in_flight.saturating_sub(1);
                inner.probe_successes += 1;
                if inner.probe_successes >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.since = None;
                    debug!("Circuit breaker '{}' closed after successful recovery", self.name);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn record_failure(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.since = Some(Instant::now());
                    warn!(
                        "Circuit breaker '{}' opened after {} failures",
                        self.name, inner.consecutive_failures
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.probes_in_flight = 0;
                inner.since = Some(Instant::now());
                warn!(
                    "Circuit breaker '{}' reopened after failure in half-open state",
                    self.name
                );
            }
            CircuitState::Open => inner.since = Some(Instant::now()),
        }
    }

    /// Manually resets the circuit breaker to closed state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.probe_successes = 0;
        inner.probes_in_flight = 0;
        inner.since = None;
        debug!("Circuit breaker '{}' manually reset", self.name);
    }
}
