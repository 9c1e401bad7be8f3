use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Source of "now" for modification stamps and timestamp-derived identifiers.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Mints identifiers for new scenarios and transaction lines.
pub trait IdSource: Send + Sync {
    fn scenario_id(&self) -> String;
    fn transaction_id(&self) -> String;
}

/// `scenario_<millis>` / `txn_<millis>` identifiers.
///
/// Two ids requested within the same millisecond are pushed one millisecond
/// apart so the sequence stays strictly increasing.
#[derive(Debug)]
pub struct TimestampIds<C> {
    clock: C,
    last_millis: AtomicI64,
}

impl<C: Clock> TimestampIds<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_millis: AtomicI64::new(0),
        }
    }

    fn next_millis(&self) -> i64 {
        let now = self.clock.now().timestamp_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

impl<C: Clock> IdSource for TimestampIds<C> {
    fn scenario_id(&self) -> String {
        format!("scenario_{}", self.next_millis())
    }

    fn transaction_id(&self) -> String {
        format!("txn_{}", self.next_millis())
    }
}

/// Counter-backed identifiers for deterministic runs.
#[derive(Debug)]
pub struct SequentialIds {
    scenarios: AtomicU64,
    transactions: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            scenarios: AtomicU64::new(1),
            transactions: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn scenario_id(&self) -> String {
        let id = self.scenarios.fetch_add(1, Ordering::Relaxed);
        format!("scenario_{id:06}")
    }

    fn transaction_id(&self) -> String {
        let id = self.transactions.fetch_add(1, Ordering::Relaxed);
        format!("txn_{id:06}")
    }
}
