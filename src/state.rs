use crate::config::AppConfig;
use crate::pricer::OptionPricer;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub quotes_served: AtomicU64,
    pub rates_served: AtomicU64,
    pub expired_quotes: AtomicU64,
    pub pricing_errors: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            quotes_served: AtomicU64::new(0),
            rates_served: AtomicU64::new(0),
            expired_quotes: AtomicU64::new(0),
            pricing_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for PerfCounters {
    fn default() -> Self {
        Self::new()
    }
}

// ── Application shared state (immutable pricer, no locks) ──

pub struct AppState {
    pub config: AppConfig,
    pub pricer: OptionPricer,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig, pricer: OptionPricer) -> Arc<Self> {
        Arc::new(Self {
            config,
            pricer,
            counters: PerfCounters::new(),
        })
    }
}
