//! In-memory trade source for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kolbr_core::{AnalysisRequest, KolbrResult, Verdict};
use serde_json::{json, Value};

use crate::client::TradeSource;

pub struct FakeSource {
    trades: KolbrResult<Vec<Value>>,
    verdict: KolbrResult<Option<Verdict>>,
    pub recent_calls: AtomicUsize,
    pub analyze_calls: AtomicUsize,
    pub last_limit: AtomicUsize,
    pub last_request: Mutex<Option<AnalysisRequest>>,
}

impl FakeSource {
    pub fn new(trades: Vec<Value>) -> Self {
        Self {
            trades: Ok(trades),
            verdict: Ok(None),
            recent_calls: AtomicUsize::new(0),
            analyze_calls: AtomicUsize::new(0),
            last_limit: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing_feed(error: kolbr_core::KolbrError) -> Self {
        Self {
            trades: Err(error),
            ..Self::new(vec![])
        }
    }

    pub fn with_verdict(mut self, verdict: KolbrResult<Option<Verdict>>) -> Self {
        self.verdict = verdict;
        self
    }

    pub fn calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst) + self.analyze_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeSource for FakeSource {
    async fn recent_trades(&self, limit: usize) -> KolbrResult<Vec<Value>> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        self.trades.clone()
    }

    async fn analyze(&self, request: &AnalysisRequest) -> KolbrResult<Option<Verdict>> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.verdict.clone()
    }

    async fn health(&self) -> KolbrResult<Value> {
        Ok(json!({"ok": true}))
    }
}
