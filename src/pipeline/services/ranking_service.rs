use std::{
    convert::Infallible,
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use crate::common::Item;

/// How a set of items should be ordered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingMode {
    /// Ascending hue, red through violet.
    Rainbow,
    /// A mode name nobody handles. Ranking leaves the input untouched.
    Unrecognized(String),
}

impl RankingMode {
    /// Total: every string maps to some mode.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rainbow" => Self::Rainbow,
            _ => Self::Unrecognized(name.to_string()),
        }
    }
}

impl Default for RankingMode {
    fn default() -> Self {
        Self::Rainbow
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rainbow => f.write_str("rainbow"),
            Self::Unrecognized(name) => write!(f, "unrecognized({name})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankRequest {
    pub items: Vec<Item>,
    pub mode: RankingMode,
}

impl RankRequest {
    pub fn new(items: Vec<Item>, mode: RankingMode) -> Self {
        Self { items, mode }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankingService;

impl RankingService {
    pub fn new() -> Self {
        Self
    }

    /// Returns a permutation of `items` ordered according to `mode`.
    ///
    /// Items with equal sort keys keep their input order. An unrecognized
    /// mode returns the items unchanged.
    pub fn rank(items: &[Item], mode: &RankingMode) -> Vec<Item> {
        let mut ranked = items.to_vec();
        match mode {
            RankingMode::Rainbow => {
                // sort_by is stable
                ranked.sort_by(|a, b| a.color().hue().total_cmp(&b.color().hue()));
            }
            RankingMode::Unrecognized(name) => {
                tracing::debug!("Unrecognized ranking mode {:?}, keeping input order", name);
            }
        }
        ranked
    }
}

impl Service<RankRequest> for RankingService {
    type Response = Vec<Item>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RankRequest) -> Self::Future {
        let ranked = Self::rank(&request.items, &request.mode);
        Box::pin(async move { Ok(ranked) })
    }
}
