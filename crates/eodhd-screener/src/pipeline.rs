//! Multi-stage screening pipeline
//!
//! A run narrows a symbol list in three stages:
//!
//! 1. **Candidates**: the caller's explicit symbols, or the provider screener.
//! 2. **Fundamentals**: one fundamentals lookup per candidate, all in flight
//!    together, keeping symbols whose record satisfies every constraint.
//! 3. **Technicals**: one round per constraint, in caller order. Each round
//!    looks up the indicator for every symbol still standing and keeps those
//!    whose latest observation passes.
//!
//! Survivors keep their relative order at every stage. A lookup that fails
//! drops only its own symbol; only a failed screener call aborts the run.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::types::{ScreenRequest, ScreenerFilter};
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::filters::{
    FundamentalsConstraintSet, TechnicalConstraint, passes_fundamentals, passes_technical,
    validate_constraints,
};
use crate::gateway::MarketDataGateway;

/// Inputs of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    pub screener_filters: ScreenerFilter,
    pub screener_sort: Option<String>,
    pub screener_limit: Option<u32>,
    pub fundamentals: FundamentalsConstraintSet,
    pub technical: Vec<TechnicalConstraint>,
    /// When non-empty, used verbatim as the candidate list and the screener
    /// is not called
    pub symbols: Vec<String>,
}

/// Symbol sequences produced by each stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub initial: Vec<String>,
    pub after_fundamentals: Vec<String>,
    #[serde(rename = "final")]
    pub final_symbols: Vec<String>,
}

impl PipelineResult {
    pub fn initial_count(&self) -> usize {
        self.initial.len()
    }

    pub fn after_fundamentals_count(&self) -> usize {
        self.after_fundamentals.len()
    }

    pub fn final_count(&self) -> usize {
        self.final_symbols.len()
    }

    /// Tool-facing JSON summary
    pub fn to_report(&self) -> Value {
        json!({
            "initial_count": self.initial_count(),
            "after_fundamentals": self.after_fundamentals_count(),
            "final_count": self.final_count(),
            "symbols": self.final_symbols,
            "stages": {
                "screener": self.initial,
                "fundamentals_filtered": self.after_fundamentals,
                "technical_filtered": self.final_symbols,
            }
        })
    }
}

/// Screening pipeline over an injected market data gateway
pub struct ScreeningPipeline {
    gateway: Arc<dyn MarketDataGateway>,
    config: Arc<ScreenerConfig>,
}

impl ScreeningPipeline {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, config: Arc<ScreenerConfig>) -> Self {
        Self { gateway, config }
    }

    /// Run all three stages
    ///
    /// Constraints are validated before any request is made.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineResult> {
        validate_constraints(&request.fundamentals)?;
        request
            .technical
            .iter()
            .try_for_each(TechnicalConstraint::validate)?;

        let initial = self.select_candidates(request).await?;
        info!("Stage 1: {} candidates", initial.len());

        if initial.is_empty() {
            return Ok(PipelineResult::default());
        }

        let after_fundamentals = if request.fundamentals.is_empty() {
            initial.clone()
        } else {
            self.narrow_by_fundamentals(&initial, &request.fundamentals)
                .await
        };
        info!(
            "Stage 2: {} of {} passed fundamentals",
            after_fundamentals.len(),
            initial.len()
        );

        let mut final_symbols = after_fundamentals.clone();
        for constraint in &request.technical {
            if final_symbols.is_empty() {
                break;
            }
            final_symbols = self.narrow_by_indicator(&final_symbols, constraint).await;
            debug!("{}: {} symbols remain", constraint, final_symbols.len());
        }
        info!(
            "Stage 3: {} of {} passed technicals",
            final_symbols.len(),
            after_fundamentals.len()
        );

        Ok(PipelineResult {
            initial,
            after_fundamentals,
            final_symbols,
        })
    }

    async fn select_candidates(&self, request: &PipelineRequest) -> Result<Vec<String>> {
        if !request.symbols.is_empty() {
            debug!("Using {} caller-supplied symbols", request.symbols.len());
            return Ok(request.symbols.clone());
        }

        let screen = ScreenRequest {
            filters: request.screener_filters.clone(),
            sort: request.screener_sort.clone(),
            limit: Some(
                request
                    .screener_limit
                    .filter(|limit| *limit > 0)
                    .unwrap_or(self.config.default_screener_limit),
            ),
            offset: None,
            signals: None,
        };

        let rows = self.gateway.screen(&screen).await?;
        Ok(rows.into_iter().map(|row| row.code).collect())
    }

    async fn narrow_by_fundamentals(
        &self,
        symbols: &[String],
        constraints: &FundamentalsConstraintSet,
    ) -> Vec<String> {
        let constraints = Arc::new(constraints.clone());
        let lookups: Vec<_> = symbols
            .iter()
            .cloned()
            .map(|symbol| {
                let gateway = Arc::clone(&self.gateway);
                let constraints = Arc::clone(&constraints);
                async move {
                    match gateway.fundamentals(&symbol).await {
                        Ok(record) => passes_fundamentals(&record, &constraints),
                        Err(e) => {
                            warn!("Dropping {}: fundamentals lookup failed: {}", symbol, e);
                            false
                        }
                    }
                }
            })
            .collect();

        let verdicts: Vec<bool> = stream::iter(lookups)
            .buffered(self.config.concurrency_for(symbols.len()))
            .collect()
            .await;

        retain_passing(symbols, &verdicts)
    }

    async fn narrow_by_indicator(
        &self,
        symbols: &[String],
        constraint: &TechnicalConstraint,
    ) -> Vec<String> {
        let query = Arc::new(constraint.query());
        let constraint = Arc::new(constraint.clone());
        let lookups: Vec<_> = symbols
            .iter()
            .cloned()
            .map(|symbol| {
                let gateway = Arc::clone(&self.gateway);
                let query = Arc::clone(&query);
                let constraint = Arc::clone(&constraint);
                async move {
                    match gateway.indicator(&symbol, &query).await {
                        Ok(series) => passes_technical(&series, &constraint),
                        Err(e) => {
                            warn!(
                                "Dropping {}: {} lookup failed: {}",
                                symbol, constraint.indicator, e
                            );
                            false
                        }
                    }
                }
            })
            .collect();

        let verdicts: Vec<bool> = stream::iter(lookups)
            .buffered(self.config.concurrency_for(symbols.len()))
            .collect()
            .await;

        retain_passing(symbols, &verdicts)
    }
}

/// Keep `symbols[i]` where `verdicts[i]` holds
fn retain_passing(symbols: &[String], verdicts: &[bool]) -> Vec<String> {
    symbols
        .iter()
        .zip(verdicts)
        .filter(|(_, keep)| **keep)
        .map(|(symbol, _)| symbol.clone())
        .collect()
}
