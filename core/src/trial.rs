//! Trial lifecycle tracking
//!
//! A trial moves `Pending -> Running -> {Solved | Failed} -> Recorded` and
//! never goes back. Failed trials are recorded too; there are no retries.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

/// Lifecycle state of a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialState {
    /// Scheduled, not started
    Pending,
    /// Solve call in progress
    Running,
    /// Solve returned a solution
    Solved,
    /// Solve returned no solution
    Failed,
    /// Metrics collected and stored
    Recorded,
}

/// One (planner, algorithm, repetition) execution
#[derive(Debug, Clone)]
pub struct Trial {
    /// Registry id of the planner
    pub planner: String,

    /// Algorithm id passed to the planner
    pub algorithm: String,

    /// Zero-based repetition index
    pub repetition: usize,

    state: TrialState,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
}

impl Trial {
    /// Create a pending trial
    pub fn new(planner: impl Into<String>, algorithm: impl Into<String>, repetition: usize) -> Self {
        Self {
            planner: planner.into(),
            algorithm: algorithm.into(),
            repetition,
            state: TrialState::Pending,
            started_at: None,
            elapsed: None,
        }
    }

    /// Current state
    pub fn state(&self) -> TrialState {
        self.state
    }

    /// Wall time of the solve call, once finished
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Start the clock
    pub fn start(&mut self) -> BenchResult<()> {
        self.transition(TrialState::Pending, TrialState::Running)?;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// Stop the clock and return the elapsed wall time
    pub fn finish(&mut self, solved: bool) -> BenchResult<Duration> {
        let next = if solved {
            TrialState::Solved
        } else {
            TrialState::Failed
        };
        self.transition(TrialState::Running, next)?;

        let elapsed = self
            .started_at
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO);
        self.elapsed = Some(elapsed);
        Ok(elapsed)
    }

    /// Mark the outcome as stored
    pub fn record(&mut self) -> BenchResult<()> {
        match self.state {
            TrialState::Solved | TrialState::Failed => {
                self.state = TrialState::Recorded;
                Ok(())
            }
            from => Err(BenchError::InvalidTransition {
                from,
                to: TrialState::Recorded,
            }),
        }
    }

    fn transition(&mut self, expected: TrialState, to: TrialState) -> BenchResult<()> {
        if self.state != expected {
            return Err(BenchError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
