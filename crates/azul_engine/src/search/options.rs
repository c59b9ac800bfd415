//! Search configuration, cancellation and progress reporting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::constants::*;
use crate::types::Move;

/// Cooperative stop signal shared between a caller and a running search
///
/// Clones share the same flag. The search polls it after every child node and before
/// every new depth.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Interim results streamed while a search runs
#[derive(Clone, Debug, PartialEq)]
pub enum SearchEvent {
    DepthStarted {
        depth: u32,
    },
    /// A root move finished at `depth`; `best_move`/`best_score` are the best so far
    RootMoveEvaluated {
        depth: u32,
        mv: Move,
        score: f32,
        best_move: Move,
        best_score: f32,
    },
    DepthCompleted {
        depth: u32,
        best_move: Move,
        score: f32,
        nodes_searched: u64,
        elapsed: Duration,
    },
}

impl SearchEvent {
    pub fn depth(&self) -> u32 {
        match self {
            SearchEvent::DepthStarted { depth }
            | SearchEvent::RootMoveEvaluated { depth, .. }
            | SearchEvent::DepthCompleted { depth, .. } => *depth,
        }
    }
}

/// Search settings
///
/// # Examples
///
/// ```rust,ignore
/// let options = SearchOptions::default()
///     .with_time_budget(Duration::from_millis(250))
///     .with_transposition_table(false);
/// ```
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Wall-clock budget; depth 1 always completes regardless
    pub time_budget: Duration,
    /// Deepest iteration to run
    pub max_depth: u32,
    pub use_transposition_table: bool,
    pub cancel: Option<CancelToken>,
    pub progress: Option<Sender<SearchEvent>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            time_budget: Duration::from_secs_f32(DEFAULT_SECS_PER_MOVE),
            max_depth: MAX_DEPTH,
            use_transposition_table: true,
            cancel: None,
            progress: None,
        }
    }
}

impl SearchOptions {
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, progress: Sender<SearchEvent>) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Outcome of a search
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Move,
    /// Score of `best_move` from the mover's point of view
    pub score: f32,
    /// Deepest fully completed depth
    pub depth: u32,
    pub nodes_searched: u64,
    pub leaf_evaluations: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
    /// Root moves sorted best first at `depth`
    pub move_order: Vec<Move>,
    pub elapsed: Duration,
}
