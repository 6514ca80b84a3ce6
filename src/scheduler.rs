//! Pair Scheduler (§4.9/§5): enumerates unordered pairs, dispatches them to
//! a fixed worker pool over `crossbeam-channel`, collects matches, and
//! honors progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::bounded;

use crate::cache::SimilarityCache;
use crate::cancellation::CancellationToken;
use crate::config::Config;
use crate::error::Result;
use crate::model::{FunctionRecord, Match};
use crate::scorer;

/// The result of a detection run: either the sorted match list, or a
/// distinguished cancellation outcome carrying no partial results.
#[derive(Debug, Clone)]
pub enum DetectionOutcome {
    Matches(Vec<Match>),
    Cancelled,
}

/// `(completed, total)`. May be invoked from any worker thread.
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

struct WorkItem {
    i: usize,
    j: usize,
}

struct WorkResult {
    i: usize,
    j: usize,
    score: f64,
}

/// Run near-duplicate detection over `functions`. See §4.9 for the full
/// protocol; `progress` and `cancellation` are both optional.
pub fn find_similar(
    functions: &[FunctionRecord],
    config: &Config,
    progress: Option<&ProgressFn<'_>>,
    cancellation: Option<&CancellationToken>,
) -> Result<DetectionOutcome> {
    let n = functions.len();
    if n < 2 {
        return Ok(DetectionOutcome::Matches(Vec::new()));
    }

    let start = Instant::now();
    let total = n * (n - 1) / 2;
    tracing::debug!(functions = n, pairs = total, "pre-normalizing function records");
    for f in functions {
        f.precompute();
    }

    let cache = SimilarityCache::new(config.limits.max_cache_size);
    let workers = config.resolved_worker_threads().min(total.max(1));

    let (work_tx, work_rx) = bounded::<WorkItem>(total);
    let (result_tx, result_rx) = bounded::<WorkResult>(total);

    let cancelled_during_enumeration = std::thread::scope(|scope| {
        let mut cancelled = false;

        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let cache = &cache;
            let cancellation = cancellation;
            scope.spawn(move || {
                for item in work_rx.iter() {
                    if cancellation.is_some_and(CancellationToken::is_cancelled) {
                        break;
                    }
                    let s = scorer::score(&functions[item.i], &functions[item.j], config, cache);
                    if result_tx.send(WorkResult { i: item.i, j: item.j, score: s }).is_err() {
                        break;
                    }
                }
            });
        }
        drop(work_rx);
        drop(result_tx);

        'enumerate: for i in 0..n {
            for j in (i + 1)..n {
                if cancellation.is_some_and(CancellationToken::is_cancelled) {
                    cancelled = true;
                    break 'enumerate;
                }
                if work_tx.send(WorkItem { i, j }).is_err() {
                    break 'enumerate;
                }
            }
        }
        drop(work_tx);
        cancelled
    });

    let completed = AtomicUsize::new(0);
    let mut matches = Vec::new();
    for result in result_rx.iter() {
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(cb) = progress {
            cb(done, total);
        }
        if result.score >= config.threshold {
            matches.push(Match {
                index_a: result.i,
                index_b: result.j,
                score: result.score,
            });
        }
    }

    let observed_cancellation = cancelled_during_enumeration
        || cancellation.is_some_and(CancellationToken::is_cancelled);

    if observed_cancellation {
        tracing::debug!(functions = n, pairs = total, elapsed = ?start.elapsed(), "run cancelled");
        return Ok(DetectionOutcome::Cancelled);
    }

    matches.sort_by_key(|m| (m.index_a, m.index_b));
    tracing::debug!(
        functions = n,
        pairs = total,
        matches = matches.len(),
        elapsed = ?start.elapsed(),
        "run complete"
    );
    Ok(DetectionOutcome::Matches(matches))
}

/// A reusable handle bundling a config with its own cancellation token, for
/// callers that want to start and later cancel a run without threading a
/// token through manually. Mirrors the host toolkit's pattern of a small
/// struct wrapping config + a cooperative-cancellation flag.
#[derive(Debug, Clone)]
pub struct PairScheduler {
    config: Config,
    cancellation: CancellationToken,
}

impl PairScheduler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn find_similar(
        &self,
        functions: &[FunctionRecord],
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<DetectionOutcome> {
        find_similar(functions, &self.config, progress, Some(&self.cancellation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AstNode, Param, TypeExpr};
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> AstNode {
        AstNode::Identifier(name.into())
    }

    fn sum_fn(name: &str, left: &str, right: &str, op: &str) -> FunctionRecord {
        FunctionRecord::new(
            name,
            "f.go",
            1,
            3,
            AstNode::FunctionDecl {
                name: name.into(),
                params: vec![
                    Param {
                        name: "a".into(),
                        ty: TypeExpr::Ident("int".into()),
                    },
                    Param {
                        name: "b".into(),
                        ty: TypeExpr::Ident("int".into()),
                    },
                ],
                results: vec![TypeExpr::Ident("int".into())],
                body: Some(Box::new(AstNode::Block(vec![AstNode::Return(vec![
                    AstNode::Binary {
                        op: op.into(),
                        left: Box::new(ident(left)),
                        right: Box::new(ident(right)),
                    },
                ])]))),
            },
        )
    }

    fn loop_fn(name: &str) -> FunctionRecord {
        FunctionRecord::new(
            name,
            "g.go",
            1,
            10,
            AstNode::FunctionDecl {
                name: name.into(),
                params: vec![],
                results: vec![],
                body: Some(Box::new(AstNode::Block(vec![AstNode::For {
                    init: None,
                    cond: None,
                    post: None,
                    body: Box::new(AstNode::Block(vec![AstNode::ExprStmt(Box::new(
                        AstNode::Call {
                            callee: Box::new(ident("doThing")),
                            args: vec![],
                        },
                    ))])),
                }]))),
            },
        )
    }

    #[test]
    fn fewer_than_two_functions_returns_empty_immediately() {
        let functions = vec![sum_fn("f", "a", "b", "+")];
        let config = Config::default();
        let outcome = find_similar(&functions, &config, None, None).unwrap();
        assert!(matches!(outcome, DetectionOutcome::Matches(m) if m.is_empty()));
    }

    #[test]
    fn three_functions_two_near_duplicates_one_distinct() {
        let functions = vec![
            sum_fn("f", "a", "b", "+"),
            sum_fn("g", "x", "y", "+"),
            loop_fn("h"),
        ];
        let config = Config::default();

        let calls: std::sync::Mutex<Vec<(usize, usize)>> = std::sync::Mutex::new(Vec::new());
        let progress = |completed: usize, total: usize| {
            calls.lock().unwrap().push((completed, total));
        };

        let outcome = find_similar(&functions, &config, Some(&progress), None).unwrap();
        let DetectionOutcome::Matches(matches) = outcome else {
            panic!("expected Matches outcome");
        };

        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].index_a, matches[0].index_b), (0, 1));
        assert_eq!(matches[0].score, 1.0);

        let recorded = calls.into_inner().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded.iter().all(|(_, total)| *total == 3));
        assert_eq!(recorded.last().copied().unwrap().0, 3);
    }

    #[test]
    fn rerun_over_same_input_is_bit_stable() {
        let functions = vec![
            sum_fn("f", "a", "b", "+"),
            sum_fn("g", "x", "y", "+"),
            loop_fn("h"),
        ];
        let config = Config::default();

        let DetectionOutcome::Matches(first) = find_similar(&functions, &config, None, None).unwrap() else {
            panic!("expected Matches outcome");
        };
        let DetectionOutcome::Matches(second) = find_similar(&functions, &config, None, None).unwrap() else {
            panic!("expected Matches outcome");
        };

        assert_eq!(first, second);
    }

    #[test]
    fn pre_cancelled_token_yields_cancelled_outcome() {
        let functions = vec![
            sum_fn("f", "a", "b", "+"),
            sum_fn("g", "x", "y", "+"),
        ];
        let config = Config::default();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = find_similar(&functions, &config, None, Some(&token)).unwrap();
        assert!(matches!(outcome, DetectionOutcome::Cancelled));
    }

    #[test]
    fn scheduler_handle_exposes_its_own_cancellation_token() {
        let scheduler = PairScheduler::new(Config::default());
        let token = scheduler.cancellation_token();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(scheduler.cancellation_token().is_cancelled());
    }
}
