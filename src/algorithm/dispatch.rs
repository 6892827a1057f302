use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::algorithm::ShortestPathEngine;
use crate::config::RouterConfig;
use crate::data_structures::HeapType;
use crate::graph::Graph;
use crate::{Error, Result};

/// Cooperative cancellation flag shared between a caller and running batches
///
/// Workers check the flag before each origin, never in the middle of a
/// relaxation. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that running and future batches using this token stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Fails with `Cancelled` once cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Fans origin queries out over a fixed worker pool
///
/// Origins are cut into contiguous ranges of `chunk_size`. The cut depends only
/// on the number of origins, never on the number of workers, and results are
/// reassembled in range order, so output is identical for every pool size.
/// Each worker builds its own engine (queue and scratch) and reuses it for all
/// ranges it picks up; the graph is the only thing shared.
#[derive(Debug)]
pub struct Dispatcher {
    pool: ThreadPool,
    heap: HeapType,
    chunk_size: usize,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Builds the worker pool described by `config`
    pub fn new(config: &RouterConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads.unwrap_or(0))
            .thread_name(|i| format!("netroute-worker-{}", i))
            .build()?;
        debug!(
            "dispatcher ready: {} workers, heap {}, chunk size {}",
            pool.current_num_threads(),
            config.heap,
            config.chunk_size
        );
        Ok(Dispatcher {
            pool,
            heap: config.heap,
            chunk_size: config.chunk_size,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token checked by subsequent batches
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn heap(&self) -> HeapType {
        self.heap
    }

    /// Number of worker threads in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Contiguous ranges covering `0..n`
    pub fn partition(&self, n: usize) -> Vec<Range<usize>> {
        (0..n)
            .step_by(self.chunk_size)
            .map(|start| start..(start + self.chunk_size).min(n))
            .collect()
    }

    /// Runs `task` once per origin and returns the results in origin order
    ///
    /// `task` receives the worker's engine, the origin's position in `origins`
    /// and the origin vertex. The first error, including cancellation, aborts
    /// the batch and discards every partial result.
    pub fn map_origins<'g, G, T, F>(
        &self,
        graph: &'g G,
        origins: &[usize],
        task: F,
    ) -> Result<Vec<T>>
    where
        G: Graph,
        T: Send,
        F: Fn(&mut ShortestPathEngine<'g, G>, usize, usize) -> Result<T> + Sync,
    {
        self.cancel.check()?;
        let ranges = self.partition(origins.len());
        debug!(
            "dispatching {} origins as {} ranges over {} workers",
            origins.len(),
            ranges.len(),
            self.threads()
        );

        let heap = self.heap;
        let cancel = &self.cancel;
        let chunks: Result<Vec<Vec<T>>> = self.pool.install(|| {
            ranges
                .par_iter()
                .map_init(
                    || ShortestPathEngine::new(graph, heap),
                    |engine, range| {
                        let mut out = Vec::with_capacity(range.len());
                        for i in range.clone() {
                            cancel.check()?;
                            out.push(task(engine, i, origins[i])?);
                        }
                        Ok(out)
                    },
                )
                .collect()
        });

        let chunks = chunks.map_err(|e| self.log_abort(e))?;
        Ok(chunks.into_iter().flatten().collect())
    }

    /// Accumulates a per-origin contribution into one vector of length `width`
    ///
    /// Every range sums into its own zeroed accumulator. Ranges are processed
    /// in waves of a few per worker, and each wave's accumulators are added to
    /// the total in range order, so the floating-point result does not depend
    /// on how ranges were scheduled.
    pub fn fold_origins<'g, G, F>(
        &self,
        graph: &'g G,
        origins: &[usize],
        width: usize,
        task: F,
    ) -> Result<Vec<f64>>
    where
        G: Graph,
        F: Fn(&mut ShortestPathEngine<'g, G>, usize, usize, &mut [f64]) -> Result<()> + Sync,
    {
        self.cancel.check()?;
        let ranges = self.partition(origins.len());
        let wave = (self.threads() * 2).max(1);
        debug!(
            "folding {} origins as {} ranges, {} ranges per wave",
            origins.len(),
            ranges.len(),
            wave
        );

        let heap = self.heap;
        let cancel = &self.cancel;
        let mut total = vec![0.0; width];
        for batch in ranges.chunks(wave) {
            let partials: Result<Vec<Vec<f64>>> = self.pool.install(|| {
                batch
                    .par_iter()
                    .map_init(
                        || ShortestPathEngine::new(graph, heap),
                        |engine, range| {
                            let mut acc = vec![0.0; width];
                            for i in range.clone() {
                                cancel.check()?;
                                task(engine, i, origins[i], &mut acc)?;
                            }
                            Ok(acc)
                        },
                    )
                    .collect()
            });
            for partial in partials.map_err(|e| self.log_abort(e))? {
                for (t, p) in total.iter_mut().zip(partial) {
                    *t += p;
                }
            }
        }
        Ok(total)
    }

    fn log_abort(&self, error: Error) -> Error {
        match &error {
            Error::Cancelled => warn!("batch cancelled; partial results discarded"),
            other => warn!("batch aborted: {}", other),
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::generate_random;

    #[test]
    fn test_partition_ignores_thread_count() {
        for threads in [1, 3] {
            let config = RouterConfig::new().with_threads(threads).with_chunk_size(4);
            let dispatcher = Dispatcher::new(&config).unwrap();
            assert_eq!(dispatcher.partition(10), vec![0..4, 4..8, 8..10]);
            assert!(dispatcher.partition(0).is_empty());
        }
    }

    #[test]
    fn test_map_origins_preserves_order() {
        let net = generate_random(40, 160, 3);
        let g = net.graph().unwrap();
        let config = RouterConfig::new().with_threads(4).with_chunk_size(3);
        let dispatcher = Dispatcher::new(&config).unwrap();
        let origins: Vec<usize> = (0..40).rev().collect();
        let sources = dispatcher
            .map_origins(&g, &origins, |engine, i, origin| {
                let tree = engine.run(origin)?;
                Ok((i, tree.source))
            })
            .unwrap();
        let expected: Vec<(usize, usize)> = origins.iter().copied().enumerate().collect();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let net = generate_random(10, 30, 5);
        let g = net.graph().unwrap();
        let token = CancellationToken::new();
        let dispatcher = Dispatcher::new(&RouterConfig::new().with_threads(2))
            .unwrap()
            .with_cancellation(token.clone());
        token.cancel();
        let result = dispatcher.map_origins(&g, &[0, 1, 2], |engine, _, o| {
            Ok(engine.run(o)?.settle_order.len())
        });
        assert!(matches!(result, Err(Error::Cancelled)));
        let folded = dispatcher.fold_origins(&g, &[0], 1, |_, _, _, _| Ok(()));
        assert!(matches!(folded, Err(Error::Cancelled)));
    }

    #[test]
    fn test_cancel_from_inside_a_batch() {
        let net = generate_random(10, 30, 5);
        let g = net.graph().unwrap();
        let config = RouterConfig::new().with_threads(1).with_chunk_size(100);
        let dispatcher = Dispatcher::new(&config).unwrap();
        let token = dispatcher.cancellation_token().clone();
        let origins: Vec<usize> = (0..10).collect();
        let result = dispatcher.map_origins(&g, &origins, |engine, i, o| {
            if i == 2 {
                token.cancel();
            }
            engine.run(o)?;
            Ok(i)
        });
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
