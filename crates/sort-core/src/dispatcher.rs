//! Parallel frame dispatch.
//!
//! A frame is split into stripes along the configured axis and stripe `s`
//! is assigned to worker `s % N`. Each worker sorts its stripes in
//! increasing index order on its own scoped thread. The call returns only
//! after every worker has been joined.
//!
//! Workers wait on a start gate until the whole pool has been spawned. If
//! spawning any worker fails the gate never opens, the spawned workers exit
//! without touching their stripes, and the frame is left exactly as it was.

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use pixsort_common::error::{PixsortError, PixsortResult};
use pixsort_frame_model::{Frame, SortConfig};

use crate::sorter::StripeSorter;
use crate::stripe::{stripes_mut, StripeMut};

/// Summary of one transform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Stripes sorted (rows or columns of the frame).
    pub stripes: usize,
    /// Workers spawned.
    pub workers: usize,
    /// Wall time of the whole call, spawn and join included.
    pub elapsed: Duration,
}

/// Sorts whole frames across a fixed-size pool of scoped worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDispatcher {
    config: SortConfig,
}

impl FrameDispatcher {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Sort every stripe of `frame` in place.
    ///
    /// Fails only when a worker thread cannot be spawned (the frame is then
    /// unchanged) or when a worker panics.
    pub fn transform(&self, frame: &mut Frame) -> PixsortResult<DispatchStats> {
        self.dispatch(frame, WorkerFaults::default())
    }

    fn dispatch(&self, frame: &mut Frame, faults: WorkerFaults) -> PixsortResult<DispatchStats> {
        let started = Instant::now();
        let workers = self.config.workers.get();
        let sorter = StripeSorter::new(self.config.key);

        let mut queues: Vec<Vec<StripeMut<'_>>> = (0..workers).map(|_| Vec::new()).collect();
        let mut stripes = 0usize;
        for (index, stripe) in stripes_mut(frame, self.config.axis).enumerate() {
            queues[index % workers].push(stripe);
            stripes += 1;
        }

        std::thread::scope(|scope| -> PixsortResult<()> {
            let mut gates = Vec::with_capacity(workers);
            let mut handles = Vec::with_capacity(workers);

            for (worker_id, queue) in queues.into_iter().enumerate() {
                let (gate, opened) = mpsc::channel::<()>();
                let panics = faults.panic_worker == Some(worker_id);
                let spawned = if faults.fail_spawn == Some(worker_id) {
                    Err(io::Error::new(
                        io::ErrorKind::OutOfMemory,
                        "thread limit reached",
                    ))
                } else {
                    std::thread::Builder::new()
                        .name(format!("pixsort-worker-{worker_id}"))
                        .spawn_scoped(scope, move || {
                            if opened.recv().is_err() {
                                return;
                            }
                            if panics {
                                panic!("worker {worker_id} failed");
                            }
                            for mut stripe in queue {
                                sorter.sort(&mut stripe);
                            }
                        })
                };
                let handle = spawned.map_err(|e| {
                    PixsortError::dispatch(format!(
                        "failed to spawn worker {worker_id} of {workers}: {e}"
                    ))
                })?;
                gates.push(gate);
                handles.push(handle);
            }

            for gate in gates {
                // A send only fails if the worker already exited, which it
                // cannot do before receiving.
                gate.send(()).ok();
            }

            let mut panicked = 0usize;
            for handle in handles {
                if handle.join().is_err() {
                    panicked += 1;
                }
            }
            if panicked > 0 {
                return Err(PixsortError::dispatch(format!(
                    "{panicked} of {workers} workers panicked"
                )));
            }
            Ok(())
        })?;

        let stats = DispatchStats {
            stripes,
            workers,
            elapsed: started.elapsed(),
        };
        tracing::trace!(
            axis = %self.config.axis,
            stripes,
            workers,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "Frame transformed"
        );
        Ok(stats)
    }
}

/// Failures forced into a dispatch, by worker index. Always empty outside tests.
#[derive(Debug, Clone, Copy, Default)]
struct WorkerFaults {
    fail_spawn: Option<usize>,
    panic_worker: Option<usize>,
}

/// Sort every stripe of `frame` along `config.axis`, in place.
pub fn transform(frame: &mut Frame, config: &SortConfig) -> PixsortResult<DispatchStats> {
    FrameDispatcher::new(*config).transform(frame)
}
