use crossbeam_channel::Sender;

use crate::pipeline::batch_error::BatchError;
use crate::shared::partition::chunks;

/// Messages from workers to the coordinating thread.
enum WorkerEvent<R> {
    ItemDone,
    Finished {
        worker: usize,
        result: Result<R, BatchError>,
    },
}

/// Handle a worker uses to report each finished item.
pub struct ProgressTicker<'a, R> {
    tx: &'a Sender<WorkerEvent<R>>,
}

impl<R> ProgressTicker<'_, R> {
    pub fn tick(&self) {
        let _ = self.tx.send(WorkerEvent::ItemDone);
    }
}

/// Fork-join over contiguous chunks of a slice.
///
/// Layout: `parent ← [worker 0 .. worker n-1]`. Each worker owns one chunk
/// and returns a self-contained result; the parent relays progress while
/// workers run and collects results in worker order once all have finished.
pub struct ThreadedChunkExecutor {
    workers: usize,
}

impl ThreadedChunkExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `work(worker, chunk, ticker)` for each chunk.
    ///
    /// `on_progress(done, total)` is called on the calling thread after each
    /// item. The first worker error (by worker index) is returned.
    pub fn execute<T, R, F>(
        &self,
        items: &[T],
        mut on_progress: impl FnMut(usize, usize),
        work: F,
    ) -> Result<Vec<R>, BatchError>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &[T], &ProgressTicker<'_, R>) -> Result<R, BatchError> + Sync,
    {
        let total = items.len();
        let (tx, rx) = crossbeam_channel::unbounded::<WorkerEvent<R>>();
        let mut results: Vec<(usize, Result<R, BatchError>)> = Vec::with_capacity(self.workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = chunks(total, self.workers)
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let tx = tx.clone();
                    let chunk = &items[range];
                    let work = &work;
                    scope.spawn(move || {
                        let result = work(worker, chunk, &ProgressTicker { tx: &tx });
                        let _ = tx.send(WorkerEvent::Finished { worker, result });
                    })
                })
                .collect();
            drop(tx);

            let mut done = 0;
            for event in rx.iter() {
                match event {
                    WorkerEvent::ItemDone => {
                        done += 1;
                        on_progress(done, total);
                    }
                    WorkerEvent::Finished { worker, result } => results.push((worker, result)),
                }
            }

            // Join every handle; the scope re-panics on any left unjoined.
            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(worker);
                }
            }
            match panicked {
                Some(worker) => Err(BatchError::WorkerPanicked { worker }),
                None => Ok(()),
            }
        })?;

        results.sort_by_key(|(worker, _)| *worker);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
