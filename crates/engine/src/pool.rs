/// Fork-join worker pool primitive (C1): spawn exactly `workers` concurrent
/// units of work, each given its integer id in `[0, workers)`, and return
/// only once all have finished. No task queue, no work stealing, no result
/// channel — coordination between workers happens entirely through whatever
/// shared data the caller's closure captures.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to build worker pool");
        Self { pool, workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `f` once per worker id, blocking until every invocation returns.
    pub fn run<F>(&self, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        self.pool.scope(|scope| {
            for id in 0..self.workers {
                let f = &f;
                scope.spawn(move |_| f(id));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn runs_every_worker_exactly_once() {
        let pool = WorkerPool::new(4);
        let seen = (0..4).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>();
        pool.run(|id| {
            seen[id].fetch_add(1, Ordering::SeqCst);
        });
        assert!(seen.iter().all(|count| count.load(Ordering::SeqCst) == 1));
    }
}
