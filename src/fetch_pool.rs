use rayon::prelude::*;

/// Bounded pool for independent upstream calls (one per season or league).
/// Without a pool the work runs inline on the caller's thread.
pub struct FetchPool {
    pool: Option<rayon::ThreadPool>,
}

impl FetchPool {
    pub fn new(threads: usize) -> Self {
        if threads <= 1 {
            return Self::sequential();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("pitchside-fetch-{idx}"))
            .build()
            .ok();
        Self { pool }
    }

    pub fn sequential() -> Self {
        Self { pool: None }
    }

    /// Applies `f` to every item; output order always matches input order.
    pub fn map<I, O, F>(&self, items: &[I], f: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send,
    {
        match self.pool.as_ref() {
            Some(pool) => pool.install(|| items.par_iter().map(&f).collect()),
            None => items.iter().map(f).collect(),
        }
    }
}
