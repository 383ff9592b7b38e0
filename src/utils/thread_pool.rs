use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::LazyLock;

static NUM_CPUS: LazyLock<usize> = LazyLock::new(|| {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
});

/// Hardware parallelism, falling back to 1 when it cannot be determined
#[must_use]
pub fn available_workers() -> usize {
    *NUM_CPUS
}

/// Build a dedicated pool with exactly `num_threads` named workers
///
/// # Errors
///
/// Returns an error if the operating system refuses to spawn the threads
pub fn build_pool(num_threads: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .thread_name(|i| format!("unburnt-worker-{i}"))
        .build()
}
