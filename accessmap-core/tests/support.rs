//! Shared helpers for the behaviour tests.

use std::future::Future;

/// Drive `future` to completion on a single-threaded runtime.
///
/// # Panics
///
/// Panics when the runtime cannot be built.
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build test runtime")
        .block_on(future)
}
