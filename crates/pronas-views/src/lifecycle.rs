//! Per-controller teardown guard.
//!
//! Every controller owns one [`Lifecycle`]. Network calls are raced against
//! its cancellation token, so once the view is torn down an in-flight call
//! is abandoned and its response never reaches controller state.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ViewError;

/// Cloneable handle to a controller's lifetime. Clones share one token.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    token: CancellationToken,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dismiss the view. Pending and future guarded calls resolve to
    /// [`ViewError::Cancelled`].
    pub fn teardown(&self) {
        debug!("view torn down");
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Await `fut` unless the view is torn down first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, ViewError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ViewError::Cancelled),
            out = fut => Ok(out),
        }
    }
}
