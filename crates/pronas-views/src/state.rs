//! Screen-scoped state container shared by every controller.
//!
//! A view moves `Idle → Loading → {Ready, Failed}`. A submission overlays
//! `Ready` with the `submitting` flag and always lands back on `Ready`,
//! whether the write succeeded or not.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pronas_client::ClientError;
use tracing::{debug, warn};

use crate::{Lifecycle, Notice, ViewError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Snapshot-able state of one view.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    status: Status,
    data: Option<T>,
    submitting: bool,
    error: Option<String>,
    notice: Option<Notice>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            data: None,
            submitting: false,
            error: None,
            notice: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Why the last required read failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the triggering action for a submission should be enabled.
    pub fn can_submit(&self) -> bool {
        self.status == Status::Ready && !self.submitting
    }

    pub(crate) fn data_mut(&mut self) -> Result<&mut T, ViewError> {
        match self.status {
            Status::Ready => self.data.as_mut().ok_or(ViewError::NotReady),
            _ => Err(ViewError::NotReady),
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub(crate) fn begin_load(&mut self) {
        debug!(from = ?self.status, "loading");
        self.status = Status::Loading;
        self.error = None;
    }

    pub(crate) fn ready(&mut self, data: T) {
        debug!(from = ?self.status, "ready");
        self.status = Status::Ready;
        self.data = Some(data);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, err: &ClientError) {
        debug!(from = ?self.status, "failed");
        self.status = Status::Failed;
        self.data = None;
        self.error = Some(err.detail());
    }

    /// Enter `Submitting`. Rejected, without side effects, unless the view
    /// is `Ready` and idle.
    pub(crate) fn begin_submit(&mut self) -> Result<(), ViewError> {
        if self.status != Status::Ready {
            return Err(ViewError::NotReady);
        }
        if self.submitting {
            return Err(ViewError::Busy);
        }
        self.submitting = true;
        self.notice = None;
        Ok(())
    }

    pub(crate) fn end_submit(&mut self) {
        self.submitting = false;
    }
}

/// Interior-mutable holder for a [`ViewState`]. The lock is never held across
/// an `.await`.
#[derive(Debug)]
pub(crate) struct StateCell<T>(Mutex<ViewState<T>>);

impl<T> StateCell<T> {
    pub(crate) fn new() -> Self {
        Self(Mutex::new(ViewState::default()))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ViewState<T>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> ViewState<T>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Run the required reads in `fetch` and settle on `Ready` or `Failed`.
    ///
    /// A torn-down view is left untouched.
    pub(crate) async fn load<F>(
        &self,
        screen: &'static str,
        lifecycle: &Lifecycle,
        fetch: F,
    ) -> Result<(), ViewError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.lock().begin_load();
        match lifecycle.guard(fetch).await? {
            Ok(data) => {
                self.lock().ready(data);
                Ok(())
            }
            Err(err) => {
                warn!(screen, error = %err, "required read failed");
                self.lock().fail(&err);
                Err(err.into())
            }
        }
    }

    /// Run one write with the `submitting` flag raised.
    ///
    /// On failure the view stays `Ready` with its data untouched and the
    /// error is returned for the caller to phrase.
    pub(crate) async fn submit<F, R>(
        &self,
        screen: &'static str,
        lifecycle: &Lifecycle,
        write: F,
    ) -> Result<R, ViewError>
    where
        F: Future<Output = Result<R, ClientError>>,
    {
        self.lock().begin_submit()?;
        let outcome = lifecycle.guard(write).await;
        self.lock().end_submit();
        match outcome? {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(screen, error = %err, "submission failed");
                Err(err.into())
            }
        }
    }
}
