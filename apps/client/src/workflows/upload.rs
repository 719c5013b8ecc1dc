//! Upload workflow: single-file upload lifecycle and its result/error state.
//!
//! INVARIANT: at most one upload is in flight. The guard lives in the state
//! machine itself (`upload()` refuses while `Uploading`), not in whatever
//! surface renders the trigger. An `upload()` future dropped before its
//! response arrives puts back the state it replaced, so the guard never
//! outlives the call that set it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api_client::ResumeApi;
use crate::errors::ApiError;
use crate::models::{Resume, ResumeFile};

/// Shown when a failure carries no description of its own.
pub const UPLOAD_FALLBACK_MESSAGE: &str = "Upload Failed";

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Uploading(ResumeFile),
    Success(Resume),
    Error(String),
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading(_))
    }
}

/// Why an `upload()` invocation did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadSkipped {
    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    AlreadyUploading,
}

pub struct UploadController {
    api: Arc<dyn ResumeApi>,
    selected: watch::Sender<Option<ResumeFile>>,
    state: watch::Sender<UploadState>,
}

impl UploadController {
    pub fn new(api: Arc<dyn ResumeApi>) -> Self {
        let (selected, _) = watch::channel(None);
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            api,
            selected,
            state,
        }
    }

    /// Records the candidate file. Contents are not validated; an unlisted
    /// extension only produces a warning since the backend is the validator.
    pub fn select_file(&self, file: ResumeFile) {
        if !file.has_accepted_extension() {
            warn!(
                "'{}' is not one of the suggested formats (pdf, doc, docx, txt); sending anyway",
                file.file_name
            );
        }
        self.selected.send_replace(Some(file));
    }

    pub fn selected_file(&self) -> Option<ResumeFile> {
        self.selected.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Whether a trigger bound to `upload()` should be enabled.
    #[allow(dead_code)]
    pub fn can_upload(&self) -> bool {
        self.selected.borrow().is_some() && !self.state.borrow().is_uploading()
    }

    /// Uploads the selected file and returns the resulting state.
    ///
    /// `Idle`, `Success` and `Error` all accept a new upload; the previous
    /// result or error is cleared on entering `Uploading`. Exactly one network
    /// call is made per accepted invocation.
    pub async fn upload(&self) -> Result<UploadState, UploadSkipped> {
        let file = self.selected_file().ok_or(UploadSkipped::NoFileSelected)?;

        let mut previous = None;
        self.state.send_if_modified(|state| {
            if state.is_uploading() {
                return false;
            }
            previous = Some(std::mem::replace(state, UploadState::Uploading(file.clone())));
            true
        });
        let Some(previous) = previous else {
            warn!("Ignoring upload of '{}': another upload is in flight", file.file_name);
            return Err(UploadSkipped::AlreadyUploading);
        };
        let in_flight = InFlight {
            state: &self.state,
            previous: Some(previous),
        };

        info!("Uploading '{}' ({} bytes)", file.file_name, file.content.len());

        let next = match self.api.upload_resume(&file).await {
            Ok(resume) => {
                info!("Upload of '{}' analysed as resume {}", file.file_name, resume.id);
                UploadState::Success(resume)
            }
            Err(e) => {
                warn!("Upload of '{}' failed: {e}", file.file_name);
                UploadState::Error(failure_message(&e))
            }
        };

        in_flight.finish(next.clone());
        Ok(next)
    }
}

fn failure_message(e: &ApiError) -> String {
    if e.has_detail() {
        e.describe()
    } else {
        UPLOAD_FALLBACK_MESSAGE.to_string()
    }
}

/// Holds the `Uploading` state for one accepted call. Dropped without
/// `finish`, it restores the state that was replaced.
struct InFlight<'a> {
    state: &'a watch::Sender<UploadState>,
    previous: Option<UploadState>,
}

impl InFlight<'_> {
    fn finish(mut self, next: UploadState) {
        self.previous = None;
        self.state.send_replace(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        warn!("Upload abandoned before a response arrived");
        self.state.send_if_modified(|state| {
            if !state.is_uploading() {
                return false;
            }
            *state = previous;
            true
        });
    }
}
