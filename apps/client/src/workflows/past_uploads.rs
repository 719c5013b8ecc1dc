//! Past uploads workflow: list load plus the per-row detail modal.
//!
//! List policy: a failed load degrades to an empty list. The user cannot tell
//! "no uploads" from "backend unreachable"; the error is kept for logs and for
//! `last_load_error()`. Loads are tokened like detail fetches, so when loads
//! overlap only the most recently started one writes the list and its error.
//!
//! Detail policy: one modal slot, latest request wins. Every `open_details`
//! takes a fresh token; a completion is applied only while its token is still
//! the active one, so a slow earlier response can never replace a newer one.
//! A failed fetch surfaces `DetailState::Failed` instead of leaving the modal
//! loading forever.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api_client::ResumeApi;
use crate::errors::ApiError;
use crate::models::{Resume, ResumeId};
use crate::render::{render_row, ResumeRow};

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Resume>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Closed,
    Loading(ResumeId),
    Loaded(Resume),
    Failed { id: ResumeId, message: String },
}

impl DetailState {
    #[allow(dead_code)]
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailState::Closed)
    }

    /// Id of the resume the modal is showing or waiting for.
    pub fn resume_id(&self) -> Option<ResumeId> {
        match self {
            DetailState::Closed => None,
            DetailState::Loading(id) | DetailState::Failed { id, .. } => Some(*id),
            DetailState::Loaded(resume) => Some(resume.id),
        }
    }
}

pub struct PastUploadsController {
    api: Arc<dyn ResumeApi>,
    list: watch::Sender<ListState>,
    detail: watch::Sender<DetailState>,
    /// Token of the detail request allowed to write `detail`. Only changed
    /// inside `detail` modify closures, so check-and-apply is atomic.
    active_token: AtomicU64,
    /// Same scheme for list loads, changed only inside `list` modify closures.
    list_token: AtomicU64,
    last_load_error: Mutex<Option<Arc<ApiError>>>,
}

impl PastUploadsController {
    /// Starts in `ListState::Loading`; call [`load`](Self::load) to activate.
    pub fn new(api: Arc<dyn ResumeApi>) -> Self {
        let (list, _) = watch::channel(ListState::Loading);
        let (detail, _) = watch::channel(DetailState::Closed);
        Self {
            api,
            list,
            detail,
            active_token: AtomicU64::new(0),
            list_token: AtomicU64::new(0),
            last_load_error: Mutex::new(None),
        }
    }

    #[allow(dead_code)]
    pub fn list_state(&self) -> ListState {
        self.list.borrow().clone()
    }

    pub fn detail_state(&self) -> DetailState {
        self.detail.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn subscribe_list(&self) -> watch::Receiver<ListState> {
        self.list.subscribe()
    }

    #[allow(dead_code)]
    pub fn subscribe_detail(&self) -> watch::Receiver<DetailState> {
        self.detail.subscribe()
    }

    /// Error behind the most recent degraded load, cleared by a successful one.
    #[allow(dead_code)]
    pub fn last_load_error(&self) -> Option<Arc<ApiError>> {
        match self.last_load_error.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Table projection of the loaded list; empty while loading.
    pub fn rows(&self) -> Vec<ResumeRow> {
        match &*self.list.borrow() {
            ListState::Loading => Vec::new(),
            ListState::Loaded(resumes) => resumes.iter().map(render_row).collect(),
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // List lifecycle
    // ────────────────────────────────────────────────────────────────────────

    /// Fetches the list. Never ends in an error state.
    pub async fn load(&self) {
        let token = self.begin_list(false);
        self.fetch_list(token).await;
    }

    /// Re-enters `Loading` and replaces the list wholesale.
    pub async fn reload(&self) {
        let token = self.begin_list(true);
        self.fetch_list(token).await;
    }

    async fn fetch_list(&self, token: u64) {
        let (resumes, error) = match self.api.fetch_resumes().await {
            Ok(resumes) => {
                info!("Loaded {} past uploads", resumes.len());
                (resumes, None)
            }
            Err(e) => {
                warn!("Failed to load past uploads, showing none: {e}");
                (Vec::new(), Some(Arc::new(e)))
            }
        };

        if !self.finish_list(token, resumes, error) {
            debug!("Discarded stale list (request {token})");
        }
    }

    /// Takes a fresh list token, entering `Loading` when asked to.
    fn begin_list(&self, show_loading: bool) -> u64 {
        let mut token = 0;
        self.list.send_if_modified(|state| {
            token = self.list_token.fetch_add(1, Ordering::SeqCst) + 1;
            if show_loading && *state != ListState::Loading {
                *state = ListState::Loading;
                return true;
            }
            false
        });
        token
    }

    /// Applies the list and its load error together if `token` is still
    /// active. Returns whether they were applied.
    fn finish_list(
        &self,
        token: u64,
        resumes: Vec<Resume>,
        error: Option<Arc<ApiError>>,
    ) -> bool {
        self.list.send_if_modified(|state| {
            if self.list_token.load(Ordering::SeqCst) != token {
                return false;
            }
            self.set_load_error(error);
            *state = ListState::Loaded(resumes);
            true
        })
    }

    fn set_load_error(&self, error: Option<Arc<ApiError>>) {
        match self.last_load_error.lock() {
            Ok(mut guard) => *guard = error,
            Err(poisoned) => *poisoned.into_inner() = error,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Detail lifecycle
    // ────────────────────────────────────────────────────────────────────────

    /// Opens the modal for `id` immediately (`Loading`), then returns the
    /// fetch. The modal state changes on this call, before the future is
    /// first polled.
    pub fn open_details(&self, id: ResumeId) -> impl Future<Output = ()> + Send + '_ {
        let token = self.begin_detail(id);
        debug!("Opening details for resume {id} (request {token})");

        async move {
            let next = match self.api.fetch_resume_details(id).await {
                Ok(resume) => DetailState::Loaded(resume),
                Err(e) => {
                    warn!("Failed to fetch details for resume {id}: {e}");
                    DetailState::Failed {
                        id,
                        message: e.describe(),
                    }
                }
            };

            if !self.finish_detail(token, next) {
                debug!("Discarded stale details for resume {id} (request {token})");
            }
        }
    }

    /// Closes the modal. In-flight fetches complete but are discarded.
    pub fn close_details(&self) {
        self.detail.send_modify(|state| {
            self.active_token.fetch_add(1, Ordering::SeqCst);
            *state = DetailState::Closed;
        });
    }

    fn begin_detail(&self, id: ResumeId) -> u64 {
        let mut token = 0;
        self.detail.send_modify(|state| {
            token = self.active_token.fetch_add(1, Ordering::SeqCst) + 1;
            *state = DetailState::Loading(id);
        });
        token
    }

    /// Applies `next` if `token` is still active. Returns whether it was applied.
    fn finish_detail(&self, token: u64, next: DetailState) -> bool {
        self.detail.send_if_modified(|state| {
            if self.active_token.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = next;
            true
        })
    }

    // ────────────────────────────────────────────────────────────────────────
    // Deletion
    // ────────────────────────────────────────────────────────────────────────

    /// Deletes a resume, closes the modal if it shows that resume, and reloads
    /// the list. Errors are returned to the caller and leave state untouched.
    pub async fn delete(&self, id: ResumeId) -> Result<Resume, ApiError> {
        let removed = self.api.delete_resume(id).await?;
        info!("Deleted resume {id}");

        let showing_removed = self.detail.borrow().resume_id() == Some(id);
        if showing_removed {
            self.close_details();
        }

        self.reload().await;
        Ok(removed)
    }
}
