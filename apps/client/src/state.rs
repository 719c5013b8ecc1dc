use std::sync::Arc;

use anyhow::Result;

use crate::api_client::{HttpResumeApi, ResumeApi};
use crate::config::Config;
use crate::workflows::{PastUploadsController, UploadController};

/// Shared client state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Backend seam shared by all controllers.
    pub api: Arc<dyn ResumeApi>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let api = HttpResumeApi::new(&config.api_url, config.list_limit)?;
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }

    pub fn upload_controller(&self) -> UploadController {
        UploadController::new(self.api.clone())
    }

    pub fn past_uploads_controller(&self) -> PastUploadsController {
        PastUploadsController::new(self.api.clone())
    }
}
