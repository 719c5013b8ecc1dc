// Client workflows: each controller owns one piece of UI state, publishes it
// through a watch channel and talks to the backend only via `ResumeApi`.
// Controllers do not depend on each other.

pub mod past_uploads;
pub mod upload;

pub use past_uploads::{DetailState, ListState, PastUploadsController};
pub use upload::{UploadController, UploadSkipped, UploadState};
