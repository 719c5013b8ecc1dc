pub mod file;
pub mod resume;

pub use file::ResumeFile;
pub use resume::{Resume, ResumeId, WorkExperience};
