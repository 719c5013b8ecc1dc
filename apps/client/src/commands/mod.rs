use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::models::{ResumeFile, ResumeId};
use crate::render::{render_details, render_row, render_table};
use crate::state::AppState;
use crate::workflows::{DetailState, UploadState};

#[derive(Debug, Parser)]
#[command(name = "tunecv", about = "Upload resumes for analysis and browse past uploads")]
pub struct Cli {
    /// Backend base URL, overriding TUNECV_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a resume file and print the extracted fields and analysis.
    Upload { path: PathBuf },
    /// List past uploads.
    List,
    /// Show the full record of one past upload.
    Show { id: i64 },
    /// Delete a past upload.
    Delete { id: i64 },
}

pub async fn run(state: AppState, command: Command) -> Result<()> {
    match command {
        Command::Upload { path } => upload(&state, path).await,
        Command::List => list(&state).await,
        Command::Show { id } => show(&state, ResumeId(id)).await,
        Command::Delete { id } => delete(&state, ResumeId(id)).await,
    }
}

async fn upload(state: &AppState, path: PathBuf) -> Result<()> {
    let controller = state.upload_controller();
    controller.select_file(ResumeFile::from_path(&path).await?);

    println!("Uploading {} ...", path.display());
    match controller.upload().await? {
        UploadState::Success(resume) => {
            println!("Resume {} analysed.\n", resume.id);
            print!("{}", render_details(&resume));
            Ok(())
        }
        UploadState::Error(message) => bail!("Upload failed: {message}"),
        other => bail!("Upload ended in unexpected state: {other:?}"),
    }
}

async fn list(state: &AppState) -> Result<()> {
    let controller = state.past_uploads_controller();
    controller.load().await;

    let rows = controller.rows();
    info!("{} past uploads", rows.len());
    print!("{}", render_table(&rows));
    if rows.len() as u32 >= state.config.list_limit {
        println!("(showing the first {} uploads)", state.config.list_limit);
    }
    Ok(())
}

async fn show(state: &AppState, id: ResumeId) -> Result<()> {
    let controller = state.past_uploads_controller();
    controller.open_details(id).await;

    match controller.detail_state() {
        DetailState::Loaded(resume) => {
            print!("{}", render_details(&resume));
            Ok(())
        }
        DetailState::Failed { id, message } => bail!("Could not load resume {id}: {message}"),
        other => bail!("Details for resume {id} ended in unexpected state: {other:?}"),
    }
}

async fn delete(state: &AppState, id: ResumeId) -> Result<()> {
    let controller = state.past_uploads_controller();
    let removed = match controller.delete(id).await {
        Ok(removed) => removed,
        Err(e) if e.is_not_found() => bail!("Resume {id} does not exist"),
        Err(e) => return Err(e.into()),
    };

    let row = render_row(&removed);
    println!("Deleted resume {} ({})\n", row.id, row.file_name);
    print!("{}", render_table(&controller.rows()));
    Ok(())
}
