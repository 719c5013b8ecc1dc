//! Scripted in-memory backend for controller tests.
//!
//! Each call pops the next scripted reply for its operation. A reply is a
//! oneshot receiver, so tests choose exactly when (and in which order) each
//! in-flight request completes.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::ResumeApi;
use crate::errors::ApiError;
use crate::models::{Resume, ResumeFile, ResumeId};

type Reply<T> = oneshot::Receiver<Result<T, ApiError>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(String),
    List,
    Details(ResumeId),
    Delete(ResumeId),
}

#[derive(Default)]
pub struct FakeResumeApi {
    uploads: Mutex<VecDeque<Reply<Resume>>>,
    lists: Mutex<VecDeque<Reply<Vec<Resume>>>>,
    details: Mutex<HashMap<ResumeId, VecDeque<Reply<Resume>>>>,
    deletes: Mutex<VecDeque<Reply<Resume>>>,
    calls: Mutex<Vec<Call>>,
}

/// Reply that is available as soon as the call is made.
pub fn ready<T>(result: Result<T, ApiError>) -> Reply<T> {
    let (tx, rx) = oneshot::channel();
    let _ = tx.send(result);
    rx
}

/// Reply held back until the returned sender fires.
pub fn gated<T>() -> (oneshot::Sender<Result<T, ApiError>>, Reply<T>) {
    oneshot::channel()
}

pub fn server_error(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message.to_string(),
    }
}

/// Minimal summary record, as the list endpoint returns.
pub fn summary(id: i64, name: &str) -> Resume {
    Resume {
        id: ResumeId(id),
        file_name: Some(format!("{}.pdf", name.to_lowercase())),
        uploaded_at: None,
        name: Some(name.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: None,
        linkedin_url: None,
        github_url: None,
        summary: None,
        technical_skills: None,
        work_experience: None,
        llm_analysis: None,
    }
}

/// Full record, as the detail and upload endpoints return.
pub fn detailed(id: i64, name: &str) -> Resume {
    Resume {
        summary: Some(format!("{name} builds things.")),
        technical_skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
        work_experience: Some(vec![]),
        llm_analysis: Some(serde_json::json!({ "resume_rating": { "overall_score": 8 } })),
        ..summary(id, name)
    }
}

/// Polls `fut` once, asserting it is still waiting on its reply.
pub async fn assert_pending<F: Future + Unpin>(fut: &mut F) {
    tokio::select! {
        biased;
        _ = fut => panic!("future completed before its reply was released"),
        _ = tokio::task::yield_now() => {}
    }
}

impl FakeResumeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_upload(&self, reply: Reply<Resume>) -> &Self {
        self.uploads.lock().unwrap().push_back(reply);
        self
    }

    pub fn script_list(&self, reply: Reply<Vec<Resume>>) -> &Self {
        self.lists.lock().unwrap().push_back(reply);
        self
    }

    pub fn script_details(&self, id: ResumeId, reply: Reply<Resume>) -> &Self {
        self.details
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn script_delete(&self, reply: Reply<Resume>) -> &Self {
        self.deletes.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn await_reply<T>(reply: Option<Reply<T>>, what: &str) -> Result<T, ApiError> {
    let reply = reply.unwrap_or_else(|| panic!("no scripted reply for {what}"));
    reply
        .await
        .unwrap_or_else(|_| panic!("reply sender for {what} was dropped"))
}

#[async_trait]
impl ResumeApi for FakeResumeApi {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<Resume, ApiError> {
        self.record(Call::Upload(file.file_name.clone()));
        let reply = self.uploads.lock().unwrap().pop_front();
        await_reply(reply, "upload").await
    }

    async fn fetch_resumes(&self) -> Result<Vec<Resume>, ApiError> {
        self.record(Call::List);
        let reply = self.lists.lock().unwrap().pop_front();
        await_reply(reply, "list").await
    }

    async fn fetch_resume_details(&self, id: ResumeId) -> Result<Resume, ApiError> {
        self.record(Call::Details(id));
        let reply = self
            .details
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(|q| q.pop_front());
        await_reply(reply, &format!("details of {id}")).await
    }

    async fn delete_resume(&self, id: ResumeId) -> Result<Resume, ApiError> {
        self.record(Call::Delete(id));
        let reply = self.deletes.lock().unwrap().pop_front();
        await_reply(reply, "delete").await
    }
}
