//! Backend Command Wrappers
//!
//! REST bindings to the backend, organized by domain. The rest of the app
//! talks to the backend only through [`TaskBackend`].

mod note;
mod task;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{Note, Status, Task};

// Re-export all public items
pub use note::*;
pub use task::*;

/// Characters left as-is in a path segment (RFC 3986 unreserved)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

pub(crate) fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Remote operations used by the coordinator and views
#[async_trait(?Send)]
pub trait TaskBackend {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>>;

    async fn list_statuses(&self) -> ApiResult<Vec<Status>>;

    async fn list_notes(&self) -> ApiResult<Vec<Note>>;

    async fn change_status(&self, task_id: &str, args: &ChangeStatusArgs) -> ApiResult<Task>;

    async fn update_task(&self, task_id: &str, args: &EditTaskArgs) -> ApiResult<Task>;

    async fn delete_task(&self, task_id: &str) -> ApiResult<()>;

    async fn copy_task(&self, task_id: &str) -> ApiResult<Task>;

    async fn create_subtask(&self, task_id: &str, args: &CreateSubtaskArgs) -> ApiResult<Task>;

    async fn reorder_notes(&self, args: &ReorderNotesArgs) -> ApiResult<()>;
}

/// [`TaskBackend`] over HTTP
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.endpoint(path));
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            code: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        Self::send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_ack(builder: RequestBuilder) -> ApiResult<()> {
        Self::send(builder).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl TaskBackend for HttpBackend {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        Self::send_json(self.request(Method::GET, "tasks")).await
    }

    async fn list_statuses(&self) -> ApiResult<Vec<Status>> {
        Self::send_json(self.request(Method::GET, "statuses")).await
    }

    async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        Self::send_json(self.request(Method::GET, "notes")).await
    }

    async fn change_status(&self, task_id: &str, args: &ChangeStatusArgs) -> ApiResult<Task> {
        Self::send_json(self.request(Method::POST, &status_path(task_id)).json(args)).await
    }

    async fn update_task(&self, task_id: &str, args: &EditTaskArgs) -> ApiResult<Task> {
        Self::send_json(self.request(Method::PUT, &edit_path(task_id)).json(args)).await
    }

    async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        Self::send_ack(self.request(Method::DELETE, &delete_path(task_id))).await
    }

    async fn copy_task(&self, task_id: &str) -> ApiResult<Task> {
        Self::send_json(self.request(Method::PUT, &copy_path(task_id))).await
    }

    async fn create_subtask(&self, task_id: &str, args: &CreateSubtaskArgs) -> ApiResult<Task> {
        Self::send_json(self.request(Method::POST, &subtasks_path(task_id)).json(args)).await
    }

    async fn reorder_notes(&self, args: &ReorderNotesArgs) -> ApiResult<()> {
        Self::send_ack(self.request(Method::POST, REORDER_PATH).json(args)).await
    }
}
