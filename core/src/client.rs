//! Typed async client for the ProposalPage API.
//!
//! # Design
//! `ProposalPageClient` owns a `Session` (base URL + bearer token) and a
//! `Dispatcher`. Every public method maps one-to-one onto an operation in
//! [`crate::catalog`] and goes through the same dispatcher, so path
//! templating, header layering and response normalization live in one place.
//! Methods return the raw `CallResult` envelope; decode with
//! `CallResult::json_as` when a DTO is wanted.
//!
//! Calls share no mutable state besides the session. Any number may run
//! concurrently; each reads the session once when it is first polled.

use serde::Serialize;
use serde_json::Value;

use crate::catalog::ops;
use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::CallError;
use crate::params::{Params, RequestBody};
use crate::registry::Registry;
use crate::result::CallResult;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ClonePosition, Credentials, Pagination, PasswordPayload, ProjectFilter};

/// What `authenticate` does with the token in a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Store the returned token on the session for subsequent calls.
    StoreToken,
    /// Leave the session untouched; the caller inspects the result.
    InspectOnly,
}

pub struct ProposalPageClient<T = UreqTransport> {
    session: Session,
    dispatcher: Dispatcher<T>,
}

impl ProposalPageClient<UreqTransport> {
    /// Client against the production API with no token.
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::from_config(ClientConfig::default().with_base_url(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl Default for ProposalPageClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProposalPageClient<T> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn base_url(&self) -> String {
        self.session.base_url()
    }

    pub fn set_base_url(&self, base_url: &str) {
        self.session.set_base_url(base_url);
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    pub fn clear_token(&self) {
        self.session.clear_token();
    }
}

impl<T: Transport> ProposalPageClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            session: Session::new(&config.base_url, config.token),
            dispatcher: Dispatcher::new(Registry::standard(), transport),
        }
    }

    /// Dispatch any registered operation by name.
    pub async fn call(
        &self,
        operation: &str,
        params: &Params,
        body: Option<RequestBody>,
    ) -> Result<CallResult, CallError> {
        self.dispatcher
            .call(&self.session, operation, params, body)
            .await
    }

    pub async fn call_with_headers(
        &self,
        operation: &str,
        params: &Params,
        body: Option<RequestBody>,
        headers: &[(String, String)],
    ) -> Result<CallResult, CallError> {
        self.dispatcher
            .call_with_headers(&self.session, operation, params, body, headers)
            .await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        params: &Params,
        body: &B,
    ) -> Result<CallResult, CallError> {
        let body = RequestBody::json(body)?;
        self.call(operation, params, Some(body)).await
    }

    // Auth

    /// Exchange credentials for a token.
    ///
    /// With [`AuthMode::StoreToken`], a 200 response carrying a string
    /// `token` field replaces the session token. Any other outcome leaves
    /// the session as it was.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        mode: AuthMode,
    ) -> Result<CallResult, CallError> {
        let result = self
            .send_json(ops::AUTHENTICATE, &Params::new(), credentials)
            .await?;

        if mode == AuthMode::StoreToken && result.status_code == 200 {
            let token = result
                .json
                .as_ref()
                .and_then(|json| json.get("token"))
                .and_then(Value::as_str);
            if let Some(token) = token {
                self.session.set_token(token);
            }
        }
        Ok(result)
    }

    pub async fn auth_me(&self) -> Result<CallResult, CallError> {
        self.call(ops::AUTH_ME, &Params::new(), None).await
    }

    // Templates

    pub async fn list_templates(&self, pagination: &Pagination) -> Result<CallResult, CallError> {
        self.call(ops::LIST_TEMPLATES, &pagination.to_params(), None)
            .await
    }

    // Projects

    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<CallResult, CallError> {
        self.call(ops::LIST_PROJECTS, &filter.to_params(), None).await
    }

    /// Fetch a single project.
    pub async fn list_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::LIST_PROJECT, &project(project_id), None).await
    }

    pub async fn create_project<B: Serialize + ?Sized>(
        &self,
        project: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::CREATE_PROJECT, &Params::new(), project)
            .await
    }

    pub async fn create_project_from_template(
        &self,
        template_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = Params::new().with("templateId", template_id);
        self.call(ops::CREATE_PROJECT_FROM_TEMPLATE, &params, None)
            .await
    }

    pub async fn update_project<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        changes: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::UPDATE_PROJECT, &project(project_id), changes)
            .await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::DELETE_PROJECT, &project(project_id), None)
            .await
    }

    pub async fn clone_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::CLONE_PROJECT, &project(project_id), None).await
    }

    pub async fn set_project_password(
        &self,
        project_id: &str,
        password: &str,
    ) -> Result<CallResult, CallError> {
        let body = PasswordPayload {
            password: password.to_string(),
        };
        self.send_json(ops::SET_PROJECT_PASSWORD, &project(project_id), &body)
            .await
    }

    /// A wrong password comes back as a 401 `CallResult`, not an error.
    pub async fn check_project_password(
        &self,
        project_id: &str,
        password: &str,
    ) -> Result<CallResult, CallError> {
        let body = PasswordPayload {
            password: password.to_string(),
        };
        self.send_json(ops::CHECK_PROJECT_PASSWORD, &project(project_id), &body)
            .await
    }

    pub async fn publish_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::PUBLISH_PROJECT, &project(project_id), None)
            .await
    }

    pub async fn secure_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::SECURE_PROJECT, &project(project_id), None)
            .await
    }

    pub async fn generate_project_cover(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::GENERATE_PROJECT_COVER, &project(project_id), None)
            .await
    }

    pub async fn view_project_and_notify(
        &self,
        project_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::VIEW_PROJECT_AND_NOTIFY, &project(project_id), None)
            .await
    }

    pub async fn accept_project(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::ACCEPT_PROJECT, &project(project_id), None)
            .await
    }

    pub async fn confirm_project_accept(
        &self,
        accept_token: &str,
    ) -> Result<CallResult, CallError> {
        let params = Params::new().with("acceptToken", accept_token);
        self.call(ops::CONFIRM_PROJECT_ACCEPT, &params, None).await
    }

    pub async fn revert_project_accept(
        &self,
        accept_reversion_token: &str,
    ) -> Result<CallResult, CallError> {
        let params = Params::new().with("acceptReversionToken", accept_reversion_token);
        self.call(ops::REVERT_PROJECT_ACCEPT, &params, None).await
    }

    // Blocks

    pub async fn list_blocks(&self, project_id: &str) -> Result<CallResult, CallError> {
        self.call(ops::LIST_BLOCKS, &project(project_id), None).await
    }

    pub async fn list_block(
        &self,
        project_id: &str,
        block_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::LIST_BLOCK, &block(project_id, block_id), None)
            .await
    }

    pub async fn create_block<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::CREATE_BLOCK, &project(project_id), block)
            .await
    }

    pub async fn update_block<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        changes: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::UPDATE_BLOCK, &block(project_id, block_id), changes)
            .await
    }

    pub async fn delete_block(
        &self,
        project_id: &str,
        block_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::DELETE_BLOCK, &block(project_id, block_id), None)
            .await
    }

    pub async fn move_block_forward(
        &self,
        project_id: &str,
        block_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::MOVE_BLOCK_FORWARD, &block(project_id, block_id), None)
            .await
    }

    pub async fn move_block_backward(
        &self,
        project_id: &str,
        block_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::MOVE_BLOCK_BACKWARD, &block(project_id, block_id), None)
            .await
    }

    /// Clone a block. Without a position the backend appends the copy
    /// after the original.
    pub async fn clone_block(
        &self,
        project_id: &str,
        block_id: &str,
        position: Option<u32>,
    ) -> Result<CallResult, CallError> {
        let position = position.map(|p| p.to_string()).unwrap_or_default();
        let params = block(project_id, block_id).with("position", position);
        self.call(ops::CLONE_BLOCK, &params, None).await
    }

    // Rows

    pub async fn list_rows(
        &self,
        project_id: &str,
        block_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::LIST_ROWS, &block(project_id, block_id), None)
            .await
    }

    pub async fn list_row(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::LIST_ROW, &row(project_id, block_id, row_id), None)
            .await
    }

    pub async fn create_row<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::CREATE_ROW, &block(project_id, block_id), row)
            .await
    }

    pub async fn update_row<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        changes: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::UPDATE_ROW, &row(project_id, block_id, row_id), changes)
            .await
    }

    pub async fn delete_row(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::DELETE_ROW, &row(project_id, block_id, row_id), None)
            .await
    }

    /// Clone a row, optionally to `position` within its block.
    pub async fn clone_row(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        position: Option<u32>,
    ) -> Result<CallResult, CallError> {
        let params = row(project_id, block_id, row_id);
        match position {
            Some(position) => {
                self.send_json(ops::CLONE_ROW, &params, &ClonePosition { position })
                    .await
            }
            None => self.call(ops::CLONE_ROW, &params, None).await,
        }
    }

    // Columns

    pub async fn list_columns(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
    ) -> Result<CallResult, CallError> {
        self.call(ops::LIST_COLUMNS, &row(project_id, block_id, row_id), None)
            .await
    }

    pub async fn list_column(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id);
        self.call(ops::LIST_COLUMN, &params, None).await
    }

    pub async fn create_column<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column: &B,
    ) -> Result<CallResult, CallError> {
        self.send_json(ops::CREATE_COLUMN, &row(project_id, block_id, row_id), column)
            .await
    }

    pub async fn update_column<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
        changes: &B,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id);
        self.send_json(ops::UPDATE_COLUMN, &params, changes).await
    }

    pub async fn delete_column(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id);
        self.call(ops::DELETE_COLUMN, &params, None).await
    }

    // Contents

    pub async fn list_contents(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id);
        self.call(ops::LIST_CONTENTS, &params, None).await
    }

    pub async fn list_content(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
        content_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id).with("contentId", content_id);
        self.call(ops::LIST_CONTENT, &params, None).await
    }

    pub async fn create_content<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
        content: &B,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id);
        self.send_json(ops::CREATE_CONTENT, &params, content).await
    }

    pub async fn update_content<B: Serialize + ?Sized>(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
        content_id: &str,
        changes: &B,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id).with("contentId", content_id);
        self.send_json(ops::UPDATE_CONTENT, &params, changes).await
    }

    pub async fn delete_content(
        &self,
        project_id: &str,
        block_id: &str,
        row_id: &str,
        column_id: &str,
        content_id: &str,
    ) -> Result<CallResult, CallError> {
        let params = column(project_id, block_id, row_id, column_id).with("contentId", content_id);
        self.call(ops::DELETE_CONTENT, &params, None).await
    }
}

fn project(project_id: &str) -> Params {
    Params::new().with("projectId", project_id)
}

fn block(project_id: &str, block_id: &str) -> Params {
    project(project_id).with("blockId", block_id)
}

fn row(project_id: &str, block_id: &str, row_id: &str) -> Params {
    block(project_id, block_id).with("rowId", row_id)
}

fn column(project_id: &str, block_id: &str, row_id: &str, column_id: &str) -> Params {
    row(project_id, block_id, row_id).with("columnId", column_id)
}
