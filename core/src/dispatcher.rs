//! Turns an operation name, parameters and an optional body into one HTTP
//! round-trip and a normalized result.
//!
//! # Design
//! `build_request` and `parse_response` are pure: the first resolves the
//! endpoint, renders the URL and layers headers; the second turns whatever
//! the transport returned into a `CallResult` or a `MalformedJsonResponse`.
//! `call` glues them around the single `Transport::send` await. Every
//! request-side failure is raised by `build_request`, so a call that fails
//! there never reaches the transport. There is no retry, backoff or caching.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CallError;
use crate::http::{merge_header, HttpMethod, HttpRequest, HttpResponse};
use crate::params::{Params, RequestBody};
use crate::registry::Registry;
use crate::result::CallResult;
use crate::session::{Session, SessionState};
use crate::template;
use crate::transport::Transport;

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug)]
pub struct Dispatcher<T> {
    registry: Arc<Registry>,
    transport: T,
}

impl<T> Dispatcher<T> {
    pub fn new(registry: Arc<Registry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `operation` against the registry and build the request it
    /// describes for `session`.
    ///
    /// Headers are layered: session defaults (`Authorization`,
    /// `Content-Type: application/json`), then the endpoint's overrides, then
    /// `extra_headers`. Later layers win regardless of header-name case.
    /// Bodies are dropped for GET and DELETE.
    pub fn build_request(
        &self,
        session: &SessionState,
        operation: &str,
        params: &Params,
        body: Option<RequestBody>,
        extra_headers: &[(String, String)],
    ) -> Result<HttpRequest, CallError> {
        let endpoint = self.registry.resolve(operation)?;

        let path = template::render_path(endpoint.name, endpoint.path_template, params)?;
        let mut url = format!("{}{}", session.base_url, path);
        if endpoint.method == HttpMethod::Get {
            let consumed = endpoint.placeholders();
            if let Some(query) = template::query_string(endpoint.query_params, &consumed, params) {
                url.push('?');
                url.push_str(&query);
            }
        }

        let mut headers = vec![
            (AUTHORIZATION.to_string(), session.authorization()),
            (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
        ];
        for header in endpoint.header_overrides {
            merge_header(&mut headers, header.name, header.value);
        }
        for (name, value) in extra_headers {
            merge_header(&mut headers, name, Some(value));
        }

        let body = match body {
            Some(body) if endpoint.method.allows_body() => body.into_payload()?,
            Some(_) => {
                debug!(operation, method = %endpoint.method, "dropping body on bodiless method");
                None
            }
            None => None,
        };

        Ok(HttpRequest {
            method: endpoint.method,
            url,
            headers,
            body,
        })
    }
}

impl<T: Transport> Dispatcher<T> {
    pub async fn call(
        &self,
        session: &Session,
        operation: &str,
        params: &Params,
        body: Option<RequestBody>,
    ) -> Result<CallResult, CallError> {
        self.call_with_headers(session, operation, params, body, &[])
            .await
    }

    /// Dispatch one call. The session is read once, when the returned future
    /// is first polled; later token or base URL changes do not affect it.
    pub async fn call_with_headers(
        &self,
        session: &Session,
        operation: &str,
        params: &Params,
        body: Option<RequestBody>,
        extra_headers: &[(String, String)],
    ) -> Result<CallResult, CallError> {
        let state = session.snapshot();
        let request = self.build_request(&state, operation, params, body, extra_headers)?;
        debug!(operation, method = %request.method, url = %request.url, "dispatching request");

        let response = self.transport.send(request).await?;
        debug!(operation, status = response.status, "response received");

        parse_response(response)
    }
}

/// Normalize a transport response. A non-empty body must be JSON.
pub fn parse_response(response: HttpResponse) -> Result<CallResult, CallError> {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;

    let json = if body.is_empty() {
        None
    } else {
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(source) => {
                warn!(status, "response body is not valid JSON");
                return Err(CallError::MalformedJsonResponse {
                    status,
                    body,
                    source,
                });
            }
        }
    };

    Ok(CallResult {
        status_code: status,
        headers,
        body,
        json,
    })
}
