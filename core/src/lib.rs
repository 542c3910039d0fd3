//! Async client SDK for the ProposalPage document-builder API.
//!
//! # Overview
//! Accounts own projects; projects nest blocks → rows → columns → contents.
//! Every backend operation is a named entry in a static registry (verb, URL
//! template, query parameters, header overrides). A single dispatcher turns
//! an operation name plus parameters into an HTTP request, sends it through a
//! pluggable `Transport`, and normalizes the response into a `CallResult`.
//!
//! # Design
//! - `Registry` is built once and shared read-only; lookups never lock.
//! - `Dispatcher::build_request` is pure and raises every request-side error
//!   (unknown operation, missing path parameter, unserializable body) before
//!   any I/O. `Transport::send` is the only await in a call.
//! - HTTP status codes are data: a 401 is a `CallResult`, not an error.
//! - `Session` keeps base URL and token in an atomically swapped snapshot so
//!   each call sees a consistent pair.
//! - `ProposalPageClient` wraps the dispatcher with one typed method per
//!   operation.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod params;
pub mod registry;
pub mod result;
pub mod session;
pub mod template;
pub mod transport;
pub mod types;

pub use catalog::ops;
pub use client::{AuthMode, ProposalPageClient};
pub use config::ClientConfig;
pub use dispatcher::{parse_response, Dispatcher};
pub use error::{CallError, CallErrorKind, RegistryError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{Params, RequestBody};
pub use registry::{EndpointDefinition, HeaderOverride, Registry};
pub use result::CallResult;
pub use session::{Session, SessionState, DEFAULT_BASE_URL};
pub use transport::{Transport, UreqTransport};
pub use types::{
    AccountInfo, AuthToken, Block, ClonePosition, Column, Content, Credentials, Paginated,
    Pagination, PasswordPayload, Project, ProjectFilter, Row,
};
