//! The ProposalPage backend catalog: every operation the client can call.

use crate::http::HttpMethod::{Delete, Get, Post, Put};
use crate::registry::{EndpointDefinition as Endpoint, HeaderOverride};

/// Operation names, as registered.
pub mod ops {
    pub const AUTHENTICATE: &str = "authenticate";
    pub const AUTH_ME: &str = "authMe";

    pub const LIST_TEMPLATES: &str = "listTemplates";

    pub const LIST_PROJECTS: &str = "listProjects";
    pub const LIST_PROJECT: &str = "listProject";
    pub const CREATE_PROJECT: &str = "createProject";
    pub const CREATE_PROJECT_FROM_TEMPLATE: &str = "createProjectFromTemplate";
    pub const UPDATE_PROJECT: &str = "updateProject";
    pub const DELETE_PROJECT: &str = "deleteProject";
    pub const CLONE_PROJECT: &str = "cloneProject";
    pub const SET_PROJECT_PASSWORD: &str = "setProjectPassword";
    pub const CHECK_PROJECT_PASSWORD: &str = "checkProjectPassword";
    pub const PUBLISH_PROJECT: &str = "publishProject";
    pub const SECURE_PROJECT: &str = "secureProject";
    pub const GENERATE_PROJECT_COVER: &str = "generateProjectCover";
    pub const VIEW_PROJECT_AND_NOTIFY: &str = "viewProjectAndNotify";
    pub const ACCEPT_PROJECT: &str = "acceptProject";
    pub const CONFIRM_PROJECT_ACCEPT: &str = "confirmProjectAccept";
    pub const REVERT_PROJECT_ACCEPT: &str = "revertProjectAccept";

    pub const LIST_BLOCKS: &str = "listBlocks";
    pub const LIST_BLOCK: &str = "listBlock";
    pub const CREATE_BLOCK: &str = "createBlock";
    pub const UPDATE_BLOCK: &str = "updateBlock";
    pub const DELETE_BLOCK: &str = "deleteBlock";
    pub const MOVE_BLOCK_FORWARD: &str = "moveBlockForward";
    pub const MOVE_BLOCK_BACKWARD: &str = "moveBlockBackward";
    pub const CLONE_BLOCK: &str = "cloneBlock";

    pub const LIST_ROWS: &str = "listRows";
    pub const LIST_ROW: &str = "listRow";
    pub const CREATE_ROW: &str = "createRow";
    pub const UPDATE_ROW: &str = "updateRow";
    pub const DELETE_ROW: &str = "deleteRow";
    pub const CLONE_ROW: &str = "cloneRow";

    pub const LIST_COLUMNS: &str = "listColumns";
    pub const LIST_COLUMN: &str = "listColumn";
    pub const CREATE_COLUMN: &str = "createColumn";
    pub const UPDATE_COLUMN: &str = "updateColumn";
    pub const DELETE_COLUMN: &str = "deleteColumn";

    pub const LIST_CONTENTS: &str = "listContents";
    pub const LIST_CONTENT: &str = "listContent";
    pub const CREATE_CONTENT: &str = "createContent";
    pub const UPDATE_CONTENT: &str = "updateContent";
    pub const DELETE_CONTENT: &str = "deleteContent";
}

const JSON_BODY: &[HeaderOverride] = &[HeaderOverride::set("Content-Type", "application/json")];
const PAGINATION: &[&str] = &["page", "itemsPerPage"];

const PROJECT: &str = "/projects/{projectId}";
const BLOCK: &str = "/projects/{projectId}/blocks/{blockId}";
const ROW: &str = "/projects/{projectId}/blocks/{blockId}/rows/{rowId}";
const COLUMN: &str = "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns/{columnId}";
const CONTENT: &str =
    "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns/{columnId}/contents/{contentId}";

pub static ENDPOINTS: &[Endpoint] = &[
    // Auth
    Endpoint::new(ops::AUTHENTICATE, Post, "/accounts/auth/token").with_headers(JSON_BODY),
    Endpoint::new(ops::AUTH_ME, Get, "/accounts/auth/me"),
    // Templates
    Endpoint::new(ops::LIST_TEMPLATES, Get, "/projects/templates").with_query(PAGINATION),
    // Projects
    Endpoint::new(ops::LIST_PROJECTS, Get, "/projects").with_query(&["page", "itemsPerPage", "title"]),
    Endpoint::new(ops::LIST_PROJECT, Get, PROJECT),
    Endpoint::new(ops::CREATE_PROJECT, Post, "/projects").with_headers(JSON_BODY),
    Endpoint::new(ops::CREATE_PROJECT_FROM_TEMPLATE, Post, "/projects/{templateId}/copy")
        .with_headers(JSON_BODY),
    Endpoint::new(ops::UPDATE_PROJECT, Put, PROJECT),
    Endpoint::new(ops::DELETE_PROJECT, Delete, PROJECT),
    Endpoint::new(ops::CLONE_PROJECT, Post, "/projects/{projectId}/clone"),
    Endpoint::new(ops::SET_PROJECT_PASSWORD, Post, "/projects/{projectId}/password"),
    Endpoint::new(ops::CHECK_PROJECT_PASSWORD, Post, "/projects/{projectId}/password-check"),
    Endpoint::new(ops::PUBLISH_PROJECT, Post, "/projects/{projectId}/publish"),
    Endpoint::new(ops::SECURE_PROJECT, Post, "/projects/{projectId}/secure"),
    Endpoint::new(ops::GENERATE_PROJECT_COVER, Get, "/projects/{projectId}/screenshot"),
    Endpoint::new(ops::VIEW_PROJECT_AND_NOTIFY, Put, "/projects/{projectId}/view-and-notify"),
    Endpoint::new(ops::ACCEPT_PROJECT, Post, "/projects/{projectId}/accept"),
    Endpoint::new(ops::CONFIRM_PROJECT_ACCEPT, Post, "/projects/accept/{acceptToken}"),
    Endpoint::new(
        ops::REVERT_PROJECT_ACCEPT,
        Post,
        "/projects/revert-accept/{acceptReversionToken}",
    ),
    // Blocks
    Endpoint::new(ops::LIST_BLOCKS, Get, "/projects/{projectId}/blocks"),
    Endpoint::new(ops::LIST_BLOCK, Get, BLOCK),
    Endpoint::new(ops::CREATE_BLOCK, Post, "/projects/{projectId}/blocks").with_headers(JSON_BODY),
    Endpoint::new(ops::UPDATE_BLOCK, Put, BLOCK),
    Endpoint::new(ops::DELETE_BLOCK, Delete, BLOCK),
    Endpoint::new(
        ops::MOVE_BLOCK_FORWARD,
        Post,
        "/projects/{projectId}/blocks/{blockId}/forward",
    ),
    Endpoint::new(
        ops::MOVE_BLOCK_BACKWARD,
        Post,
        "/projects/{projectId}/blocks/{blockId}/backward",
    ),
    Endpoint::new(
        ops::CLONE_BLOCK,
        Post,
        "/projects/{projectId}/blocks/{blockId}/clone/{position}",
    ),
    // Rows
    Endpoint::new(ops::LIST_ROWS, Get, "/projects/{projectId}/blocks/{blockId}/rows"),
    Endpoint::new(ops::LIST_ROW, Get, ROW),
    Endpoint::new(
        ops::CREATE_ROW,
        Post,
        "/projects/{projectId}/blocks/{blockId}/rows",
    )
    .with_headers(JSON_BODY),
    Endpoint::new(ops::UPDATE_ROW, Put, ROW),
    Endpoint::new(ops::DELETE_ROW, Delete, ROW),
    Endpoint::new(
        ops::CLONE_ROW,
        Post,
        "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/clone",
    ),
    // Columns
    Endpoint::new(
        ops::LIST_COLUMNS,
        Get,
        "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns",
    ),
    Endpoint::new(ops::LIST_COLUMN, Get, COLUMN),
    Endpoint::new(
        ops::CREATE_COLUMN,
        Post,
        "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns",
    )
    .with_headers(JSON_BODY),
    Endpoint::new(ops::UPDATE_COLUMN, Put, COLUMN),
    Endpoint::new(ops::DELETE_COLUMN, Delete, COLUMN),
    // Contents
    Endpoint::new(
        ops::LIST_CONTENTS,
        Get,
        "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns/{columnId}/contents",
    ),
    Endpoint::new(ops::LIST_CONTENT, Get, CONTENT),
    Endpoint::new(
        ops::CREATE_CONTENT,
        Post,
        "/projects/{projectId}/blocks/{blockId}/rows/{rowId}/columns/{columnId}/contents",
    )
    .with_headers(JSON_BODY),
    Endpoint::new(ops::UPDATE_CONTENT, Put, CONTENT),
    Endpoint::new(ops::DELETE_CONTENT, Delete, CONTENT),
];
