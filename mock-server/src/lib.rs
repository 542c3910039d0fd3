use std::{collections::HashSet, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEMO_USERNAME: &str = "demo@proposalpage.com";
pub const DEMO_PASSWORD: &str = "demo-password";
pub const DEMO_ACCOUNT_ID: &str = "5c9e1a7bdf6272001ae7d700";
pub const DEMO_USER_ID: &str = "5c9e1a7bdf6272001ae7d701";
pub const TEMPLATE_ID: &str = "5cb47ec98497e9001ad9a1b2";
pub const DEFAULT_COVER: &str = "https://cdn.proposalpage.com/covers/default.png";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub fonts: Vec<Value>,
    pub publish: bool,
    pub secure: bool,
    pub count_views: u64,
    pub time_views: u64,
    pub priority: i64,
    pub blocks: Vec<Block>,
    pub user_id: String,
    pub account_id: String,
    pub token: String,
    pub slug: String,
    #[serde(rename = "publishURL")]
    pub publish_url: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "__v")]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_view: Option<String>,
    pub accepted: bool,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip)]
    pub accept_token: Option<String>,
    #[serde(skip)]
    pub accept_reversion_token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_id")]
    pub id: String,
    pub style: Value,
    pub full_screen: bool,
    pub rows: Vec<Row>,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(rename = "_id")]
    pub id: String,
    pub style: Value,
    pub columns: Vec<Column>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(rename = "_id")]
    pub id: String,
    pub style: Value,
    pub size: u32,
    pub contents: Vec<Content>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub style: Value,
    pub data: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
    pub default_cover: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordPayload {
    pub password: String,
}

#[derive(Deserialize)]
pub struct ClonePosition {
    pub position: usize,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub items_per_page: Option<usize>,
    pub title: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub fonts: Option<Vec<Value>>,
    pub priority: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockInput {
    pub description: Option<String>,
    pub style: Option<Value>,
    pub full_screen: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RowInput {
    pub style: Option<Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ColumnInput {
    pub style: Option<Value>,
    pub size: Option<u32>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ContentInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub style: Option<Value>,
    pub data: Option<Value>,
}

/// In-memory backend state.
pub struct Store {
    tokens: HashSet<String>,
    projects: Vec<Project>,
    templates: Vec<Project>,
}

impl Store {
    fn seeded() -> Self {
        let mut template = Project::new("Business Proposal");
        template.id = TEMPLATE_ID.to_string();
        template.blocks.push(Block::new(BlockInput {
            description: Some("Cover".to_string()),
            ..BlockInput::default()
        }));
        Self {
            tokens: HashSet::new(),
            projects: Vec::new(),
            templates: vec![template],
        }
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        bearer(headers).is_some_and(|token| self.tokens.contains(token))
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        if self.is_authorized(headers) {
            Ok(())
        } else {
            debug!("rejecting request without a valid bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(Project, Block, Row, Column, Content);

fn position<T: Identified>(items: &[T], id: &str) -> Result<usize, StatusCode> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or(StatusCode::NOT_FOUND)
}

fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Result<&'a T, StatusCode> {
    items.iter().find(|item| item.id() == id).ok_or(StatusCode::NOT_FOUND)
}

fn find_mut<'a, T: Identified>(items: &'a mut [T], id: &str) -> Result<&'a mut T, StatusCode> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or(StatusCode::NOT_FOUND)
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

// Same shape as the backend: `2019-04-02T11:22:57.000Z`.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn default_style() -> Value {
    json!({
        "backgroundImage": "",
        "backgroundRepeat": "no-repeat",
        "backgroundSize": "cover",
        "backgroundPosition": "center center",
        "opacity": 1
    })
}

fn paginate<T: Clone>(items: &[T], query: &ListQuery) -> Paginated<T> {
    let limit = query.items_per_page.unwrap_or(10).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total_items = items.len();
    let offset = page.saturating_sub(1).saturating_mul(limit);
    Paginated {
        items: items.iter().skip(offset).take(limit).cloned().collect(),
        total_items,
        page,
        limit,
        pages: total_items.div_ceil(limit),
        default_cover: DEFAULT_COVER.to_string(),
    }
}

impl Project {
    fn new(title: &str) -> Self {
        let id = new_id();
        let slug = title.to_lowercase().replace(' ', "-");
        let timestamp = now();
        Self {
            publish_url: format!("https://proposalpage.com/p/{slug}-{id}"),
            id,
            title: title.to_string(),
            fonts: Vec::new(),
            publish: false,
            secure: false,
            count_views: 0,
            time_views: 0,
            priority: 0,
            blocks: Vec::new(),
            user_id: DEMO_USER_ID.to_string(),
            account_id: DEMO_ACCOUNT_ID.to_string(),
            token: new_id(),
            slug,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            version: 0,
            last_view: None,
            accepted: false,
            password: None,
            accept_token: None,
            accept_reversion_token: None,
        }
    }

    fn copy_of(source: &Project, title: String) -> Self {
        let mut copy = Project::new(&title);
        copy.fonts = source.fonts.clone();
        copy.priority = source.priority;
        copy.blocks = source.blocks.iter().map(Block::fresh_copy).collect();
        copy
    }

    fn touch(&mut self) {
        self.updated_at = now();
        self.version += 1;
    }
}

impl Block {
    fn new(input: BlockInput) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            style: input.style.unwrap_or_else(default_style),
            full_screen: input.full_screen.unwrap_or(false),
            rows: Vec::new(),
            description: input.description.unwrap_or_default(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy.created_at = now();
        copy.rows = self.rows.iter().map(Row::fresh_copy).collect();
        copy
    }
}

impl Row {
    fn new(input: RowInput) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            style: input.style.unwrap_or_else(default_style),
            columns: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy.created_at = now();
        copy.columns = self.columns.iter().map(Column::fresh_copy).collect();
        copy
    }
}

impl Column {
    fn new(input: ColumnInput) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            style: input.style.unwrap_or_else(default_style),
            size: input.size.unwrap_or(12),
            contents: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy.created_at = now();
        copy.contents = self
            .contents
            .iter()
            .map(|content| Content {
                id: new_id(),
                ..content.clone()
            })
            .collect();
        copy
    }
}

impl Content {
    fn new(input: ContentInput) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            kind: input.kind.unwrap_or_else(|| "text".to_string()),
            style: input.style.unwrap_or_else(default_style),
            data: input.data.unwrap_or_else(|| json!({})),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));

    let project = "/projects/{project_id}";
    let block = "/projects/{project_id}/blocks/{block_id}";
    let row = "/projects/{project_id}/blocks/{block_id}/rows/{row_id}";
    let column = "/projects/{project_id}/blocks/{block_id}/rows/{row_id}/columns/{column_id}";

    Router::new()
        .route("/accounts/auth/token", post(authenticate))
        .route("/accounts/auth/me", get(auth_me))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/templates", get(list_templates))
        .route("/projects/accept/{accept_token}", post(confirm_accept))
        .route("/projects/revert-accept/{reversion_token}", post(revert_accept))
        .route(
            project,
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(&format!("{project}/copy"), post(copy_template))
        .route(&format!("{project}/clone"), post(clone_project))
        .route(&format!("{project}/password"), post(set_password))
        .route(&format!("{project}/password-check"), post(check_password))
        .route(&format!("{project}/publish"), post(publish_project))
        .route(&format!("{project}/secure"), post(secure_project))
        .route(&format!("{project}/screenshot"), get(project_cover))
        .route(&format!("{project}/view-and-notify"), put(view_and_notify))
        .route(&format!("{project}/accept"), post(accept_project))
        .route(
            &format!("{project}/blocks"),
            get(list_blocks).post(create_block),
        )
        .route(block, get(get_block).put(update_block).delete(delete_block))
        .route(&format!("{block}/forward"), post(move_block_forward))
        .route(&format!("{block}/backward"), post(move_block_backward))
        .route(&format!("{block}/clone/"), post(clone_block_after))
        .route(&format!("{block}/clone/{{position}}"), post(clone_block_at))
        .route(&format!("{block}/rows"), get(list_rows).post(create_row))
        .route(row, get(get_row).put(update_row).delete(delete_row))
        .route(&format!("{row}/clone"), post(clone_row))
        .route(
            &format!("{row}/columns"),
            get(list_columns).post(create_column),
        )
        .route(
            column,
            get(get_column).put(update_column).delete(delete_column),
        )
        .route(
            &format!("{column}/contents"),
            get(list_contents).post(create_content),
        )
        .route(
            &format!("{column}/contents/{{content_id}}"),
            get(get_content).put(update_content).delete(delete_content),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Reply<T> = Result<Json<T>, StatusCode>;
type Created<T> = Result<(StatusCode, Json<T>), StatusCode>;

// --- auth ---

async fn authenticate(
    State(db): State<Db>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if credentials.username != DEMO_USERNAME || credentials.password != DEMO_PASSWORD {
        warn!(username = %credentials.username, "rejected authentication attempt");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid credentials"})),
        ));
    }
    let token = format!("{}{}", new_id(), new_id());
    db.write().await.tokens.insert(token.clone());
    Ok(Json(json!({ "token": token })))
}

async fn auth_me(State(db): State<Db>, headers: HeaderMap) -> Reply<Value> {
    db.read().await.authorize(&headers)?;
    Ok(Json(json!({ "id": DEMO_USER_ID })))
}

// --- projects ---

async fn list_templates(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply<Paginated<Project>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    Ok(Json(paginate(&store.templates, &query)))
}

async fn list_projects(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply<Paginated<Project>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let matching: Vec<Project> = match query.title.as_deref() {
        Some(title) => {
            let needle = title.to_lowercase();
            store
                .projects
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        None => store.projects.clone(),
    };
    Ok(Json(paginate(&matching, &query)))
}

async fn create_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ProjectInput>,
) -> Created<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let mut project = Project::new(input.title.as_deref().unwrap_or("Untitled"));
    if let Some(fonts) = input.fonts {
        project.fonts = fonts;
    }
    if let Some(priority) = input.priority {
        project.priority = priority;
    }
    store.projects.push(project.clone());
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Project> {
    let store = db.read().await;
    store.authorize(&headers)?;
    find(&store.projects, &project_id).cloned().map(Json)
}

async fn update_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    if let Some(title) = input.title {
        project.title = title;
    }
    if let Some(fonts) = input.fonts {
        project.fonts = fonts;
    }
    if let Some(priority) = input.priority {
        project.priority = priority;
    }
    project.touch();
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let index = position(&store.projects, &project_id)?;
    store.projects.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

// The `{project_id}` segment carries the template id on this route.
async fn copy_template(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(template_id): Path<String>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let template = find(&store.templates, &template_id)?;
    let project = Project::copy_of(template, template.title.clone());
    store.projects.push(project.clone());
    Ok(Json(project))
}

async fn clone_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let source = find(&store.projects, &project_id)?;
    let project = Project::copy_of(source, format!("{} (copy)", source.title));
    store.projects.push(project.clone());
    Ok(Json(project))
}

async fn set_password(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(input): Json<PasswordPayload>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    project.password = Some(input.password);
    project.touch();
    Ok(Json(project.clone()))
}

async fn check_password(
    State(db): State<Db>,
    Path(project_id): Path<String>,
    Json(input): Json<PasswordPayload>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let store = db.read().await;
    let project = find(&store.projects, &project_id)
        .map_err(|status| (status, Json(json!({"message": "project not found"}))))?;
    if project.password.as_deref() == Some(input.password.as_str()) {
        Ok(Json(json!({ "valid": true })))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid password"})),
        ))
    }
}

async fn publish_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    project.publish = !project.publish;
    project.touch();
    Ok(Json(project.clone()))
}

async fn secure_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Project> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    project.secure = !project.secure;
    project.touch();
    Ok(Json(project.clone()))
}

async fn project_cover(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Value> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    Ok(Json(json!({
        "url": format!("https://cdn.proposalpage.com/covers/{}.png", project.id)
    })))
}

async fn view_and_notify(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Value> {
    let mut store = db.write().await;
    let owner_viewing = store.is_authorized(&headers);
    let project = find_mut(&mut store.projects, &project_id)?;
    project.count_views += 1;
    project.last_view = Some(now());
    Ok(Json(json!({ "viewed": true, "emailSent": !owner_viewing })))
}

async fn accept_project(
    State(db): State<Db>,
    Path(project_id): Path<String>,
) -> Reply<Value> {
    let mut store = db.write().await;
    let project = find_mut(&mut store.projects, &project_id)?;
    let token = new_id();
    project.accept_token = Some(token.clone());
    Ok(Json(json!({ "acceptToken": token })))
}

async fn confirm_accept(
    State(db): State<Db>,
    Path(accept_token): Path<String>,
) -> Reply<Value> {
    let mut store = db.write().await;
    let project = store
        .projects
        .iter_mut()
        .find(|p| p.accept_token.as_deref() == Some(accept_token.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    let reversion = new_id();
    project.accepted = true;
    project.accept_token = None;
    project.accept_reversion_token = Some(reversion.clone());
    project.touch();
    Ok(Json(json!({ "accepted": true, "acceptReversionToken": reversion })))
}

async fn revert_accept(
    State(db): State<Db>,
    Path(reversion_token): Path<String>,
) -> Reply<Value> {
    let mut store = db.write().await;
    let project = store
        .projects
        .iter_mut()
        .find(|p| p.accept_reversion_token.as_deref() == Some(reversion_token.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    project.accepted = false;
    project.accept_reversion_token = None;
    project.touch();
    Ok(Json(json!({ "accepted": false })))
}

// --- blocks ---

async fn list_blocks(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply<Vec<Block>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    Ok(Json(find(&store.projects, &project_id)?.blocks.clone()))
}

async fn create_block(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(input): Json<BlockInput>,
) -> Created<Block> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = Block::new(input);
    project.blocks.push(block.clone());
    Ok((StatusCode::CREATED, Json(block)))
}

async fn get_block(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Reply<Block> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    find(&project.blocks, &block_id).cloned().map(Json)
}

async fn update_block(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
    Json(input): Json<BlockInput>,
) -> Reply<Block> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    if let Some(description) = input.description {
        block.description = description;
    }
    if let Some(style) = input.style {
        block.style = style;
    }
    if let Some(full_screen) = input.full_screen {
        block.full_screen = full_screen;
    }
    block.updated_at = now();
    Ok(Json(block.clone()))
}

async fn delete_block(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let index = position(&project.blocks, &block_id)?;
    project.blocks.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

async fn move_block(
    db: Db,
    headers: HeaderMap,
    project_id: String,
    block_id: String,
    forward: bool,
) -> Reply<Block> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let index = position(&project.blocks, &block_id)?;
    let target = if forward {
        (index + 1).min(project.blocks.len() - 1)
    } else {
        index.saturating_sub(1)
    };
    project.blocks.swap(index, target);
    Ok(Json(project.blocks[target].clone()))
}

async fn move_block_forward(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Reply<Block> {
    move_block(db, headers, project_id, block_id, true).await
}

async fn move_block_backward(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Reply<Block> {
    move_block(db, headers, project_id, block_id, false).await
}

async fn clone_block(
    db: Db,
    headers: HeaderMap,
    project_id: String,
    block_id: String,
    at: Option<usize>,
) -> Created<Block> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let index = position(&project.blocks, &block_id)?;
    let copy = project.blocks[index].fresh_copy();
    let at = at.unwrap_or(index + 1).min(project.blocks.len());
    project.blocks.insert(at, copy.clone());
    Ok((StatusCode::CREATED, Json(copy)))
}

async fn clone_block_after(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Created<Block> {
    clone_block(db, headers, project_id, block_id, None).await
}

async fn clone_block_at(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, position)): Path<(String, String, usize)>,
) -> Created<Block> {
    clone_block(db, headers, project_id, block_id, Some(position)).await
}

// --- rows ---

async fn list_rows(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
) -> Reply<Vec<Row>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    Ok(Json(find(&project.blocks, &block_id)?.rows.clone()))
}

async fn create_row(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id)): Path<(String, String)>,
    Json(input): Json<RowInput>,
) -> Created<Row> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = Row::new(input);
    block.rows.push(row.clone());
    Ok((StatusCode::CREATED, Json(row)))
}

async fn get_row(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
) -> Reply<Row> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    let block = find(&project.blocks, &block_id)?;
    find(&block.rows, &row_id).cloned().map(Json)
}

async fn update_row(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
    Json(input): Json<RowInput>,
) -> Reply<Row> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    if let Some(style) = input.style {
        row.style = style;
    }
    row.updated_at = now();
    Ok(Json(row.clone()))
}

async fn delete_row(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let index = position(&block.rows, &row_id)?;
    block.rows.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

// An empty body clones right after the original.
async fn clone_row(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
    body: Bytes,
) -> Created<Row> {
    let requested = if body.is_empty() {
        None
    } else {
        let input: ClonePosition =
            serde_json::from_slice(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
        Some(input.position)
    };
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let index = position(&block.rows, &row_id)?;
    let copy = block.rows[index].fresh_copy();
    let at = requested.unwrap_or(index + 1).min(block.rows.len());
    block.rows.insert(at, copy.clone());
    Ok((StatusCode::CREATED, Json(copy)))
}

// --- columns ---

async fn list_columns(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
) -> Reply<Vec<Column>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    let block = find(&project.blocks, &block_id)?;
    Ok(Json(find(&block.rows, &row_id)?.columns.clone()))
}

async fn create_column(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id)): Path<(String, String, String)>,
    Json(input): Json<ColumnInput>,
) -> Created<Column> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let column = Column::new(input);
    row.columns.push(column.clone());
    Ok((StatusCode::CREATED, Json(column)))
}

async fn get_column(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id)): Path<(String, String, String, String)>,
) -> Reply<Column> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    let block = find(&project.blocks, &block_id)?;
    let row = find(&block.rows, &row_id)?;
    find(&row.columns, &column_id).cloned().map(Json)
}

async fn update_column(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id)): Path<(String, String, String, String)>,
    Json(input): Json<ColumnInput>,
) -> Reply<Column> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let column = find_mut(&mut row.columns, &column_id)?;
    if let Some(style) = input.style {
        column.style = style;
    }
    if let Some(size) = input.size {
        column.size = size;
    }
    column.updated_at = now();
    Ok(Json(column.clone()))
}

async fn delete_column(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id)): Path<(String, String, String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let index = position(&row.columns, &column_id)?;
    row.columns.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

// --- contents ---

async fn list_contents(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id)): Path<(String, String, String, String)>,
) -> Reply<Vec<Content>> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    let block = find(&project.blocks, &block_id)?;
    let row = find(&block.rows, &row_id)?;
    Ok(Json(find(&row.columns, &column_id)?.contents.clone()))
}

async fn create_content(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id)): Path<(String, String, String, String)>,
    Json(input): Json<ContentInput>,
) -> Created<Content> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let column = find_mut(&mut row.columns, &column_id)?;
    let content = Content::new(input);
    column.contents.push(content.clone());
    Ok((StatusCode::CREATED, Json(content)))
}

type ContentPath = Path<(String, String, String, String, String)>;

async fn get_content(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id, content_id)): ContentPath,
) -> Reply<Content> {
    let store = db.read().await;
    store.authorize(&headers)?;
    let project = find(&store.projects, &project_id)?;
    let block = find(&project.blocks, &block_id)?;
    let row = find(&block.rows, &row_id)?;
    let column = find(&row.columns, &column_id)?;
    find(&column.contents, &content_id).cloned().map(Json)
}

async fn update_content(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id, content_id)): ContentPath,
    Json(input): Json<ContentInput>,
) -> Reply<Content> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let column = find_mut(&mut row.columns, &column_id)?;
    let content = find_mut(&mut column.contents, &content_id)?;
    if let Some(kind) = input.kind {
        content.kind = kind;
    }
    if let Some(style) = input.style {
        content.style = style;
    }
    if let Some(data) = input.data {
        content.data = data;
    }
    content.updated_at = now();
    Ok(Json(content.clone()))
}

async fn delete_content(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((project_id, block_id, row_id, column_id, content_id)): ContentPath,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let project = find_mut(&mut store.projects, &project_id)?;
    let block = find_mut(&mut project.blocks, &block_id)?;
    let row = find_mut(&mut block.rows, &row_id)?;
    let column = find_mut(&mut row.columns, &column_id)?;
    let index = position(&column.contents, &content_id)?;
    column.contents.remove(index);
    Ok(StatusCode::NO_CONTENT)
}
