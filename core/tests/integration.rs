//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, the blocking transport and response normalization work
//! end-to-end with the actual server.

use proposalpage_core::{
    AuthMode, Block, CallErrorKind, ClientConfig, Column, Content, Credentials, Paginated,
    Pagination, Project, ProjectFilter, ProposalPageClient, Row,
};
use serde_json::{json, Value};

/// Start the mock server on its own runtime and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn id(value: &Option<Value>) -> String {
    value.as_ref().unwrap()["_id"].as_str().unwrap().to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle() {
    let client = ProposalPageClient::with_base_url(&start_server());

    // Step 1: unauthenticated calls come back as 401 results.
    let me = client.auth_me().await.unwrap();
    assert_eq!(me.status_code, 401);

    // Step 2: bad credentials leave the session alone.
    let rejected = client
        .authenticate(
            &Credentials::new(mock_server::DEMO_USERNAME, "wrong"),
            AuthMode::StoreToken,
        )
        .await
        .unwrap();
    assert_eq!(rejected.status_code, 401);
    assert_eq!(client.token(), None);

    // Step 3: log in and keep the token.
    let login = client
        .authenticate(
            &Credentials::new(mock_server::DEMO_USERNAME, mock_server::DEMO_PASSWORD),
            AuthMode::StoreToken,
        )
        .await
        .unwrap();
    assert_eq!(login.status_code, 200);
    assert!(client.token().is_some());
    let me = client.auth_me().await.unwrap();
    assert_eq!(me.status_code, 200);

    // Step 4: templates, and a project copied from one.
    let templates = client.list_templates(&Pagination::new(1, 20)).await.unwrap();
    let templates: Paginated<Project> = templates.json_as().unwrap().unwrap();
    assert_eq!(templates.items[0].id, mock_server::TEMPLATE_ID);

    let copied = client
        .create_project_from_template(mock_server::TEMPLATE_ID)
        .await
        .unwrap();
    assert_eq!(copied.status_code, 200);
    let copied: Project = copied.json_as().unwrap().unwrap();
    assert_eq!(copied.blocks.len(), 1);

    // Step 5: create, update, list with a title filter.
    let created = client
        .create_project(&json!({"title": "New Project", "blocks": []}))
        .await
        .unwrap();
    assert_eq!(created.status_code, 201);
    let project_id = id(&created.json);

    let updated = client
        .update_project(&project_id, &json!({"title": "Q3 & Q4 plan"}))
        .await
        .unwrap();
    let updated: Project = updated.json_as().unwrap().unwrap();
    assert_eq!(updated.title, "Q3 & Q4 plan");

    let listed = client
        .list_projects(&ProjectFilter::default().title("Q3 & Q4"))
        .await
        .unwrap();
    let listed: Paginated<Project> = listed.json_as().unwrap().unwrap();
    assert_eq!(listed.total_items, 1);
    assert_eq!(listed.items[0].id, project_id);

    let fetched = client.list_project(&project_id).await.unwrap();
    assert_eq!(id(&fetched.json), project_id);

    // Step 6: project flags, cover and password.
    let published: Project = client
        .publish_project(&project_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert!(published.publish);
    let secured: Project = client
        .secure_project(&project_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert!(secured.secure);

    let cover = client.generate_project_cover(&project_id).await.unwrap();
    assert!(cover.json.unwrap()["url"].is_string());

    let set = client.set_project_password(&project_id, "s3cret").await.unwrap();
    assert_eq!(set.status_code, 200);
    let wrong = client.check_project_password(&project_id, "nope").await.unwrap();
    assert_eq!(wrong.status_code, 401);
    let right = client.check_project_password(&project_id, "s3cret").await.unwrap();
    assert_eq!(right.status_code, 200);

    let viewed = client.view_project_and_notify(&project_id).await.unwrap();
    assert_eq!(viewed.json.unwrap()["emailSent"], false);

    // Step 7: blocks.
    let first = client
        .create_block(&project_id, &json!({"description": "Cover"}))
        .await
        .unwrap();
    assert_eq!(first.status_code, 201);
    let block_id = id(&first.json);
    let second = client
        .create_block(&project_id, &json!({"description": "Pricing"}))
        .await
        .unwrap();
    let second_id = id(&second.json);

    client.move_block_backward(&project_id, &second_id).await.unwrap();
    let blocks: Vec<Block> = client
        .list_blocks(&project_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(blocks[0].id, second_id);
    client.move_block_forward(&project_id, &second_id).await.unwrap();

    let appended = client.clone_block(&project_id, &block_id, None).await.unwrap();
    assert_eq!(appended.status_code, 201);
    let placed = client.clone_block(&project_id, &block_id, Some(0)).await.unwrap();
    let placed_id = id(&placed.json);
    let blocks: Vec<Block> = client
        .list_blocks(&project_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0].id, placed_id);

    let block = client
        .update_block(&project_id, &block_id, &json!({"fullScreen": true}))
        .await
        .unwrap();
    let block: Block = block.json_as().unwrap().unwrap();
    assert!(block.full_screen);
    assert_eq!(block.description, "Cover");
    let one = client.list_block(&project_id, &block_id).await.unwrap();
    assert_eq!(id(&one.json), block_id);

    // Step 8: rows.
    let row = client
        .create_row(&project_id, &block_id, &json!({}))
        .await
        .unwrap();
    assert_eq!(row.status_code, 201);
    let row_id = id(&row.json);
    let cloned = client
        .clone_row(&project_id, &block_id, &row_id, Some(0))
        .await
        .unwrap();
    assert_eq!(cloned.status_code, 201);
    let cloned_id = id(&cloned.json);
    let rows: Vec<Row> = client
        .list_rows(&project_id, &block_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, cloned_id);
    client
        .update_row(&project_id, &block_id, &row_id, &json!({"style": {"opacity": 0.5}}))
        .await
        .unwrap();
    let row: Row = client
        .list_row(&project_id, &block_id, &row_id)
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(row.style["opacity"], 0.5);

    // Step 9: columns and contents.
    let column = client
        .create_column(&project_id, &block_id, &row_id, &json!({"size": 6}))
        .await
        .unwrap();
    assert_eq!(column.status_code, 201);
    let column_id = id(&column.json);
    let column: Column = client
        .update_column(&project_id, &block_id, &row_id, &column_id, &json!({"size": 4}))
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(column.size, Some(4));
    let columns = client.list_columns(&project_id, &block_id, &row_id).await.unwrap();
    assert_eq!(columns.json.unwrap().as_array().unwrap().len(), 1);
    let one = client
        .list_column(&project_id, &block_id, &row_id, &column_id)
        .await
        .unwrap();
    assert_eq!(id(&one.json), column_id);

    let content = client
        .create_content(
            &project_id,
            &block_id,
            &row_id,
            &column_id,
            &json!({"type": "text", "data": {"html": "<p>Lorem Ipsum</p>"}}),
        )
        .await
        .unwrap();
    assert_eq!(content.status_code, 201);
    let content_id = id(&content.json);
    let content: Content = client
        .update_content(
            &project_id,
            &block_id,
            &row_id,
            &column_id,
            &content_id,
            &json!({"data": {"html": "<p>Hello</p>"}}),
        )
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(content.kind, "text");
    assert_eq!(content.data["html"], "<p>Hello</p>");
    let contents = client
        .list_contents(&project_id, &block_id, &row_id, &column_id)
        .await
        .unwrap();
    assert_eq!(contents.json.unwrap().as_array().unwrap().len(), 1);
    let one = client
        .list_content(&project_id, &block_id, &row_id, &column_id, &content_id)
        .await
        .unwrap();
    assert_eq!(id(&one.json), content_id);

    // Step 10: deletes return 204 with no JSON, then 404.
    let deleted = client
        .delete_content(&project_id, &block_id, &row_id, &column_id, &content_id)
        .await
        .unwrap();
    assert_eq!(deleted.status_code, 204);
    assert!(deleted.json.is_none());
    let gone = client
        .list_content(&project_id, &block_id, &row_id, &column_id, &content_id)
        .await
        .unwrap();
    assert_eq!(gone.status_code, 404);

    let deleted = client
        .delete_column(&project_id, &block_id, &row_id, &column_id)
        .await
        .unwrap();
    assert_eq!(deleted.status_code, 204);
    let deleted = client.delete_row(&project_id, &block_id, &row_id).await.unwrap();
    assert_eq!(deleted.status_code, 204);
    let deleted = client.delete_block(&project_id, &block_id).await.unwrap();
    assert_eq!(deleted.status_code, 204);

    // Step 11: accept, confirm, revert.
    let accept = client.accept_project(&project_id).await.unwrap();
    let accept_token = accept.json.unwrap()["acceptToken"]
        .as_str()
        .unwrap()
        .to_string();
    let confirmed = client.confirm_project_accept(&accept_token).await.unwrap();
    let confirmed = confirmed.json.unwrap();
    assert_eq!(confirmed["accepted"], true);
    let reversion = confirmed["acceptReversionToken"].as_str().unwrap();
    let reverted = client.revert_project_accept(reversion).await.unwrap();
    assert_eq!(reverted.json.unwrap()["accepted"], false);

    // Step 12: clone then delete projects.
    let clone = client.clone_project(&project_id).await.unwrap();
    assert_eq!(clone.status_code, 200);
    let clone_id = id(&clone.json);
    for project in [&project_id, &clone_id, &copied.id] {
        let deleted = client.delete_project(project).await.unwrap();
        assert_eq!(deleted.status_code, 204);
    }
    let missing = client.list_project(&project_id).await.unwrap();
    assert_eq!(missing.status_code, 404);
    let listed: Paginated<Project> = client
        .list_projects(&ProjectFilter::default())
        .await
        .unwrap()
        .json_as()
        .unwrap()
        .unwrap();
    assert_eq!(listed.total_items, 0);

    // Step 13: logging out drops the bearer token again.
    client.clear_token();
    let me = client.auth_me().await.unwrap();
    assert_eq!(me.status_code, 401);
}

#[tokio::test(flavor = "multi_thread")]
async fn token_from_config_is_used() {
    let base_url = start_server();
    let login = ProposalPageClient::with_base_url(&base_url);
    let result = login
        .authenticate(
            &Credentials::new(mock_server::DEMO_USERNAME, mock_server::DEMO_PASSWORD),
            AuthMode::InspectOnly,
        )
        .await
        .unwrap();
    assert_eq!(login.token(), None);
    let token = result.json.unwrap()["token"].as_str().unwrap().to_string();

    let client =
        ProposalPageClient::from_config(ClientConfig::default().with_base_url(base_url).with_token(token));
    let me = client.auth_me().await.unwrap();
    assert_eq!(me.status_code, 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_failure() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    drop(std_listener);

    let client = ProposalPageClient::with_base_url(&format!("http://{addr}"));
    let err = client.auth_me().await.unwrap_err();
    assert_eq!(err.kind(), CallErrorKind::TransportFailure);
}
