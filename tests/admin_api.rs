//! Admin API over real sockets.

use segment_router::config::RouterConfig;

mod common;

#[tokio::test]
async fn test_admin_lists_routes() {
    let admin_addr = common::free_local_addr();
    let mut config = RouterConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = "test-key".into();
    config.admin.bind_address = admin_addr.to_string();

    let server = common::start_server(config).await;
    let client = common::client();
    let admin = format!("http://{}", admin_addr);

    let res = client.get(format!("{}/admin/routes", admin)).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("{}/admin/routes", admin))
        .bearer_auth("test-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let routes: serde_json::Value = res.json().await.unwrap();
    assert_eq!(routes.as_array().unwrap().len(), 2);
    assert_eq!(routes[1]["pattern"], "/:url");

    let res = client
        .get(format!("{}/admin/status", admin))
        .bearer_auth("test-key")
        .send()
        .await
        .unwrap();
    let status: serde_json::Value = res.json().await.unwrap();
    assert_eq!(status["routes"], 2);

    server.shutdown.trigger();
}
