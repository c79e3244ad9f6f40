//! End-to-end dispatch tests over real sockets.

use std::time::Duration;

use segment_router::config::{RouteConfig, RouterConfig};

mod common;

#[tokio::test]
async fn test_default_routes_answer_hello() {
    let server = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    for path in ["/", "/abc", "/some-url/"] {
        let res = client.get(server.url(path)).send().await.expect("Server unreachable");
        assert_eq!(res.status(), 200, "path {}", path);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.text().await.unwrap(), "Hello, World!");
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_is_not_found() {
    let server = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/a/b")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "Cannot GET /a/b");

    let res = client.delete(server.url("/abc")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_precedence_follows_config_order() {
    let mut config = RouterConfig::default();
    let mut health = RouteConfig::get("/health");
    health.body = "ok".into();
    let mut item = RouteConfig::get("/:id");
    item.body = "item {id}".into();
    config.routes = vec![health, item];

    let server = common::start_server(config).await;
    let client = common::client();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = client.get(server.url("/42")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "item 42");

    // Root has no route in this config.
    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    let concurrency = 20;
    let requests_per_task = 25;

    let mut handles = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let base = server.url("");
        handles.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let url = format!("{}/t{}-{}", base, task, i);
                if let Ok(res) = client.get(url).send().await {
                    if res.status() == 200 {
                        ok += 1;
                    }
                }
            }
            ok
        }));
    }

    let mut total_ok = 0;
    for handle in handles {
        total_ok += handle.await.unwrap();
    }
    assert_eq!(total_ok, concurrency * requests_per_task);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_hot_reload_swaps_routes() {
    let server = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    let mut next = RouterConfig::default();
    let mut greeting = RouteConfig::get("/hello/:name");
    greeting.body = "Hello, {name}!".into();
    next.routes = vec![greeting];
    server.config_updates.send(next).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/hello/ferris")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "Hello, ferris!");

    let res = client.get(server.url("/abc")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    // A broken config leaves the current routes in place.
    let mut broken = RouterConfig::default();
    broken.routes = vec![RouteConfig::get("/x"), RouteConfig::get("/x")];
    server.config_updates.send(broken).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/hello/again")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let server = common::start_server(RouterConfig::default()).await;
    server.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = common::client()
        .get(server.url("/"))
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    assert!(res.is_err(), "server should no longer accept connections");
}
