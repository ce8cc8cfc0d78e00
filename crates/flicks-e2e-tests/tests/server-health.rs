use flicks_e2e_tests::{launch_env, prepare_env};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_health_and_root() {
    let (args, _config_guard) = prepare_env("test_health").unwrap();
    let (client, base_url, _server_guard) = launch_env(args).await.unwrap();

    let response = client.get(base_url.join("health").unwrap()).send().await.unwrap();
    assert!(response.status().is_success());

    let response = client.get(base_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.get("message").is_some());
}
