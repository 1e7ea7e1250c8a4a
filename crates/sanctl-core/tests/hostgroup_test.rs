// Host-group teardown tests: bounded fan-out over LUN path deletions.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sanctl_api::{JobPoller, SessionStore};
use sanctl_core::{
    delete_host_group, ApiGeneration, ArrayClient, ArrayConfig, AuthCredentials, CoreError,
    TlsVerification,
};

fn client_for(server: &MockServer) -> ArrayClient {
    let config = ArrayConfig {
        url: server.uri().parse().unwrap(),
        auth: AuthCredentials::Token(SecretString::from("tok".to_owned())),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
        generation: ApiGeneration::V2,
        serial: None,
    };
    ArrayClient::from_config(&config, Arc::new(SessionStore::new()))
        .unwrap()
        .with_poller(JobPoller {
            interval: Duration::from_millis(1),
            max_polls: 60,
        })
}

async fn mount_lun_listing(server: &MockServer, luns: &[&str]) {
    let rows: Vec<serde_json::Value> = luns.iter().map(|l| json!({ "lunId": l })).collect();
    Mock::given(method("GET"))
        .and(path("/v1/objects/luns"))
        .and(query_param("portId", "CL1-A"))
        .and(query_param("hostGroupNumber", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": rows })))
        .mount(server)
        .await;
}

async fn mount_completed_job(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/objects/jobs/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobId": id,
            "status": "Completed",
            "state": "Succeeded",
            "affectedResources": ["/v1/objects/luns/x"]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_teardown_deletes_every_path_then_the_group() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let luns = ["CL1-A,42,0", "CL1-A,42,1", "CL1-A,42,2"];
    mount_lun_listing(&server, &luns).await;

    for lun in &luns {
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/objects/luns/{lun}")))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 5 })))
            .expect(1)
            .mount(&server)
            .await;
    }
    mount_completed_job(&server, 5).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/host-groups/CL1-A,42"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 6 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_completed_job(&server, 6).await;

    delete_host_group(&client, "CL1-A", 42).await.unwrap();
}

#[tokio::test]
async fn test_teardown_reraises_first_path_failure() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    mount_lun_listing(&server, &["CL1-A,42,0", "CL1-A,42,1"]).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/luns/CL1-A,42,0"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 5 })))
        .mount(&server)
        .await;
    mount_completed_job(&server, 5).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/luns/CL1-A,42,1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "The path is in use." })),
        )
        .mount(&server)
        .await;

    // The group must survive when any path deletion failed.
    Mock::given(method("DELETE"))
        .and(path("/v1/objects/host-groups/CL1-A,42"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 6 })))
        .expect(0)
        .mount(&server)
        .await;

    let result = delete_host_group(&client, "CL1-A", 42).await;

    match result {
        Err(CoreError::Rejected { message }) => {
            assert!(message.contains("The path is in use."), "message was: {message}");
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_teardown_of_empty_group() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    mount_lun_listing(&server, &[]).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/objects/host-groups/CL1-A,42"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 6 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_completed_job(&server, 6).await;

    delete_host_group(&client, "CL1-A", 42).await.unwrap();
}
