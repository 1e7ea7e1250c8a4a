// End-to-end pair operation tests against two wiremock servers (one per
// array). Clients carry pre-issued tokens so session creation stays out
// of the picture; job polling runs with a millisecond interval.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sanctl_api::{JobPoller, SessionStore};
use sanctl_core::{
    ApiGeneration, ArrayClient, ArrayConfig, AuthCredentials, CoreError, PairCreate, PairId,
    PairKind, PairManager, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

const REMOTE_SERIAL: &str = "886000123456";

fn config_for(server: &MockServer, token: &str, serial: Option<&str>) -> ArrayConfig {
    ArrayConfig {
        url: server.uri().parse().unwrap(),
        auth: AuthCredentials::Token(SecretString::from(token.to_owned())),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
        generation: ApiGeneration::V2,
        serial: serial.map(str::to_owned),
    }
}

fn fast_poller() -> JobPoller {
    JobPoller {
        interval: Duration::from_millis(1),
        max_polls: 60,
    }
}

fn manager_for(local: &MockServer, secondary: &MockServer) -> PairManager {
    let sessions = Arc::new(SessionStore::new());
    let local_client = ArrayClient::from_config(
        &config_for(local, "tok-local", None),
        Arc::clone(&sessions),
    )
    .unwrap()
    .with_poller(fast_poller());
    let secondary_client = ArrayClient::from_config(
        &config_for(secondary, "tok-remote", Some(REMOTE_SERIAL)),
        sessions,
    )
    .unwrap()
    .with_poller(fast_poller());
    PairManager::new(local_client, secondary_client)
}

fn completed_job(id: u64, resource: &str) -> serde_json::Value {
    json!({
        "jobId": id,
        "status": "Completed",
        "state": "Succeeded",
        "affectedResources": [resource]
    })
}

async fn mount_job(server: &MockServer, id: u64, resource: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/objects/jobs/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_job(id, resource)))
        .mount(server)
        .await;
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_defaults_device_group_names() {
    let local = MockServer::start().await;
    let secondary = MockServer::start().await;
    let manager = manager_for(&local, &secondary);

    Mock::given(method("POST"))
        .and(path("/v1/objects/remote-mirror-copypairs"))
        .and(header("authorization", "Session tok-local"))
        .and(header("remote-authorization", "Session tok-remote"))
        .and(header("job-mode-wait-configuration-change", "NoWait"))
        .and(body_partial_json(json!({
            "copyGroupName": "CG1",
            "copyPairName": "pair1",
            "localDeviceGroupName": "CG1P_",
            "remoteDeviceGroupName": "CG1S_",
            "remoteStorageDeviceId": REMOTE_SERIAL,
            "replicationType": "SYNC",
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 1 })))
        .expect(1)
        .mount(&local)
        .await;
    mount_job(
        &local,
        1,
        "/v1/objects/remote-mirror-copypairs/886000123456,CG1,CG1P_,CG1S_,pair1",
    )
    .await;

    let spec = PairCreate {
        copy_group: "CG1".into(),
        pair_name: "pair1".into(),
        local_device_group: None,
        remote_device_group: None,
        pvol_ldev_id: 100,
        svol_ldev_id: 200,
        kind: PairKind::Sync,
    };

    let id = manager.create(&spec).await.unwrap();
    assert_eq!(id.to_string(), "886000123456,CG1,CG1P_,CG1S_,pair1");
}

// ── Swap addressing ─────────────────────────────────────────────────

#[tokio::test]
async fn test_swap_split_addresses_transposed_id() {
    let local = MockServer::start().await;
    let secondary = MockServer::start().await;
    let manager = manager_for(&local, &secondary);

    // Device groups trade places in the path for the swap variant.
    Mock::given(method("POST"))
        .and(path(
            "/v1/objects/remote-mirror-copypairs/886000123456,CG1,CG1S_,CG1P_,pair1/actions/split/invoke",
        ))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 2 })))
        .expect(1)
        .mount(&local)
        .await;
    mount_job(&local, 2, "/v1/objects/remote-mirror-copypairs/x").await;

    let id = PairId::new(REMOTE_SERIAL, "CG1", "pair1", None, None);
    manager.split(&id, true).await.unwrap();
}

// ── Resize saga ─────────────────────────────────────────────────────

fn pair_status_body(pvol: &str, svol: &str) -> serde_json::Value {
    json!({
        "copyGroupName": "CG1",
        "copyPairName": "pair1",
        "pvolLdevId": 100,
        "svolLdevId": 200,
        "pvolStatus": pvol,
        "svolStatus": svol,
    })
}

#[tokio::test]
async fn test_resize_skips_split_when_already_suspended() {
    let local = MockServer::start().await;
    let secondary = MockServer::start().await;
    let manager = manager_for(&local, &secondary);
    let id = PairId::new(REMOTE_SERIAL, "CG1", "pair1", None, None);

    Mock::given(method("GET"))
        .and(path(format!("/v1/objects/remote-mirror-copypairs/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pair_status_body("PSUS", "SSUS")))
        .mount(&local)
        .await;

    // Already suspended: the split step must not fire.
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/objects/remote-mirror-copypairs/{id}/actions/split/invoke"
        )))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 99 })))
        .expect(0)
        .mount(&local)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/ldevs/100/actions/expand/invoke"))
        .and(body_partial_json(json!({ "parameters": { "additionalBlockCapacity": 2048 } })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 3 })))
        .expect(1)
        .mount(&local)
        .await;
    mount_job(&local, 3, "/v1/objects/ldevs/100").await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/ldevs/200/actions/expand/invoke"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 9 })))
        .expect(1)
        .mount(&secondary)
        .await;
    mount_job(&secondary, 9, "/v1/objects/ldevs/200").await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/objects/remote-mirror-copypairs/{id}/actions/resync/invoke"
        )))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 4 })))
        .expect(1)
        .mount(&local)
        .await;
    mount_job(&local, 4, "/v1/objects/remote-mirror-copypairs/x").await;

    manager.resize(&id, 2048).await.unwrap();
}

#[tokio::test]
async fn test_resize_failure_reports_pair_left_split() {
    let local = MockServer::start().await;
    let secondary = MockServer::start().await;
    let manager = manager_for(&local, &secondary);
    let id = PairId::new(REMOTE_SERIAL, "CG1", "pair1", None, None);

    Mock::given(method("GET"))
        .and(path(format!("/v1/objects/remote-mirror-copypairs/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pair_status_body("PAIR", "PAIR")))
        .mount(&local)
        .await;

    // Synchronized pair: split first.
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/objects/remote-mirror-copypairs/{id}/actions/split/invoke"
        )))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 2 })))
        .expect(1)
        .mount(&local)
        .await;
    mount_job(&local, 2, "/v1/objects/remote-mirror-copypairs/x").await;

    Mock::given(method("POST"))
        .and(path("/v1/objects/ldevs/100/actions/expand/invoke"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 3 })))
        .mount(&local)
        .await;
    mount_job(&local, 3, "/v1/objects/ldevs/100").await;

    // Secondary expansion fails -- the saga stops, no resync.
    Mock::given(method("POST"))
        .and(path("/v1/objects/ldevs/200/actions/expand/invoke"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Not enough pool capacity." })),
        )
        .mount(&secondary)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/objects/remote-mirror-copypairs/{id}/actions/resync/invoke"
        )))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 4 })))
        .expect(0)
        .mount(&local)
        .await;

    let result = manager.resize(&id, 2048).await;

    match result {
        Err(CoreError::PairLeftSplit { pair, message }) => {
            assert_eq!(pair, id.to_string());
            assert!(
                message.contains("Not enough pool capacity."),
                "message was: {message}"
            );
        }
        other => panic!("expected PairLeftSplit, got: {other:?}"),
    }
}

// ── Job failure propagation ─────────────────────────────────────────

#[tokio::test]
async fn test_failed_job_surfaces_composed_message() {
    let local = MockServer::start().await;
    let secondary = MockServer::start().await;
    let manager = manager_for(&local, &secondary);
    let id = PairId::new(REMOTE_SERIAL, "CG1", "pair1", None, None);

    Mock::given(method("DELETE"))
        .and(path(format!("/v1/objects/remote-mirror-copypairs/{id}")))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": 7 })))
        .mount(&local)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/objects/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobId": 7,
            "status": "Completed",
            "state": "Failed",
            "error": {
                "messageId": "KART30001-E",
                "message": "The pair cannot be deleted.",
                "cause": "The pair is still copying."
            }
        })))
        .mount(&local)
        .await;

    let result = manager.delete(&id).await;

    match result {
        Err(CoreError::JobFailed { message }) => {
            assert!(message.contains("KART30001-E"));
            assert!(message.contains("The pair cannot be deleted."));
            assert!(message.contains("The pair is still copying."));
        }
        other => panic!("expected JobFailed, got: {other:?}"),
    }
}
