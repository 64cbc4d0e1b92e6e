//! Warm-init and multi-client session conformance: the replay window, the
//! device lock, binding kicks, and the config-payload rules.

use std::time::Duration;

use bfrt_client::{
    BfrtError, ClientInterface, ClientOptions, DataTuple, KeyTuple, PipelineAction,
    PipelineConfig, SessionState, Target, WarmInitStatus,
};
use bfrt_harness::mock::{schemas, MockRuntime};

async fn connect(mock: &MockRuntime, client_id: u32) -> ClientInterface {
    ClientInterface::connect(ClientOptions::new(mock.endpoint(), client_id, 0))
        .await
        .expect("connect")
}

async fn setup_two_clients() -> (MockRuntime, ClientInterface, ClientInterface) {
    bfrt_harness::init_logging();
    let mock = MockRuntime::start().await.expect("mock runtime");
    mock.install_programs(&[("prog_a".to_string(), schemas::demo_program_blob())])
        .await
        .expect("install");
    let c1 = connect(&mock, 1).await;
    let c2 = connect(&mock, 2).await;
    (mock, c1, c2)
}

fn configs_a_and_b() -> Vec<PipelineConfig> {
    vec![
        PipelineConfig::new("prog_a", schemas::demo_program_blob()),
        PipelineConfig::new("prog_b", schemas::aux_program_blob()),
    ]
}

#[tokio::test]
async fn test_two_client_warm_init_with_replay() {
    let (mock, c1, c2) = setup_two_clients().await;
    let target = Target::new(0);

    c1.bind_pipeline_config("prog_a").await.unwrap();

    // Freeze the device with a config carrying both programs.
    c1.pipeline_config_set(
        PipelineAction::VerifyAndWarmInitBegin,
        "/artifacts",
        &configs_a_and_b(),
    )
    .await
    .unwrap();
    c1.notifications()
        .wait_warm_init(WarmInitStatus::Started, Duration::from_secs(5))
        .await
        .unwrap();
    c2.notifications()
        .wait_warm_init(WarmInitStatus::Started, Duration::from_secs(5))
        .await
        .unwrap();

    // The second client joins the replay window by binding to the program
    // the new config introduced.
    c2.bind_pipeline_config("prog_b").await.unwrap();
    assert_eq!(c2.state(), SessionState::Bound);

    // Both clients replay entries while the device is frozen.
    let forward = c1.table("forward").await.unwrap();
    let key_a = forward
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:22")])
        .unwrap();
    let data_a = forward
        .make_data(&[DataTuple::new("port", 260u32)], Some("hit"))
        .unwrap();
    forward.entry_add(target, &[key_a.clone()], &[data_a]).await.unwrap();

    let output = c2.table("output").await.unwrap();
    let key_b = output
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:22")])
        .unwrap();
    let data_b = output
        .make_data(&[DataTuple::new("port", 132u32)], Some("output_hit"))
        .unwrap();
    output.entry_add(target, &[key_b.clone()], &[data_b]).await.unwrap();

    // Commit: no config payload allowed.
    c1.pipeline_config_set(PipelineAction::WarmInitEnd, "", &[])
        .await
        .unwrap();
    for client in [&c1, &c2] {
        client
            .notifications()
            .wait_warm_init(WarmInitStatus::Finished, Duration::from_secs(5))
            .await
            .unwrap();
    }

    // The replayed entries survive the commit.
    assert_eq!(forward.usage_get(target).await.unwrap(), 1);
    assert_eq!(output.usage_get(target).await.unwrap(), 1);
    assert_eq!(c1.state(), SessionState::Bound);
    assert_eq!(c2.state(), SessionState::Bound);

    mock.stop().await;
}

#[tokio::test]
async fn test_client_kicked_when_bound_program_vanishes() {
    let (mock, c1, c2) = setup_two_clients().await;

    // Load both programs, bind the second client to the auxiliary one.
    c1.pipeline_config_set(
        PipelineAction::VerifyAndWarmInitBeginAndEnd,
        "/artifacts",
        &configs_a_and_b(),
    )
    .await
    .unwrap();
    c2.notifications()
        .wait_warm_init(WarmInitStatus::Finished, Duration::from_secs(5))
        .await
        .unwrap();
    c2.bind_pipeline_config("prog_b").await.unwrap();

    // Replace with a config that no longer carries prog_b.
    c1.pipeline_config_set(
        PipelineAction::VerifyAndWarmInitBeginAndEnd,
        "/artifacts",
        &[PipelineConfig::new("prog_a", schemas::demo_program_blob())],
    )
    .await
    .unwrap();

    // The kick arrives as a CANCELLED stream error; consuming it keeps the
    // teardown assertion clean.
    let error = c2
        .notifications()
        .next_error(Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(error.code, tonic::Code::Cancelled);
    assert_eq!(c2.bound_program(), None);
    assert_eq!(c2.state(), SessionState::Subscribed);

    mock.stop().await;
}

#[tokio::test]
async fn test_warm_init_end_rejects_config_payload() {
    let (mock, c1, _c2) = setup_two_clients().await;

    c1.pipeline_config_set(
        PipelineAction::VerifyAndWarmInitBegin,
        "/artifacts",
        &configs_a_and_b(),
    )
    .await
    .unwrap();

    let err = c1
        .pipeline_config_set(PipelineAction::WarmInitEnd, "", &configs_a_and_b())
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::InvalidArgument(_)));

    // A payload-free commit succeeds.
    c1.pipeline_config_set(PipelineAction::WarmInitEnd, "", &[])
        .await
        .unwrap();

    mock.stop().await;
}

#[tokio::test]
async fn test_device_locked_for_non_replay_writers() {
    let (mock, c1, c2) = setup_two_clients().await;
    let target = Target::new(0);

    c1.bind_pipeline_config("prog_a").await.unwrap();
    c1.pipeline_config_set(
        PipelineAction::VerifyAndWarmInitBegin,
        "/artifacts",
        &[PipelineConfig::new("prog_a", schemas::demo_program_blob())],
    )
    .await
    .unwrap();

    // An unbound bystander is locked out until the commit.
    let forward2 = c2.table_from("prog_a", "forward").await.unwrap();
    let key = forward2
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "02:00:00:00:00:01")])
        .unwrap();
    let data = forward2
        .make_data(&[DataTuple::new("port", 4u32)], Some("hit"))
        .unwrap();
    let err = forward2
        .entry_add(target, &[key.clone()], &[data.clone()])
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::Unavailable(_)));

    // The initiator replays freely.
    let forward1 = c1.table("forward").await.unwrap();
    forward1
        .entry_add(
            target,
            &[forward1
                .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "02:00:00:00:00:02")])
                .unwrap()],
            &[forward1
                .make_data(&[DataTuple::new("port", 8u32)], Some("hit"))
                .unwrap()],
        )
        .await
        .unwrap();

    c1.pipeline_config_set(PipelineAction::WarmInitEnd, "", &[])
        .await
        .unwrap();
    c2.notifications()
        .wait_warm_init(WarmInitStatus::Finished, Duration::from_secs(5))
        .await
        .unwrap();

    // The lock lifts with the commit.
    forward2.entry_add(target, &[key], &[data]).await.unwrap();

    mock.stop().await;
}

#[tokio::test]
async fn test_verify_leaves_the_device_untouched() {
    let (mock, c1, _c2) = setup_two_clients().await;

    c1.pipeline_config_set(
        PipelineAction::Verify,
        "/artifacts",
        &[PipelineConfig::new("prog_b", schemas::aux_program_blob())],
    )
    .await
    .unwrap();

    // Still only the originally installed program.
    let configs = c1.pipeline_config_get().await.unwrap();
    let names: Vec<&str> = configs.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["prog_a"]);

    // And no warm-init progression was observed.
    let err = c1
        .notifications()
        .wait_warm_init(WarmInitStatus::Started, Duration::from_millis(300))
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::Timeout(_)));

    mock.stop().await;
}

#[tokio::test]
async fn test_double_bind_reports_already_exists() {
    let (mock, c1, _c2) = setup_two_clients().await;

    c1.bind_pipeline_config("prog_a").await.unwrap();
    let err = c1.bind_pipeline_config("prog_a").await.unwrap_err();
    assert!(matches!(err, BfrtError::AlreadyExists(_)));

    mock.stop().await;
}
