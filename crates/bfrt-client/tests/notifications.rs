//! Notification dispatch conformance: idle-timeout aging in both modes,
//! port-status changes, in-kind ordering, and queue teardown semantics.

use std::time::Duration;

use bfrt_client::{
    BfrtError, ClientInterface, ClientOptions, DataTuple, IdleTableMode, IdleTimeAttribute,
    KeyTuple, Table, TableOperationKind, Target, ENTRY_HIT_STATE, ENTRY_TTL,
};
use bfrt_harness::mock::{schemas, MockRuntime};

async fn setup() -> (MockRuntime, ClientInterface) {
    bfrt_harness::init_logging();
    let mock = MockRuntime::start().await.expect("mock runtime");
    mock.install_programs(&[("demo".to_string(), schemas::demo_program_blob())])
        .await
        .expect("install demo program");
    let client = ClientInterface::connect(ClientOptions::new(mock.endpoint(), 1, 0))
        .await
        .expect("connect");
    client.bind_pipeline_config("demo").await.expect("bind");
    (mock, client)
}

async fn notify_enabled_forward(client: &ClientInterface, interval_ms: u32) -> Table {
    let forward = client.table("forward").await.unwrap();
    forward
        .attribute_idle_time_set(
            Target::new(0),
            IdleTimeAttribute {
                enable: true,
                mode: IdleTableMode::Notify,
                ttl_query_interval_ms: interval_ms,
            },
        )
        .await
        .unwrap();
    forward
}

#[tokio::test]
async fn test_idle_timeout_notification_carries_the_key() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = notify_enabled_forward(&client, 100).await;

    let key = forward
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:22")])
        .unwrap();
    let data = forward
        .make_data(
            &[
                DataTuple::new("port", 2u32),
                DataTuple::new(ENTRY_TTL, 200u32),
            ],
            Some("hit"),
        )
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    let notification = client
        .notifications()
        .idle_timeout(Duration::from_secs(5))
        .await
        .expect("idle notification");
    let notified_key = forward.decode_notification_key(&notification).unwrap();
    assert_eq!(notified_key, key.masked());
    assert_eq!(notification.target.device_id, 0);

    mock.stop().await;
}

#[tokio::test]
async fn test_disabled_table_freezes_ttl() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = notify_enabled_forward(&client, 100).await;

    let key = forward
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:23")])
        .unwrap();
    let data = forward
        .make_data(
            &[
                DataTuple::new("port", 2u32),
                DataTuple::new(ENTRY_TTL, 400u32),
            ],
            Some("hit"),
        )
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    // Freeze immediately; aging must stop at the residual.
    forward
        .attribute_idle_time_set(
            target,
            IdleTimeAttribute {
                enable: false,
                mode: IdleTableMode::Notify,
                ttl_query_interval_ms: 100,
            },
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    let err = client
        .notifications()
        .idle_timeout(Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::Timeout(_)));

    let entries = forward
        .entry_get(target, Some(&[key.clone()]), false, None)
        .await
        .unwrap();
    let residual = entries[0].1.get_int(ENTRY_TTL).unwrap();
    assert!(residual > 0, "TTL decayed while the table was disabled");

    // Re-enabling resumes aging from the frozen residual.
    forward
        .attribute_idle_time_set(
            target,
            IdleTimeAttribute {
                enable: true,
                mode: IdleTableMode::Notify,
                ttl_query_interval_ms: 100,
            },
        )
        .await
        .unwrap();
    client
        .notifications()
        .idle_timeout(Duration::from_secs(5))
        .await
        .expect("notification after re-enable");

    mock.stop().await;
}

#[tokio::test]
async fn test_poll_mode_hit_state_clears_on_read() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();
    forward
        .attribute_idle_time_set(
            target,
            IdleTimeAttribute {
                enable: true,
                mode: IdleTableMode::Poll,
                ttl_query_interval_ms: 0,
            },
        )
        .await
        .unwrap();

    let key = forward
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:24")])
        .unwrap();
    let data = forward
        .make_data(&[DataTuple::new("port", 2u32)], Some("hit"))
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    // Force the hit bit, then sync it into the readable state.
    let force_active = forward
        .make_data(&[DataTuple::new(ENTRY_HIT_STATE, "ENTRY_ACTIVE")], None)
        .unwrap();
    forward
        .entry_mod(target, &[key.clone()], &[force_active])
        .await
        .unwrap();
    forward
        .operations_execute(target, TableOperationKind::UpdateHitState)
        .await
        .unwrap();
    let entries = forward
        .entry_get(target, Some(&[key.clone()]), true, None)
        .await
        .unwrap();
    assert_eq!(entries[0].1.get_str(ENTRY_HIT_STATE).unwrap(), "ENTRY_ACTIVE");

    // No traffic since the last sync: the next sync reads back idle.
    forward
        .operations_execute(target, TableOperationKind::UpdateHitState)
        .await
        .unwrap();
    let entries = forward
        .entry_get(target, Some(&[key]), true, None)
        .await
        .unwrap();
    assert_eq!(entries[0].1.get_str(ENTRY_HIT_STATE).unwrap(), "ENTRY_IDLE");

    mock.stop().await;
}

#[tokio::test]
async fn test_port_status_notifications_keep_order() {
    let (mock, client) = setup().await;

    mock.set_port_status(132, false).await;
    mock.set_port_status(132, true).await;
    mock.set_port_status(260, false).await;

    let queues = client.notifications();
    let first = queues.port_status(Duration::from_secs(2)).await.unwrap();
    assert_eq!((first.dev_port, first.up), (132, false));
    let second = queues.port_status(Duration::from_secs(2)).await.unwrap();
    assert_eq!((second.dev_port, second.up), (132, true));
    let third = queues.port_status(Duration::from_secs(2)).await.unwrap();
    assert_eq!((third.dev_port, third.up), (260, false));

    mock.stop().await;
}

#[tokio::test]
async fn test_closed_session_closes_queues() {
    let (mock, client) = setup().await;

    client.close().await;
    let err = client
        .notifications()
        .idle_timeout(Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::QueueClosed));

    mock.stop().await;
}

#[tokio::test]
async fn test_operations_execute_validates_support() {
    let (mock, client) = setup().await;
    let acl = client.table("acl").await.unwrap();

    // The acl table advertises no operations at all; the counter sync is
    // rejected before any RPC.
    let err = acl
        .operations_execute(Target::new(0), TableOperationKind::SyncCounters)
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::InvalidArgument(_)));

    mock.stop().await;
}
