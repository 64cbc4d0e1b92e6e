//! Reserved-table helper conformance: PRE trees with incremental membership,
//! mirror sessions, and packet-generator configuration.

use bfrt_client::mirror::{Mirror, MirrorDirection, MirrorSessionConfig};
use bfrt_client::pktgen::{Arch, Pktgen, PktgenAppConfig, PktgenTrigger};
use bfrt_client::pre::{MgidMember, Multicast};
use bfrt_client::{BfrtError, ClientInterface, ClientOptions, Target};
use bfrt_harness::mock::{schemas, MockRuntime};
use bfrt_harness::ports::{make_port, pktgen_port};

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

#[tokio::test]
async fn test_multicast_tree_and_incremental_membership() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let pre = Multicast::new(&client).await.unwrap();

    pre.node_add(target, 1, 10, &[make_port(0, 4), make_port(0, 8)], &[])
        .await
        .unwrap();
    pre.node_add(target, 2, 10, &[make_port(1, 4)], &[]).await.unwrap();

    pre.mgid_add(target, 100, &[MgidMember::new(1)]).await.unwrap();
    assert_eq!(pre.mgid_members_get(target, 100).await.unwrap(), vec![1]);

    // Membership grows and shrinks through incremental modifies.
    pre.mgid_members_add(target, 100, &[MgidMember::with_xid(2, 7)])
        .await
        .unwrap();
    assert_eq!(pre.mgid_members_get(target, 100).await.unwrap(), vec![1, 2]);

    pre.mgid_members_del(target, 100, &[MgidMember::new(1)])
        .await
        .unwrap();
    assert_eq!(pre.mgid_members_get(target, 100).await.unwrap(), vec![2]);

    pre.mgid_del(target, 100).await.unwrap();
    pre.node_del(target, 1).await.unwrap();
    pre.node_del(target, 2).await.unwrap();

    mock.stop().await;
}

#[tokio::test]
async fn test_ecmp_lag_and_prune_round_trip() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let pre = Multicast::new(&client).await.unwrap();

    pre.node_add(target, 5, 20, &[make_port(0, 0)], &[]).await.unwrap();
    pre.ecmp_add(target, 1, &[5]).await.unwrap();

    // LAG and prune memberships read back in index order.
    let lag_ports = vec![make_port(0, 4), make_port(1, 4), make_port(2, 4)];
    pre.lag_set(target, 3, &lag_ports).await.unwrap();
    assert_eq!(pre.lag_get(target, 3).await.unwrap(), lag_ports);

    let prune_ports = vec![make_port(0, 8), make_port(1, 8)];
    pre.prune_set(target, 9, &prune_ports).await.unwrap();
    assert_eq!(pre.prune_get(target, 9).await.unwrap(), prune_ports);

    pre.ecmp_del(target, 1).await.unwrap();

    mock.stop().await;
}

#[tokio::test]
async fn test_mirror_session_round_trip() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let mirror = Mirror::new(&client).await.unwrap();

    let config = MirrorSessionConfig {
        session_id: 1,
        direction: MirrorDirection::Egress,
        ucast_egress_port: make_port(0, 12),
        max_pkt_len: 128,
        enable: true,
    };
    mirror.session_add(target, &config).await.unwrap();

    let read = mirror.session_get(target, 1).await.unwrap();
    assert_eq!(read.direction, MirrorDirection::Egress);
    assert_eq!(read.ucast_egress_port, make_port(0, 12));
    assert_eq!(read.max_pkt_len, 128);
    assert!(read.enable);

    mirror.session_del(target, 1).await.unwrap();
    let err = mirror.session_get(target, 1).await.unwrap_err();
    assert!(matches!(err, BfrtError::NotFound(_)));

    mock.stop().await;
}

#[tokio::test]
async fn test_pktgen_timer_app_configuration() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let pktgen = Pktgen::new(&client, Arch::Tofino).await.unwrap();

    pktgen
        .port_enable(target, pktgen_port(Arch::Tofino, 0))
        .await
        .unwrap();

    // Payload placed at the documented buffer offset.
    let payload = vec![0xABu8; 64];
    pktgen.buffer_write(target, 144, &payload).await.unwrap();

    let config = PktgenAppConfig {
        app_id: 1,
        trigger: PktgenTrigger::Timer { timer_nanosec: 100 },
        batch_count: 4,
        packets_per_batch: 2,
        pkt_buffer_offset: 144,
        pkt_len: 64,
        source_port: pktgen_port(Arch::Tofino, 0),
        enable: true,
    };
    pktgen.app_configure(target, &config).await.unwrap();
    assert_eq!(Pktgen::packets_per_burst(&config), 8);

    // The configuration reads back through the app table.
    let app_cfg = client.table("tf1.pktgen.app_cfg").await.unwrap();
    let key = app_cfg
        .make_key(&[bfrt_client::KeyTuple::exact("app_id", 1u8)])
        .unwrap();
    let entries = app_cfg
        .entry_get(target, Some(&[key]), false, None)
        .await
        .unwrap();
    let (_, data) = &entries[0];
    assert_eq!(data.action_name(), Some("trigger_timer_periodic"));
    assert_eq!(data.get_int("timer_nanosec").unwrap(), 100);
    assert_eq!(data.get_int("batch_count_cfg").unwrap(), 4);
    assert_eq!(data.get_int("packets_per_batch_cfg").unwrap(), 2);

    pktgen.app_disable(target, 1).await.unwrap();

    mock.stop().await;
}
