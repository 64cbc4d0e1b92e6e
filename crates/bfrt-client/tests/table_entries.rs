//! Table entry lifecycle conformance against the in-process runtime.
//!
//! Covers the core invariants: usage tracks adds minus deletes, read-back
//! equality for non-approximate fields, server-side masking of ternary and
//! LPM keys, duplicate/absent lifecycle errors, and batch atomicity modes.

use bfrt_client::{
    Atomicity, BfrtError, ClientInterface, ClientOptions, DataTuple, Key, KeyTuple, Table, Target,
};
use bfrt_harness::mock::{schemas, MockRuntime};
use bfrt_harness::specs::MeterSpec;

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

fn mac_key(table: &Table, mac: &str) -> Key {
    table
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", mac)])
        .expect("key build")
}

#[tokio::test]
async fn test_exact_entry_add_get_delete() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let key = mac_key(&forward, "22:22:22:22:22:22");
    let data = forward
        .make_data(&[DataTuple::new("port", 260u32)], Some("hit"))
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    assert_eq!(forward.usage_get(target).await.unwrap(), 1);

    let entries = forward
        .entry_get(target, Some(&[key.clone()]), false, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    let (read_key, read_data) = &entries[0];
    assert_eq!(read_key, &key);
    assert_eq!(read_data.action_name(), Some("SwitchIngress.hit"));
    assert_eq!(read_data.get_int("port").unwrap(), 260);

    // Delete everything in scope; the key is gone afterwards.
    forward.entry_del(target, None).await.unwrap();
    assert_eq!(forward.usage_get(target).await.unwrap(), 0);
    let err = forward
        .entry_get(target, Some(&[key]), false, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BfrtError::NotFound(_)));

    mock.stop().await;
}

#[tokio::test]
async fn test_duplicate_add_already_exists() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let key = mac_key(&forward, "aa:bb:cc:dd:ee:01");
    let data = forward
        .make_data(&[DataTuple::new("port", 4u32)], Some("hit"))
        .unwrap();
    forward
        .entry_add(target, &[key.clone()], &[data.clone()])
        .await
        .unwrap();

    let err = forward.entry_add(target, &[key], &[data]).await.unwrap_err();
    let subs = err.sub_errors();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].index, 0);
    assert_eq!(subs[0].code, tonic::Code::AlreadyExists);

    mock.stop().await;
}

#[tokio::test]
async fn test_mod_and_del_of_absent_entry_fail() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let key = mac_key(&forward, "aa:bb:cc:dd:ee:02");
    let data = forward
        .make_data(&[DataTuple::new("port", 4u32)], Some("hit"))
        .unwrap();

    let err = forward
        .entry_mod(target, &[key.clone()], &[data])
        .await
        .unwrap_err();
    assert_eq!(err.sub_errors()[0].code, tonic::Code::NotFound);

    let err = forward.entry_del(target, Some(&[key])).await.unwrap_err();
    assert_eq!(err.sub_errors()[0].code, tonic::Code::NotFound);

    mock.stop().await;
}

#[tokio::test]
async fn test_ternary_mask_applied_on_read_back() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let acl = client.table("acl").await.unwrap();

    // Value bits outside the mask are dropped by the device.
    let broad = acl
        .make_key(&[
            KeyTuple::ternary("hdr.ipv4.dst_addr", "10.10.5.5", "255.255.0.0"),
            KeyTuple::priority(2),
        ])
        .unwrap();
    let narrow = acl
        .make_key(&[
            KeyTuple::ternary("hdr.ipv4.dst_addr", "10.10.0.1", "255.255.255.255"),
            KeyTuple::priority(1),
        ])
        .unwrap();
    let to_a = acl
        .make_data(&[DataTuple::new("port", 1u32)], Some("acl_hit"))
        .unwrap();
    let to_b = acl
        .make_data(&[DataTuple::new("port", 2u32)], Some("acl_hit"))
        .unwrap();
    acl.entry_add(target, &[broad.clone(), narrow.clone()], &[to_a, to_b])
        .await
        .unwrap();

    let mut entries = acl.entry_get(target, None, false, None).await.unwrap();
    assert_eq!(entries.len(), 2);
    entries.sort_by_key(|(k, _)| k.priority());

    // Lower priority value wins conflict resolution; it is the /32 entry.
    assert_eq!(entries[0].0.priority(), Some(1));
    assert_eq!(entries[0].0, narrow.masked());
    assert_eq!(entries[0].1.get_int("port").unwrap(), 2);

    assert_eq!(entries[1].0.priority(), Some(2));
    assert_eq!(entries[1].0, broad.masked());
    assert_ne!(entries[1].0, broad, "unmasked bits must not round-trip");

    mock.stop().await;
}

#[tokio::test]
async fn test_lpm_prefix_applied_on_read_back() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let route = client.table("route").await.unwrap();

    let key = route
        .make_key(&[KeyTuple::lpm("hdr.ipv4.dst_addr", "10.10.5.5", 16)])
        .unwrap();
    let data = route
        .make_data(&[DataTuple::new("port", 8u32)], Some("route_hit"))
        .unwrap();
    route.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    // Point lookup with the unmasked key still resolves.
    let entries = route
        .entry_get(target, Some(&[key.clone()]), false, None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, key.masked());
    assert_ne!(entries[0].0, key);

    mock.stop().await;
}

#[tokio::test]
async fn test_wildcard_scan_matches_usage() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let keys: Vec<Key> = (0..10)
        .map(|i| mac_key(&forward, &format!("02:00:00:00:00:{i:02x}")))
        .collect();
    let datas: Vec<_> = (0..10)
        .map(|i| {
            forward
                .make_data(&[DataTuple::new("port", i as u32)], Some("hit"))
                .unwrap()
        })
        .collect();
    forward.entry_add(target, &keys, &datas).await.unwrap();

    let usage = forward.usage_get(target).await.unwrap();
    let entries = forward.entry_get(target, None, false, None).await.unwrap();
    assert_eq!(usage, 10);
    assert_eq!(entries.len() as u32, usage);

    // Scan order is unspecified; compare as sets.
    let mut scanned: Vec<&Key> = entries.iter().map(|(k, _)| k).collect();
    for key in &keys {
        assert!(scanned.contains(&key));
        scanned.retain(|k| *k != key);
    }

    mock.stop().await;
}

#[tokio::test]
async fn test_rollback_on_error_restores_usage() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let mut keys: Vec<Key> = (0..30)
        .map(|i| mac_key(&forward, &format!("02:00:00:00:01:{i:02x}")))
        .collect();
    // One intentional duplicate in the middle of the batch.
    keys[10] = keys[0].clone();
    let datas: Vec<_> = (0..30)
        .map(|_| {
            forward
                .make_data(&[DataTuple::new("port", 1u32)], Some("hit"))
                .unwrap()
        })
        .collect();

    let err = forward
        .entry_add_with_atomicity(target, &keys, &datas, Atomicity::RollbackOnError)
        .await
        .unwrap_err();
    assert_eq!(err.sub_errors().len(), 1);
    assert_eq!(err.sub_errors()[0].code, tonic::Code::AlreadyExists);
    assert_eq!(
        forward.usage_get(target).await.unwrap(),
        0,
        "rollback must restore the pre-batch usage"
    );

    let err = forward
        .entry_add_with_atomicity(target, &keys, &datas, Atomicity::ContinueOnError)
        .await
        .unwrap_err();
    let subs = err.sub_errors();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].index, 10);
    assert_eq!(
        forward.usage_get(target).await.unwrap(),
        29,
        "continue-on-error applies every unique key"
    );

    mock.stop().await;
}

#[tokio::test]
async fn test_default_entry_set_get_reset() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let data = forward.make_data(&[], Some("miss")).unwrap();
    forward.default_entry_set(target, &data).await.unwrap();
    let read = forward.default_entry_get(target, false).await.unwrap();
    assert_eq!(read.action_name(), Some("SwitchIngress.miss"));

    forward.default_entry_reset(target).await.unwrap();
    let read = forward.default_entry_get(target, false).await.unwrap();
    assert_eq!(read.action_name(), None);

    mock.stop().await;
}

#[tokio::test]
async fn test_projection_limits_returned_fields() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let forward = client.table("forward").await.unwrap();

    let key = mac_key(&forward, "02:00:00:00:02:01");
    let data = forward
        .make_data(
            &[
                DataTuple::new("port", 3u32),
                DataTuple::new("$COUNTER_SPEC_BYTES", 4096u64),
                DataTuple::new("$COUNTER_SPEC_PKTS", 32u64),
            ],
            Some("hit"),
        )
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();

    let projection = forward
        .make_data_get(
            &[
                DataTuple::select("$COUNTER_SPEC_BYTES"),
                DataTuple::select("$COUNTER_SPEC_PKTS"),
            ],
            None,
        )
        .unwrap();
    let entries = forward
        .entry_get(target, Some(&[key]), true, Some(&projection))
        .await
        .unwrap();
    let (_, read) = &entries[0];
    assert_eq!(read.get_int("$COUNTER_SPEC_BYTES").unwrap(), 4096);
    assert_eq!(read.get_int("$COUNTER_SPEC_PKTS").unwrap(), 32);
    assert!(!read.has_field("port"));

    mock.stop().await;
}

#[tokio::test]
async fn test_meter_spec_round_trip_within_tolerance() {
    let (mock, client) = setup().await;
    let target = Target::new(0);
    let meter = client.table("meter").await.unwrap();

    let key = meter.make_key(&[KeyTuple::exact("$METER_INDEX", 5u32)]).unwrap();
    let spec = MeterSpec {
        cir_kbps: 1000,
        pir_kbps: 2000,
        cbs_kbits: 128,
        pbs_kbits: 256,
    };
    let data = meter.make_data(&spec.tuples(), None).unwrap();
    meter.entry_mod(target, &[key.clone()], &[data]).await.unwrap();

    let entries = meter
        .entry_get(target, Some(&[key]), true, None)
        .await
        .unwrap();
    let read = MeterSpec::from_data(&entries[0].1).unwrap();
    assert!(spec.approx_eq(&read), "read-back {read:?} outside tolerance");

    mock.stop().await;
}

#[tokio::test]
async fn test_usage_is_scoped_per_pipe_target() {
    let (mock, client) = setup().await;
    let forward = client.table("forward").await.unwrap();
    let pipe0 = Target::new(0).with_pipe(0);
    let pipe1 = Target::new(0).with_pipe(1);

    let key = mac_key(&forward, "02:00:00:00:03:01");
    let data = forward
        .make_data(&[DataTuple::new("port", 1u32)], Some("hit"))
        .unwrap();
    forward.entry_add(pipe0, &[key.clone()], &[data]).await.unwrap();

    assert_eq!(forward.usage_get(pipe0).await.unwrap(), 1);
    assert_eq!(forward.usage_get(pipe1).await.unwrap(), 0);
    assert_eq!(forward.usage_get(Target::new(0)).await.unwrap(), 0);

    mock.stop().await;
}

#[tokio::test]
async fn test_build_time_validation_fails_before_rpc() {
    let (mock, client) = setup().await;
    let mut forward = client.table("forward").await.unwrap();

    // Unknown table.
    let err = client.table("nonexistent").await.unwrap_err();
    assert!(matches!(err, BfrtError::NotFound(_)));

    // Ambiguous suffix: both programs would be needed for ambiguity, so use
    // an unknown key field and action instead.
    assert!(forward
        .make_key(&[KeyTuple::exact("hdr.bogus", 1u32)])
        .is_err());
    assert!(forward
        .make_data(&[DataTuple::new("port", 1u32)], Some("bogus_action"))
        .is_err());
    assert!(forward.key_field_annotation_add("hdr.bogus", "mac").is_err());
    assert!(forward
        .key_field_annotation_add("hdr.ethernet.dst_addr", "nonsense")
        .is_err());
    forward
        .key_field_annotation_add("hdr.ethernet.dst_addr", "mac")
        .unwrap();

    mock.stop().await;
}
