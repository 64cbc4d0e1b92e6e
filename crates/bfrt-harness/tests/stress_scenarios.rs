//! Multi-client stress scenarios against the in-process runtime: background
//! writers racing repeated warm inits, a schema reader, and clean shutdown
//! with first-error propagation. Also exercises the fixture's cleanup
//! obligation end to end.

use std::sync::Arc;
use std::time::Duration;

use bfrt_client::{
    BfrtError, ClientInterface, ClientOptions, DataTuple, KeyTuple, PipelineConfig, Target,
};
use bfrt_harness::mock::{schemas, MockRuntime};
use bfrt_harness::stress::{bind_with_retry, reconfigurer_loop, schema_reader_loop};
use bfrt_harness::{Supervisor, TestContext, TestFixture, TestParams};

async fn start_mock() -> MockRuntime {
    bfrt_harness::init_logging();
    let mock = MockRuntime::start().await.expect("mock runtime");
    mock.install_programs(&[("demo".to_string(), schemas::demo_program_blob())])
        .await
        .expect("install demo program");
    mock
}

async fn connect(mock: &MockRuntime, client_id: u32) -> ClientInterface {
    ClientInterface::connect(ClientOptions::new(mock.endpoint(), client_id, 0))
        .await
        .expect("connect")
}

/// Writer liveness: bind with retry, then push entries tolerating every
/// table-level error while reconfigurations tear the device state away.
async fn writer_loop(
    client: Arc<ClientInterface>,
    worker: u32,
    cancel: tokio_util::sync::CancellationToken,
) -> anyhow::Result<u64> {
    let target = Target::new(0);
    let mut written = 0u64;
    let mut serial = 0u32;
    while !cancel.is_cancelled() {
        if !bind_with_retry(&client, "demo", &cancel).await? {
            break;
        }
        let forward = match client.table("forward").await {
            Ok(t) => t,
            Err(_) => continue,
        };
        for _ in 0..8 {
            serial += 1;
            let mac = format!("02:{worker:02x}:00:00:{:02x}:{:02x}", serial >> 8, serial & 0xFF);
            let result = async {
                let key = forward.make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", mac.as_str())])?;
                let data = forward.make_data(&[DataTuple::new("port", 4u32)], Some("hit"))?;
                forward.entry_add(target, &[key], &[data]).await
            }
            .await;
            match result {
                Ok(()) => written += 1,
                // Any table-level error is tolerated; liveness is the point.
                Err(BfrtError::Transport(_)) => anyhow::bail!("transport lost"),
                Err(_) => {}
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    Ok(written)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_writers_survive_repeated_warm_inits() {
    let mock = start_mock().await;
    let reconf_client = connect(&mock, 10).await;
    let reader_client = connect(&mock, 11).await;
    let writer_a = Arc::new(connect(&mock, 12).await);
    let writer_b = Arc::new(connect(&mock, 13).await);

    let mut supervisor = Supervisor::new();
    let token = supervisor.stop_token();

    {
        let cancel = token.clone();
        let client = writer_a.clone();
        supervisor.spawn("writer-a", async move {
            writer_loop(client, 0xA, cancel).await.map(|_| ())
        });
    }
    {
        let cancel = token.clone();
        let client = writer_b.clone();
        supervisor.spawn("writer-b", async move {
            writer_loop(client, 0xB, cancel).await.map(|_| ())
        });
    }
    {
        let cancel = token.clone();
        supervisor.spawn("reader", async move {
            schema_reader_loop(&reader_client, Duration::from_millis(10), &cancel)
                .await
                .map(|_| ())
        });
    }

    // The reconfigurer drives five full cycles in the foreground; every push
    // must observe WARM_INIT_FINISHED.
    let configs = vec![PipelineConfig::new("demo", schemas::demo_program_blob())];
    let no_stop = tokio_util::sync::CancellationToken::new();
    reconfigurer_loop(&reconf_client, "/artifacts", &configs, 5, &no_stop)
        .await
        .expect("reconfigurer cycles");

    supervisor.stop_and_join().await.expect("no worker errors");
    mock.stop().await;
}

#[tokio::test]
async fn test_bind_retry_breaks_on_already_bound() {
    let mock = start_mock().await;
    let client = connect(&mock, 1).await;
    let token = tokio_util::sync::CancellationToken::new();

    assert!(bind_with_retry(&client, "demo", &token).await.unwrap());
    // A second bind reports ALREADY_EXISTS, which the loop treats as done.
    assert!(bind_with_retry(&client, "demo", &token).await.unwrap());

    mock.stop().await;
}

#[tokio::test]
async fn test_fixture_cleans_up_tracked_entries() {
    let mock = start_mock().await;
    let params = {
        let mut p = TestParams::default();
        p.grpc_addr = mock.endpoint();
        p.test_seed = Some(1234);
        p
    };
    let ctx = Arc::new(TestContext::new(params));

    let fixture = TestFixture::create(ctx.clone(), 1).await.unwrap();
    fixture.client().bind_pipeline_config("demo").await.unwrap();
    let target = Target::new(0);
    let forward = fixture.table("forward").await.unwrap();

    let mac = ctx.random_mac();
    let key = forward
        .make_key(&[KeyTuple::exact("hdr.ethernet.dst_addr", mac.as_str())])
        .unwrap();
    let data = forward
        .make_data(&[DataTuple::new("port", 4u32)], Some("hit"))
        .unwrap();
    forward.entry_add(target, &[key.clone()], &[data]).await.unwrap();
    fixture.track_entry(&forward, target, key);
    assert_eq!(forward.usage_get(target).await.unwrap(), 1);

    fixture.teardown().await.expect("clean teardown");

    // A second client observes the cleanup.
    let observer = connect(&mock, 2).await;
    let forward = observer.table_from("demo", "forward").await.unwrap();
    assert_eq!(forward.usage_get(target).await.unwrap(), 0);

    mock.stop().await;
}

#[tokio::test]
async fn test_teardown_flags_unconsumed_stream_errors() {
    let mock = start_mock().await;
    let params = {
        let mut p = TestParams::default();
        p.grpc_addr = mock.endpoint();
        p.test_seed = Some(99);
        p
    };
    let ctx = Arc::new(TestContext::new(params));

    let fixture = TestFixture::create(ctx, 1).await.unwrap();
    fixture.client().bind_pipeline_config("demo").await.unwrap();

    // Replace the pipeline from another client; the fixture's client gets
    // kicked and a CANCELLED error lands in its queue.
    let other = connect(&mock, 2).await;
    other
        .pipeline_config_set(
            bfrt_client::PipelineAction::VerifyAndWarmInitBeginAndEnd,
            "/artifacts",
            &[PipelineConfig::new("other", schemas::aux_program_blob())],
        )
        .await
        .unwrap();

    // Give the kick a moment to arrive, then tear down without consuming.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let err = fixture.teardown().await.unwrap_err();
    assert!(err.to_string().contains("unconsumed stream errors"));

    mock.stop().await;
}
