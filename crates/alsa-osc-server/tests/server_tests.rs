//! OSC server integration tests
//!
//! Each test binds a real UDP server on localhost, sends OSC packets with
//! rosc and observes the calls reaching a recording actuator.

use alsa_osc_core::{ChannelSelector, Level, Root, RouteTable, Value};
use alsa_osc_server::server::MAX_IN_FLIGHT;
use alsa_osc_server::{OscSender, OscServer, OscServerConfig, ServerError, ServerStats};
use alsa_osc_test_utils::{
    fixture_snapshot, usb_codec_pcm, wait_for, ActuatorCall, RecordingActuator, DEFAULT_TIMEOUT,
};
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const PCM: &str = "/alsa/interface/USB Audio CODEC/PCM";

struct TestServer {
    server: Arc<OscServer>,
    actuator: Arc<RecordingActuator>,
    sender: OscSender,
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let routes = Arc::new(RouteTable::build(&Root::default(), &fixture_snapshot()));
        let actuator = Arc::new(RecordingActuator::new());

        let server = OscServer::bind(
            &OscServerConfig::new("127.0.0.1", 0),
            routes,
            actuator.clone(),
        )
        .await
        .expect("bind test server");
        let server = Arc::new(server);
        let addr = server.local_addr().unwrap();

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let task_server = Arc::clone(&server);
        let handle = tokio::spawn(async move {
            task_server.serve(&mut shutdown_rx).await.unwrap();
        });

        let sender = OscSender::connect(&addr.to_string()).await.unwrap();

        Self {
            server,
            actuator,
            sender,
            shutdown_tx,
            handle,
        }
    }

    async fn wait_for_calls(&self, n: usize) -> bool {
        let actuator = Arc::clone(&self.actuator);
        wait_for(move || actuator.call_count() >= n, DEFAULT_TIMEOUT).await
    }

    async fn wait_for_stats<F: Fn(ServerStats) -> bool>(&self, check: F) -> bool {
        let server = Arc::clone(&self.server);
        wait_for(move || check(server.stats()), DEFAULT_TIMEOUT).await
    }

    async fn stop(self) {
        let _ = self.shutdown_tx.send(()).await;
        self.handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_plain_volume_end_to_end() {
    let test = TestServer::start().await;

    test.sender
        .send_args(PCM, vec![OscType::Float(0.86)])
        .await
        .unwrap();

    assert!(test.wait_for_calls(1).await, "actuator was not called");
    assert_eq!(
        test.actuator.last_call(),
        Some(ActuatorCall::Volume {
            target: usb_codec_pcm().target(),
            channel: ChannelSelector::All,
            level: Level::Percent(86),
        })
    );

    test.stop().await;
}

#[tokio::test]
async fn test_decibel_channel_end_to_end() {
    let test = TestServer::start().await;

    test.sender
        .send(&format!("{}/dB/CH1", PCM), &Value::Float(-18.0))
        .await
        .unwrap();

    assert!(test.wait_for_calls(1).await);
    assert_eq!(
        test.actuator.last_call(),
        Some(ActuatorCall::Volume {
            target: usb_codec_pcm().target(),
            channel: ChannelSelector::Channel(1),
            level: Level::Decibel(-18.0),
        })
    );

    test.stop().await;
}

#[tokio::test]
async fn test_mute_end_to_end() {
    let test = TestServer::start().await;

    test.sender
        .send_args(&format!("{}/mute", PCM), vec![OscType::Bool(true)])
        .await
        .unwrap();

    assert!(test.wait_for_calls(1).await);
    assert_eq!(
        test.actuator.calls(),
        vec![ActuatorCall::Mute {
            target: usb_codec_pcm().target(),
            mute: true,
        }]
    );

    test.stop().await;
}

#[tokio::test]
async fn test_bundle_messages_all_dispatched() {
    let test = TestServer::start().await;

    let message = |addr: String, arg: OscType| {
        OscPacket::Message(OscMessage {
            addr,
            args: vec![arg],
        })
    };
    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime::from((0, 1)),
        content: vec![
            message(format!("{}/CH0", PCM), OscType::Float(0.25)),
            message(format!("{}/CH1", PCM), OscType::Float(0.75)),
            message(
                "/alsa/interface/USB Audio CODEC/Mic/rec".to_string(),
                OscType::Int(1),
            ),
        ],
    });
    test.sender.send_packet(&bundle).await.unwrap();

    assert!(test.wait_for_calls(3).await);
    let calls = test.actuator.calls();
    assert!(calls.contains(&ActuatorCall::Volume {
        target: usb_codec_pcm().target(),
        channel: ChannelSelector::Channel(0),
        level: Level::Percent(25),
    }));
    assert!(calls.contains(&ActuatorCall::Volume {
        target: usb_codec_pcm().target(),
        channel: ChannelSelector::Channel(1),
        level: Level::Percent(75),
    }));
    assert!(calls
        .iter()
        .any(|c| matches!(c, ActuatorCall::Record { armed: true, .. })));

    test.stop().await;
}

#[tokio::test]
async fn test_bundle_applied_in_order() {
    let test = TestServer::start().await;

    let content = (0..=10)
        .map(|step| {
            OscPacket::Message(OscMessage {
                addr: PCM.to_string(),
                args: vec![OscType::Float(step as f32 / 10.0)],
            })
        })
        .collect();
    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime::from((0, 1)),
        content,
    });
    test.sender.send_packet(&bundle).await.unwrap();

    assert!(test.wait_for_calls(11).await);
    let levels: Vec<Level> = test
        .actuator
        .calls()
        .into_iter()
        .map(|call| match call {
            ActuatorCall::Volume { level, .. } => level,
            other => panic!("unexpected call {:?}", other),
        })
        .collect();
    let expected: Vec<Level> = (0..=10).map(|step| Level::Percent(step * 10)).collect();
    assert_eq!(levels, expected);

    test.stop().await;
}

#[tokio::test]
async fn test_burst_beyond_in_flight_limit_is_fully_applied() {
    let test = TestServer::start().await;
    let burst = MAX_IN_FLIGHT * 2;

    for _ in 0..burst {
        test.sender
            .send_args(&format!("{}/mute", PCM), vec![OscType::Bool(true)])
            .await
            .unwrap();
        tokio::task::yield_now().await;
    }

    assert!(
        test.wait_for_stats(|s| s.routed == burst as u64).await,
        "stats: {:?}",
        test.server.stats()
    );
    assert_eq!(test.actuator.call_count(), burst);

    test.stop().await;
}

#[tokio::test]
async fn test_unmapped_and_malformed_are_counted() {
    let test = TestServer::start().await;

    test.sender
        .send_args("/alsa/interface/Nope/Master", vec![OscType::Float(0.5)])
        .await
        .unwrap();
    test.sender
        .send_args(PCM, vec![OscType::String("loud".to_string())])
        .await
        .unwrap();

    assert!(
        test.wait_for_stats(|s| s.unmapped == 1 && s.rejected == 1)
            .await,
        "stats: {:?}",
        test.server.stats()
    );
    assert_eq!(test.actuator.call_count(), 0);

    test.stop().await;
}

#[tokio::test]
async fn test_server_survives_garbage_and_failures() {
    let test = TestServer::start().await;

    // Not an OSC packet
    let raw = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    raw.send_to(b"\x01\x02\x03", test.server.local_addr().unwrap())
        .unwrap();
    assert!(test.wait_for_stats(|s| s.decode_errors == 1).await);

    test.actuator.fail_with("device removed");
    test.sender
        .send_args(PCM, vec![OscType::Float(0.5)])
        .await
        .unwrap();
    assert!(test.wait_for_stats(|s| s.failed == 1).await);

    test.actuator.recover();
    test.sender
        .send_args(PCM, vec![OscType::Float(0.5)])
        .await
        .unwrap();
    assert!(test.wait_for_calls(1).await);
    assert!(test.wait_for_stats(|s| s.routed == 1).await);

    test.stop().await;
}

#[tokio::test]
async fn test_bind_conflict_is_fatal() {
    let taken = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let result = OscServer::bind(
        &OscServerConfig::new("127.0.0.1", port),
        Arc::new(RouteTable::default()),
        Arc::new(RecordingActuator::new()),
    )
    .await;

    assert!(matches!(result, Err(ServerError::Bind { .. })));
}
