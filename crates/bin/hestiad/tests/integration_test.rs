//! End-to-end tests for the full hestiad stack.
//!
//! Each test runs a discovery session against the virtual bridge and probe,
//! then exercises the real axum router via `tower::ServiceExt::oneshot`.
//! No TCP port is bound.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hestia_adapter_http_axum::router;
use hestia_adapter_http_axum::state::AppState;
use hestia_adapter_virtual::{KeyPress, VirtualBridge, VirtualMediaKeys, VirtualProbe};
use hestia_app::discovery::{DiscoveryConfig, DiscoveryService};
use hestia_app::home::Home;
use hestia_app::ports::BridgeLightState;

type TestHome = Home<VirtualBridge, VirtualMediaKeys>;

fn lan(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 1, last))
}

fn session() -> DiscoveryConfig {
    DiscoveryConfig {
        timeout: Duration::from_secs(2),
        probe_timeout: Duration::from_millis(200),
        ..DiscoveryConfig::default()
    }
}

/// A home discovered on a LAN with one bridge (two lights) and one web host.
async fn discovered() -> (Arc<TestHome>, Arc<VirtualBridge>) {
    let bridge = Arc::new(
        VirtualBridge::new()
            .with_bridge(lan(10), "001788fffe4a2b3c", "Living Room Bridge")
            .with_light("1", "Desk Lamp")
            .with_light("2", "Hall Ceiling"),
    );
    let probe = Arc::new(VirtualProbe::new().with_open(SocketAddr::new(lan(3), 80)));
    let home = Arc::new(Home::new(Arc::clone(&bridge), VirtualMediaKeys::default()));

    let discovery = DiscoveryService::new(Arc::clone(&bridge), probe, session());
    let report = home.discover(&discovery).await;
    assert!(report.bridge.is_some());
    assert!(!report.bootstrapped);

    (home, bridge)
}

/// A home where nothing answered, so the virtual devices were seeded.
async fn bootstrapped() -> Arc<TestHome> {
    let bridge = Arc::new(VirtualBridge::new());
    let home = Arc::new(Home::new(Arc::clone(&bridge), VirtualMediaKeys::default()));
    let discovery = DiscoveryService::new(bridge, Arc::new(VirtualProbe::new()), session());
    let report = home.discover(&discovery).await;
    assert!(report.bootstrapped);
    home
}

async fn call(
    home: &Arc<TestHome>,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let app = router::build(AppState::from_arc(Arc::clone(home)));
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn command(home: &Arc<TestHome>, text: &str) -> String {
    let body = serde_json::json!({ "text": text }).to_string();
    let (status, json) = call(home, "POST", "/api/command", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["handled"], true, "'{text}' should be handled");
    json["result"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_register_bridge_lights_then_network_hosts() {
    let (home, _) = discovered().await;

    let (status, devices) = call(&home, "GET", "/api/devices", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = devices
        .as_array()
        .unwrap()
        .iter()
        .map(|device| device["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        [
            "bridge_desk_lamp",
            "bridge_hall_ceiling",
            "network_device_192_168_1_3"
        ]
    );
}

#[tokio::test]
async fn should_fall_back_to_virtual_devices_when_nothing_answers() {
    let home = bootstrapped().await;

    let (_, devices) = call(&home, "GET", "/api/devices?kind=light", None).await;

    assert_eq!(devices.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_drive_bridge_lights_from_text() {
    let (home, bridge) = discovered().await;

    let result = command(&home, "set the lights to red").await;

    assert_eq!(
        result,
        "✓ Desk Lamp: color set to red\n✓ Hall Ceiling: color set to red"
    );
    assert_eq!(
        bridge.light_state("1"),
        Some(BridgeLightState {
            xy: Some([0.7, 0.3]),
            ..BridgeLightState::default()
        })
    );
}

#[tokio::test]
async fn should_isolate_unmapped_color_per_device() {
    let (home, bridge) = discovered().await;

    let result = command(&home, "lights orange").await;

    assert!(result.contains("✗ Desk Lamp: unknown color: orange"));
    assert!(result.contains("✗ Hall Ceiling: unknown color: orange"));
    assert!(bridge.updates().is_empty());
}

#[tokio::test]
async fn should_press_media_keys_for_virtual_player() {
    let home = bootstrapped().await;

    assert_eq!(
        command(&home, "play some music").await,
        "✓ Virtual Music Player: playback started"
    );
    command(&home, "volume 30").await;

    let (_, status) = call(
        &home,
        "GET",
        "/api/status?device=Virtual%20Music%20Player",
        None,
    )
    .await;
    assert_eq!(
        status["status"],
        "Virtual Music Player: media (virtual) - playing, volume 30%"
    );
    assert_eq!(
        home.dispatcher().media().presses(),
        [KeyPress::PlayPause, KeyPress::Volume(30)]
    );
}

#[tokio::test]
async fn should_report_unhandled_text() {
    let home = bootstrapped().await;

    let (status, json) = call(
        &home,
        "POST",
        "/api/command",
        Some(r#"{"text":"what's the weather"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["handled"], false);
    assert!(json["result"].is_null());
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_activate_movie_mode_on_bridge_and_report_missing_player() {
    let (home, bridge) = discovered().await;

    let (status, json) = call(&home, "POST", "/api/scenes/movie_mode/activate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["complete"], false);
    let result = json["result"].as_str().unwrap();
    assert!(result.starts_with("Scene 'movie_mode' activated:"));
    assert!(result.contains("✓ Desk Lamp: brightness set to 20%"));
    assert!(result.contains("✓ Hall Ceiling: color set to blue"));
    assert!(result.contains("✗ media volume 70%: no media device matches 'all'"));
    assert_eq!(
        bridge.light_state("2"),
        Some(BridgeLightState {
            on: None,
            bri: Some(50),
            xy: Some([0.1, 0.1]),
        })
    );
}

#[tokio::test]
async fn should_store_and_replay_user_scene() {
    let home = bootstrapped().await;
    let scene = r#"{"actions":[
        {"type":"light","command":"on","target":"bedroom"},
        {"type":"light","command":"color","color":"pink","target":"bedroom"}
    ]}"#;

    let (status, _) = call(&home, "PUT", "/api/scenes/night", Some(scene)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = call(&home, "POST", "/api/scenes/night/activate", None).await;
    assert_eq!(json["complete"], true);
    let (_, status) = call(&home, "GET", "/api/status?device=bedroom%20light", None).await;
    assert_eq!(
        status["status"],
        "Bedroom Light: light (virtual) - on, 80%, pink"
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_scene() {
    let home = bootstrapped().await;

    let (status, json) = call(&home, "POST", "/api/scenes/disco/activate", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "scene 'disco' not found");
}
