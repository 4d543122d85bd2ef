#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use wsrelay_gateway::config::{self, DeliveryMode};
use wsrelay_gateway::realtime::QoS;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
  outbound_queu: 12 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.gateway.outbound_queue, 1024);
    assert_eq!(cfg.realtime.delivery, DeliveryMode::Reliable);
    assert_eq!(cfg.realtime.qos(), QoS::Reliable { timeout_ms: 1500 });
    assert_eq!(cfg.resources.default_page_limit, 10);
}

#[test]
fn lossy_delivery_maps_to_lossy_qos() {
    let cfg = config::load_from_str(
        r#"
version: 1
realtime:
  delivery: lossy
"#,
    )
    .expect("must parse");
    assert_eq!(cfg.realtime.qos(), QoS::Lossy);
}

#[test]
fn wrong_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        "version: 1\ngateway:\n  ping_interval_ms: 10\n",
        "version: 1\ngateway:\n  outbound_queue: 0\n",
        "version: 1\nrealtime:\n  send_timeout_ms: 600000\n",
        "version: 1\nrealtime:\n  send_timeout_ms: 0\n",
        "version: 1\nresources:\n  default_page_limit: 500\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{bad}");
    }
}

#[test]
fn shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../wsrelay.yaml");
    let cfg = config::load_from_file(path).expect("repo config must load");
    assert_eq!(cfg.realtime.delivery, DeliveryMode::Reliable);
}
