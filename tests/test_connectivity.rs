mod common;

use mcp_mixmaster::connectivity::{Connectivity, TcpProbe};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

fn addr_of(base_url: &str) -> String {
    TcpProbe::for_base_url(base_url)
        .expect("base url parses")
        .addr()
        .to_string()
}

#[test]
fn test_scheme_default_ports() {
    assert_eq!(addr_of("https://generativelanguage.googleapis.com"), "generativelanguage.googleapis.com:443");
    assert_eq!(addr_of("http://localhost"), "localhost:80");
}

#[test]
fn test_explicit_port() {
    assert_eq!(addr_of("https://example.com:8443/"), "example.com:8443");
    assert_eq!(addr_of("http://127.0.0.1:8089"), "127.0.0.1:8089");
}

#[test]
fn test_ipv6_host_is_bracketed() {
    assert_eq!(addr_of("https://[::1]"), "[::1]:443");
    assert_eq!(addr_of("http://[::1]:9000/v1"), "[::1]:9000");
}

#[test]
fn test_userinfo_path_and_query_are_dropped() {
    assert_eq!(addr_of("https://user:pw@example.com/v1"), "example.com:443");
    assert_eq!(addr_of("https://example.com?x=1"), "example.com:443");
    assert_eq!(addr_of("https://example.com/v1beta/models#frag"), "example.com:443");
}

#[test]
fn test_unparsable_url_is_rejected() {
    assert!(TcpProbe::for_base_url("generativelanguage.googleapis.com").is_err());
    assert!(TcpProbe::for_base_url("").is_err());
}

#[tokio::test]
async fn test_online_when_listener_accepts() {
    common::init_test_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let probe = TcpProbe::for_base_url(&format!("http://127.0.0.1:{}", port)).unwrap();
    assert!(probe.is_online().await);

    // Answer is reused while fresh, so a closed listener is not noticed yet
    drop(listener);
    assert!(probe.is_online().await);
}

#[tokio::test]
async fn test_offline_when_port_is_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let probe = TcpProbe::new(format!("127.0.0.1:{}", port));
    assert!(!probe.is_online().await);
}
