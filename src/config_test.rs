use super::*;

#[test]
fn default_uses_local_host_and_no_deadlines() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.host, "localhost:1234");
    assert_eq!(cfg.timeout, None);
    assert_eq!(cfg.connect_timeout, None);
}

#[test]
fn builders_override_fields() {
    let cfg = ClientConfig::default()
        .with_host("10.0.0.5:8080")
        .with_timeout(Duration::from_secs(30))
        .with_connect_timeout(Duration::from_secs(2));
    assert_eq!(
        cfg,
        ClientConfig {
            host: "10.0.0.5:8080".to_owned(),
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(2)),
        }
    );
}
