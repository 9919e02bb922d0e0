use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HeatwallError::render_precondition("x")
            .to_string()
            .contains("render precondition failed:")
    );
    assert!(HeatwallError::write("x").to_string().contains("write error:"));
    assert!(
        HeatwallError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        HeatwallError::from(FetchError::Transport("x".to_string()))
            .to_string()
            .contains("fetch error:")
    );
    assert!(
        HeatwallError::from(PlatformError::Unsupported {
            platform: "plan9".to_string()
        })
        .to_string()
        .contains("wallpaper error:")
    );
}

#[test]
fn query_errors_are_joined() {
    let err = FetchError::Query(vec!["first".to_string(), "second".to_string()]);
    assert_eq!(err.to_string(), "api reported errors: first; second");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HeatwallError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
