use super::*;

// =============================================================
// validate_base_url
// =============================================================

#[test]
fn accepts_http_and_https() {
    assert_eq!(validate_base_url("http://127.0.0.1:3000/api/auth").ok().as_deref(), Some("http://127.0.0.1:3000/api/auth"));
    assert_eq!(
        validate_base_url("https://ep-x.neonauth.tech/neondb/auth/").ok().as_deref(),
        Some("https://ep-x.neonauth.tech/neondb/auth")
    );
}

#[test]
fn rejects_other_schemes() {
    assert!(matches!(validate_base_url("ftp://example.com"), Err(CliError::InvalidBaseUrl(_))));
    assert!(matches!(validate_base_url("example.com/api/auth"), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn rejects_missing_host() {
    assert!(matches!(validate_base_url("https://"), Err(CliError::InvalidBaseUrl(_))));
    assert!(matches!(validate_base_url("http:///api/auth"), Err(CliError::InvalidBaseUrl(_))));
}

// =============================================================
// origin_of
// =============================================================

#[test]
fn origin_drops_path() {
    assert_eq!(origin_of("http://localhost:3000/api/auth"), "http://localhost:3000");
    assert_eq!(origin_of("https://ep-x.neonauth.tech"), "https://ep-x.neonauth.tech");
}

#[test]
fn transport_uses_explicit_origin() {
    let transport = ReqwestTransport::new("http://localhost:3000/api/auth", Some("http://app.local/"));
    assert!(transport.is_ok());
}

#[test]
fn transport_rejects_bad_base_url() {
    assert!(ReqwestTransport::new("localhost:3000", None).is_err());
}
