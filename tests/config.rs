use eventdesk::domain::PageSize;
use eventdesk::{initialize, AppError, Config};
use std::io::Write;
use std::time::Duration;

#[test]
fn loads_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_url = "http://localhost:8080/api"
search_debounce_ms = 150
default_page_size = 50
stale_time_secs = 30
gc_time_secs = 600
trace_level = "eventdesk=debug"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.api_url, "http://localhost:8080/api");
    assert_eq!(config.search_debounce(), Duration::from_millis(150));
    assert_eq!(config.page_size().unwrap(), PageSize::Fifty);
    assert_eq!(config.stale_time(), Duration::from_secs(30));
    assert_eq!(config.gc_time(), Duration::from_secs(600));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.trace_level.as_deref(), Some("eventdesk=debug"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = ").unwrap();
    assert!(matches!(Config::from_file(file.path()), Err(AppError::ConfigParse(_))));
}

#[test]
fn initialize_rejects_unusable_api_url() {
    let config = Config::new("ftp://example.com");
    assert!(matches!(initialize(&config), Err(AppError::Config(_))));
}

#[tokio::test]
async fn initialized_desk_shares_one_cache() {
    let desk = initialize(&Config::new("http://localhost:8080")).unwrap();
    let first = desk.table_session().unwrap();
    let second = desk.table_session().unwrap();

    assert!(std::sync::Arc::ptr_eq(&desk.cache(), &desk.clone().cache()));
    assert_eq!(first.state().pagination.page_size, PageSize::Ten);
    assert_eq!(second.requests_issued(), 0);
}
