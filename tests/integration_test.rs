//! Integration tests for CoinView CLI commands

use std::process::Output;

use serde_json::json;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COINVIEW_VARS: [&str; 10] = [
    "COINVIEW_PAGE_SIZE",
    "COINVIEW_LOOKBACK_DAYS",
    "COINVIEW_SORT_POLICY",
    "COINVIEW_LOG_LEVEL",
    "COINVIEW_LOG_FILE_PATH",
    "COINVIEW_MARKET_URL",
    "COINVIEW_NEWS_URL",
    "COINVIEW_NEWS_API_KEY",
    "COINVIEW_TIMEOUT_SECONDS",
    "COINVIEW_DARK_MODE",
];

/// Binary invocation isolated from the caller's config file and env
fn coinview(config_dir: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_coinview"));
    for var in COINVIEW_VARS {
        command.env_remove(var);
    }
    command.env_remove("RUST_LOG");
    command
        .env("NO_COLOR", "1")
        .arg("--config-file")
        .arg(config_dir.path().join("config.toml"));
    command
}

async fn run(command: &mut Command) -> Output {
    command.output().await.expect("Failed to execute coinview")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Test that the help command works
#[tokio::test]
async fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir).arg("--help")).await;

    assert!(output.status.success(), "Help command should succeed");

    let stdout = stdout(&output);
    assert!(stdout.contains("Usage: coinview"), "Should show usage");
    assert!(stdout.contains("markets"), "Should show markets command");
    assert!(stdout.contains("coin"), "Should show coin command");
    assert!(stdout.contains("news"), "Should show news command");
    assert!(stdout.contains("config"), "Should show config command");
    assert!(
        !stdout.contains("interactive"),
        "Interactive command stays hidden"
    );
}

/// Test that markets help describes what search matches
#[tokio::test]
async fn test_markets_help_describes_search() {
    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir).args(["markets", "--help"])).await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("coin name or symbol"));
}

/// Test that the version command works
#[tokio::test]
async fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir).arg("--version")).await;

    assert!(output.status.success(), "Version command should succeed");

    let stdout = stdout(&output);
    assert!(stdout.contains("coinview"), "Should show binary name");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Should show version number"
    );
}

/// Test the markets command against a mock upstream
#[tokio::test]
async fn test_markets_command_sorts_and_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "current_price": 100.0,
             "market_cap": 10.0, "total_volume": 1.0},
            {"id": "ethereum", "name": "Ethereum", "symbol": "eth", "current_price": 50.0,
             "market_cap": 20.0, "total_volume": 2.0},
            {"id": "dogecoin", "name": "Dogecoin", "symbol": "doge", "current_price": 0.1,
             "market_cap": 5.0, "total_volume": 3.0}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir)
        .env("COINVIEW_MARKET_URL", server.uri())
        .args(["markets", "--sort", "price", "--desc", "--page-size", "2"]))
    .await;

    assert!(
        output.status.success(),
        "Markets command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = stdout(&output);
    let btc = stdout.find("Bitcoin").expect("Bitcoin on first page");
    let eth = stdout.find("Ethereum").expect("Ethereum on first page");
    assert!(btc < eth, "Descending price order");
    assert!(!stdout.contains("Dogecoin"), "Third coin is on page 2");
    assert!(stdout.contains("Page 1 of 2"), "Should show page summary");
}

/// Test that a page past the end is reported, not clamped
#[tokio::test]
async fn test_markets_command_out_of_range_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "current_price": 100.0}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir)
        .env("COINVIEW_MARKET_URL", server.uri())
        .args(["markets", "--page", "4"]))
    .await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Page 4 is empty"));
}

/// Test that an upstream failure exits non-zero with a message
#[tokio::test]
async fn test_coin_command_reports_missing_coin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coins/ghost/market_chart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prices": []})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir)
        .env("COINVIEW_MARKET_URL", server.uri())
        .args(["coin", "ghost"]))
    .await;

    assert!(!output.status.success(), "Missing coin should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no market data for coin 'ghost'"));
}

/// Test config show hides the API key and reset writes the file
#[tokio::test]
async fn test_config_show_and_reset() {
    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir)
        .env("COINVIEW_NEWS_API_KEY", "super-secret")
        .args(["config", "show"]))
    .await;

    assert!(output.status.success(), "Config show command should succeed");
    let shown = stdout(&output);
    assert!(shown.contains("page_size"), "Should show page size");
    assert!(shown.contains("market_url"), "Should show API config");
    assert!(shown.contains("news_api_key: configured"));
    assert!(!shown.contains("super-secret"), "Key must not be printed");

    let output = run(coinview(&dir).args(["config", "reset"])).await;
    assert!(output.status.success(), "Config reset command should succeed");

    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("page_size = 20"));
}

/// Test dry-run prints the welcome banner without starting the TUI
#[tokio::test]
async fn test_dry_run_shows_welcome_page() {
    let dir = TempDir::new().unwrap();
    let output = run(coinview(&dir).arg("--dry-run")).await;

    assert!(output.status.success(), "Dry run should succeed");
    let stdout = stdout(&output);
    assert!(stdout.contains("CoinView Crypto Market Browser"));
    assert!(stdout.contains("Configuration loaded successfully"));
}

/// Test that a malformed config file is reported instead of silently replaced
#[tokio::test]
async fn test_bad_config_file_warns_on_stderr() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "page_size = \"twenty\"\n").unwrap();

    let output = run(coinview(&dir).arg("--dry-run")).await;

    assert!(output.status.success(), "Defaults still apply");
    assert!(stdout(&output).contains("Page size: 20"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load config"),
        "Warning should reach stderr: {}",
        stderr
    );
    assert!(stderr.contains("Failed to parse config file"));
}

/// Test that the configured log level is honoured when no flag is given
#[tokio::test]
async fn test_config_log_level_controls_output() {
    let dir = TempDir::new().unwrap();

    let quiet = run(coinview(&dir)
        .env("COINVIEW_LOG_LEVEL", "warn")
        .arg("--dry-run"))
    .await;
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("CoinView starting"));
    assert!(stdout(&quiet).contains("Log level: warn"));

    let loud = run(coinview(&dir)
        .env("COINVIEW_LOG_LEVEL", "warn")
        .args(["--log-level", "info", "--dry-run"]))
    .await;
    assert!(String::from_utf8_lossy(&loud.stderr).contains("CoinView starting"));
}
