//! Live conversation against a real chat page.
//!
//! Needs a Chrome started with `--remote-debugging-port=9222` in which the
//! vendor is reachable (and logged in where the vendor requires it).
//! Run with:
//! PAGECHAT_VENDOR=duckduckgo cargo test -p pagechat-cdp --test live_smoke -- --ignored --nocapture

use std::path::Path;

use pagechat_cdp::CdpTab;
use pagechat_config::{Config, ConfigLoader};
use pagechat_core::{AdapterConfig, ChatSession, VendorRegistry};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "Hello! What is the capital of France?";

fn load_config() -> Config {
    match std::env::var("PAGECHAT_CONFIG") {
        Ok(path) => ConfigLoader::load(Path::new(&path)).expect("config should load"),
        Err(_) => Config::default(),
    }
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a running Chrome with remote debugging on port 9222"]
async fn test_live_conversation() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let config = load_config();
    let vendor = std::env::var("PAGECHAT_VENDOR").unwrap_or_else(|_| config.default_vendor.clone());

    let registry = VendorRegistry::from_config(&config).expect("registry should build");
    let adapter = registry
        .adapter(&vendor, AdapterConfig::from(&config.engine))
        .expect("vendor should be registered");

    let tab = CdpTab::connect(&config.cdp.endpoint)
        .await
        .expect("Chrome should be reachable");
    let mut session = ChatSession::new(tab, vendor.clone());

    adapter
        .initialize(&mut session)
        .await
        .expect("chat page should become ready");

    let turn = adapter
        .run_turn(&mut session, PROMPT)
        .await
        .expect("turn should complete");
    println!("[{}] {:?}: {}", vendor, turn.extraction, turn.clean_text);

    assert!(turn.phase.is_terminal());
}
