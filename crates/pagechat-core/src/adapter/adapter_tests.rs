use super::*;
use crate::error::SessionError;
use crate::session::mock::{MockElement, MockEvent, MockSession};
use crate::vendors;

fn adapter(profile: VendorProfile) -> ChatAdapter {
    ChatAdapter::new(Arc::new(profile), AdapterConfig::default()).unwrap()
}

fn ready(mock: MockSession, vendor: &str) -> ChatSession<MockSession> {
    let mut session = ChatSession::new(mock, vendor);
    session.set_readiness(Readiness::Ready);
    session
}

fn completion_locator(profile: &VendorProfile) -> Locator {
    match &profile.completion {
        CompletionStrategy::ButtonDisabledAppears(locator)
        | CompletionStrategy::ButtonReappears(locator)
        | CompletionStrategy::MarkerAppears(locator) => locator.clone(),
        CompletionStrategy::ClipboardPoll { copy_button, .. } => copy_button.clone(),
    }
}

/// Input and submit controls present, completion signalled at once.
fn idle_page(profile: &VendorProfile) -> MockSession {
    MockSession::new()
        .with_elements(profile.input.clone(), 1)
        .with_elements(profile.submit.clone(), 1)
        .with_elements(completion_locator(profile), 1)
}

#[test]
fn test_adapter_config_from_engine() {
    let engine = EngineConfig {
        readiness_deadline_secs: Some(600),
        poll_interval_ms: 100,
        ..EngineConfig::default()
    };
    let config = AdapterConfig::from(&engine);
    assert_eq!(config.readiness_interval, Duration::from_secs(5));
    assert_eq!(config.readiness_deadline, Some(Duration::from_secs(600)));
    assert_eq!(config.poll_interval, Duration::from_millis(100));
    assert_eq!(config.paste_settle, Duration::from_millis(500));

    assert_eq!(AdapterConfig::from(&EngineConfig::default()), AdapterConfig::default());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_ready_on_third_probe() {
    let profile = vendors::gemini();
    let mock = MockSession::new().with_appearing(profile.readiness.clone(), 2, 1);
    let adapter = adapter(profile.clone());
    let mut session = ChatSession::new(mock, "gemini");

    adapter.initialize(&mut session).await.unwrap();

    assert!(session.is_ready());
    let probes = session.handle().probe_times(&profile.readiness);
    assert_eq!(probes.len(), 3);
    let waited = probes[2] - probes[0];
    assert!(waited >= Duration::from_secs(10) && waited < Duration::from_secs(11));
    assert!(matches!(
        session.handle().events().first(),
        Some((_, MockEvent::Navigate(url))) if url == "https://gemini.google.com/app"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_initialize_honours_deadline() {
    let profile = vendors::kimi();
    let config = AdapterConfig {
        readiness_deadline: Some(Duration::from_secs(12)),
        ..AdapterConfig::default()
    };
    let adapter = ChatAdapter::new(Arc::new(profile.clone()), config).unwrap();
    let mut session = ChatSession::new(MockSession::new(), "kimi");

    let err = adapter.initialize(&mut session).await.unwrap_err();

    assert!(matches!(err, ChatError::ReadinessTimeout { ref vendor, .. } if vendor == "kimi"));
    assert_eq!(session.readiness(), Readiness::NotReady);
    // Probes at 0s, 5s, 10s and 15s.
    assert_eq!(session.handle().probe_count(&profile.readiness), 4);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_error_propagates() {
    let profile = vendors::qwen();
    let adapter = adapter(profile.clone());
    let mock = MockSession::new().with_navigation_error("net::ERR_INTERNET_DISCONNECTED");
    let mut session = ChatSession::new(mock, "qwen");

    let err = adapter.initialize(&mut session).await.unwrap_err();

    assert!(matches!(err, ChatError::Session(SessionError::Navigation(_))));
    assert_eq!(session.handle().probe_count(&profile.readiness), 0);
    assert!(!session.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_turn_requires_ready_session() {
    let profile = vendors::mistral();
    let adapter = adapter(profile.clone());
    let mut session = ChatSession::new(idle_page(&profile), "mistral");

    let err = adapter.converse(&mut session, "Hi").await.unwrap_err();

    assert!(matches!(err, ChatError::NotReady { .. }));
    assert!(session.handle().events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dwell_precedes_first_completion_probe() {
    let profile = vendors::anthropic();
    let disabled = completion_locator(&profile);
    let mock = idle_page(&profile).with_markup(
        profile.answer.clone(),
        vec![r#"<div class="font-claude-message"><p>Hi there</p></div>"#.to_string()],
    );
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "anthropic");

    let turn = adapter.run_turn(&mut session, "Hello!").await.unwrap();

    let clicked = session.handle().click_times(&profile.submit)[0];
    let first_probe = session.handle().probe_times(&disabled)[0];
    assert!(first_probe - clicked >= profile.timeouts.dwell);
    assert_eq!(turn.phase, TurnPhase::Done);
    assert_eq!(turn.extraction, Extraction::Markup);
    assert_eq!(turn.clean_text, "Hi there");
    assert_eq!(turn.prompt, "Hello!");
}

#[tokio::test(start_paused = true)]
async fn test_prompt_is_pasted_into_last_input() {
    let profile = vendors::mistral();
    let mock = idle_page(&profile).with_elements(profile.input.clone(), 2);
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "mistral");

    adapter.converse(&mut session, "Bonjour").await.unwrap();

    assert_eq!(session.handle().clipboard_writes(), vec!["Bonjour".to_string()]);
    let pasted: Vec<MockElement> = session
        .handle()
        .events()
        .into_iter()
        .filter_map(|(_, event)| match event {
            MockEvent::Paste(element) => Some(element),
            _ => None,
        })
        .collect();
    assert_eq!(
        pasted,
        vec![MockElement {
            locator: profile.input.clone(),
            index: 1
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_pre_submit_pause_before_click() {
    let profile = vendors::kimi();
    let adapter = adapter(profile.clone());
    let mut session = ready(idle_page(&profile), "kimi");

    adapter.converse(&mut session, "Hi").await.unwrap();

    let probes = session.handle().probe_times(&profile.submit);
    let clicked = session.handle().click_times(&profile.submit)[0];
    assert_eq!(probes.len(), 2);
    assert!(clicked - probes[0] >= profile.timeouts.pre_submit_pause);
}

#[tokio::test(start_paused = true)]
async fn test_missing_input_is_selector_stale() {
    let profile = vendors::kimi();
    let mock = MockSession::new().with_elements(profile.submit.clone(), 1);
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "kimi");

    let err = adapter.converse(&mut session, "Hi").await.unwrap_err();

    assert!(err.is_selector_stale());
    assert!(session.handle().clipboard_writes().is_empty());
    assert!(session.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_submit_timeout() {
    let profile = vendors::mistral();
    let mock = MockSession::new().with_elements(profile.input.clone(), 1);
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "mistral");

    let started = Instant::now();
    let err = adapter.converse(&mut session, "Hi").await.unwrap_err();

    assert!(matches!(err, ChatError::SubmitTimeout { ref locator, .. } if locator == r#"button[type="submit"]"#));
    assert!(err.is_transient());
    assert!(started.elapsed() >= profile.timeouts.submit);
    assert!(session.handle().click_times(&profile.submit).is_empty());
    assert!(session.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_completion_timeout_keeps_session() {
    let profile = vendors::qwen();
    let mock = MockSession::new()
        .with_elements(profile.input.clone(), 1)
        .with_elements(profile.submit.clone(), 1);
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "qwen");

    let err = adapter.run_turn(&mut session, "Hi").await.unwrap_err();
    assert!(matches!(err, ChatError::CompletionTimeout { waited, .. } if waited == Duration::from_secs(120)));
    assert!(session.is_ready());

    // The next turn is attempted on the same session.
    let err = adapter.run_turn(&mut session, "Again").await.unwrap_err();
    assert!(matches!(err, ChatError::CompletionTimeout { .. }));
    assert_eq!(session.handle().click_times(&profile.submit).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_answer_degrades_to_empty_text() {
    let profile = vendors::kimi();
    let adapter = adapter(profile.clone());
    let mut session = ready(idle_page(&profile), "kimi");

    let turn = adapter.run_turn(&mut session, "Hi").await.unwrap();

    assert_eq!(turn.phase, TurnPhase::Done);
    assert_eq!(turn.extraction, Extraction::Empty);
    assert_eq!(turn.clean_text, "");
    assert!(session.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_last_answer_is_extracted() {
    let profile = vendors::gemini();
    let mock = idle_page(&profile).with_markup(
        profile.answer.clone(),
        vec![
            "<message-content><p>Old answer</p></message-content>".to_string(),
            r#"<message-content><p>Use <code>ls</code>:</p><div class="code-block"><div class="header">Shell</div><div class="formatted-code-block-internal-container">ls -la</div></div></message-content>"#.to_string(),
        ],
    );
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "gemini");

    let turn = adapter.run_turn(&mut session, "How do I list files?").await.unwrap();

    assert!(turn.raw_markup.contains("ls -la"));
    assert_eq!(turn.clean_text, "Use `ls`:\n```\nls -la\n```");
}

#[tokio::test(start_paused = true)]
async fn test_post_completion_pause() {
    let profile = vendors::qwen();
    let completion = completion_locator(&profile);
    let mock = idle_page(&profile).with_markup(
        profile.answer.clone(),
        vec![r#"<div id="response-content-container"><p>Done</p></div>"#.to_string()],
    );
    let adapter = adapter(profile.clone());
    let mut session = ready(mock, "qwen");

    adapter.converse(&mut session, "Hi").await.unwrap();

    let signalled = session.handle().probe_times(&completion)[0];
    let extracted = session.handle().probe_times(&profile.answer)[0];
    assert!(extracted - signalled >= profile.timeouts.post_completion_pause);
}

#[tokio::test(start_paused = true)]
async fn test_turn_rejects_session_of_other_vendor() {
    let kimi = vendors::kimi();
    let adapter = adapter(kimi.clone());
    let mut session = ready(idle_page(&kimi), "gemini");

    let err = adapter.converse(&mut session, "Hi").await.unwrap_err();

    assert!(matches!(
        &err,
        ChatError::VendorMismatch { adapter, session } if adapter == "kimi" && session == "gemini"
    ));
    assert!(session.handle().events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_rejects_session_of_other_vendor() {
    let profile = vendors::mistral();
    let adapter = adapter(profile.clone());
    let mock = MockSession::new().with_elements(profile.readiness.clone(), 1);
    let mut session = ChatSession::new(mock, "qwen");

    let err = adapter.initialize(&mut session).await.unwrap_err();

    assert!(matches!(err, ChatError::VendorMismatch { .. }));
    assert!(!session.is_ready());
    assert!(session.handle().events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_each_turn_releases_elements_first() {
    let profile = vendors::mistral();
    let mock = idle_page(&profile).with_markup(
        profile.answer.clone(),
        vec![r#"<div class="prose"><p>Paris.</p></div>"#.to_string()],
    );
    let adapter = adapter(profile);
    let mut session = ready(mock, "mistral");

    adapter.converse(&mut session, "First").await.unwrap();
    adapter.converse(&mut session, "Second").await.unwrap();

    let events: Vec<MockEvent> = session
        .handle()
        .events()
        .into_iter()
        .map(|(_, event)| event)
        .filter(|event| {
            matches!(event, MockEvent::ReleaseElements | MockEvent::Paste(_))
        })
        .collect();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], MockEvent::ReleaseElements));
    assert!(matches!(events[1], MockEvent::Paste(_)));
    assert!(matches!(events[2], MockEvent::ReleaseElements));
    assert!(matches!(events[3], MockEvent::Paste(_)));
}
