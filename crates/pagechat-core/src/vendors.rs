//! Built-in vendor profiles.
//!
//! Selectors mirror the live pages and are kept verbatim, CSS or XPath,
//! whichever the page is easiest to address with.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::RegistryError;
use crate::profile::{CleanupRules, CodeBlockRule, CompletionStrategy, Timeouts, VendorProfile};
use crate::session::Locator;

/// Vendors with a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Anthropic,
    DuckDuckGo,
    Gemini,
    Kimi,
    Mistral,
    Qwen,
}

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Anthropic,
        Vendor::DuckDuckGo,
        Vendor::Gemini,
        Vendor::Kimi,
        Vendor::Mistral,
        Vendor::Qwen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "anthropic",
            Vendor::DuckDuckGo => "duckduckgo",
            Vendor::Gemini => "gemini",
            Vendor::Kimi => "kimi",
            Vendor::Mistral => "mistral",
            Vendor::Qwen => "qwen",
        }
    }

    pub fn profile(&self) -> VendorProfile {
        match self {
            Vendor::Anthropic => anthropic(),
            Vendor::DuckDuckGo => duckduckgo(),
            Vendor::Gemini => gemini(),
            Vendor::Kimi => kimi(),
            Vendor::Mistral => mistral(),
            Vendor::Qwen => qwen(),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Vendor::ALL
            .into_iter()
            .find(|vendor| vendor.as_str() == wanted)
            .ok_or_else(|| RegistryError::NotFound(s.to_string()))
    }
}

pub fn anthropic() -> VendorProfile {
    let send = Locator::css(r#"button[type="button"][aria-label="Send Message"]"#);
    VendorProfile {
        id: Vendor::Anthropic.as_str().to_string(),
        display_name: "Anthropic".to_string(),
        url: "https://claude.ai/new".to_string(),
        readiness: send.clone(),
        input: Locator::css("div[contenteditable='true']"),
        submit: send,
        completion: CompletionStrategy::ButtonDisabledAppears(Locator::css(
            r#"button[disabled][type="button"][aria-label="Send Message"]"#,
        )),
        answer: Locator::xpath(r#"//div[contains(@class, "font-claude-message")]"#),
        cleanup: CleanupRules {
            code_blocks: vec![CodeBlockRule::new("pre").with_content("code")],
            inline_code: vec!["code".to_string()],
            strip: Vec::new(),
        },
        timeouts: Timeouts {
            dwell: Duration::from_secs(2),
            ..Timeouts::default()
        },
    }
}

pub fn duckduckgo() -> VendorProfile {
    let send = Locator::css(r#"button[type="submit"][aria-label="Send"]"#);
    VendorProfile {
        id: Vendor::DuckDuckGo.as_str().to_string(),
        display_name: "DuckDuckGo".to_string(),
        url: "https://duck.ai/".to_string(),
        readiness: send.clone(),
        input: Locator::css("textarea"),
        submit: send.clone(),
        completion: CompletionStrategy::ClipboardPoll {
            copy_button: Locator::xpath("//*[@data-copyairesponse='true']"),
            max_attempts: 5,
            interval: Duration::from_secs(1),
            ready: Some(send),
        },
        answer: Locator::xpath("//div[@heading]"),
        cleanup: CleanupRules::default(),
        timeouts: Timeouts {
            dwell: Duration::from_secs(1),
            pre_submit_pause: Duration::from_secs(1),
            ..Timeouts::default()
        },
    }
}

pub fn gemini() -> VendorProfile {
    let submit = Locator::css("button.submit");
    VendorProfile {
        id: Vendor::Gemini.as_str().to_string(),
        display_name: "Gemini".to_string(),
        url: "https://gemini.google.com/app".to_string(),
        readiness: submit.clone(),
        input: Locator::css(".textarea"),
        submit,
        // The microphone comes back once the stop icon is gone.
        completion: CompletionStrategy::MarkerAppears(Locator::css(
            "div.mic-button-container:not(.hidden)",
        )),
        answer: Locator::xpath("//message-content"),
        cleanup: CleanupRules {
            code_blocks: vec![CodeBlockRule::new("div.code-block")
                .with_content("div.formatted-code-block-internal-container")],
            inline_code: vec!["code".to_string()],
            strip: Vec::new(),
        },
        timeouts: Timeouts {
            submit: Duration::from_secs(1000),
            completion: Duration::from_secs(1000),
            dwell: Duration::from_secs(1),
            ..Timeouts::default()
        },
    }
}

pub fn kimi() -> VendorProfile {
    let editor = Locator::xpath("//div[@class='chat-input-editor']");
    VendorProfile {
        id: Vendor::Kimi.as_str().to_string(),
        display_name: "Kimi".to_string(),
        url: "https://www.kimi.com/chat/".to_string(),
        readiness: editor.clone(),
        input: editor,
        submit: Locator::css(".send-button-container"),
        completion: CompletionStrategy::ButtonDisabledAppears(Locator::css(
            "div.send-button-container.disabled:not(.stop)",
        )),
        answer: Locator::xpath("//div[@class='markdown-container']"),
        cleanup: CleanupRules {
            code_blocks: vec![
                CodeBlockRule::new("div.segment-code").with_content("div.segment-code-content")
            ],
            inline_code: vec!["code".to_string()],
            strip: Vec::new(),
        },
        timeouts: Timeouts {
            dwell: Duration::from_secs(3),
            pre_submit_pause: Duration::from_secs(1),
            post_completion_pause: Duration::from_secs(1),
            ..Timeouts::default()
        },
    }
}

pub fn mistral() -> VendorProfile {
    let submit = Locator::css(r#"button[type="submit"]"#);
    VendorProfile {
        id: Vendor::Mistral.as_str().to_string(),
        display_name: "Mistral".to_string(),
        url: "https://chat.mistral.ai/".to_string(),
        readiness: submit.clone(),
        input: Locator::css(r#"textarea[name="message.text"]"#),
        submit: submit.clone(),
        completion: CompletionStrategy::ButtonReappears(submit),
        answer: Locator::css("div.prose"),
        cleanup: CleanupRules {
            // Mistral renders every snippet, short or long, as a code block.
            code_blocks: vec![CodeBlockRule::new("code")],
            inline_code: Vec::new(),
            strip: vec![
                "div.sticky".to_string(),
                r#"button.disabled\:pointer-auto[type="button"]"#.to_string(),
            ],
        },
        timeouts: Timeouts {
            dwell: Duration::from_secs(1),
            ..Timeouts::default()
        },
    }
}

pub fn qwen() -> VendorProfile {
    VendorProfile {
        id: Vendor::Qwen.as_str().to_string(),
        display_name: "Qwen".to_string(),
        url: "https://chat.qwen.ai/".to_string(),
        readiness: Locator::xpath("//textarea[@id='chat-input']"),
        input: Locator::css("textarea"),
        submit: Locator::css("#send-message-button"),
        completion: CompletionStrategy::ButtonDisabledAppears(Locator::css(
            "#send-message-button[disabled]",
        )),
        answer: Locator::xpath("//div[@id='response-content-container']"),
        cleanup: CleanupRules {
            code_blocks: vec![CodeBlockRule::new("div.code-cntainer").with_content("div.cm-content")],
            inline_code: vec!["code".to_string()],
            strip: vec![r#"div[style*="display: none"]"#.to_string()],
        },
        timeouts: Timeouts {
            dwell: Duration::from_secs(3),
            pre_submit_pause: Duration::from_secs(1),
            post_completion_pause: Duration::from_secs(1),
            ..Timeouts::default()
        },
    }
}
