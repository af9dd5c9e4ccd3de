//! Vendor markup to plain text.
//!
//! The answer bubble's outer markup is parsed with `scraper` and rendered
//! into flat text: decorative elements are dropped, code containers become
//! fenced blocks, inline code gets single backticks and block-level
//! elements break lines. The parsed document never outlives a call, so the
//! normalizer can be shared across tasks.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::RuleError;
use crate::profile::{CleanupRules, CompletionStrategy};

const FENCE: &str = "```";

/// Elements that start and end on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tr",
    "ul",
];

/// Never rendered, whatever the rules say.
const SILENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug)]
struct CodeBlockSelector {
    container: Selector,
    content: Option<Selector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ordinary flowing text.
    Flow,
    /// Inside an inline code span.
    Inline,
    /// Inside a fenced block; whitespace is kept as written.
    Code,
}

/// Compiled cleanup rules of one vendor.
#[derive(Debug)]
pub struct Normalizer {
    code_blocks: Vec<CodeBlockSelector>,
    inline_code: Vec<Selector>,
    strip: Vec<Selector>,
}

impl Normalizer {
    /// Compile `rules`. Fails on the first selector that does not parse.
    pub fn new(rules: &CleanupRules) -> Result<Self, RuleError> {
        let code_blocks = rules
            .code_blocks
            .iter()
            .map(|rule| {
                Ok(CodeBlockSelector {
                    container: compile(&rule.container)?,
                    content: rule.content.as_deref().map(compile).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        Ok(Self {
            code_blocks,
            inline_code: compile_all(&rules.inline_code)?,
            strip: compile_all(&rules.strip)?,
        })
    }

    /// Normalizer without any vendor rule.
    pub fn plain() -> Self {
        Self {
            code_blocks: Vec::new(),
            inline_code: Vec::new(),
            strip: Vec::new(),
        }
    }

    /// Clean an extracted answer. Clipboard answers are already text and
    /// only get whitespace tidying; page answers are markup.
    pub fn clean(&self, raw: &str, completion: &CompletionStrategy) -> String {
        if completion.reads_clipboard() {
            self.clean_text(raw)
        } else {
            self.clean_markup(raw)
        }
    }

    /// Flatten page markup into text.
    ///
    /// The input is parsed as HTML: entities are decoded and anything shaped
    /// like a tag is markup. Its output is text, so cleaning it again goes
    /// through [`Normalizer::clean_text`], which leaves clean text unchanged.
    pub fn clean_markup(&self, markup: &str) -> String {
        let fragment = Html::parse_fragment(markup);
        let mut out = String::with_capacity(markup.len() / 2);
        self.render_children(fragment.root_element(), &mut out, Mode::Flow);
        tidy(&out)
    }

    /// Tidy plain text. Idempotent.
    pub fn clean_text(&self, text: &str) -> String {
        tidy(text)
    }

    fn render_children(&self, element: ElementRef<'_>, out: &mut String, mode: Mode) {
        for child in element.children() {
            if let Some(child) = ElementRef::wrap(child) {
                self.render_element(child, out, mode);
            } else if let Node::Text(text) = child.value() {
                match mode {
                    Mode::Code => out.push_str(text),
                    Mode::Flow | Mode::Inline => push_flowing(out, text),
                }
            }
        }
    }

    fn render_element(&self, element: ElementRef<'_>, out: &mut String, mode: Mode) {
        let name = element.value().name();
        if SILENT_TAGS.contains(&name) || self.strip.iter().any(|s| s.matches(&element)) {
            return;
        }
        if name == "br" {
            out.push('\n');
            return;
        }

        if mode == Mode::Flow {
            if let Some(rule) = self.code_blocks.iter().find(|r| r.container.matches(&element)) {
                self.render_code_block(element, rule, out);
                return;
            }
            if self.inline_code.iter().any(|s| s.matches(&element)) {
                out.push('`');
                self.render_children(element, out, Mode::Inline);
                out.push('`');
                return;
            }
        }

        let block = BLOCK_TAGS.contains(&name);
        if block {
            line_break(out);
        }
        self.render_children(element, out, mode);
        if block {
            line_break(out);
        }
    }

    fn render_code_block(&self, element: ElementRef<'_>, rule: &CodeBlockSelector, out: &mut String) {
        let parts: Vec<ElementRef<'_>> = match &rule.content {
            Some(content) => element.select(content).collect(),
            None => Vec::new(),
        };

        let code = if parts.is_empty() {
            self.code_text(element)
        } else {
            parts
                .into_iter()
                .map(|part| self.code_text(part))
                .collect::<Vec<_>>()
                .join("\n")
        };

        line_break(out);
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(&code);
        out.push('\n');
        out.push_str(FENCE);
        out.push('\n');
    }

    fn code_text(&self, element: ElementRef<'_>) -> String {
        let mut code = String::new();
        self.render_children(element, &mut code, Mode::Code);
        code.trim_matches('\n').to_string()
    }
}

fn compile(selector: &str) -> Result<Selector, RuleError> {
    Selector::parse(selector).map_err(|e| RuleError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn compile_all(selectors: &[String]) -> Result<Vec<Selector>, RuleError> {
    selectors.iter().map(|s| compile(s)).collect()
}

fn line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Append text following HTML whitespace rules, except that line breaks
/// inside a text node survive. Formatting whitespace between tags is
/// dropped at line starts and folded to one space elsewhere.
fn push_flowing(out: &mut String, text: &str) {
    if text.trim().is_empty() {
        if !(out.is_empty() || out.ends_with([' ', '\n'])) {
            out.push(' ');
        }
        return;
    }

    for ch in text.chars() {
        match ch {
            '\n' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push('\n');
            }
            '\r' => {}
            c if c.is_whitespace() => {
                if !(out.is_empty() || out.ends_with([' ', '\n'])) {
                    out.push(' ');
                }
            }
            c => out.push(c),
        }
    }
}

/// CRLF to LF, trailing whitespace trimmed per line, at most one blank
/// line in a row, and no surrounding whitespace.
fn tidy(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
