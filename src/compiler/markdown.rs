//! Minimal Markdown to HTML conversion.
//!
//! Recognizes just what the docs need, one source line at a time:
//!
//! | Construct          | Output                                                   |
//! |--------------------|----------------------------------------------------------|
//! | ```` ``` ```` fence | `<div class="card code"><pre><code>…</code></pre></div>` |
//! | `# ` / `## ` / `### ` | `<h1>` / `<h2>` / `<h3>`                              |
//! | `- item`           | `<ul>` + `<li>`                                          |
//! | blank line         | empty output line                                        |
//! | anything else      | `<p>` with `` `code` `` spans                            |
//!
//! Content is trusted: nothing is HTML-escaped.
//!
//! # State machine
//!
//! ```text
//!            "- "                    fence
//!   Normal ───────► InList ──────────────────┐
//!     ▲  ◄─────────  │                       ▼
//!     │   other      │ fence           InCodeBlock
//!     │              └──────────────────►    │
//!     └──────────────────────────────────────┘
//!                       fence
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Inline code span, non-greedy and non-nested.
static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// First level-1 heading of a Markdown source.
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

const FENCE: &str = "```";

/// Convert Markdown source to an HTML fragment.
pub fn markdown_to_html(md: &str) -> String {
    let mut converter = Converter::default();
    for line in md.lines() {
        converter.feed(line);
    }
    converter.finish()
}

/// Text of the first `# ` heading, if any.
pub fn extract_title(md: &str) -> Option<&str> {
    RE_TITLE
        .captures(md)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Normal,
    InList,
    InCodeBlock,
}

/// Line-oriented converter: current state plus the output and code buffers.
#[derive(Debug, Default)]
struct Converter<'a> {
    state: State,
    lines: Vec<String>,
    code: Vec<&'a str>,
}

impl<'a> Converter<'a> {
    fn feed(&mut self, line: &'a str) {
        if line.trim().starts_with(FENCE) {
            self.toggle_fence();
            return;
        }

        if self.state == State::InCodeBlock {
            self.code.push(line);
            return;
        }

        if let Some((level, text)) = heading(line) {
            self.close_list();
            self.lines.push(format!("<h{level}>{}</h{level}>", text.trim()));
        } else if let Some(item) = line.strip_prefix("- ") {
            self.open_list();
            self.lines.push(format!("<li>{}</li>", item.trim()));
        } else if line.trim().is_empty() {
            self.close_list();
            self.lines.push(String::new());
        } else {
            self.close_list();
            let text = RE_INLINE_CODE.replace_all(line, "<code>$1</code>");
            self.lines.push(format!("<p>{text}</p>"));
        }
    }

    fn toggle_fence(&mut self) {
        match self.state {
            State::InCodeBlock => self.close_code(),
            State::InList | State::Normal => {
                self.close_list();
                self.state = State::InCodeBlock;
            }
        }
    }

    fn open_list(&mut self) {
        if self.state != State::InList {
            self.lines.push("<ul>".to_owned());
            self.state = State::InList;
        }
    }

    fn close_list(&mut self) {
        if self.state == State::InList {
            self.lines.push("</ul>".to_owned());
            self.state = State::Normal;
        }
    }

    fn close_code(&mut self) {
        if self.state == State::InCodeBlock {
            let code = self.code.join("\n");
            self.lines.push(format!(
                r#"<div class="card code"><pre><code>{code}</code></pre></div>"#
            ));
            self.code.clear();
            self.state = State::Normal;
        }
    }

    /// Force-close whatever is still open and join the output.
    fn finish(mut self) -> String {
        self.close_code();
        self.close_list();
        // Single non-overlapping pass: 4+ blank lines may survive partially.
        self.lines.join("\n").replace("\n\n\n", "\n\n")
    }
}

/// Match `### `, `## ` or `# ` (longest first) and split off the text.
fn heading(line: &str) -> Option<(u8, &str)> {
    [(3, "### "), (2, "## "), (1, "# ")]
        .into_iter()
        .find_map(|(level, prefix)| line.strip_prefix(prefix).map(|text| (level, text)))
}
