//! Placeholder substitution and asset path rewriting for HTML pages.
//!
//! Every page (Markdown-rendered or hand-written) passes through
//! [`transform_html`], which applies in order:
//!
//! 1. `{{VERSION}}` → resolved version
//! 2. `{{REL}}` → `..` on command pages, `.` on root pages
//! 3. `<span class="badge">vX.Y.Z</span>` → resolved version
//! 4. `src="../img/` / `src="../../img/` normalized per page position
//! 5. with a base URL: stylesheet and image references made absolute

use regex::{Captures, Regex};
use std::{path::Path, sync::LazyLock};

/// Replaced by the resolved version string.
pub const VERSION_PLACEHOLDER: &str = "{{VERSION}}";
/// Replaced by the relative path to the output root.
pub const REL_PLACEHOLDER: &str = "{{REL}}";

/// Directory name marking nested (one level deeper) pages.
pub const COMMANDS_DIR: &str = "commands";

static RE_BADGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<span\s+class="badge"\s*>\s*)v?[0-9]+\.[0-9]+\.[0-9]+(\s*</span>)"#).unwrap()
});
static RE_STYLESHEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href="(?:\./|\.\./)styles\.css""#).unwrap());
static RE_IMAGE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src="(?:\./|\.\./)img/([^"]+)""#).unwrap());

/// Where a page lives in the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    /// Directly under the output root.
    Root,
    /// Under `commands/`, one directory deeper.
    Commands,
}

impl PagePosition {
    /// Classify a path relative to its tree root by whether it has a
    /// `commands` component.
    pub fn of(relative: &Path) -> Self {
        if relative.components().any(|c| c.as_os_str() == COMMANDS_DIR) {
            Self::Commands
        } else {
            Self::Root
        }
    }

    /// Relative path from the page back to the output root.
    pub const fn rel(self) -> &'static str {
        match self {
            Self::Root => ".",
            Self::Commands => "..",
        }
    }
}

/// Per-page parameters for [`transform_html`].
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub version: &'a str,
    pub position: PagePosition,
}

impl<'a> TransformContext<'a> {
    pub const fn new(version: &'a str, position: PagePosition) -> Self {
        Self { version, position }
    }

    pub const fn is_commands_page(&self) -> bool {
        matches!(self.position, PagePosition::Commands)
    }

    pub const fn is_root_page(&self) -> bool {
        matches!(self.position, PagePosition::Root)
    }
}

/// Apply placeholder substitution and path rewriting to an HTML document.
pub fn transform_html(html: &str, ctx: &TransformContext<'_>, base_url: Option<&str>) -> String {
    let html = html
        .replace(VERSION_PLACEHOLDER, ctx.version)
        .replace(REL_PLACEHOLDER, ctx.position.rel());

    let html = RE_BADGE
        .replace_all(&html, |caps: &Captures| {
            format!("{}{}{}", &caps[1], ctx.version, &caps[2])
        })
        .into_owned();

    let html = normalize_image_paths(html, ctx);

    match base_url {
        Some(base) => absolutize(&html, base),
        None => html,
    }
}

/// Point image sources at `img/` as seen from the page's position.
///
/// Runs even when a base URL is set, so that `../../img/` on a root page
/// reaches a form the absolute rewrite recognizes.
fn normalize_image_paths(html: String, ctx: &TransformContext<'_>) -> String {
    if ctx.is_root_page() {
        html.replace(r#"src="../img/"#, r#"src="./img/"#)
            .replace(r#"src="../../img/"#, r#"src="./img/"#)
    } else if ctx.is_commands_page() {
        html.replace(r#"src="../../img/"#, r#"src="../img/"#)
    } else {
        html
    }
}

/// Rewrite stylesheet and image references to absolute URLs under `base`.
fn absolutize(html: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');

    let html = RE_STYLESHEET.replace_all(html, |_: &Captures| format!(r#"href="{base}/styles.css""#));
    RE_IMAGE_SRC
        .replace_all(&html, |caps: &Captures| format!(r#"src="{base}/img/{}""#, &caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: TransformContext<'static> = TransformContext::new("v9.9.9", PagePosition::Root);
    const NESTED: TransformContext<'static> =
        TransformContext::new("v9.9.9", PagePosition::Commands);

    // ------------------------------------------------------------------------
    // position
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_position_of() {
        assert_eq!(PagePosition::of(Path::new("index.md")), PagePosition::Root);
        assert_eq!(PagePosition::of(Path::new("commands/init.md")), PagePosition::Commands);
        assert_eq!(PagePosition::of(Path::new("guide/commands/x.md")), PagePosition::Commands);
        // substring is not a path segment
        assert_eq!(PagePosition::of(Path::new("commands.md")), PagePosition::Root);
        assert_eq!(PagePosition::of(Path::new("subcommands/a.md")), PagePosition::Root);
    }

    #[test]
    fn test_context_flags_are_exclusive() {
        assert!(ROOT.is_root_page() && !ROOT.is_commands_page());
        assert!(NESTED.is_commands_page() && !NESTED.is_root_page());
    }

    // ------------------------------------------------------------------------
    // placeholders
    // ------------------------------------------------------------------------

    #[test]
    fn test_placeholders() {
        let html = r#"<link href="{{REL}}/styles.css"><b>{{VERSION}}</b><a title="{{VERSION}}">"#;
        assert_eq!(
            transform_html(html, &ROOT, None),
            r#"<link href="./styles.css"><b>v9.9.9</b><a title="v9.9.9">"#
        );
        assert_eq!(
            transform_html("{{REL}}/index.html", &NESTED, None),
            "../index.html"
        );
    }

    #[test]
    fn test_badge_substitution() {
        assert_eq!(
            transform_html(r#"<span class="badge">v0.1.0</span>"#, &ROOT, None),
            r#"<span class="badge">v9.9.9</span>"#
        );
        assert_eq!(
            transform_html(r#"<SPAN  class="badge" > 1.2.3 </SPAN>"#, &ROOT, None),
            r#"<SPAN  class="badge" > v9.9.9 </SPAN>"#
        );
    }

    #[test]
    fn test_badge_other_content_untouched() {
        let html = r#"<span class="badge">beta</span><span class="tag">v1.0.0</span>"#;
        assert_eq!(transform_html(html, &ROOT, None), html);
    }

    #[test]
    fn test_badge_version_with_dollar_is_literal() {
        let ctx = TransformContext::new("v$1", PagePosition::Root);
        assert_eq!(
            transform_html(r#"<span class="badge">v0.1.0</span>"#, &ctx, None),
            r#"<span class="badge">v$1</span>"#
        );
    }

    // ------------------------------------------------------------------------
    // relative paths
    // ------------------------------------------------------------------------

    #[test]
    fn test_root_page_image_paths() {
        assert_eq!(
            transform_html(r#"<img src="../img/logo.png">"#, &ROOT, None),
            r#"<img src="./img/logo.png">"#
        );
        assert_eq!(
            transform_html(r#"<img src="../../img/logo.png">"#, &ROOT, None),
            r#"<img src="./img/logo.png">"#
        );
    }

    #[test]
    fn test_nested_page_image_paths() {
        assert_eq!(
            transform_html(r#"<img src="../../img/logo.png">"#, &NESTED, None),
            r#"<img src="../img/logo.png">"#
        );
        // already correct for nested pages
        assert_eq!(
            transform_html(r#"<img src="../img/logo.png">"#, &NESTED, None),
            r#"<img src="../img/logo.png">"#
        );
    }

    // ------------------------------------------------------------------------
    // base url
    // ------------------------------------------------------------------------

    #[test]
    fn test_base_url_stylesheet() {
        let base = Some("https://example.com");
        for ctx in [&ROOT, &NESTED] {
            assert_eq!(
                transform_html(r#"<link href="./styles.css">"#, ctx, base),
                r#"<link href="https://example.com/styles.css">"#
            );
            assert_eq!(
                transform_html(r#"<link href="../styles.css">"#, ctx, base),
                r#"<link href="https://example.com/styles.css">"#
            );
        }
    }

    #[test]
    fn test_base_url_images() {
        let base = Some("https://example.com/");
        assert_eq!(
            transform_html(r#"<img src="../img/a/b.svg">"#, &NESTED, base),
            r#"<img src="https://example.com/img/a/b.svg">"#
        );
        assert_eq!(
            transform_html(r#"<img SRC="./IMG/x.png">"#, &ROOT, base),
            r#"<img src="https://example.com/img/x.png">"#
        );
    }

    #[test]
    fn test_base_url_no_relative_leak() {
        // root page: ../../img is normalized first, then made absolute
        assert_eq!(
            transform_html(r#"<img src="../../img/logo.png">"#, &ROOT, Some("https://d.io")),
            r#"<img src="https://d.io/img/logo.png">"#
        );
        // nested page: ../../img -> ../img -> absolute
        assert_eq!(
            transform_html(r#"<img src="../../img/logo.png">"#, &NESTED, Some("https://d.io")),
            r#"<img src="https://d.io/img/logo.png">"#
        );
    }

    #[test]
    fn test_base_url_after_placeholder() {
        assert_eq!(
            transform_html(r#"<link href="{{REL}}/styles.css">"#, &NESTED, Some("https://d.io")),
            r#"<link href="https://d.io/styles.css">"#
        );
    }

    #[test]
    fn test_other_links_untouched() {
        let html = r#"<a href="./getting-started.html">go</a><img src="https://cdn.x/img/a.png">"#;
        assert_eq!(transform_html(html, &ROOT, Some("https://d.io")), html);
    }
}
