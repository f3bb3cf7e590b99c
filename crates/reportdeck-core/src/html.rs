//! HTML building blocks shared by the live and static renderers
//!
//! [`escape`] is the only way text reaches generated markup. Report content
//! (action stdout/stderr in particular) comes from an external process and
//! must never be interpreted as markup.

use std::fmt::Write as _;

use serde::Serialize;

/// Escape text for insertion into element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `value` as JSON safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` become `\u` escapes so no closing tag or comment opener
/// can appear; line separators are escaped for older JS parsers.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Restrict a free-form tag to `[a-z0-9-]` so it can be used as a CSS class.
pub fn class_token(tag: &str) -> String {
    let token: String = tag
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let token = token.trim_matches('-');
    if token.is_empty() {
        "unknown".to_string()
    } else {
        token.to_string()
    }
}

/// Anchor opening in a new browsing context without leaking `window.opener`.
pub fn external_link(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape(href),
        escape(text)
    )
}

/// A complete HTML document
pub struct Page<'a> {
    pub title: &'a str,
    /// Extra markup for `<head>`, already escaped by the caller
    pub head: &'a str,
    pub body: &'a str,
    /// Inline script; callers embed data through [`script_json`]
    pub script: Option<&'a str>,
}

impl Page<'_> {
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(self.body.len() + STYLESHEET.len() + 1024);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        let _ = writeln!(html, "<title>{}</title>", escape(self.title));
        html.push_str(self.head);
        let _ = writeln!(html, "<style>{STYLESHEET}</style>");
        html.push_str("</head>\n<body>\n");
        html.push_str(self.body);
        if let Some(script) = self.script {
            let _ = writeln!(html, "<script>{script}</script>");
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Stylesheet shared by every generated document
pub const STYLESHEET: &str = r#"
:root { --bg: #f5f5f7; --card: #fff; --border: #d2d2d7; --text: #1d1d1f; --dim: #6e6e73;
  --ok: #248a3d; --warn: #b25000; --bad: #d70015; --accent: #0066cc; }
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  background: var(--bg); color: var(--text); line-height: 1.45; }
header.deck { padding: 1rem 1.5rem; border-bottom: 1px solid var(--border); background: var(--card);
  display: flex; gap: 1rem; align-items: center; }
header.deck h1 { font-size: 1.2rem; margin: 0; }
.layout { display: grid; grid-template-columns: 18rem 1fr; gap: 1rem; padding: 1rem 1.5rem; }
nav.reports ul, nav.runs ul { list-style: none; margin: 0; padding: 0; }
nav.reports li, nav.runs li { padding: .35rem .5rem; border-radius: 6px; cursor: pointer; }
nav li.selected { background: var(--accent); color: #fff; }
nav li .sub { display: block; font-size: .8rem; color: var(--dim); }
nav li.selected .sub { color: #e8f0ff; }
section.card { background: var(--card); border: 1px solid var(--border); border-radius: 10px;
  padding: 1rem 1.25rem; margin-bottom: 1rem; }
.placeholder { color: var(--dim); font-style: italic; }
.chip { display: inline-block; padding: .1rem .55rem; border-radius: 999px; font-size: .8rem;
  border: 1px solid var(--border); }
.difficulty-easy { background: #e3f5e8; } .difficulty-medium { background: #fff1d6; }
.difficulty-hard { background: #fde2e1; } .difficulty-other { background: #eee; }
table { border-collapse: collapse; width: 100%; font-size: .9rem; }
th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid var(--border); vertical-align: top; }
td.num, th.num { text-align: right; font-variant-numeric: tabular-nums; }
.status-success, .status-ok, .status-completed { color: var(--ok); }
.status-error, .status-failed, .status-failure { color: var(--bad); }
pre.log, details.log pre, .trace-panel pre { margin: 0; white-space: pre-wrap; word-break: break-word;
  font-size: .8rem; max-height: 24rem; overflow: auto; }
details.log summary { cursor: pointer; font-family: monospace; font-size: .8rem; }
.log-size { color: var(--dim); margin-right: .5rem; }
.passed { color: var(--ok); } .failed { color: var(--bad); }
header.deck button { border: 1px solid var(--border); background: var(--card); border-radius: 6px;
  padding: .3rem .8rem; cursor: pointer; }
header.deck button.active { background: var(--accent); color: #fff; }
header.deck .sub, aside h3 { color: var(--dim); font-size: .85rem; }
main.single { max-width: 72rem; margin: 1rem auto; padding: 0 1.5rem; }
[hidden] { display: none !important; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_neutralizes_tags() {
        let escaped = escape("<script>alert('x')</script> & \"y\"");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;y&quot;"
        );
    }

    #[test]
    fn test_script_json_cannot_close_script() {
        let json = script_json(&json!({"stdout": "</script><script>alert(1)</script>"})).unwrap();
        assert!(!json.contains("</script>"));
        assert!(!json.contains('<'));
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["stdout"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_class_token() {
        assert_eq!(class_token("Success"), "success");
        assert_eq!(class_token("x\" onmouseover=\"y"), "x--onmouseover--y");
        assert_eq!(class_token("  "), "unknown");
    }

    #[test]
    fn test_external_link_isolated() {
        let link = external_link("https://example.com/?a=1&b=<2>", "docs");
        assert!(link.contains(r#"rel="noopener noreferrer""#));
        assert!(link.contains(r#"target="_blank""#));
        assert!(link.contains("a=1&amp;b=&lt;2&gt;"));
    }

    #[test]
    fn test_page_escapes_title() {
        let page = Page {
            title: "<b>t</b>",
            head: "",
            body: "<main></main>",
            script: None,
        }
        .render();
        assert!(page.contains("<title>&lt;b&gt;t&lt;/b&gt;</title>"));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
