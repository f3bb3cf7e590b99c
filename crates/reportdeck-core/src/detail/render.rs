//! HTML and terminal layouts for a [`DetailView`]

use std::fmt::Write as _;

use super::{DetailView, LinkItem, TraceView, PLACEHOLDER};
use crate::html::{escape, external_link};

fn link_item_html(item: &LinkItem) -> String {
    match item {
        LinkItem::Link(href) => external_link(href, href),
        LinkItem::Text(text) => escape(text),
    }
}

fn link_list(title: &str, items: &[LinkItem]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<h3>{}</h3><ul>", escape(title));
    for item in items {
        let _ = write!(html, "<li>{}</li>", link_item_html(item));
    }
    html.push_str("</ul>");
    html
}

fn trace_html(trace: &TraceView) -> String {
    format!(
        concat!(
            r#"<div class="trace"><h4>#{} {}</h4>"#,
            r#"<details class="trace-panel"><summary>Prompt</summary><pre>{}</pre></details>"#,
            r#"<details class="trace-panel"><summary>Assistant</summary><pre>{}</pre></details>"#,
            "</div>"
        ),
        trace.index,
        escape(&trace.action),
        escape(&trace.prompt),
        escape(&trace.assistant),
    )
}

impl DetailView {
    fn header_html(&self) -> String {
        let mut html = format!("<h2>{}</h2>", escape(&self.label));
        if let Some(difficulty) = &self.difficulty {
            let _ = write!(
                html,
                r#"<span class="chip {}">{}</span> "#,
                difficulty.class(),
                escape(difficulty.tag())
            );
        }
        if let Some(passed) = self.passed {
            let (class, text) = if passed {
                ("passed", "passed")
            } else {
                ("failed", "failed")
            };
            let _ = write!(html, r#"<span class="chip {class}">{text}</span>"#);
        }
        if let Some(description) = &self.description {
            let _ = write!(html, "<p>{}</p>", escape(description));
        }
        html.push_str("<table class=\"meta\">");
        let meta = [
            ("Model", self.model.as_deref()),
            ("Category", self.category.as_deref()),
            ("Endpoint", self.endpoint_url.as_deref()),
            ("Harness start (s)", Some(self.started_at.as_str())),
            ("Harness end (s)", Some(self.generated_at.as_str())),
            ("Verified from", Some(self.verified_from.as_str())),
            ("Verified until", Some(self.verified_until.as_str())),
        ];
        for (label, value) in meta {
            let _ = write!(
                html,
                "<tr><th>{}</th><td>{}</td></tr>",
                label,
                escape(value.unwrap_or(PLACEHOLDER))
            );
        }
        html.push_str("</table>");
        html
    }

    fn metrics_html(&self) -> String {
        let mut html = String::from("<h3>Metrics</h3><table class=\"metrics\"><tr>");
        for metric in &self.metrics {
            let _ = write!(html, r#"<th class="num">{}</th>"#, metric.label);
        }
        html.push_str("</tr><tr>");
        for metric in &self.metrics {
            let _ = write!(html, r#"<td class="num">{}</td>"#, escape(&metric.value));
        }
        html.push_str("</tr></table>");
        html
    }

    fn components_html(&self) -> String {
        let mut html = String::from("<h3>Score breakdown</h3>");
        if self.components.is_empty() {
            html.push_str(r#"<p class="placeholder">No score components</p>"#);
            return html;
        }
        html.push_str(
            r#"<table class="components"><tr><th>Component</th><th class="num">Value</th><th class="num">Max</th></tr>"#,
        );
        for row in &self.components {
            let _ = write!(
                html,
                r#"<tr data-key="{}"><td>{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                escape(&row.key),
                escape(&row.label),
                escape(&row.value),
                escape(&row.max)
            );
        }
        html.push_str("</table>");
        html
    }

    fn actions_html(&self) -> String {
        let mut html = String::from("<h3>Actions</h3>");
        if self.actions.is_empty() {
            html.push_str(r#"<p class="placeholder">No actions recorded</p>"#);
            return html;
        }
        html.push_str(
            "<table class=\"actions\"><tr><th>#</th><th>Action</th><th>Status</th><th>CLI</th><th>Stdout</th><th>Stderr</th></tr>",
        );
        for row in &self.actions {
            let _ = write!(
                html,
                r#"<tr><td class="num">{}</td><td>{}</td><td class="status-{}">{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>"#,
                row.index,
                escape(&row.name),
                row.status_class,
                escape(&row.status),
                escape(&row.cli),
                row.stdout.to_html(),
                row.stderr.to_html(),
            );
        }
        html.push_str("</table>");
        html
    }

    /// Report detail as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<article class="report-detail">"#);
        let _ = write!(html, r#"<section class="card">{}</section>"#, self.header_html());
        let _ = write!(
            html,
            r#"<section class="card">{}{}</section>"#,
            self.metrics_html(),
            self.components_html()
        );
        if !self.errors.is_empty() {
            html.push_str(r#"<section class="card"><h3>Verification errors</h3><ul>"#);
            for error in &self.errors {
                let _ = write!(html, "<li>{}</li>", escape(error));
            }
            html.push_str("</ul></section>");
        }
        let _ = write!(html, r#"<section class="card">{}</section>"#, self.actions_html());
        if !self.traces.is_empty() {
            html.push_str(r#"<section class="card"><h3>Reasoning traces</h3>"#);
            for trace in &self.traces {
                html.push_str(&trace_html(trace));
            }
            html.push_str("</section>");
        }
        let notes = format!(
            "{}{}",
            link_list("Notes", &self.notes),
            link_list("Links", &self.links)
        );
        if !notes.is_empty() {
            let _ = write!(html, r#"<section class="card">{notes}</section>"#);
        }
        html.push_str("</article>");
        html
    }

    /// Plain-text digest for terminal output
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}", self.label);
        if let Some(difficulty) = &self.difficulty {
            let _ = write!(out, " [{}]", difficulty.tag());
        }
        if let Some(passed) = self.passed {
            let _ = write!(out, " ({})", if passed { "passed" } else { "failed" });
        }
        out.push('\n');
        if let Some(description) = &self.description {
            let _ = writeln!(out, "{description}");
        }
        let _ = writeln!(out, "model: {}", self.model.as_deref().unwrap_or(PLACEHOLDER));
        for metric in &self.metrics {
            let _ = writeln!(out, "{}: {}", metric.label, metric.value);
        }
        if !self.components.is_empty() {
            out.push_str("\nScore breakdown:\n");
            for row in &self.components {
                let _ = writeln!(out, "  {} = {} / {}", row.label, row.value, row.max);
            }
        }
        if !self.actions.is_empty() {
            out.push_str("\nActions:\n");
            for row in &self.actions {
                let _ = writeln!(
                    out,
                    "  {:>3}. {} [{}] {}",
                    row.index, row.name, row.status, row.cli
                );
                if row.stderr != super::LogBlock::Empty {
                    let _ = writeln!(out, "       stderr: {}", row.stderr.to_text());
                }
            }
        }
        for (title, items) in [("Notes", &self.notes), ("Links", &self.links)] {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{title}:");
            for item in items {
                match item {
                    LinkItem::Link(s) | LinkItem::Text(s) => {
                        let _ = writeln!(out, "  - {s}");
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::{DetailView, LIVE_PREVIEW_CHARS, STATIC_PREVIEW_CHARS};
    use crate::report::ReportDetail;
    use serde_json::json;

    fn view(value: serde_json::Value, preview: usize) -> DetailView {
        DetailView::build(&ReportDetail::from_value(&value).unwrap(), preview)
    }

    #[test]
    fn test_hostile_text_never_opens_tags() {
        let html = view(
            json!({
                "task_name": "<img src=x onerror=alert(1)>",
                "description": "<script>alert(1)</script>",
                "difficulty": "<b>hard</b>",
                "actions": [{
                    "action": "<i>run</i>",
                    "status": "\"><script>",
                    "metadata": {"result": {"stdout": "<script>alert(1)</script>", "stderr": "</pre><script>"}}
                }],
                "notes": ["<script>n</script>", "http://x/\"><script>"],
                "verification": {"errors": ["<script>e</script>"]}
            }),
            LIVE_PREVIEW_CHARS,
        )
        .to_html();
        assert!(!html.contains("<script"), "{html}");
        assert!(!html.contains("<img"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_difficulty_chip_only_when_present() {
        let html = view(json!({"difficulty": "EASY-ish"}), LIVE_PREVIEW_CHARS).to_html();
        assert!(html.contains(r#"<span class="chip difficulty-easy">easy</span>"#));
        let html = view(json!({}), LIVE_PREVIEW_CHARS).to_html();
        assert!(!html.contains("difficulty-"));
    }

    #[test]
    fn test_static_preview_collapses_short_logs() {
        let stdout = "y".repeat(41);
        let report = json!({"actions": [{"metadata": {"result": {"stdout": stdout}}}]});
        let static_html = view(report.clone(), STATIC_PREVIEW_CHARS).to_html();
        assert!(static_html.contains("41 chars"));
        let live_html = view(report, LIVE_PREVIEW_CHARS).to_html();
        assert!(!live_html.contains("41 chars"));
    }

    #[test]
    fn test_links_open_isolated() {
        let html = view(json!({"links": ["https://example.com/run"]}), LIVE_PREVIEW_CHARS).to_html();
        assert!(html.contains(
            r#"<a href="https://example.com/run" target="_blank" rel="noopener noreferrer">"#
        ));
    }

    #[test]
    fn test_trace_panels() {
        let html = view(
            json!({"actions": [{"action": "a"}, {"action": "plan", "metadata": {"llm_trace": {"prompt": "p"}}}]}),
            LIVE_PREVIEW_CHARS,
        )
        .to_html();
        assert!(html.contains("<h4>#2 plan</h4>"));
        assert_eq!(html.matches("trace-panel").count(), 2);
    }

    #[test]
    fn test_text_digest() {
        let text = view(
            json!({"task_name": "Create Queue", "metrics": {"score": 1},
                   "actions": [{"action": "create", "status": "success"}]}),
            LIVE_PREVIEW_CHARS,
        )
        .to_text();
        assert!(text.starts_with("Create Queue\n"));
        assert!(text.contains("Score: 1.00"));
        assert!(text.contains("1. create [success] -"));
    }
}
