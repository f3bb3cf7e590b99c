//! Live dashboard document
//!
//! Each refresh re-scans the corpus, repairs the selection, and renders a
//! single document that reloads itself on the refresh interval. The file is
//! only rewritten when the rendered markup changed.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{write_document, RenderMode};
use crate::detail::DetailView;
use crate::error::Result;
use crate::html::{escape, Page};
use crate::index::derive_title;
use crate::report::{LoadedReport, DEFAULT_TASK_LABEL};
use crate::service::ReportService;
use crate::summary::render_summary_html;
use crate::view::{Selection, ViewState};

const LIVE_TITLE: &str = "Evaluation reports (live)";

/// One rendered refresh
#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub state: ViewState,
    pub html: String,
}

/// Renders and writes the live dashboard for one corpus
#[derive(Debug)]
pub struct LiveDashboard {
    service: ReportService,
    output: PathBuf,
    refresh_secs: u64,
    last_written: Option<String>,
}

impl LiveDashboard {
    pub fn new(service: ReportService, output: impl Into<PathBuf>, refresh_secs: u64) -> Self {
        Self {
            service,
            output: output.into(),
            refresh_secs: refresh_secs.max(1),
            last_written: None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Re-scan and render without touching the output file.
    pub fn render(&self, requested: &Selection) -> Result<LiveFrame> {
        let mut state = self.service.snapshot(requested)?;
        let detail = match state.selection.report.clone() {
            Some(name) => match self.service.get_report(&name) {
                Ok(report) => Some(Ok(report)),
                Err(e) if e.is_not_found() => {
                    state.selection.report = None;
                    state.report_vanished = true;
                    None
                }
                Err(e) => Some(Err(e.to_string())),
            },
            None => None,
        };
        let html = render_live_document(&state, detail.as_ref(), self.refresh_secs);
        Ok(LiveFrame { state, html })
    }

    /// Render and write; returns the frame and whether the file changed.
    pub fn refresh(&mut self, requested: &Selection) -> Result<(LiveFrame, bool)> {
        let frame = self.render(requested)?;
        if self.last_written.as_deref() == Some(frame.html.as_str()) {
            return Ok((frame, false));
        }
        write_document(&self.output, &frame.html)?;
        self.last_written = Some(frame.html.clone());
        Ok((frame, true))
    }
}

fn runs_html(state: &ViewState) -> String {
    let mut html = String::from(r#"<nav class="runs"><h3>Runs</h3><ul>"#);
    for run in &state.index.runs {
        let selected = state.selection.run.as_deref() == Some(run.name.as_str());
        let name = if run.name.is_empty() { "(root)" } else { run.name.as_str() };
        let _ = write!(
            html,
            r#"<li{} data-run="{}" title="reportdeck watch --run {}">{}<span class="sub">{} reports, latest {}</span></li>"#,
            if selected { r#" class="selected""# } else { "" },
            escape(&run.name),
            escape(&shell_word(&run.name)),
            escape(name),
            run.count,
            run.latest.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if state.index.runs.is_empty() {
        html.push_str(r#"<li class="placeholder">No runs yet</li>"#);
    }
    html.push_str("</ul></nav>");
    html
}

fn models_html(state: &ViewState) -> String {
    if state.index.models.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<nav class="runs"><h3>Models</h3><ul>"#);
    for model in &state.index.models {
        let selected = state.selection.model.as_deref() == Some(model.as_str());
        let _ = write!(
            html,
            r#"<li{} data-model="{}" title="reportdeck watch --model {}">{}</li>"#,
            if selected { r#" class="selected""# } else { "" },
            escape(model),
            escape(&shell_word(model)),
            escape(model)
        );
    }
    html.push_str("</ul></nav>");
    html
}

fn reports_html(state: &ViewState) -> String {
    let mut html = String::from(r#"<nav class="reports"><h3>Reports</h3><ul>"#);
    for record in &state.visible {
        let selected = state.selection.report.as_deref() == Some(record.name.as_str());
        let _ = write!(
            html,
            r#"<li{} data-report="{}" title="reportdeck watch --report {}">{}<code class="sub">{}</code><span class="sub">{} · {}</span></li>"#,
            if selected { r#" class="selected""# } else { "" },
            escape(&record.name),
            escape(&shell_word(&record.name)),
            escape(&derive_title(&record.name)),
            escape(&record.name),
            escape(record.task_label.as_deref().unwrap_or(DEFAULT_TASK_LABEL)),
            escape(record.model.as_deref().unwrap_or("-"))
        );
    }
    if state.visible.is_empty() {
        html.push_str(r#"<li class="placeholder">No reports</li>"#);
    }
    html.push_str("</ul></nav>");
    html
}

/// Quote `word` for a POSIX shell when it is not a plain token
fn shell_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@+".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

const SELECTION_HINT: &str = concat!(
    r#"<p class="sub hint">Hover an entry for the command that selects it: "#,
    r#"<code>reportdeck watch --run RUN --model MODEL --report NAME [--summary]</code></p>"#
);

/// The live dashboard document for `state`.
///
/// `detail` is the selected report, or the message of a failed load.
pub fn render_live_document(
    state: &ViewState,
    detail: Option<&std::result::Result<LoadedReport, String>>,
    refresh_secs: u64,
) -> String {
    let head = format!("<meta http-equiv=\"refresh\" content=\"{refresh_secs}\">\n");
    let mut body = format!(
        r#"<header class="deck"><h1>{}</h1><span class="sub">refreshes every {}s</span></header>"#,
        LIVE_TITLE, refresh_secs
    );
    body.push_str(r#"<div class="layout"><aside>"#);
    body.push_str(&runs_html(state));
    body.push_str(&models_html(state));
    body.push_str(&reports_html(state));
    body.push_str(SELECTION_HINT);
    body.push_str("</aside><main>");
    if state.selection.show_summary {
        body.push_str(&render_summary_html(state.summary.as_ref()));
    }
    match detail {
        Some(Ok(report)) => {
            let view = DetailView::build(&report.detail, RenderMode::Live.preview_chars());
            body.push_str(&view.to_html());
        }
        Some(Err(message)) => {
            let _ = write!(
                body,
                r#"<section class="card"><p class="failed">Could not load report: {}</p></section>"#,
                escape(message)
            );
        }
        None => {
            body.push_str(r#"<section class="card"><p class="placeholder">Select a report</p></section>"#);
        }
    }
    body.push_str("</main></div>\n");
    Page {
        title: LIVE_TITLE,
        head: &head,
        body: &body,
        script: None,
    }
    .render()
}
