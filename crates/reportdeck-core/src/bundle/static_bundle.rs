//! Self-contained HTML bundles
//!
//! A single report file becomes one document. A directory becomes one
//! document per report, mirroring the corpus layout, plus [`INDEX_DOCUMENT`]
//! with every report's raw payload embedded and the navigation runtime.
//!
//! Output is a pure function of the corpus: entries are ordered by name and
//! nothing time-dependent is added at render time.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use super::runtime::{DATA_ELEMENT_ID, INDEX_RUNTIME};
use super::{write_document, RenderMode};
use crate::detail::DetailView;
use crate::error::{BundleFailure, DeckError, Result};
use crate::html::{escape, script_json, Page};
use crate::index::derive_title;
use crate::paths::{document_name, CorpusRoot};
use crate::report::LoadedReport;
use crate::service::ReportService;
use crate::summary::{render_summary_html, Summary};
use crate::trace_time;

/// Aggregate document written at the top of a directory bundle
pub const INDEX_DOCUMENT: &str = "index.html";

const INDEX_TITLE: &str = "Evaluation reports";

/// What a bundle run produced
#[derive(Debug, Default)]
pub struct BundleOutcome {
    /// Documents written, in write order; the index comes last
    pub written: Vec<PathBuf>,
    /// Reports that could not be rendered or written
    pub failures: Vec<BundleFailure>,
}

impl BundleOutcome {
    /// `Err` carrying every per-report failure, if there were any
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        if self.failures.is_empty() {
            Ok(self.written)
        } else {
            Err(DeckError::Bundle {
                failures: self.failures,
            })
        }
    }
}

/// One report in the embedded snapshot
#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    name: &'a str,
    title: String,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    document: String,
    data: &'a Value,
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    reports: Vec<IndexEntry<'a>>,
    summary: Option<&'a Summary>,
}

/// Bundle `input` (a report file or a corpus directory).
///
/// `output` is the document path for a single file and the target directory
/// for a corpus; without it, documents go under `default_dir`.
pub fn build_bundle(input: &Path, output: Option<&Path>, default_dir: &Path) -> Result<BundleOutcome> {
    let metadata = fs::metadata(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeckError::not_found("bundle input", input.display())
        } else {
            DeckError::io_at("read", input, e)
        }
    })?;
    if metadata.is_dir() {
        bundle_directory(input, output.unwrap_or(default_dir))
    } else {
        bundle_file(input, output, default_dir)
    }
}

fn bundle_file(input: &Path, output: Option<&Path>, default_dir: &Path) -> Result<BundleOutcome> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DeckError::invalid_name(input.display(), "not a report file name"))?;
    let parent = input.parent().filter(|p| !p.as_os_str().is_empty());
    let root = CorpusRoot::new(parent.unwrap_or(Path::new(".")))?;
    let report = LoadedReport::load(name, &root.resolve_report(name)?)?;

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_dir.join(document_name(name)));
    write_document(&target, &render_report_document(&report, None)?)?;
    tracing::info!(path = %target.display(), "wrote report document");
    Ok(BundleOutcome {
        written: vec![target],
        failures: Vec::new(),
    })
}

#[tracing::instrument(skip_all, fields(root = %root.display(), out = %out_dir.display()))]
fn bundle_directory(root: &Path, out_dir: &Path) -> Result<BundleOutcome> {
    let start = Instant::now();
    let service = ReportService::new(root)?;
    let mut records = service.records()?;
    records.sort_by(|a, b| a.name.cmp(&b.name));

    let mut outcome = BundleOutcome::default();
    let mut loaded = Vec::with_capacity(records.len());
    for record in &records {
        let document = document_name(&record.name);
        if document == INDEX_DOCUMENT {
            outcome.failures.push(failure(service.root(), &record.name, "collides with the bundle index"));
            continue;
        }
        let report = match service.get_report(&record.name) {
            Ok(report) => report,
            Err(e) if e.is_not_found() => {
                tracing::debug!(name = %record.name, "report gone before it was bundled");
                outcome.failures.push(failure(service.root(), &record.name, e));
                continue;
            }
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "skipping report");
                outcome.failures.push(failure(service.root(), &record.name, e));
                continue;
            }
        };
        let target = out_dir.join(&document);
        let written = render_report_document(&report, Some(&relative_index(&document)))
            .and_then(|html| write_document(&target, &html));
        match written {
            Ok(()) => {
                outcome.written.push(target);
                loaded.push(report);
            }
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "failed to write report document");
                outcome.failures.push(failure(service.root(), &record.name, e));
            }
        }
    }

    let summary = service.bundle_summary();
    let index_path = out_dir.join(INDEX_DOCUMENT);
    let written = render_index_document(&loaded, summary.as_ref())
        .and_then(|html| write_document(&index_path, &html));
    match written {
        Ok(()) => outcome.written.push(index_path),
        Err(e) => {
            tracing::warn!(error = %e, "failed to write bundle index");
            outcome.failures.push(BundleFailure {
                source: service.root().to_path_buf(),
                reason: format!("{INDEX_DOCUMENT}: {e}"),
            });
        }
    }
    trace_time!(start, "bundle_directory");
    Ok(outcome)
}

fn failure(root: &CorpusRoot, name: &str, reason: impl ToString) -> BundleFailure {
    BundleFailure {
        source: root.join(name),
        reason: reason.to_string(),
    }
}

/// Link from a document at `document` (bundle-relative) back to the index
fn relative_index(document: &str) -> String {
    let depth = document.matches('/').count();
    format!("{}{INDEX_DOCUMENT}", "../".repeat(depth))
}

fn embedded_json(id: &str, value: &impl Serialize) -> Result<String> {
    Ok(format!(
        r#"<script type="application/json" id="{id}">{}</script>"#,
        script_json(value)?
    ))
}

/// One report as a standalone document with its payload embedded.
pub fn render_report_document(report: &LoadedReport, index_href: Option<&str>) -> Result<String> {
    let title = derive_title(&report.name);
    let view = DetailView::build(&report.detail, RenderMode::Static.preview_chars());

    let mut body = format!(
        r#"<header class="deck"><h1>{}</h1><span class="sub">{}</span>"#,
        escape(&title),
        escape(&report.name)
    );
    if let Some(href) = index_href {
        let _ = write!(body, r#"<a href="{}">All reports</a>"#, escape(href));
    }
    body.push_str("</header>\n");
    let _ = writeln!(body, r#"<main class="single">{}</main>"#, view.to_html());
    body.push_str(&embedded_json("report-data", &report.raw)?);
    body.push('\n');

    Ok(Page {
        title: &title,
        head: "",
        body: &body,
        script: None,
    }
    .render())
}

/// The aggregate index over `reports`, which must already be in name order.
pub fn render_index_document(reports: &[LoadedReport], summary: Option<&Summary>) -> Result<String> {
    let snapshot = Snapshot {
        reports: reports
            .iter()
            .map(|r| IndexEntry {
                name: &r.name,
                title: derive_title(&r.name),
                label: r.detail.label(),
                model: r.detail.model.as_deref(),
                document: document_name(&r.name),
                data: &r.raw,
            })
            .collect(),
        summary,
    };

    let mut body = format!(
        concat!(
            r#"<header class="deck"><h1>{}</h1>"#,
            r#"<button id="show-summary" type="button">Summary</button>"#,
            r#"<button id="show-detail" type="button">Detail</button>"#,
            r#"<select id="model-filter"><option value="">All models</option></select>"#,
            "</header>\n"
        ),
        INDEX_TITLE
    );
    body.push_str(r#"<div class="layout"><nav class="reports"><ul id="report-list"></ul></nav><main>"#);
    let _ = write!(
        body,
        r#"<div id="summary-view">{}</div>"#,
        render_summary_html(summary)
    );
    body.push_str(r#"<div id="detail-view" hidden><p class="placeholder" id="detail-placeholder">Select a report</p>"#);
    for (index, report) in reports.iter().enumerate() {
        let view = DetailView::build(&report.detail, RenderMode::Static.preview_chars());
        let document = document_name(&report.name);
        let _ = write!(
            body,
            r#"<div class="report-panel" data-index="{index}" hidden><p><a href="{}">Open {}</a></p>{}</div>"#,
            escape(&document),
            escape(&document),
            view.to_html()
        );
    }
    body.push_str("</div></main></div>\n");
    body.push_str(&embedded_json(DATA_ELEMENT_ID, &snapshot)?);
    body.push('\n');

    Ok(Page {
        title: INDEX_TITLE,
        head: "",
        body: &body,
        script: Some(INDEX_RUNTIME),
    }
    .render())
}
