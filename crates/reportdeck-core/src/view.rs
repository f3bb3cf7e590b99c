//! Immutable view state for the live dashboard
//!
//! A [`ViewState`] is recomputed from scratch on every refresh from the
//! current scan, the external summary and the requested [`Selection`]. The
//! selection-repair rules below are the only place selection changes.

use serde::Serialize;

use crate::index::CorpusIndex;
use crate::scan::ReportRecord;
use crate::summary::Summary;

/// What the user asked to look at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub run: Option<String>,
    pub model: Option<String>,
    pub report: Option<String>,
    pub show_summary: bool,
}

/// Projection of one corpus snapshot under a repaired selection
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Selection after repair; feed it back into the next refresh
    pub selection: Selection,
    pub index: CorpusIndex,
    /// Reports of the selected run, filtered by the selected model
    pub visible: Vec<ReportRecord>,
    pub summary: Option<Summary>,
    /// The requested report existed before but is gone from this snapshot
    pub report_vanished: bool,
}

impl ViewState {
    /// Derive the view for `records` and `requested`.
    ///
    /// - a run that no longer exists falls back to the most recent run;
    /// - a model that no longer exists clears the model filter;
    /// - a report no longer visible clears the report selection.
    pub fn derive(records: &[ReportRecord], summary: Option<Summary>, requested: &Selection) -> Self {
        let index = CorpusIndex::build(records);
        let run = index.select_run(requested.run.as_deref());
        let model = requested
            .model
            .clone()
            .filter(|m| index.models.iter().any(|known| known == m));

        let visible: Vec<ReportRecord> = match &run {
            Some(run) => records
                .iter()
                .filter(|r| r.run() == run)
                .filter(|r| model.is_none() || r.model == model)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let report = requested
            .report
            .clone()
            .filter(|name| visible.iter().any(|r| &r.name == name));
        let report_vanished = requested.report.is_some() && report.is_none();

        Self {
            selection: Selection {
                run,
                model,
                report,
                show_summary: requested.show_summary,
            },
            index,
            visible,
            summary,
            report_vanished,
        }
    }

    pub fn selected_record(&self) -> Option<&ReportRecord> {
        let name = self.selection.report.as_deref()?;
        self.visible.iter().find(|r| r.name == name)
    }
}
