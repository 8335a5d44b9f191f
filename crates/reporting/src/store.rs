//! Export loading. Reports live under `<root>/<report_id>_results/`.

use campaign_core::exports::{ExportBundle, ExportKind};
use campaign_core::{ReportError, ReportResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where raw export documents come from.
pub trait ExportSource {
    fn report_exists(&self, report_id: u64) -> bool;

    /// The raw document, or `Ok(None)` when the export is absent or does not
    /// parse as JSON.
    fn load(&self, report_id: u64, kind: ExportKind) -> ReportResult<Option<Value>>;
}

pub struct FsExportSource {
    root: PathBuf,
}

impl FsExportSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn report_dir(&self, report_id: u64) -> PathBuf {
        self.root.join(format!("{report_id}_results"))
    }
}

impl ExportSource for FsExportSource {
    fn report_exists(&self, report_id: u64) -> bool {
        self.report_dir(report_id).is_dir()
    }

    fn load(&self, report_id: u64, kind: ExportKind) -> ReportResult<Option<Value>> {
        let path = self.report_dir(report_id).join(kind.file_name(report_id));
        if !path.is_file() {
            debug!(report_id = report_id, file = %path.display(), "Export absent");
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| ReportError::Storage(format!("{}: {e}", path.display())))?;
        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                warn!(report_id = report_id, file = %path.display(), error = %e, "Export is not valid JSON");
                Ok(None)
            }
        }
    }
}

/// Load and shape-resolve every export of a report. Fails only when the
/// report is unknown or its campaigns export is missing.
pub fn load_bundle(source: &dyn ExportSource, report_id: u64) -> ReportResult<ExportBundle> {
    if !source.report_exists(report_id) {
        return Err(ReportError::ReportNotFound(report_id));
    }

    let mut documents: HashMap<ExportKind, Value> = HashMap::new();
    for kind in ExportKind::ALL {
        let loaded = match source.load(report_id, kind) {
            Ok(doc) => doc,
            Err(e) if kind.is_required() => return Err(e),
            Err(e) => {
                warn!(report_id = report_id, kind = ?kind, error = %e, "Optional export unreadable");
                None
            }
        };
        match loaded {
            Some(doc) => {
                documents.insert(kind, doc);
            }
            None if kind.is_required() => {
                return Err(ReportError::MissingExport {
                    report_id,
                    file: kind.file_name(report_id),
                });
            }
            None => {}
        }
    }

    let loaded = documents.len();
    let mut bundle = ExportBundle::from_documents(report_id, |kind| documents.remove(&kind));
    let removed = bundle.exclude_deleted_groups();

    info!(
        report_id = report_id,
        documents = loaded,
        campaigns = bundle.campaigns.len(),
        ads = bundle.ads.len(),
        deleted_group_ads = removed,
        "Exports loaded"
    );
    Ok(bundle)
}
