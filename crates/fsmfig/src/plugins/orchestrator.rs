//! Batch export of declarative machines
//!
//! The orchestrator runs every target through DOT rendering and the
//! configured exporter: Render → Export → (Fallback). Each target is
//! handled on its own so one failure never stops the rest of the batch.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, error, info, span, warn, Level};

use crate::catalog::ExportTarget;
use crate::core::Renderer;
use crate::plugins::graphviz::{
    export_with_fallback, DotRenderer, ExportConfig, ExportOutcome, GraphExporter,
};

/// What happened to one export target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub base_name: String,
    pub title: String,
    /// Path the primary format was meant to produce
    pub primary_path: PathBuf,
    pub outcome: ExportOutcome,
}

/// Coordinates rendering and exporting for a batch of machines
pub struct Orchestrator<E: GraphExporter> {
    renderer: DotRenderer,
    exporter: E,
    config: ExportConfig,
}

impl<E: GraphExporter> Orchestrator<E> {
    pub fn new(exporter: E, config: ExportConfig) -> Self {
        Self {
            renderer: DotRenderer::new(),
            exporter,
            config,
        }
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Render and export a single target
    pub fn export_target(&self, target: &ExportTarget) -> ExportReport {
        let target_span = span!(Level::INFO, "export_target", target = %target.base_name);
        let _enter = target_span.enter();

        let primary_path = self.config.primary_path(&target.base_name);
        let outcome = match self.renderer.render(&target.machine) {
            Ok(dot) => export_with_fallback(
                &self.exporter,
                &dot,
                &self.config.base_path(&target.base_name),
                self.config.primary,
                self.config.fallback,
            ),
            Err(e) => ExportOutcome::Failed {
                primary_error: format!("{:#}", e),
                fallback_error: None,
            },
        };

        match &outcome {
            ExportOutcome::Primary { path } => {
                info!(path = %path.display(), "Exported");
            }
            ExportOutcome::Fallback { path, .. } => {
                warn!(path = %path.display(), "Exported fallback format");
            }
            ExportOutcome::Failed {
                primary_error,
                fallback_error,
            } => {
                error!(
                    primary_error = %primary_error,
                    fallback_error = fallback_error.as_deref().unwrap_or("-"),
                    "Export failed"
                );
            }
        }

        ExportReport {
            base_name: target.base_name.clone(),
            title: target.title.clone(),
            primary_path,
            outcome,
        }
    }

    /// Export every target in order, calling `on_report` as each finishes
    pub fn export_each<F>(&self, targets: &[ExportTarget], mut on_report: F) -> Vec<ExportReport>
    where
        F: FnMut(&ExportReport),
    {
        let batch_span = span!(
            Level::INFO,
            "export_all",
            targets = targets.len(),
            exporter = self.exporter.name()
        );
        let _enter = batch_span.enter();

        let reports: Vec<ExportReport> = targets
            .iter()
            .map(|target| {
                let report = self.export_target(target);
                on_report(&report);
                report
            })
            .collect();

        let failed = reports.iter().filter(|r| r.outcome.is_failed()).count();
        debug!(total = reports.len(), failed, "Batch finished");
        reports
    }

    /// Export every target in order
    pub fn export_all(&self, targets: &[ExportTarget]) -> Vec<ExportReport> {
        self.export_each(targets, |_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::export_targets;
    use crate::plugins::graphviz::OutputFormat;
    use anyhow::Result;
    use std::path::Path;

    struct FailFor(&'static str);

    impl GraphExporter for FailFor {
        fn export(&self, _dot: &str, format: OutputFormat, path: &Path) -> Result<()> {
            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if name == self.0 {
                anyhow::bail!("cannot write {}", format);
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fail-for"
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let orchestrator = Orchestrator::new(FailFor("request_fsm"), ExportConfig::default());
        let reports = orchestrator.export_all(&export_targets().unwrap());
        assert_eq!(reports.len(), 3);
        assert!(matches!(reports[0].outcome, ExportOutcome::Primary { .. }));
        assert!(reports[1].outcome.is_failed());
        assert!(matches!(reports[2].outcome, ExportOutcome::Primary { .. }));
        assert_eq!(reports[1].primary_path, PathBuf::from("./request_fsm.pdf"));
    }

    #[test]
    fn test_export_each_reports_in_order() {
        let orchestrator = Orchestrator::new(FailFor("none"), ExportConfig::default());
        let mut seen = Vec::new();
        orchestrator.export_each(&export_targets().unwrap(), |r| seen.push(r.title.clone()));
        assert_eq!(seen, ["Matching FSM", "Request FSM", "Viewing FSM"]);
    }
}
