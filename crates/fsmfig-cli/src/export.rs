//! `fsm-export`: export the focused machines through Graphviz

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fsmfig::catalog::{export_targets, ExportTarget};
use fsmfig::core::Topology;
use fsmfig::machine::StateMachine;
use fsmfig::plugins::graphviz::{
    ExportConfig, ExportOutcome, GraphExporter, GraphvizExporter, OutputFormat,
};
use fsmfig::plugins::orchestrator::{ExportReport, Orchestrator};
use serde::Serialize;
use tracing::debug;

use crate::cli::{display_path, ColorChoice, CommonArgs};
use crate::colorizer::{paint, Status};

const BANNER: &str = "Generating Matching Algorithm FSM diagrams (split into 3 focused machines)...";
const TRAILER: &str = "FSM diagram generation complete!";

/// Export the Matching, Request and Viewing state machines
#[derive(Parser, Debug)]
#[command(name = "fsm-export")]
#[command(about = "Export the matching FSMs as Graphviz diagrams (PDF, PNG fallback)")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct ExportCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Graphviz program to run (defaults to $FSMFIG_DOT, then `dot`)
    #[arg(long, value_name = "PATH")]
    pub dot_program: Option<PathBuf>,

    /// Write DOT sources instead of running Graphviz
    #[arg(long)]
    pub dot_only: bool,

    /// List the machines instead of exporting them
    #[arg(long)]
    pub list: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// When to use colors in status lines
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl ExportCli {
    /// Exporter for the resolved Graphviz program
    pub fn exporter(&self) -> GraphvizExporter {
        match &self.dot_program {
            Some(program) => GraphvizExporter::new(program),
            None => GraphvizExporter::from_env(),
        }
    }

    /// Export settings for the given output directory
    pub fn export_config(&self, output_dir: PathBuf) -> ExportConfig {
        if self.dot_only {
            ExportConfig::dot_only(output_dir)
        } else {
            ExportConfig::default().with_output_dir(output_dir)
        }
    }
}

/// One entry of `--list --json`
#[derive(Serialize)]
struct ListEntry<'a> {
    base_name: &'a str,
    title: &'a str,
    machine: &'a StateMachine,
}

/// Graph export application
#[derive(Debug, Default)]
pub struct ExportApp;

impl ExportApp {
    pub fn new() -> Self {
        Self
    }

    /// Run with the given arguments, printing status to stdout
    pub fn run(&self, cli: ExportCli) -> Result<()> {
        cli.common.init_logging();
        let color = cli.color.enabled();
        self.run_with_output(cli, color, &mut std::io::stdout())
    }

    /// Run without touching logging, writing status lines to `out`
    ///
    /// Individual export failures are reported and do not fail the run.
    pub fn run_with_output(&self, cli: ExportCli, color: bool, out: &mut impl Write) -> Result<()> {
        if cli.common.verbose {
            eprintln!("fsm-export v{}", env!("CARGO_PKG_VERSION"));
        }

        let targets = export_targets()?;

        if cli.list {
            return list_command(&targets, cli.json, out);
        }

        let config = cli.export_config(cli.common.prepare_output_dir()?.to_path_buf());
        let exporter = cli.exporter();
        debug!(exporter = exporter.name(), program = %exporter.program().display(), "Exporter ready");

        let fallback = config.fallback;
        let orchestrator = Orchestrator::new(exporter, config);
        writeln!(out, "{}", BANNER)?;

        let mut write_result = Ok(());
        orchestrator.export_each(&targets, |report| {
            if write_result.is_ok() {
                write_result = write_report(&mut *out, report, fallback, color);
            }
        });
        write_result?;

        writeln!(out, "{}", TRAILER)?;
        Ok(())
    }
}

/// Status lines for one finished export
fn write_report(
    out: &mut impl Write,
    report: &ExportReport,
    fallback: Option<OutputFormat>,
    color: bool,
) -> std::io::Result<()> {
    let file = display_path(&report.primary_path);
    let fallback_name = fallback.map(|f| f.to_string()).unwrap_or_default();
    match &report.outcome {
        ExportOutcome::Primary { path } => {
            let line = format!("Generated: {} ({})", display_path(path), report.title);
            writeln!(out, "{}", paint(&line, Status::Success, color))
        }
        ExportOutcome::Fallback {
            path,
            primary_error,
        } => {
            let error = format!("Error generating {}: {}", file, primary_error);
            let line = format!("Generated {} instead: {}", fallback_name, display_path(path));
            writeln!(out, "{}", paint(&error, Status::Failure, color))?;
            writeln!(out, "{}", paint(&line, Status::Warning, color))
        }
        ExportOutcome::Failed {
            primary_error,
            fallback_error,
        } => {
            let error = format!("Error generating {}: {}", file, primary_error);
            writeln!(out, "{}", paint(&error, Status::Failure, color))?;
            match fallback_error {
                Some(fallback_error) => {
                    let line = format!("{} generation also failed: {}", fallback_name, fallback_error);
                    writeln!(out, "{}", paint(&line, Status::Failure, color))
                }
                None => Ok(()),
            }
        }
    }
}

fn list_command(targets: &[ExportTarget], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let entries: Vec<ListEntry> = targets
            .iter()
            .map(|t| ListEntry {
                base_name: &t.base_name,
                title: &t.title,
                machine: &t.machine,
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    } else {
        writeln!(out, "Exportable state machines:")?;
        for target in targets {
            writeln!(
                out,
                "  {:<14} {} ({} states, {} transitions)",
                target.base_name,
                target.title,
                target.machine.node_count(),
                target.machine.edge_count()
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Total: {} machines", targets.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ExportCli {
        let mut full = vec!["fsm-export"];
        full.extend_from_slice(args);
        ExportCli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let cli = parse(&[]);
        assert!(!cli.dot_only);
        assert!(!cli.list);
        assert_eq!(cli.color, ColorChoice::Auto);
        assert!(cli.dot_program.is_none());
        let config = cli.export_config(PathBuf::from("."));
        assert_eq!(config.primary, OutputFormat::Pdf);
        assert_eq!(config.fallback, Some(OutputFormat::Png));
    }

    #[test]
    fn test_dot_program_flag_wins() {
        let cli = parse(&["--dot-program", "/opt/graphviz/bin/dot"]);
        assert_eq!(
            cli.exporter().program(),
            std::path::Path::new("/opt/graphviz/bin/dot")
        );
    }

    #[test]
    fn test_json_requires_list() {
        let args = ["fsm-export", "--json"];
        assert!(ExportCli::try_parse_from(args).is_err());
        assert!(parse(&["--list", "--json"]).json);
    }

    #[test]
    fn test_list_text() {
        let mut out = Vec::new();
        ExportApp::new()
            .run_with_output(parse(&["--list"]), false, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("request_fsm"));
        assert!(text.contains("Viewing FSM (2 states, 1 transitions)"));
        assert!(text.contains("Total: 3 machines"));
    }

    #[test]
    fn test_list_json() {
        let mut out = Vec::new();
        ExportApp::new()
            .run_with_output(parse(&["--list", "--json"]), false, &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[0]["base_name"], "matching_fsm");
        assert_eq!(value[2]["machine"]["name"], "Viewing FSM");
    }

    #[test]
    fn test_dot_only_run() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&["--dot-only", "--output-dir", dir.path().to_str().unwrap()]);
        let mut out = Vec::new();
        ExportApp::new().run_with_output(cli, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.first(), Some(&BANNER));
        assert_eq!(lines.last(), Some(&TRAILER));
        assert_eq!(lines.iter().filter(|l| l.starts_with("Generated: ")).count(), 3);
        assert!(dir.path().join("viewing_fsm.dot").exists());
    }

    #[test]
    fn test_missing_program_reports_each_machine() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-dot");
        let cli = parse(&[
            "--output-dir",
            dir.path().to_str().unwrap(),
            "--dot-program",
            missing.to_str().unwrap(),
        ]);
        let mut out = Vec::new();
        ExportApp::new().run_with_output(cli, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Error generating ").count(), 3);
        assert_eq!(text.matches("PNG generation also failed: ").count(), 3);
        assert!(text.contains("matching_fsm.pdf"));
        assert!(text.trim_end().ends_with(TRAILER));
    }

    #[test]
    fn test_fallback_lines() {
        let report = ExportReport {
            base_name: "request_fsm".to_string(),
            title: "Request FSM".to_string(),
            primary_path: PathBuf::from("./request_fsm.pdf"),
            outcome: ExportOutcome::Fallback {
                path: PathBuf::from("./request_fsm.png"),
                primary_error: "dot exited".to_string(),
            },
        };
        let mut out = Vec::new();
        write_report(&mut out, &report, Some(OutputFormat::Png), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error generating request_fsm.pdf: dot exited\nGenerated PNG instead: request_fsm.png\n"
        );
    }
}
