//! `fsm-figure`: draw the hand-placed matching-module figure

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use fsmfig::plugins::figure::{generate_figure, FigureConfig};
use tracing::debug;

use crate::cli::{display_path, CommonArgs};

/// Draw the matching-module state machine as a PDF figure
#[derive(Parser, Debug)]
#[command(name = "fsm-figure")]
#[command(about = "Draw the matching-module FSM as a hand-placed PDF figure")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct FigureCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Figure generator application
#[derive(Debug, Default)]
pub struct FigureApp;

impl FigureApp {
    pub fn new() -> Self {
        Self
    }

    /// Run with the given arguments, printing status to stdout
    pub fn run(&self, cli: FigureCli) -> Result<()> {
        cli.common.init_logging();
        self.run_with_output(cli, &mut std::io::stdout())
    }

    /// Run without touching logging, writing status lines to `out`
    pub fn run_with_output(&self, cli: FigureCli, out: &mut impl Write) -> Result<()> {
        if cli.common.verbose {
            eprintln!("fsm-figure v{}", env!("CARGO_PKG_VERSION"));
        }

        let config = FigureConfig {
            output_dir: cli.common.prepare_output_dir()?.to_path_buf(),
            ..FigureConfig::default()
        };
        debug!(path = %config.output_path().display(), "Generating figure");

        let path = generate_figure(&config)?;
        writeln!(out, "FSM diagram generated: {}", display_path(&path))?;
        Ok(())
    }
}
