//! fsm-figure - Draw the matching-module FSM as a PDF figure

use clap::Parser;
use fsmfig_cli::{FigureApp, FigureCli};

fn main() {
    let cli_args = FigureCli::parse();

    if let Err(e) = FigureApp::new().run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
