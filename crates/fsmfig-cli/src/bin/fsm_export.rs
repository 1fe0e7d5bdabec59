//! fsm-export - Export the matching FSMs through Graphviz

use clap::Parser;
use fsmfig_cli::{ExportApp, ExportCli};

fn main() {
    let cli_args = ExportCli::parse();

    if let Err(e) = ExportApp::new().run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
