use agri_risk_processor::cli::{run, Cli};
use agri_risk_processor::error::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
