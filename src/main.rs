use clap::Parser;
use tascreen::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
