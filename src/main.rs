use clap::Parser;
use tosquote::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
