use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use libshock::cli::{self, Cli};

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = cli::run(&args, &mut out).and_then(|()| Ok(out.flush()?));

    if let Err(e) = result {
        eprintln!("hc: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
