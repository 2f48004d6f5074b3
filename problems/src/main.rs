use clap::Parser;
use sema::{logger, teletype::Console};
use std::process::ExitCode;
use sync_problems::cli::{self, Args};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli::clap_exit_code(&e));
        }
    };
    if let Err(e) = logger::init(logger::level_for(args.verbose, args.quiet)) {
        eprintln!("failed to install logger: {e}");
    }

    match cli::execute(&args, Console::new()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_invocation() {
                tracing::debug!(error = ?e, "invalid invocation");
            } else {
                tracing::error!(error = ?e, "run failed");
            }
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
