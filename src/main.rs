//! `u-explore <csv_file>`: print a profile of the file and write its charts
//! to the current directory.

use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use u_explore::config::ExploreConfig;
use u_explore::pipeline;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut args = std::env::args().skip(1);
    let (Some(source), None) = (args.next(), args.next()) else {
        eprintln!("usage: u-explore <csv_file>");
        return ExitCode::from(2);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match pipeline::run(&source, &ExploreConfig::default(), &mut out) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!(
                "error: {} artifact(s) could not be written",
                report.failures.len()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: failed to explore {source}: {e}");
            ExitCode::FAILURE
        }
    }
}
