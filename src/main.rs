use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Status for an invalid command line.
const USAGE_EXIT: u8 = 2;

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match my_ls::cli::parse_args(std::env::args_os()) {
        Ok(invocation) => my_ls::list_files(invocation),
        Err(err) => {
            eprintln!("my-ls: {}", err);
            ExitCode::from(USAGE_EXIT)
        }
    }
}
