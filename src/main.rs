use clap::Parser;
use ferrite_tf::config::{Config, DEFAULT_DIRECTORY};
use miette::Result;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ferrite-tf")]
#[command(about = "finds broken json hiding in terraform heredocs", long_about = None)]
struct Cli {
    /// Folder with terraform files, checked recursively including subdirectories
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DIRECTORY)]
    directory: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FERRITE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    miette::set_panic_hook();
    init_tracing();
    let cli = Cli::parse();
    let config = Config::new(cli.directory);
    let code = ferrite_tf::run(&config, &mut io::stdout().lock())?;
    Ok(ExitCode::from(code))
}
