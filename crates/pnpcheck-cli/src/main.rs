use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

mod error;
mod run;

use error::ErrorCode;

/// Visual QA for pick-and-place centroid files: renders each board side as an
/// image of component rectangles sized from footprint libraries, with pin-1
/// markers and reference labels.
#[derive(Parser, Debug)]
#[command(name = "pnpcheck", version, about)]
pub struct Cli {
    /// KiCad centroid (.pos) file
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Footprint library location: a `.pretty` directory or a parent
    /// directory of `.pretty` directories. Comma-separated, repeatable;
    /// searched in order.
    #[arg(long = "lib", value_name = "PATHS", value_delimiter = ',')]
    pub libs: Vec<PathBuf>,

    /// Output image for the top side
    #[arg(long, value_name = "PNG")]
    pub top: Option<PathBuf>,

    /// Output image for the bottom side
    #[arg(long, value_name = "PNG")]
    pub bottom: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let code = match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => ErrorCode::Usage as i32,
        };
        let _ = err.print();
        std::process::exit(code);
    });

    init_tracing(cli.debug);

    if let Err(err) = run::run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(err.code as i32);
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
