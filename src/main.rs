//! BridgeKit CLI
//!
//! Rewrites bridge moves in a sliced G-code file.

use std::path::PathBuf;

use clap::Parser;

use bridgekit::{init_logging, load_settings, process_file, settings_schema_json, BUILD_DATE, VERSION};

#[derive(Debug, Parser)]
#[command(name = "bridgekit", version, about = "Pause before bridges and tune their speed, flow and retraction")]
struct Cli {
    /// Sliced G-code file to rewrite
    #[arg(required_unless_present_any = ["print_schema", "print_config"])]
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the settings schema as JSON and exit
    #[arg(long)]
    print_schema: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    tracing::debug!("BridgeKit v{} (built {})", VERSION, BUILD_DATE);

    if cli.print_schema {
        println!("{}", settings_schema_json()?);
        return Ok(());
    }

    let settings = load_settings(cli.config.as_deref())?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    if let Some(input) = cli.input.as_deref() {
        process_file(input, cli.output.as_deref(), &settings)?;
    }

    Ok(())
}
