//! Command dispatch logic for progress-relay

use super::{DemoArgs, InitArgs, ValidateArgs, init_config, run_demo, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "progress-relay", author, version, long_about = None)]
#[command(about = "Relay the progress of long-running jobs as a stream of JSON messages")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: RelaySubcommand,
}

#[derive(Subcommand, Debug)]
enum RelaySubcommand {
    /// Run a simulated document job and stream its progress as NDJSON
    Demo(Box<DemoArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        RelaySubcommand::Demo(demo_args) => run_demo(host, demo_args).await,
        RelaySubcommand::Init(init_args) => init_config(host, init_args),
        RelaySubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["progress-relay", "demo", "--pages", "2", "--fail-at", "1"]).unwrap();
        assert!(matches!(cli.command, RelaySubcommand::Demo(ref args) if args.pages == 2 && args.fail_at == Some(1)));

        let cli = Cli::try_parse_from(["progress-relay", "init", "out.toml"]).unwrap();
        assert!(matches!(cli.command, RelaySubcommand::Init(ref args) if args.output.as_ref().is_some_and(|p| p.as_str() == "out.toml")));

        let cli = Cli::try_parse_from(["progress-relay", "validate", "-c", "relay.toml"]).unwrap();
        assert!(matches!(cli.command, RelaySubcommand::Validate(ref args) if args.config.is_some()));
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["progress-relay", "serve"]).is_err());
    }
}
