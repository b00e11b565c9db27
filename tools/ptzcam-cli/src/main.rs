//! PtzCam CLI: pan and tilt every motorized camera by a relative angle.
//!
//! Usage:
//!   ptzcam [PAN] [TILT] [TIME] [WAIT]   Move every camera
//!   ptzcam --list                       Show cameras and their pan/tilt ranges
//!   ptzcam --check                      Check system capabilities

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ptzcam_common::config::AppConfig;
use ptzcam_common::error::PtzError;
use ptzcam_motion::DeviceFilter;

mod args;
mod backend;
mod commands;
mod console;

use args::MotionArgs;
use backend::{Backend, BackendKind};

#[derive(Parser)]
#[command(
    name = "ptzcam",
    about = "Pan and tilt every attached motorized camera by a relative angle",
    version,
    author,
    allow_negative_numbers = true
)]
struct Cli {
    /// Relative pan in degrees
    #[arg(allow_hyphen_values = true)]
    pan: Option<String>,

    /// Relative tilt in degrees
    #[arg(allow_hyphen_values = true)]
    tilt: Option<String>,

    /// Base settle time after each move (ms)
    #[arg(allow_hyphen_values = true)]
    time: Option<String>,

    /// Extra wait per degree of travel (ms)
    #[arg(allow_hyphen_values = true)]
    wait: Option<String>,

    /// Anything after WAIT is ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    ignored: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Load defaults from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera backend
    #[arg(long, value_enum, default_value_t = BackendKind::Auto)]
    backend: BackendKind,

    /// Only move cameras whose name contains this text
    #[arg(long)]
    device: Option<String>,

    /// List cameras and their ranges without moving them
    #[arg(long, conflicts_with = "check")]
    list: bool,

    /// Check system capabilities
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn motion_args(&self) -> MotionArgs<'_> {
        MotionArgs {
            pan: self.pan.as_deref(),
            tilt: self.tilt.as_deref(),
            time: self.time.as_deref(),
            wait: self.wait.as_deref(),
        }
    }

    fn filter(&self) -> DeviceFilter {
        match &self.device {
            Some(needle) => DeviceFilter::name_contains(needle.as_str()),
            None => DeviceFilter::any(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("ERROR: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    ptzcam_common::logging::init_logging(&config.logging);

    match dispatch(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn dispatch(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    if cli.check {
        return commands::check::run();
    }

    let params = cli.motion_args().resolve(config.motion);
    let backend = Backend::select(cli.backend)?;
    if cli.list {
        return match &backend {
            Backend::Native(catalog) => {
                commands::list::run(catalog.as_ref(), params, cli.filter())
            }
            Backend::Simulated(catalog) => commands::list::run(catalog, params, cli.filter()),
        };
    }

    if !cli.ignored.is_empty() {
        tracing::debug!(ignored = ?cli.ignored, "Ignoring extra arguments");
    }
    match &backend {
        Backend::Native(catalog) => commands::run::run(
            catalog.as_ref(),
            ptzcam_common::clock::ThreadPacer,
            params,
            cli.filter(),
        ),
        Backend::Simulated(catalog) => {
            commands::run::run(catalog, catalog.clock().clone(), params, cli.filter())
        }
    }
}

/// The process exit status for a failed run.
///
/// An unreachable enumeration service exits with the low byte of its
/// platform code, or 1 when that byte is zero. Everything else exits 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PtzError>() {
        Some(PtzError::PlatformUnavailable { code, .. }) => match (*code as u32 & 0xFF) as u8 {
            0 => 1,
            low => low,
        },
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptzcam_common::config::MotionParameters;

    #[test]
    fn positionals_accept_negative_angles() {
        let cli = Cli::try_parse_from(["ptzcam", "-90", "-45"]).unwrap();
        assert_eq!(cli.pan.as_deref(), Some("-90"));
        assert_eq!(cli.tilt.as_deref(), Some("-45"));
        assert!(cli.time.is_none());
    }

    #[test]
    fn no_arguments_resolve_to_defaults() {
        let cli = Cli::try_parse_from(["ptzcam"]).unwrap();
        let params = cli.motion_args().resolve(AppConfig::default().motion);
        assert_eq!(params.pan_delta, 180);
        assert_eq!(params.tilt_delta, 180);
        assert_eq!(params.settle_base_ms, 100);
        assert_eq!(params.per_degree_wait_ms, 9);
        assert_eq!(cli.backend, BackendKind::Auto);
    }

    #[test]
    fn unparsable_positional_is_not_a_usage_error() {
        let cli = Cli::try_parse_from(["ptzcam", "left", "up"]).unwrap();
        let params = cli.motion_args().resolve(AppConfig::default().motion);
        assert_eq!((params.pan_delta, params.tilt_delta), (0, 0));
    }

    #[test]
    fn hyphenated_garbage_is_parsed_leniently() {
        let cli = Cli::try_parse_from(["ptzcam", "-5x", "-abc"]).unwrap();
        assert_eq!(cli.pan.as_deref(), Some("-5x"));
        assert_eq!(cli.tilt.as_deref(), Some("-abc"));
        let params = cli.motion_args().resolve(AppConfig::default().motion);
        assert_eq!((params.pan_delta, params.tilt_delta), (-5, 0));
    }

    #[test]
    fn verbose_flag_still_parses_before_positionals() {
        let cli = Cli::try_parse_from(["ptzcam", "-v", "-5x"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.pan.as_deref(), Some("-5x"));
    }

    #[test]
    fn arguments_after_wait_are_ignored() {
        let cli = Cli::try_parse_from(["ptzcam", "10", "20", "30", "4", "5", "extra"]).unwrap();
        assert_eq!(cli.ignored, vec!["5".to_string(), "extra".to_string()]);
        let params = cli.motion_args().resolve(AppConfig::default().motion);
        assert_eq!(params, MotionParameters::new(10, 20, 30, 4));
    }

    #[test]
    fn list_and_check_conflict() {
        assert!(Cli::try_parse_from(["ptzcam", "--list", "--check"]).is_err());
    }

    #[test]
    fn enumeration_failure_exits_with_platform_code() {
        let code = 0x8000_4005_u32 as i32;
        let err = anyhow::Error::from(PtzError::platform_unavailable("gone", code));
        assert_eq!(exit_code_for(&err), 0x05);

        let err = anyhow::Error::from(PtzError::platform_unavailable("gone", 0x100));
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn other_failures_exit_one() {
        let err = anyhow::Error::from(PtzError::unsupported("nope"));
        assert_eq!(exit_code_for(&err), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }
}
