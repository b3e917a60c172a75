use anyhow::Result;
use clap::Parser;
use flashkit_core::cli::{Cli, Command};
use flashkit_core::errors::FlashError;
use flashkit_hal::toolchain::locate_tool;
use flashkit_hal::{FastbootHal, Toolchain};
use flashkit_workflow::clock::SystemClock;
use flashkit_workflow::{extract, session};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_DUMPER: &str = "payload-dumper-go";

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    flashkit_core::logging::init_with(cli.log_file.clone());

    match &cli.command {
        Command::Extract {
            payload,
            output,
            dumper,
        } => {
            log::info!("📦 Extracting update payload...");
            let dumper = resolve_dumper(&cli, dumper.as_deref())?;
            let hal = FastbootHal::new(Toolchain::default().with_payload_dumper(dumper));
            extract::run_extract(&hal, payload, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Flash {
            image_dir,
            dynamic_partitions,
            adb,
            fastboot,
            report,
        } => {
            log::info!("💾 Running full-image flash...");
            let tools = device_toolchain(&cli, adb.as_deref(), fastboot.as_deref())?;
            let hal = FastbootHal::new(tools);
            let config = session::SessionConfig::new(image_dir.clone(), *dynamic_partitions);

            let session_report = session::run_full_flash(&hal, &SystemClock, &config);

            log::info!("📋 Session {}", session_report);
            for outcome in &session_report.outcomes {
                if !outcome.succeeded {
                    log::warn!(
                        "⚠️  Partition {} failed: {}",
                        outcome.partition,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            if let Some(path) = report {
                session_report.write_json(path)?;
                log::info!("📝 Report written to {}", path.display());
            }

            Ok(if session_report.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Resolve adb/fastboot into an explicit toolchain. CLI overrides win; otherwise PATH,
/// then the bundled tools directory.
fn device_toolchain(cli: &Cli, adb: Option<&Path>, fastboot: Option<&Path>) -> Result<Toolchain> {
    let mut tools = match (adb, fastboot) {
        (Some(adb), Some(fastboot)) => {
            Toolchain::new(adb.to_path_buf(), fastboot.to_path_buf())
        }
        _ => {
            let path_env = std::env::var("PATH").unwrap_or_default();
            Toolchain::locate(&path_env, cli.bundled_tools.as_deref())
                .map_err(|err| FlashError::ToolUnavailable(err.to_string()))?
        }
    };
    if let Some(adb) = adb {
        tools.adb = adb.to_path_buf();
    }
    if let Some(fastboot) = fastboot {
        tools.fastboot = fastboot.to_path_buf();
    }
    Ok(tools)
}

/// An explicit dumper path must exist; otherwise the default name is located on PATH or
/// in the bundled tools directory.
fn resolve_dumper(cli: &Cli, dumper: Option<&Path>) -> Result<PathBuf> {
    if let Some(dumper) = dumper {
        if !dumper.is_file() {
            return Err(FlashError::ToolUnavailable(format!(
                "payload dumper not found: {}",
                dumper.display()
            ))
            .into());
        }
        return Ok(dumper.to_path_buf());
    }

    let path_env = std::env::var("PATH").unwrap_or_default();
    locate_tool(DEFAULT_DUMPER, &path_env, cli.bundled_tools.as_deref()).ok_or_else(|| {
        FlashError::ToolUnavailable(format!("{} not found on PATH", DEFAULT_DUMPER)).into()
    })
}
