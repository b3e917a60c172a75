//! CLI argument parsing for flashkit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flashkit")]
#[command(about = "🔦 flashkit - fastboot full-image flashing and payload extraction")]
#[command(long_about = "🔦 flashkit - fastboot full-image flashing and payload extraction\n\n\
    Extract partition images from a vendor update payload, then flash every\n\
    <partition>.img in a directory onto the connected device. The file name is\n\
    the flash target; there is no manifest.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory with bundled adb/fastboot binaries, used when the tools are not on PATH
    #[arg(long, global = true)]
    pub bundled_tools: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// 📦 Extract partition images from an update payload archive
    Extract {
        /// Path to the payload archive
        #[arg(long, default_value = "pyld/payload.bin")]
        payload: PathBuf,

        /// Directory to write extracted images into (created if missing)
        #[arg(long, default_value = "image")]
        output: PathBuf,

        /// Path to the payload dumper executable (located on PATH when omitted)
        #[arg(long)]
        dumper: Option<PathBuf>,
    },

    /// 💾 Flash every partition image in a directory onto the device
    Flash {
        /// Directory of <partition>.img files; each file name is its flash target
        #[arg(long, default_value = "image")]
        image_dir: PathBuf,

        /// Reboot into fastbootd first (required for dynamic partitions such as system/vendor)
        #[arg(long)]
        dynamic_partitions: bool,

        /// Override the adb executable path
        #[arg(long)]
        adb: Option<PathBuf>,

        /// Override the fastboot executable path
        #[arg(long)]
        fastboot: Option<PathBuf>,

        /// Write the session report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}
