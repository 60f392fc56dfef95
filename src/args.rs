// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::{ArgAction, Parser};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use bldd::{Capacity, OutputRequest, ReportFormat};

#[derive(Parser)]
#[command(name = "bldd")]
#[command(version)]
#[command(about = "bldd (backward ldd) - Find executables that use specific shared libraries")]
#[command(after_help = "Examples:\n  \
    bldd --lib libc.so.6 --dir /usr/bin --format txt\n  \
    bldd --lib libpthread.so --lib libm.so --dir /usr/local/bin\n  \
    bldd --lib libc.so.6 --dir /home --format pdf")]
pub(crate) struct Args {
    /// Shared library to search for (can be specified multiple times).
    #[arg(short = 'l', long = "lib", value_name = "LIB", required = true)]
    pub libs: Vec<String>,

    /// Directory to scan for executables.
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Output report format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Txt)]
    pub format: ReportFormat,

    /// Output file name without extension.
    #[arg(short, long, value_name = "FILENAME", default_value = "bldd_report")]
    pub output: PathBuf,

    /// Also write the aggregated results as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Number of worker threads used for probing (default: one per CPU).
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,

    #[arg(
        long,
        value_name = "N",
        long_help = "Maximum number of architectures to aggregate.\n\
                Facts for further architectures are dropped and reported once."
    )]
    pub max_architectures: Option<usize>,

    /// Maximum number of libraries per architecture.
    #[arg(long, value_name = "N")]
    pub max_libraries: Option<usize>,

    /// Maximum number of executables per library.
    #[arg(long, value_name = "N")]
    pub max_executables: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub(crate) fn capacity(&self) -> Capacity {
        Capacity {
            max_architectures: self.max_architectures,
            max_libraries: self.max_libraries,
            max_executables: self.max_executables,
        }
    }

    pub(crate) fn output_request(&self) -> OutputRequest {
        OutputRequest {
            format: self.format,
            base: self.output.clone(),
            json: self.json.clone(),
        }
    }

    pub(crate) fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
