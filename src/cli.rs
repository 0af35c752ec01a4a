#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const DEFAULT_BUTTONS: [&str; 4] = ["Projects", "Writing", "About", "Contact"];

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "terminal-lightning",
    version,
    about = "Animated lightning storm for the terminal"
)]
pub struct Cli {
    /// Target FPS (15..60)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Silence the thunder cue
    #[arg(long)]
    pub mute: bool,

    /// Seed for a reproducible storm
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tuning file (JSON); falls back to $TERMINAL_LIGHTNING_CONFIG
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file (RUST_LOG sets the filter)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Button label; repeat for several buttons
    #[arg(long = "button", value_name = "LABEL")]
    pub buttons: Vec<String>,

    /// Skip the two opening strikes
    #[arg(long)]
    pub no_intro: bool,
}

impl Cli {
    #[must_use]
    pub fn button_labels(&self) -> Vec<String> {
        if self.buttons.is_empty() {
            DEFAULT_BUTTONS.iter().map(ToString::to_string).collect()
        } else {
            self.buttons.clone()
        }
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}
