use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate text, optionally prefixed with a command such as `$p` or `$r<>`
    Translate {
        /// Text to translate; read from stdin when omitted
        text: Option<String>,

        /// Source language code
        #[arg(short, long, default_value = "auto")]
        from: String,

        /// Target language code
        #[arg(short, long, default_value = "zh_cn")]
        to: String,

        /// Provider to use instead of the configured one
        #[arg(long)]
        provider: Option<String>,

        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,
    },

    /// List the command prefixes that select a translation strategy
    Strategies,

    /// Write a configuration file with default values
    InitConfig {
        /// Output path
        #[arg(default_value = "kotoba.toml")]
        path: PathBuf,
    },
}
