use crate::config::toml_config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "landing-gate")]
#[command(about = "Waitlist intake, sitemap and cookie consent for the landing site")]
pub struct CliConfig {
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH, help = "Path to landing.toml")]
    pub config: PathBuf,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API (/api/waitlist, /api/sitemap)
    Serve {
        #[arg(long, help = "Keep waitlist entries in memory instead of Supabase")]
        memory: bool,

        #[arg(long, help = "Override server.listen_addr")]
        listen: Option<String>,
    },

    /// Write sitemap.xml to a file
    Sitemap {
        #[arg(long, short, default_value = "public/sitemap.xml")]
        output: PathBuf,
    },

    /// Submit a waitlist entry to a running API
    Join {
        #[arg(long, default_value = "http://localhost:8080")]
        endpoint: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        practice: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long = "interest")]
        interests: Vec<String>,
    },

    /// Inspect or change the local cookie consent profile
    Consent {
        #[command(subcommand)]
        action: ConsentAction,
    },

    /// Load and validate the configuration file
    CheckConfig,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConsentAction {
    Status,
    Accept,
    Reject,
    Custom {
        #[arg(long)]
        analytics: bool,

        #[arg(long)]
        marketing: bool,
    },
    /// Forget the stored consent
    Reset,
}
