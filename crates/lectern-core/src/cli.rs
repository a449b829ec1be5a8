use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lectern",
    version,
    about = "Lectern: terminal lecture-schedule viewer",
    infer_subcommands = true,
    arg_required_else_help = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Log in and store a session token")]
    Login { username: String, password: String },

    #[command(about = "Create an account and log in")]
    Register(RegisterArgs),

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami,

    #[command(about = "List lecture groups")]
    Groups,

    #[command(about = "Switch to the day view, optionally jumping to a date")]
    Day { date: Option<String> },

    #[command(about = "Switch to the week view, optionally jumping to a date")]
    Week { date: Option<String> },

    #[command(about = "Switch to the month view, optionally jumping to a date")]
    Month { date: Option<String> },

    #[command(about = "Render the current view again")]
    Show,

    #[command(about = "Step forward one day, week, or month")]
    Next,

    #[command(about = "Step back one day, week, or month")]
    Prev,

    #[command(about = "Jump to a date in the day view")]
    Goto { date: String },

    #[command(about = "Filter lectures by group id or name")]
    Group {
        selector: Option<String>,

        #[arg(long, conflicts_with = "selector")]
        clear: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: i64,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
