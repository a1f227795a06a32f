use anyhow::{Context, Result};
use backend::{Engine, EngineConfig, StatParsing, DEFAULT_PROC_ROOT};
use clap::{Parser, Subcommand};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use ui::menu::{dispatch, Command, Menu};

mod ui;

#[derive(Parser, Debug)]
#[command(name = "proc-reaper", version, about = "List running processes and terminate them by PID or name")]
struct Cli {
    /// Root of the process pseudo-filesystem
    #[arg(long, env = "PROC_REAPER_PROC_ROOT", default_value = DEFAULT_PROC_ROOT)]
    proc_root: PathBuf,

    /// Milliseconds to wait after each signal before checking the process is gone
    #[arg(long, env = "PROC_REAPER_GRACE_MS", default_value_t = 1000)]
    grace_ms: u64,

    /// Only send SIGTERM, never escalate to SIGKILL
    #[arg(long, env = "PROC_REAPER_NO_ESCALATE")]
    no_escalate: bool,

    /// List processes in enumeration order instead of grouped by name
    #[arg(long, env = "PROC_REAPER_FLAT")]
    flat: bool,

    /// Read CPU ticks by literal field position in the stat record
    #[arg(long, env = "PROC_REAPER_POSITIONAL_STAT")]
    positional_stat: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print one process table and exit
    List,
    /// Terminate one process
    Kill { pid: i32 },
    /// Terminate every process with this name
    KillName {
        #[arg(value_parser = parse_name)]
        name: String,
    },
    /// Interactive menu (default)
    Menu,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let stat_parsing = if self.positional_stat {
            StatParsing::Positional
        } else {
            StatParsing::AfterComm
        };
        EngineConfig::default()
            .with_proc_root(self.proc_root.clone())
            .with_grace_period(Duration::from_millis(self.grace_ms))
            .with_escalate(!self.no_escalate)
            .with_group_by_name(!self.flat)
            .with_stat_parsing(stat_parsing)
    }
}

/// Rejects blank names, which would match every process whose `comm` is unreadable.
fn parse_name(input: &str) -> Result<String, String> {
    let name = input.trim();
    if name.is_empty() {
        return Err("process name must not be blank".to_string());
    }
    Ok(name.to_string())
}

fn init_logging(debug_mode: bool) {
    let default_level = if debug_mode { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if debug_mode {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!("Command line: {:?}", cli);

    let config = cli.engine_config();
    debug!("Engine config: {:?}", config);
    let engine = Engine::new(config);

    let command = match cli.command {
        Some(CliCommand::List) => Command::List,
        Some(CliCommand::Kill { pid }) => Command::KillPid(pid),
        Some(CliCommand::KillName { name }) => Command::KillName(name),
        Some(CliCommand::Menu) | None => {
            let stdin = io::stdin();
            Menu::new(stdin.lock(), io::stdout())
                .run(&engine)
                .context("menu loop failed")?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let succeeded = dispatch(&engine, &command, &mut io::stdout().lock())
        .context("failed to write output")?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
