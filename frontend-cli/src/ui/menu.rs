//! Command dispatch and the interactive menu loop.

use crate::ui::process_table::ProcessTable;
use crate::ui::status_bar::StatusBar;
use backend::Engine;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    KillPid(i32),
    KillName(String),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    List,
    KillPid,
    KillName,
    Exit,
}

pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim().parse::<u32>().ok()? {
        1 => Some(MenuChoice::List),
        2 => Some(MenuChoice::KillPid),
        3 => Some(MenuChoice::KillName),
        4 => Some(MenuChoice::Exit),
        _ => None,
    }
}

pub fn parse_pid(input: &str) -> Option<i32> {
    input.trim().parse::<i32>().ok().filter(|pid| *pid > 0)
}

/// Runs one command against the engine and prints its result.
/// Returns whether the operation succeeded.
pub fn dispatch<W: Write>(engine: &Engine, command: &Command, out: &mut W) -> io::Result<bool> {
    match command {
        Command::List => {
            let (processes, ok) = match engine.list_processes() {
                Ok(processes) => (processes, true),
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;
                    (Vec::new(), false)
                }
            };
            let table = ProcessTable::new(engine.config().group_by_name);
            write!(out, "{}", table.render(&processes))?;
            writeln!(out, "{}", StatusBar::render(&processes))?;
            Ok(ok)
        }
        Command::KillPid(pid) => {
            let outcome = engine.terminate(*pid);
            writeln!(out, "Process {}: {}", pid, outcome)?;
            Ok(outcome.is_success())
        }
        Command::KillName(name) => match engine.terminate_by_name(name) {
            Ok(summary) if summary.matched == 0 => {
                writeln!(out, "No process named \"{}\" found.", name)?;
                Ok(true)
            }
            Ok(summary) => {
                for (pid, outcome) in &summary.outcomes {
                    writeln!(out, "Process {}: {}", pid, outcome)?;
                }
                writeln!(
                    out,
                    "\nSummary: {} terminated, {} failed.",
                    summary.succeeded, summary.failed
                )?;
                Ok(summary.failed == 0)
            }
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                Ok(false)
            }
        },
        Command::Exit => {
            writeln!(out, "Exiting.")?;
            Ok(true)
        }
    }
}

pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Loops until the exit choice or end of input.
    pub fn run(&mut self, engine: &Engine) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            let Some(command) = self.command_for(&line)? else {
                continue;
            };
            dispatch(engine, &command, &mut self.output)?;
            if command == Command::Exit {
                return Ok(());
            }
        }
    }

    fn command_for(&mut self, line: &str) -> io::Result<Option<Command>> {
        let command = match parse_choice(line) {
            Some(MenuChoice::List) => Some(Command::List),
            Some(MenuChoice::KillPid) => {
                let answer = self.prompt("Enter the PID: ")?;
                match answer.as_deref().and_then(parse_pid) {
                    Some(pid) => Some(Command::KillPid(pid)),
                    None => {
                        writeln!(self.output, "Invalid PID.")?;
                        None
                    }
                }
            }
            Some(MenuChoice::KillName) => {
                let answer = self.prompt("Enter the process name: ")?;
                match answer.as_deref().map(str::trim) {
                    Some(name) if !name.is_empty() => Some(Command::KillName(name.to_string())),
                    _ => {
                        writeln!(self.output, "Invalid name.")?;
                        None
                    }
                }
            }
            Some(MenuChoice::Exit) => Some(Command::Exit),
            None => {
                writeln!(self.output, "Invalid option. Please try again.")?;
                None
            }
        };
        Ok(command)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Process Monitor ---")?;
        writeln!(self.output, "1. List processes")?;
        writeln!(self.output, "2. Terminate process by PID")?;
        writeln!(self.output, "3. Terminate all processes by name")?;
        writeln!(self.output, "4. Exit")?;
        write!(self.output, "Choose an option: ")?;
        self.output.flush()
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::EngineConfig;
    use std::fs;
    use std::time::Duration;

    fn fake_engine(root: &std::path::Path) -> Engine {
        let dir = root.join("4321");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("comm"), "sleepy\n").unwrap();
        fs::write(dir.join("status"), "Name:\tsleepy\nVmRSS:\t2048 kB\n").unwrap();
        Engine::new(
            EngineConfig::default()
                .with_proc_root(root)
                .with_grace_period(Duration::ZERO)
                .with_group_by_name(false),
        )
    }

    fn run_menu(engine: &Engine, input: &str) -> String {
        let mut output = Vec::new();
        Menu::new(input.as_bytes(), &mut output).run(engine).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn choices_map_to_closed_command_set() {
        assert_eq!(parse_choice("1\n"), Some(MenuChoice::List));
        assert_eq!(parse_choice(" 3 "), Some(MenuChoice::KillName));
        assert_eq!(parse_choice("4"), Some(MenuChoice::Exit));
        assert_eq!(parse_choice("5"), None);
        assert_eq!(parse_choice("list"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn pid_input_must_be_positive() {
        assert_eq!(parse_pid("1234\n"), Some(1234));
        assert_eq!(parse_pid("0"), None);
        assert_eq!(parse_pid("-1"), None);
        assert_eq!(parse_pid("12ab"), None);
    }

    #[test]
    fn list_then_exit() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = fake_engine(tmp.path());
        let output = run_menu(&engine, "1\n4\n");

        assert!(output.contains("sleepy"));
        assert!(output.contains("4321"));
        assert!(output.contains("2048.00"));
        assert!(output.contains("Total processes: 1"));
        assert!(output.ends_with("Exiting.\n"));
    }

    #[test]
    fn invalid_input_reprompts_until_end_of_input() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = fake_engine(tmp.path());
        let output = run_menu(&engine, "abc\n9\n2\nnot-a-pid\n");

        assert_eq!(output.matches("Invalid option").count(), 2);
        assert!(output.contains("Invalid PID."));
        assert_eq!(output.matches("--- Process Monitor ---").count(), 4);
    }

    #[test]
    fn unknown_name_is_reported_as_no_match() {
        let engine = Engine::new(EngineConfig::default().with_grace_period(Duration::ZERO));
        let output = run_menu(&engine, "3\nno-such-process-name\n4\n");

        assert!(output.contains("No process named \"no-such-process-name\" found."));
    }

    #[test]
    fn name_termination_on_a_fixture_root_is_refused() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = fake_engine(tmp.path());
        let mut output = Vec::new();

        let ok = dispatch(&engine, &Command::KillName("sleepy".to_string()), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(!ok);
        assert!(output.starts_with("Error: Refusing to signal host processes"));
    }

    #[test]
    fn unreadable_root_lists_nothing_with_a_diagnostic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = Engine::new(EngineConfig::default().with_proc_root(tmp.path().join("gone")));
        let mut output = Vec::new();

        let ok = dispatch(&engine, &Command::List, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(!ok);
        assert!(output.starts_with("Error: Failed to read process root"));
        assert!(output.contains("Total processes: 0"));
    }

    #[test]
    fn killing_a_nonexistent_pid_reports_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = fake_engine(tmp.path());
        let mut output = Vec::new();

        let ok = dispatch(&engine, &Command::KillPid(i32::MAX), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(!ok);
        assert!(!output.contains("Sending"));
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with(&format!("Process {}: failed to send SIGTERM", i32::MAX)));
    }

    #[test]
    fn refused_pid_prints_only_the_outcome() {
        let engine = Engine::new(EngineConfig::default().with_grace_period(Duration::ZERO));
        let mut output = Vec::new();

        let ok = dispatch(&engine, &Command::KillPid(0), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(!ok);
        assert_eq!(
            output,
            "Process 0: failed to send SIGTERM: Invalid PID 0: must be a positive integer\n"
        );
    }
}
