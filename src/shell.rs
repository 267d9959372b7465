// shell.rs

use std::io::Write;

use crate::builtins::{Context, Registry, Status};
use crate::config::Config;
use crate::error::ShellError;
use crate::history::History;
use crate::launcher;
use crate::parser::split_line;
use crate::reader::LineSource;

/// Run-loop state: the built-in table, the history log and the output streams.
pub struct Shell<O: Write, E: Write> {
    prompt: String,
    registry: Registry,
    builtin_names: Vec<&'static str>,
    history: History,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Shell<O, E> {
    pub fn new(config: &Config, out: O, err: E) -> Self {
        let registry = Registry::standard();
        let builtin_names = registry.names();
        Self {
            prompt: config.prompt.clone(),
            registry,
            builtin_names,
            history: History::new(config.history_capacity),
            out,
            err,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn builtin_names(&self) -> &[&'static str] {
        &self.builtin_names
    }

    /// Prompts, reads and executes lines until `exit` or end of input.
    ///
    /// Only fatal errors are returned; anything else has already been reported.
    pub fn run(&mut self, input: &mut dyn LineSource) -> Result<(), ShellError> {
        loop {
            let Some(line) = input.read_line(&self.prompt)? else {
                log::debug!("end of input");
                self.history.clear();
                return Ok(());
            };
            if self.execute_line(&line)? == Status::Exit {
                return Ok(());
            }
        }
    }

    /// Records `line` in the history, then tokenizes and dispatches it.
    pub fn execute_line(&mut self, line: &str) -> Result<Status, ShellError> {
        self.history.record(line);
        let args = split_line(line)?;
        log::trace!("args: {:?}", args);
        self.dispatch(&args)
    }

    pub fn dispatch(&mut self, args: &[&str]) -> Result<Status, ShellError> {
        let Some(&name) = args.first() else {
            return Ok(Status::Continue);
        };
        let result = match self.registry.find(name) {
            Some(builtin) => {
                log::debug!("builtin {}", name);
                let mut ctx = Context {
                    history: &mut self.history,
                    out: &mut self.out,
                    builtins: &self.builtin_names,
                };
                builtin.run(args, &mut ctx)
            }
            None => {
                // The child shares our stdout; anything buffered must go out first.
                if let Err(e) = self.out.flush() {
                    log::warn!("flushing output before launch: {}", e);
                }
                launcher::launch(args).map(|_| Status::Continue)
            }
        };
        match result {
            Ok(status) => Ok(status),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.report(&e);
                Ok(Status::Continue)
            }
        }
    }

    fn report(&mut self, error: &ShellError) {
        if let Err(e) = writeln!(self.err, "SimpleShell: {}", error) {
            log::warn!("dropped diagnostic {:?}: {}", error.to_string(), e);
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StreamReader;
    use serial_test::serial;
    use std::io::Cursor;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from_raw_os_error(libc::ENOSPC))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn shell() -> Shell<Vec<u8>, Vec<u8>> {
        Shell::new(&Config::default(), Vec::new(), Vec::new())
    }

    fn run_script(script: &str) -> (String, String) {
        let mut shell = shell();
        let mut input = StreamReader::new(Cursor::new(script.to_string()), std::io::sink());
        shell.run(&mut input).unwrap();
        let (out, err) = shell.into_parts();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn empty_args_are_a_no_op() {
        let mut shell = shell();
        assert_eq!(shell.dispatch(&[]).unwrap(), Status::Continue);
        let (out, err) = shell.into_parts();
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn blank_lines_are_recorded() {
        let mut shell = shell();
        assert_eq!(shell.execute_line("   ").unwrap(), Status::Continue);
        assert_eq!(shell.history().iter().collect::<Vec<_>>(), vec!["   "]);
    }

    #[test]
    fn history_includes_its_own_invocation() {
        let mut shell = shell();
        shell.execute_line("help").unwrap();
        shell.execute_line("history").unwrap();
        let (out, _) = shell.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("1 help\n2 history\n"));
    }

    #[test]
    fn help_history_exit_scenario() {
        let (out, err) = run_script("help\nhistory\nexit\nhelp\n");
        assert!(err.is_empty());
        assert_eq!(out.matches("The following are built-in commands:").count(), 1);
        assert!(out.contains("  cd\n  pwd\n  help\n  exit\n  history\n"));
        assert!(out.ends_with("1 help\n2 history\n"));
    }

    #[test]
    fn exit_terminates_and_clears_history() {
        let mut shell = shell();
        shell.execute_line("pwd").unwrap();
        assert_eq!(shell.execute_line("exit").unwrap(), Status::Exit);
        assert!(shell.history().is_empty());
    }

    #[test]
    #[serial]
    fn cd_without_argument_reports_one_line() {
        let before = std::env::current_dir().unwrap();
        let (_, err) = run_script("cd\n");
        assert_eq!(err, "SimpleShell: expected argument to \"cd\"\n");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn unknown_program_reports_one_line_and_continues() {
        let (out, err) = run_script("no-such-program-for-simpleshell --flag\nhistory\n");
        assert_eq!(err.lines().count(), 1);
        assert!(err.starts_with("SimpleShell: error creating process `no-such-program-for-simpleshell`"));
        assert!(out.contains("2 history\n"));
    }

    #[test]
    fn end_of_input_stops_the_loop() {
        let mut shell = shell();
        let mut input = StreamReader::new(Cursor::new("help\n"), std::io::sink());
        shell.run(&mut input).unwrap();
        assert!(shell.history().is_empty());
    }

    #[test]
    fn history_capacity_comes_from_config() {
        let config = Config { history_capacity: 2, ..Config::default() };
        let mut shell = Shell::new(&config, Vec::new(), Vec::new());
        for line in ["help a", "help b", "help c"] {
            shell.execute_line(line).unwrap();
        }
        assert_eq!(shell.history().iter().collect::<Vec<_>>(), vec!["help b", "help c"]);
    }

    #[test]
    fn failed_builtin_output_is_reported_and_loop_continues() {
        let mut shell = Shell::new(&Config::default(), FullDisk, Vec::new());
        for line in ["pwd", "help", "history"] {
            assert_eq!(shell.execute_line(line).unwrap(), Status::Continue);
        }
        let (_, err) = shell.into_parts();
        let err = String::from_utf8(err).unwrap();
        assert_eq!(err.lines().count(), 3);
        assert!(err.lines().all(|l| l.starts_with("SimpleShell: write error: ")));
    }

    #[test]
    fn huge_history_capacity_does_not_allocate_up_front() {
        let config = Config { history_capacity: usize::MAX, ..Config::default() };
        let mut shell = Shell::new(&config, Vec::new(), Vec::new());
        shell.execute_line("help").unwrap();
        assert_eq!(shell.history().len(), 1);
    }
}
