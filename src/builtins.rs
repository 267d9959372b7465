// builtins.rs

use std::env;
use std::io::Write;

use crate::error::ShellError;
use crate::history::History;
use crate::util::writeln_ignore_broken_pipe;

fn emit<S: AsRef<str>>(out: &mut dyn Write, line: S) -> Result<(), ShellError> {
    writeln_ignore_broken_pipe(out, line).map_err(ShellError::Output)
}

/// Whether the run loop should prompt again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Exit,
}

/// Shell state a built-in may touch.
pub struct Context<'a> {
    pub history: &'a mut History,
    pub out: &'a mut dyn Write,
    pub builtins: &'a [&'static str],
}

pub trait Builtin {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[&str], ctx: &mut Context<'_>) -> Result<Status, ShellError>;
}

/// Built-ins in table order. Lookup is a linear scan by exact name.
pub struct Registry {
    commands: Vec<Box<dyn Builtin>>,
}

impl Registry {
    fn empty() -> Self {
        Self { commands: Vec::new() }
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Cd));
        registry.register(Box::new(Pwd));
        registry.register(Box::new(Help));
        registry.register(Box::new(Exit));
        registry.register(Box::new(HistoryCommand));
        registry
    }

    fn register(&mut self, command: Box<dyn Builtin>) {
        self.commands.push(command);
    }

    pub fn find(&self, name: &str) -> Option<&dyn Builtin> {
        self.commands.iter().find(|c| c.name() == name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }
}

pub struct Cd;

impl Builtin for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }
    fn run(&self, args: &[&str], _ctx: &mut Context<'_>) -> Result<Status, ShellError> {
        let target = args.get(1).ok_or(ShellError::MissingArgument("cd"))?;
        env::set_current_dir(target).map_err(|source| ShellError::ChangeDir {
            path: target.to_string(),
            source,
        })?;
        log::debug!("cd -> {}", target);
        Ok(Status::Continue)
    }
}

pub struct Pwd;

impl Builtin for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }
    fn run(&self, _args: &[&str], ctx: &mut Context<'_>) -> Result<Status, ShellError> {
        let cwd = env::current_dir().map_err(ShellError::CurrentDir)?;
        emit(ctx.out, cwd.display().to_string())?;
        Ok(Status::Continue)
    }
}

pub struct Help;

impl Builtin for Help {
    fn name(&self) -> &'static str {
        "help"
    }
    fn run(&self, _args: &[&str], ctx: &mut Context<'_>) -> Result<Status, ShellError> {
        emit(ctx.out, "SimpleShell")?;
        emit(ctx.out, "Type program names and arguments, and hit enter.")?;
        emit(ctx.out, "The following are built-in commands:")?;
        for name in ctx.builtins {
            emit(ctx.out, format!("  {}", name))?;
        }
        emit(ctx.out, "Use the man command for information on other programs.")?;
        Ok(Status::Continue)
    }
}

pub struct Exit;

impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }
    fn run(&self, _args: &[&str], ctx: &mut Context<'_>) -> Result<Status, ShellError> {
        ctx.history.clear();
        Ok(Status::Exit)
    }
}

pub struct HistoryCommand;

impl Builtin for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }
    fn run(&self, _args: &[&str], ctx: &mut Context<'_>) -> Result<Status, ShellError> {
        match ctx.history.print_all(ctx.out) {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            other => other.map_err(ShellError::Output)?,
        }
        Ok(Status::Continue)
    }
}
