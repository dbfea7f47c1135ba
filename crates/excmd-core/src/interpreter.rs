//! Command interpreter
//!
//! [`Interpreter::execute`] is the top-level entry point for typed text. It
//! expands aliases, runs builtins itself and hands everything else to the
//! host's [`Dispatcher`]. `repeat` and `composite` re-enter through an
//! internal path that never touches the last-command slot, so only text the
//! user actually typed can be repeated.

use std::future::Future;
use std::sync::Arc;

use excmd_storage::ConfigStore;

use crate::alias::AliasTable;
use crate::binds::{quickmark_binds, KeyBinds};
use crate::builtin::Builtin;
use crate::error::CoreError;
use crate::invocation::CommandInvocation;
use crate::Result;

/// How deep `repeat`/`composite` may nest before giving up.
const MAX_NESTING: usize = 32;

/// The host side of the interpreter: everything that is not a builtin.
pub trait Dispatcher {
    /// Run one host command to completion.
    fn dispatch(&mut self, invocation: CommandInvocation) -> impl Future<Output = Result<()>>;

    /// Show a message to the user.
    fn echo(&mut self, message: &str) {
        tracing::info!(text = %message, "Echo");
    }

    /// Surface an error from a nested command that did not abort its caller.
    fn report(&mut self, error: &CoreError) {
        tracing::error!(error = %error, "Command failed");
    }

    /// URL of the current page, used by `quickmark` without URLs.
    fn current_url(&self) -> Option<String> {
        None
    }
}

pub struct Interpreter<D> {
    aliases: AliasTable,
    binds: KeyBinds,
    dispatcher: D,
    last_command: Option<String>,
}

impl<D: Dispatcher> Interpreter<D> {
    pub fn new(store: Arc<dyn ConfigStore>, dispatcher: D) -> Self {
        Self {
            aliases: AliasTable::new(store.clone()),
            binds: KeyBinds::new(store),
            dispatcher,
            last_command: None,
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn binds(&self) -> &KeyBinds {
        &self.binds
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// The most recent top-level command other than `repeat`.
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Run a command typed by the user.
    pub async fn execute(&mut self, exstr: &str) -> Result<()> {
        let exstr = exstr.trim();
        let expanded = self.aliases.expand(exstr)?;
        let Some(invocation) = CommandInvocation::parse(&expanded) else {
            return Ok(());
        };

        tracing::debug!(command = %exstr, expanded = %invocation, "Executing");
        let records = invocation.name != "repeat";
        let result = self.run_invocation(invocation, 0).await;

        if records {
            self.last_command = Some(exstr.to_string());
        }
        result
    }

    async fn run(&mut self, exstr: &str, depth: usize) -> Result<()> {
        let expanded = self.aliases.expand(exstr)?;
        match CommandInvocation::parse(&expanded) {
            Some(invocation) => self.run_invocation(invocation, depth).await,
            None => Ok(()),
        }
    }

    async fn run_invocation(&mut self, invocation: CommandInvocation, depth: usize) -> Result<()> {
        if depth > MAX_NESTING {
            return Err(CoreError::NestingTooDeep(MAX_NESTING));
        }

        let Some(builtin) = Builtin::from_invocation(&invocation)? else {
            return self.dispatcher.dispatch(invocation).await;
        };

        match builtin {
            Builtin::Repeat { count, exstr } => {
                let exstr = match exstr {
                    Some(exstr) => exstr,
                    None => self
                        .last_command
                        .clone()
                        .ok_or(CoreError::NothingToRepeat)?,
                };
                for iteration in 1..=count {
                    let result = Box::pin(self.run(&exstr, depth + 1)).await;
                    self.settle(&exstr, iteration, result)?;
                }
                Ok(())
            }
            Builtin::Composite(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    let result = Box::pin(self.run(part, depth + 1)).await;
                    self.settle(part, i + 1, result)?;
                }
                Ok(())
            }
            Builtin::Command {
                name,
                definition: Some(definition),
            } => self.aliases.define(&name, &definition),
            Builtin::Command {
                name,
                definition: None,
            } => {
                let message = match self.aliases.get(&name)? {
                    Some(definition) => format!("command {name} {definition}"),
                    None => format!("No alias named '{name}'"),
                };
                self.dispatcher.echo(&message);
                Ok(())
            }
            Builtin::ComClear(name) => self.aliases.clear(&name),
            Builtin::Bind {
                keys,
                exstr: Some(exstr),
            } => self.binds.bind(&keys, &exstr),
            Builtin::Bind { keys, exstr: None } => {
                let message = match self.binds.get(&keys)? {
                    Some(exstr) => format!("# {keys} = {exstr}"),
                    None => format!("# {keys} is not bound"),
                };
                self.dispatcher.echo(&message);
                Ok(())
            }
            Builtin::Unbind(keys) => self.binds.unbind(&keys),
            Builtin::Quickmark { key, mut urls } => {
                if urls.is_empty() {
                    let url = self.dispatcher.current_url().ok_or_else(|| {
                        CoreError::InvalidArgument {
                            command: "quickmark".to_string(),
                            reason: "no URL given and no current page".to_string(),
                        }
                    })?;
                    urls.push(url);
                }
                for (keys, exstr) in quickmark_binds(&key, &urls) {
                    self.binds.bind(&keys, &exstr)?;
                }
                Ok(())
            }
            Builtin::Sleep(duration) => {
                tokio::time::sleep(duration).await;
                Ok(())
            }
        }
    }

    /// Report a failed nested command and carry on, unless nesting ran away.
    fn settle(&mut self, exstr: &str, step: usize, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e @ CoreError::NestingTooDeep(_)) => Err(e),
            Err(e) => {
                tracing::warn!(command = %exstr, step, error = %e, "Nested command failed");
                self.dispatcher.report(&e);
                Ok(())
            }
        }
    }
}
