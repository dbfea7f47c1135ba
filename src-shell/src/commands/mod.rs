//! Host commands
//!
//! Everything that is not an interpreter builtin lands here. Each command
//! is parsed into a [`HostCommand`] before it touches any state.

pub mod navigation;
pub mod settings;
pub mod tabs;

use excmd_core::{
    CommandInvocation, CoreError, Dispatcher, OrdinalReference, Result, UrlModifyMode,
};

use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum HostCommand {
    Open(String),
    TabOpen { background: bool, target: String },
    WinOpen(String),
    Buffer(OrdinalReference),
    /// No references means the active tab
    TabClose(Vec<OrdinalReference>),
    TabOnly,
    Pin,
    TabNext(i64),
    TabPrev(i64),
    TabFirst,
    TabLast,
    TabMove(String),
    Tabs,
    UrlModify(UrlModifyMode),
    UrlIncrement(i64),
    UrlRoot,
    UrlParent(usize),
    /// Echo `<prefix> <current url>`
    CurrentUrl(String),
    Home,
    /// Navigate to a search through one named provider
    Search { keyword: String, query: String },
    SearchSetKeyword { keyword: String, url: String },
    Bmark { url: Option<String>, title: String },
    ComList,
    BindList,
}

impl HostCommand {
    pub fn parse(invocation: &CommandInvocation) -> Result<Self> {
        let name = invocation.name.as_str();
        let args = invocation.args.as_slice();
        let arity = |expected: &'static str| CoreError::Arity {
            command: name.to_string(),
            expected,
        };
        let count = |default: i64| -> Result<i64> {
            match args {
                [] => Ok(default),
                [n] => n.parse().map_err(|_| CoreError::InvalidArgument {
                    command: name.to_string(),
                    reason: format!("'{n}' is not a number"),
                }),
                _ => Err(arity("at most one count")),
            }
        };
        let no_args = |command: HostCommand| {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(arity("no arguments"))
            }
        };

        match name {
            "open" => Ok(HostCommand::Open(invocation.arg_string())),
            "tabopen" => {
                let (background, rest) = match args.split_first() {
                    Some((flag, rest)) if flag == "-b" => (true, rest),
                    _ => (false, args),
                };
                Ok(HostCommand::TabOpen {
                    background,
                    target: rest.join(" "),
                })
            }
            "winopen" => Ok(HostCommand::WinOpen(invocation.arg_string())),
            "buffer" => match args {
                [reference] => Ok(HostCommand::Buffer(reference.parse()?)),
                _ => Err(arity("exactly one tab ordinal")),
            },
            "tabclose" => Ok(HostCommand::TabClose(
                args.iter()
                    .map(|arg| arg.parse::<OrdinalReference>())
                    .collect::<std::result::Result<_, _>>()?,
            )),
            "tabonly" => no_args(HostCommand::TabOnly),
            "pin" => no_args(HostCommand::Pin),
            "tabnext" => Ok(HostCommand::TabNext(count(1)?)),
            "tabprev" => Ok(HostCommand::TabPrev(count(1)?)),
            "tabfirst" => no_args(HostCommand::TabFirst),
            "tablast" => no_args(HostCommand::TabLast),
            "tabmove" => match args {
                [spec] => Ok(HostCommand::TabMove(spec.clone())),
                _ => Err(arity("exactly one position")),
            },
            "tabs" => no_args(HostCommand::Tabs),
            "urlmodify" => {
                let (flag, rest) = args
                    .split_first()
                    .ok_or_else(|| arity("a mode flag (-t, -r, -q, -Q or -g)"))?;
                Ok(HostCommand::UrlModify(UrlModifyMode::from_args(flag, rest)?))
            }
            "urlincrement" => Ok(HostCommand::UrlIncrement(count(1)?)),
            "urlroot" => no_args(HostCommand::UrlRoot),
            "urlparent" => {
                let levels = count(1)?;
                let levels = usize::try_from(levels).map_err(|_| CoreError::InvalidArgument {
                    command: name.to_string(),
                    reason: "count must not be negative".to_string(),
                })?;
                Ok(HostCommand::UrlParent(levels))
            }
            "current_url" => Ok(HostCommand::CurrentUrl(invocation.arg_string())),
            "home" => no_args(HostCommand::Home),
            "search" => match args {
                [keyword, query @ ..] if !query.is_empty() => Ok(HostCommand::Search {
                    keyword: keyword.clone(),
                    query: query.join(" "),
                }),
                _ => Err(arity("a keyword and a query")),
            },
            "searchsetkeyword" => match args {
                [keyword, url @ ..] if !url.is_empty() => Ok(HostCommand::SearchSetKeyword {
                    keyword: keyword.clone(),
                    url: url.join(" "),
                }),
                _ => Err(arity("a keyword and a URL")),
            },
            "bmark" => {
                let (url, title) = match args.split_first() {
                    Some((url, title)) => (Some(url.clone()), title.join(" ")),
                    None => (None, String::new()),
                };
                Ok(HostCommand::Bmark { url, title })
            }
            "comlist" => no_args(HostCommand::ComList),
            "bindlist" => no_args(HostCommand::BindList),
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }
}

/// The simulated browser seen by the interpreter.
pub struct Host {
    state: AppState,
    messages: Vec<String>,
}

impl Host {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            messages: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Messages produced since the last call.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    fn run(&mut self, command: HostCommand) -> Result<Option<String>> {
        let state = &self.state;
        match command {
            HostCommand::Open(target) => navigation::open(state, &target),
            HostCommand::TabOpen { background, target } => {
                tabs::tabopen(state, &target, background)
            }
            HostCommand::WinOpen(target) => tabs::winopen(state, &target),
            HostCommand::Buffer(reference) => tabs::buffer(state, reference),
            HostCommand::TabClose(references) => tabs::tabclose(state, &references),
            HostCommand::TabOnly => tabs::tabonly(state),
            HostCommand::Pin => tabs::pin(state),
            HostCommand::TabNext(n) => tabs::tabnext(state, n),
            HostCommand::TabPrev(n) => tabs::tabprev(state, n),
            HostCommand::TabFirst => tabs::buffer(state, OrdinalReference::Index(1)),
            HostCommand::TabLast => tabs::buffer(state, OrdinalReference::Index(0)),
            HostCommand::TabMove(spec) => tabs::tabmove(state, &spec),
            HostCommand::Tabs => tabs::list(state),
            HostCommand::UrlModify(mode) => navigation::urlmodify(state, &mode),
            HostCommand::UrlIncrement(n) => navigation::urlincrement(state, n),
            HostCommand::UrlRoot => navigation::urlroot(state),
            HostCommand::UrlParent(n) => navigation::urlparent(state, n),
            HostCommand::CurrentUrl(prefix) => navigation::current_url(state, &prefix),
            HostCommand::Home => navigation::home(state),
            HostCommand::Search { keyword, query } => navigation::search(state, &keyword, &query),
            HostCommand::SearchSetKeyword { keyword, url } => {
                settings::searchsetkeyword(state, &keyword, &url)
            }
            HostCommand::Bmark { url, title } => settings::bmark(state, url.as_deref(), &title),
            HostCommand::ComList => settings::comlist(state),
            HostCommand::BindList => settings::bindlist(state),
        }
    }
}

impl Dispatcher for Host {
    async fn dispatch(&mut self, invocation: CommandInvocation) -> Result<()> {
        let command = HostCommand::parse(&invocation)?;
        tracing::debug!(command = ?command, "Dispatching host command");

        if let Some(message) = self.run(command)? {
            self.messages.push(message);
        }
        Ok(())
    }

    fn echo(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn report(&mut self, error: &CoreError) {
        self.messages.push(format!("Error: {error}"));
    }

    fn current_url(&self) -> Option<String> {
        self.state
            .with_workspace(|workspace| workspace.current_url())
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use excmd_core::{Config, Interpreter};
    use std::path::PathBuf;

    pub(crate) fn test_state() -> AppState {
        let mut config = Config::new(PathBuf::from("/tmp/excmd-test"));
        config.homepage = "https://start.example.org/".to_string();
        let state = AppState::in_memory(config).unwrap();
        state.initialize().unwrap();
        state
    }

    fn interpreter() -> Interpreter<Host> {
        let state = test_state();
        Interpreter::new(state.store(), Host::new(state))
    }

    fn urls(interpreter: &Interpreter<Host>) -> Vec<String> {
        interpreter
            .dispatcher()
            .state()
            .with_workspace(|ws| Ok(ws.tabs().tabs().iter().map(|t| t.url.clone()).collect()))
            .unwrap()
    }

    fn active_url(interpreter: &Interpreter<Host>) -> String {
        interpreter
            .dispatcher()
            .state()
            .with_workspace(|ws| ws.current_url())
            .unwrap()
    }

    fn parse(text: &str) -> Result<HostCommand> {
        HostCommand::parse(&CommandInvocation::parse(text).unwrap())
    }

    #[test]
    fn test_parse_host_commands() {
        assert!(matches!(
            parse("tabopen -b example.com").unwrap(),
            HostCommand::TabOpen { background: true, ref target } if target == "example.com"
        ));
        assert!(matches!(parse("buffer #").unwrap(), HostCommand::Buffer(OrdinalReference::Previous)));
        assert!(matches!(parse("tabnext").unwrap(), HostCommand::TabNext(1)));
        assert!(matches!(parse("tabclose 1 -1").unwrap(), HostCommand::TabClose(ref refs) if refs.len() == 2));
        assert!(matches!(
            parse("tabprev -9223372036854775808").unwrap(),
            HostCommand::TabPrev(i64::MIN)
        ));
        assert!(matches!(
            parse("search github tokio runtime").unwrap(),
            HostCommand::Search { ref keyword, ref query } if keyword == "github" && query == "tokio runtime"
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("frobnicate"), Err(CoreError::UnknownCommand(_))));
        assert!(matches!(parse("buffer"), Err(CoreError::Arity { .. })));
        assert!(matches!(parse("tabnext two"), Err(CoreError::InvalidArgument { .. })));
        assert!(matches!(parse("urlmodify"), Err(CoreError::Arity { .. })));
        assert!(matches!(parse("urlmodify -x a b"), Err(CoreError::Navigation(_))));
        assert!(matches!(parse("searchsetkeyword rs"), Err(CoreError::Arity { .. })));
        assert!(matches!(parse("search github"), Err(CoreError::Arity { .. })));
    }

    #[tokio::test]
    async fn test_composite_close_then_previous() {
        let mut interpreter = interpreter();
        interpreter.execute("tabopen a.example.com").await.unwrap();
        interpreter.execute("tabopen b.example.com").await.unwrap();
        interpreter.execute("tabopen c.example.com").await.unwrap();
        interpreter.execute("buffer 2").await.unwrap();

        interpreter.execute("composite tabclose | buffer #").await.unwrap();

        assert_eq!(
            urls(&interpreter),
            vec![
                "https://start.example.org/",
                "http://b.example.com/",
                "http://c.example.com/"
            ]
        );
        // closing a.example.com activated b; "#" then goes back to c
        assert_eq!(active_url(&interpreter), "http://c.example.com/");
    }

    #[tokio::test]
    async fn test_alias_and_repeat_drive_tabs() {
        let mut interpreter = interpreter();
        interpreter.execute("command t tabopen -b").await.unwrap();
        interpreter.execute("t one.example.com").await.unwrap();
        interpreter.execute("repeat 2").await.unwrap();

        assert_eq!(urls(&interpreter).len(), 4);
        assert_eq!(active_url(&interpreter), "https://start.example.org/");
    }

    #[tokio::test]
    async fn test_errors_are_reported_inside_composite() {
        let mut interpreter = interpreter();
        interpreter
            .execute("composite nonsense | tabopen rust-lang.org")
            .await
            .unwrap();

        let messages = interpreter.dispatcher_mut().drain_messages();
        assert_eq!(messages, vec!["Error: Not an editor command: nonsense"]);
        assert_eq!(active_url(&interpreter), "http://rust-lang.org/");
    }

    #[tokio::test]
    async fn test_quickmark_binds_current_page() {
        let mut interpreter = interpreter();
        interpreter.execute("quickmark s").await.unwrap();

        assert_eq!(
            interpreter.binds().get("gos").unwrap().as_deref(),
            Some("open https://start.example.org/")
        );
    }
}
