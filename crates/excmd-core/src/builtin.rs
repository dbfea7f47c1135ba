//! Commands the interpreter handles itself

use std::time::Duration;

use crate::error::CoreError;
use crate::invocation::CommandInvocation;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// Run a command `count` times; without one, the last top-level command
    Repeat { count: usize, exstr: Option<String> },
    /// Run `|`-separated commands in order
    Composite(Vec<String>),
    /// Define an alias, or show it when no definition is given
    Command {
        name: String,
        definition: Option<String>,
    },
    ComClear(String),
    /// Bind keys, or show the binding when no command is given
    Bind { keys: String, exstr: Option<String> },
    Unbind(String),
    /// Bind `gn`/`go`/`gw` + key; no URLs means the current page
    Quickmark { key: String, urls: Vec<String> },
    Sleep(Duration),
}

impl Builtin {
    /// `Ok(None)` when `invocation` is not a builtin.
    pub fn from_invocation(invocation: &CommandInvocation) -> Result<Option<Self>> {
        let args = &invocation.args;
        let arity = |expected: &'static str| CoreError::Arity {
            command: invocation.name.clone(),
            expected,
        };
        let invalid = |reason: String| CoreError::InvalidArgument {
            command: invocation.name.clone(),
            reason,
        };

        let builtin = match invocation.name.as_str() {
            "repeat" => {
                let count = match args.first() {
                    Some(n) => n
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("'{n}' is not a count")))?,
                    None => 1,
                };
                let exstr = (args.len() > 1).then(|| args[1..].join(" "));
                Builtin::Repeat { count, exstr }
            }
            "composite" => {
                let parts: Vec<String> = invocation
                    .arg_string()
                    .split('|')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect();
                if parts.is_empty() {
                    return Err(arity("at least one command"));
                }
                Builtin::Composite(parts)
            }
            "command" => {
                let (name, rest) = args.split_first().ok_or_else(|| arity("an alias name"))?;
                Builtin::Command {
                    name: name.clone(),
                    definition: (!rest.is_empty()).then(|| rest.join(" ")),
                }
            }
            "comclear" => match args.as_slice() {
                [name] => Builtin::ComClear(name.clone()),
                _ => return Err(arity("exactly one alias name")),
            },
            "bind" => {
                let (keys, rest) = args.split_first().ok_or_else(|| arity("a key sequence"))?;
                Builtin::Bind {
                    keys: keys.clone(),
                    exstr: (!rest.is_empty()).then(|| rest.join(" ")),
                }
            }
            "unbind" => match args.as_slice() {
                [keys] => Builtin::Unbind(keys.clone()),
                _ => return Err(arity("exactly one key sequence")),
            },
            "quickmark" => {
                let (key, urls) = args.split_first().ok_or_else(|| arity("a key"))?;
                if key.chars().count() != 1 {
                    return Err(invalid("quickmark key must be a single character".to_string()));
                }
                Builtin::Quickmark {
                    key: key.clone(),
                    urls: urls.to_vec(),
                }
            }
            "sleep" => match args.as_slice() {
                [ms] => {
                    let ms = ms
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("'{ms}' is not a number of milliseconds")))?;
                    Builtin::Sleep(Duration::from_millis(ms))
                }
                _ => return Err(arity("a duration in milliseconds")),
            },
            _ => return Ok(None),
        };

        Ok(Some(builtin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Option<Builtin>> {
        Builtin::from_invocation(&CommandInvocation::parse(text).unwrap())
    }

    #[test]
    fn test_not_a_builtin() {
        assert_eq!(parse("tabopen example.com").unwrap(), None);
    }

    #[test]
    fn test_repeat() {
        assert_eq!(
            parse("repeat").unwrap(),
            Some(Builtin::Repeat { count: 1, exstr: None })
        );
        assert_eq!(
            parse("repeat 3 tabnext 2").unwrap(),
            Some(Builtin::Repeat {
                count: 3,
                exstr: Some("tabnext 2".to_string())
            })
        );
        assert!(matches!(parse("repeat twice"), Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn test_composite_splits_on_pipe() {
        assert_eq!(
            parse("composite tabclose | buffer #").unwrap(),
            Some(Builtin::Composite(vec!["tabclose".to_string(), "buffer #".to_string()]))
        );
        assert!(matches!(parse("composite |"), Err(CoreError::Arity { .. })));
    }

    #[test]
    fn test_command() {
        assert_eq!(
            parse("command t tabopen -b").unwrap(),
            Some(Builtin::Command {
                name: "t".to_string(),
                definition: Some("tabopen -b".to_string())
            })
        );
        assert!(matches!(parse("command"), Err(CoreError::Arity { .. })));
    }

    #[test]
    fn test_arity_errors() {
        assert!(parse("comclear").is_err());
        assert!(parse("unbind a b").is_err());
        assert!(parse("sleep").is_err());
        assert!(parse("sleep soon").is_err());
        assert!(parse("quickmark ab").is_err());
    }

    #[test]
    fn test_sleep_and_quickmark() {
        assert_eq!(
            parse("sleep 250").unwrap(),
            Some(Builtin::Sleep(Duration::from_millis(250)))
        );
        assert_eq!(
            parse("quickmark r").unwrap(),
            Some(Builtin::Quickmark {
                key: "r".to_string(),
                urls: vec![]
            })
        );
    }
}
