//! URL rewriting for `urlmodify`
//!
//! ```text
//! urlmodify -t <old> <new>             first occurrence, case sensitive
//! urlmodify -r <regexp> <new> [flags]  flags from {g, i}
//! urlmodify -q <query> <new_val>       set (or add) a query parameter
//! urlmodify -Q <query>                 delete a query parameter
//! urlmodify -g <graft_point> <tail>    graft a new tail onto the path
//! ```
//!
//! Graft points for `http://website.com/this/is/the/path/component`:
//!
//! ```text
//! Graft point:       ^    ^  ^   ^    ^        ^
//! From left:         0    1  2   3    4        5
//! From right:       -6   -5 -4  -3   -2       -1
//! ```

use regex::{Regex, RegexBuilder};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub global: bool,
    pub case_insensitive: bool,
}

impl RegexFlags {
    pub fn parse(flags: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for ch in flags.chars() {
            match ch {
                'g' => parsed.global = true,
                'i' => parsed.case_insensitive = true,
                _ => return Err(NavigationError::InvalidFlag(flags.to_string())),
            }
        }
        Ok(parsed)
    }
}

/// A fully validated rewrite, one variant per `urlmodify` flag.
#[derive(Debug, Clone)]
pub enum UrlModifyMode {
    TextReplace {
        old: String,
        new: String,
    },
    RegexReplace {
        regex: Regex,
        replacement: String,
        global: bool,
    },
    QuerySet {
        key: String,
        value: String,
    },
    QueryDelete {
        key: String,
    },
    PathGraft {
        point: i64,
        tail: String,
    },
}

impl UrlModifyMode {
    /// Build a mode from its command line flag and positional arguments.
    pub fn from_args(flag: &str, args: &[String]) -> Result<Self> {
        match flag {
            "-t" => {
                let [old, new] = args else {
                    return Err(NavigationError::Arity {
                        mode: "Text replacement",
                        expected: "2 arguments",
                        usage: "<old> <new>",
                    });
                };
                Ok(UrlModifyMode::TextReplace {
                    old: old.clone(),
                    new: new.clone(),
                })
            }
            "-r" => {
                if args.len() < 2 || args.len() > 3 {
                    return Err(NavigationError::Arity {
                        mode: "RegExp replacement",
                        expected: "2 or 3 arguments",
                        usage: "<regexp> <new> [flags]",
                    });
                }

                let flags = RegexFlags::parse(args.get(2).map(String::as_str).unwrap_or(""))?;
                let regex = RegexBuilder::new(&args[0])
                    .case_insensitive(flags.case_insensitive)
                    .build()
                    .map_err(|e| NavigationError::MalformedPattern(e.to_string()))?;

                Ok(UrlModifyMode::RegexReplace {
                    regex,
                    replacement: args[1].clone(),
                    global: flags.global,
                })
            }
            "-q" => {
                let [key, value] = args else {
                    return Err(NavigationError::Arity {
                        mode: "Query replacement",
                        expected: "2 arguments",
                        usage: "<query> <new_val>",
                    });
                };
                Ok(UrlModifyMode::QuerySet {
                    key: key.clone(),
                    value: value.clone(),
                })
            }
            "-Q" => {
                let [key] = args else {
                    return Err(NavigationError::Arity {
                        mode: "Query deletion",
                        expected: "1 argument",
                        usage: "<query>",
                    });
                };
                Ok(UrlModifyMode::QueryDelete { key: key.clone() })
            }
            "-g" => {
                let [point, tail] = args else {
                    return Err(NavigationError::Arity {
                        mode: "URL path grafting",
                        expected: "2 arguments",
                        usage: "<graft point> <new path tail>",
                    });
                };
                let point = point.parse::<i64>().map_err(|_| {
                    NavigationError::MalformedPattern(format!("graft point '{point}' is not an integer"))
                })?;
                Ok(UrlModifyMode::PathGraft {
                    point,
                    tail: tail.clone(),
                })
            }
            other => Err(NavigationError::UnknownMode(other.to_string())),
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            UrlModifyMode::TextReplace { .. } => "-t",
            UrlModifyMode::RegexReplace { .. } => "-r",
            UrlModifyMode::QuerySet { .. } => "-q",
            UrlModifyMode::QueryDelete { .. } => "-Q",
            UrlModifyMode::PathGraft { .. } => "-g",
        }
    }
}

/// Apply `mode` to `url`.
///
/// Returns `Ok(None)` when the result is textually identical to the input;
/// callers must not navigate in that case.
pub fn rewrite(url: &Url, mode: &UrlModifyMode) -> Result<Option<Url>> {
    let rewritten = match mode {
        UrlModifyMode::TextReplace { old, new } => {
            reparse(url.as_str().replacen(old.as_str(), new, 1))?
        }
        UrlModifyMode::RegexReplace {
            regex,
            replacement,
            global,
        } => {
            let text = if *global {
                regex.replace_all(url.as_str(), replacement.as_str())
            } else {
                regex.replace(url.as_str(), replacement.as_str())
            };
            reparse(text.into_owned())?
        }
        UrlModifyMode::QuerySet { key, value } => set_query_value(url, key, value),
        UrlModifyMode::QueryDelete { key } => delete_query(url, key),
        UrlModifyMode::PathGraft { point, tail } => graft_path(url, *point, tail)?,
    };

    tracing::debug!(mode = mode.flag(), from = %url, to = %rewritten, "Rewrote URL");

    if rewritten.as_str() == url.as_str() {
        Ok(None)
    } else {
        Ok(Some(rewritten))
    }
}

fn reparse(text: String) -> Result<Url> {
    Url::parse(&text).map_err(|e| NavigationError::MalformedPattern(format!("{text}: {e}")))
}

fn pair_key(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(key, _)| key)
}

/// Query pairs in their raw, still-encoded form
fn raw_pairs(url: &Url) -> Vec<&str> {
    url.query()
        .map(|q| q.split('&').filter(|p| !p.is_empty()).collect())
        .unwrap_or_default()
}

fn with_pairs(url: &Url, pairs: &[String]) -> Url {
    let mut updated = url.clone();
    if pairs.is_empty() {
        updated.set_query(None);
    } else {
        updated.set_query(Some(&pairs.join("&")));
    }
    updated
}

fn set_query_value(url: &Url, key: &str, value: &str) -> Url {
    let mut found = false;
    let mut pairs: Vec<String> = raw_pairs(url)
        .into_iter()
        .map(|pair| {
            if pair_key(pair) == key {
                found = true;
                format!("{key}={value}")
            } else {
                pair.to_string()
            }
        })
        .collect();

    if !found {
        pairs.push(format!("{key}={value}"));
    }

    with_pairs(url, &pairs)
}

fn delete_query(url: &Url, key: &str) -> Url {
    if url.query().is_none() {
        return url.clone();
    }

    let pairs: Vec<String> = raw_pairs(url)
        .into_iter()
        .filter(|pair| pair_key(pair) != key)
        .map(str::to_string)
        .collect();

    with_pairs(url, &pairs)
}

fn graft_path(url: &Url, point: i64, tail: &str) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(NavigationError::InvalidUrl(format!(
            "{url} has no path to graft onto"
        )));
    }

    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    };

    let len = segments.len() as i64;
    let keep = if point >= 0 { point } else { len + point + 1 };
    if keep < 0 || keep > len {
        return Err(NavigationError::GraftOutOfRange {
            point,
            segments: segments.len(),
        });
    }

    let mut parts = segments[..keep as usize].to_vec();
    parts.push(tail.trim_start_matches('/'));

    let mut grafted = url.clone();
    grafted.set_path(&format!("/{}", parts.join("/")));
    Ok(grafted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn modify(url: &str, flag: &str, list: &[&str]) -> Option<String> {
        let url = Url::parse(url).unwrap();
        let mode = UrlModifyMode::from_args(flag, &args(list)).unwrap();
        rewrite(&url, &mode).unwrap().map(|u| u.to_string())
    }

    #[test]
    fn test_text_replace() {
        assert_eq!(
            modify("http://example.com", "-t", &["exa", "peta"]),
            Some("http://petample.com/".to_string())
        );
        // Only the first occurrence
        assert_eq!(
            modify("http://e.com/a/a", "-t", &["/a", "/b"]),
            Some("http://e.com/b/a".to_string())
        );
    }

    #[test]
    fn test_text_replace_is_case_sensitive() {
        assert_eq!(modify("http://example.com/Page", "-t", &["page", "x"]), None);
    }

    #[test]
    fn test_regex_replace() {
        assert_eq!(
            modify("http://example.com", "-r", &["[ea]", "X", "g"]),
            Some("http://XxXmplX.com/".to_string())
        );
        assert_eq!(
            modify("http://example.com", "-r", &["[ea]", "X"]),
            Some("http://Xxample.com/".to_string())
        );
        assert_eq!(
            modify("http://e.com/Issues", "-r", &["issues", "pulls", "i"]),
            Some("http://e.com/pulls".to_string())
        );
    }

    #[test]
    fn test_regex_rejects_unknown_flags() {
        let err = UrlModifyMode::from_args("-r", &args(&["a", "b", "gm"])).unwrap_err();
        assert!(matches!(err, NavigationError::InvalidFlag(f) if f == "gm"));
    }

    #[test]
    fn test_regex_rejects_bad_pattern() {
        let err = UrlModifyMode::from_args("-r", &args(&["(", "b"])).unwrap_err();
        assert!(matches!(err, NavigationError::MalformedPattern(_)));
    }

    #[test]
    fn test_query_set() {
        assert_eq!(
            modify("http://e.com?id=foo", "-q", &["id", "bar"]),
            Some("http://e.com/?id=bar".to_string())
        );
        assert_eq!(
            modify("http://e.com?id=foo", "-q", &["page", "2"]),
            Some("http://e.com/?id=foo&page=2".to_string())
        );
        assert_eq!(
            modify("http://e.com/", "-q", &["page", "2"]),
            Some("http://e.com/?page=2".to_string())
        );
    }

    #[test]
    fn test_query_delete() {
        assert_eq!(
            modify("http://e.com?id=foo&page=1", "-Q", &["id"]),
            Some("http://e.com/?page=1".to_string())
        );
        assert_eq!(
            modify("http://e.com?id=foo", "-Q", &["id"]),
            Some("http://e.com/".to_string())
        );
        // Absent key is a no-op
        assert_eq!(modify("http://e.com?page=1", "-Q", &["id"]), None);
        assert_eq!(modify("http://e.com/", "-Q", &["id"]), None);
    }

    #[test]
    fn test_path_graft() {
        let base = "http://e.com/issues/42";
        assert_eq!(modify(base, "-g", &["0", "foo"]).unwrap(), "http://e.com/foo");
        assert_eq!(modify(base, "-g", &["1", "foo"]).unwrap(), "http://e.com/issues/foo");
        assert_eq!(modify(base, "-g", &["-1", "foo"]).unwrap(), "http://e.com/issues/42/foo");
        assert_eq!(modify(base, "-g", &["-2", "foo"]).unwrap(), "http://e.com/issues/foo");
        assert_eq!(modify(base, "-g", &["-3", "foo"]).unwrap(), "http://e.com/foo");
    }

    #[test]
    fn test_path_graft_keeps_query() {
        assert_eq!(
            modify("http://e.com/a/b?x=1", "-g", &["1", "c"]).unwrap(),
            "http://e.com/a/c?x=1"
        );
    }

    #[test]
    fn test_path_graft_minus_one_appends() {
        for (path, tail) in [("/this/is/the/path/component", "tail"), ("/a", "b/c"), ("/a/", "x")] {
            let url = Url::parse(&format!("http://e.com{path}")).unwrap();
            let mode = UrlModifyMode::PathGraft {
                point: -1,
                tail: tail.to_string(),
            };
            let grafted = rewrite(&url, &mode).unwrap().unwrap();
            assert_eq!(grafted.path(), format!("{path}/{tail}"));
        }
    }

    #[test]
    fn test_path_graft_out_of_range() {
        let url = Url::parse("http://e.com/issues/42").unwrap();
        for point in [3, -4] {
            let mode = UrlModifyMode::PathGraft {
                point,
                tail: "x".to_string(),
            };
            assert!(matches!(
                rewrite(&url, &mode),
                Err(NavigationError::GraftOutOfRange { segments: 2, .. })
            ));
        }
    }

    #[test]
    fn test_arity_errors() {
        let cases: &[(&str, &[&str])] = &[
            ("-t", &["only-one"]),
            ("-r", &["a"]),
            ("-r", &["a", "b", "g", "extra"]),
            ("-q", &["id"]),
            ("-Q", &[]),
            ("-g", &["1"]),
        ];
        for (flag, list) in cases {
            let err = UrlModifyMode::from_args(flag, &args(list)).unwrap_err();
            assert!(matches!(err, NavigationError::Arity { .. }), "{flag} {list:?}");
        }
    }

    #[test]
    fn test_arity_message_names_expected_count() {
        let err = UrlModifyMode::from_args("-Q", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Query deletion needs 1 argument: <query>");
    }

    #[test]
    fn test_non_integer_graft_point() {
        let err = UrlModifyMode::from_args("-g", &args(&["two", "x"])).unwrap_err();
        assert!(matches!(err, NavigationError::MalformedPattern(_)));
    }

    #[test]
    fn test_unknown_mode() {
        let err = UrlModifyMode::from_args("-x", &args(&["a"])).unwrap_err();
        assert!(matches!(err, NavigationError::UnknownMode(m) if m == "-x"));
    }

    #[test]
    fn test_replacement_that_breaks_url() {
        let url = Url::parse("http://e.com/").unwrap();
        let mode = UrlModifyMode::from_args("-t", &args(&["http://", ""])).unwrap();
        assert!(matches!(
            rewrite(&url, &mode),
            Err(NavigationError::MalformedPattern(_))
        ));
    }
}
