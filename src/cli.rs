use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::error::{LsError, Result};

/// Width budget for grid output.
pub const TERMINAL_WIDTH: usize = 120;

#[derive(Parser, Debug)]
#[command(name = "my-ls")]
#[command(about = "list directory contents", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct Cli {
    /// use a long listing format
    #[arg(short = 'l')]
    long_format: bool,

    /// list subdirectories recursively
    #[arg(short = 'R')]
    recursive: bool,

    /// do not ignore entries starting with .
    #[arg(short = 'a')]
    all: bool,

    /// reverse order while sorting
    #[arg(short = 'r')]
    reverse: bool,

    /// sort by modification time, newest first
    #[arg(short = 't')]
    sort_by_time: bool,

    /// files or directories to list
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

/// Read-only settings that drive sorting and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub long_format: bool,
    pub recursive: bool,
    pub show_hidden: bool,
    pub reverse: bool,
    pub sort_by_time: bool,
}

impl From<&Cli> for DisplayOptions {
    fn from(cli: &Cli) -> Self {
        DisplayOptions {
            long_format: cli.long_format,
            recursive: cli.recursive,
            show_hidden: cli.all,
            reverse: cli.reverse,
            sort_by_time: cli.sort_by_time,
        }
    }
}

/// The parsed command line: options plus the paths to list, in order.
#[derive(Debug)]
pub struct Invocation {
    pub options: DisplayOptions,
    pub paths: Vec<PathBuf>,
}

/// A token is a switch cluster when it is `-` followed by at least one
/// character other than a second `-`. Everything else is a path.
fn is_switch_cluster(arg: &OsStr) -> bool {
    let bytes = arg.as_encoded_bytes();
    bytes.len() > 1 && bytes[0] == b'-' && bytes[1] != b'-'
}

fn check_cluster(arg: &OsStr, known: &[char]) -> Result<()> {
    let text = arg.to_string_lossy();
    match text[1..].chars().find(|c| !known.contains(c)) {
        Some(bad) => Err(LsError::InvalidOption(bad)),
        None => Ok(()),
    }
}

/// Collapse a clap rejection into a single diagnostic line.
fn usage_error(err: &clap::Error) -> LsError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    let message = first.strip_prefix("error: ").unwrap_or(first).trim();
    if message.is_empty() {
        LsError::Usage(err.kind().as_str().unwrap_or("invalid arguments").to_string())
    } else {
        LsError::Usage(message.to_string())
    }
}

/// Parse process arguments (including the program name in first position).
///
/// Switch clusters are validated here so the first unknown character is
/// reported as-is; paths are handed to clap after a `--` so that tokens such
/// as `-` or `--foo` stay paths.
pub fn parse_args<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| OsString::from("my-ls"));

    let known: Vec<char> = Cli::command()
        .get_arguments()
        .filter_map(|arg| arg.get_short())
        .collect();

    let mut switches = Vec::new();
    let mut paths = Vec::new();
    for arg in args {
        if is_switch_cluster(&arg) {
            check_cluster(&arg, &known)?;
            switches.push(arg);
        } else {
            paths.push(arg);
        }
    }

    let argv = std::iter::once(program)
        .chain(switches)
        .chain(std::iter::once(OsString::from("--")))
        .chain(paths);
    let cli = Cli::try_parse_from(argv).map_err(|err| usage_error(&err))?;

    let options = DisplayOptions::from(&cli);
    let mut paths = cli.paths;
    if paths.is_empty() {
        paths.push(PathBuf::from("."));
    }
    tracing::debug!(?options, ?paths, "parsed command line");

    Ok(Invocation { options, paths })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation> {
        parse_args(std::iter::once("my-ls").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_current_directory() {
        let inv = parse(&[]).unwrap();
        assert_eq!(inv.options, DisplayOptions::default());
        assert_eq!(inv.paths, vec![PathBuf::from(".")]);
    }

    #[test]
    fn bundled_and_repeated_switches() {
        let inv = parse(&["-la", "-t", "-l", "src"]).unwrap();
        assert!(inv.options.long_format);
        assert!(inv.options.show_hidden);
        assert!(inv.options.sort_by_time);
        assert!(!inv.options.recursive);
        assert!(!inv.options.reverse);
        assert_eq!(inv.paths, vec![PathBuf::from("src")]);
    }

    #[test]
    fn switches_may_follow_paths() {
        let inv = parse(&["a", "-Rr", "b"]).unwrap();
        assert!(inv.options.recursive);
        assert!(inv.options.reverse);
        assert_eq!(inv.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn dash_tokens_that_are_not_clusters_are_paths() {
        let inv = parse(&["-", "--", "--long"]).unwrap();
        assert_eq!(
            inv.paths,
            vec![
                PathBuf::from("-"),
                PathBuf::from("--"),
                PathBuf::from("--long")
            ]
        );
        assert_eq!(inv.options, DisplayOptions::default());
    }

    #[test]
    fn unknown_switch_is_reported_by_character() {
        match parse(&["-lx", "dir"]) {
            Err(LsError::InvalidOption(c)) => assert_eq!(c, 'x'),
            other => panic!("expected invalid option, got {:?}", other),
        }
    }

    #[test]
    fn clap_rejections_become_one_line() {
        let err = Cli::command().error(
            clap::error::ErrorKind::InvalidValue,
            "bad value\nsecond line",
        );
        match usage_error(&err) {
            LsError::Usage(msg) => assert_eq!(msg, "bad value"),
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[test]
    fn help_and_version_are_not_switches() {
        assert!(matches!(parse(&["-h"]), Err(LsError::InvalidOption('h'))));
        assert!(matches!(parse(&["-V"]), Err(LsError::InvalidOption('V'))));
    }
}
