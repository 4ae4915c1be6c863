// list directory contents, ls style
// short form: names in columns, colored by file type
// long form (-l): permissions, links, owner, group, size, mtime, name
// -R recurses into subdirectories, -a shows dot files, -t sorts by mtime, -r reverses

pub mod cli;
pub mod color;
pub mod entry;
pub mod error;
pub mod grid;
pub mod list;
pub mod long;
pub mod sort;

use std::io::{self, BufWriter, ErrorKind};
use std::process::ExitCode;

use users::UsersCache;

use crate::cli::Invocation;
use crate::list::Lister;

/// List every path of the invocation to stdout.
///
/// Exits 1 when any path could not be accessed or stdout could not be
/// written, 0 otherwise. A closed pipe is not an error.
pub fn list_files(invocation: Invocation) -> ExitCode {
    let stdout = io::stdout().lock();
    let mut lister = Lister::new(
        invocation.options,
        BufWriter::new(stdout),
        Box::new(UsersCache::new()),
    );

    match lister.run(&invocation.paths) {
        Ok(()) if lister.failures() == 0 => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(err) if err.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("my-ls: write error: {}", err);
            ExitCode::FAILURE
        }
    }
}
