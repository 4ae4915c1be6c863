use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::cli::{DisplayOptions, TERMINAL_WIDTH};
use crate::entry::{read_entries, stat_path, Entry};
use crate::error::LsError;
use crate::grid::write_grid;
use crate::long::{write_long, Identities};
use crate::sort::sort_entries;

/// Drives reading, sorting and rendering for each path on the command line.
///
/// Listing output goes to `out`; access errors go to stderr and are counted
/// but never stop the remaining paths.
pub struct Lister<W: Write> {
    opts: DisplayOptions,
    out: W,
    ids: Box<dyn Identities>,
    now: DateTime<Local>,
    term_width: usize,
    failures: usize,
}

impl<W: Write> Lister<W> {
    pub fn new(opts: DisplayOptions, out: W, ids: Box<dyn Identities>) -> Self {
        Lister {
            opts,
            out,
            ids,
            now: Local::now(),
            term_width: TERMINAL_WIDTH,
            failures: 0,
        }
    }

    /// Number of paths or directories that could not be listed.
    pub fn failures(&self) -> usize {
        self.failures
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    pub fn run(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        for (i, path) in paths.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            self.list_argument(path)?;
        }
        self.out.flush()
    }

    fn report(&mut self, err: &LsError) -> io::Result<()> {
        // keep stdout and stderr in program order when both go to a terminal
        self.out.flush()?;
        tracing::debug!(error = ?err, "listing failed");
        eprintln!("my-ls: {}", err);
        self.failures += 1;
        Ok(())
    }

    fn list_argument(&mut self, path: &Path) -> io::Result<()> {
        let entry = match stat_path(path) {
            Ok(entry) => entry,
            Err(err) => return self.report(&err),
        };

        if entry.is_dir() {
            self.list_directory(path, self.opts.recursive)
        } else {
            self.render(&[entry])
        }
    }

    fn list_directory(&mut self, dir: &Path, header: bool) -> io::Result<()> {
        tracing::debug!(dir = %dir.display(), "listing directory");
        let mut entries = match read_entries(dir, self.opts.show_hidden) {
            Ok(entries) => entries,
            Err(err) => return self.report(&err),
        };
        sort_entries(&mut entries, &self.opts);

        if header {
            writeln!(self.out, "{}:", dir.display())?;
        }
        self.render(&entries)?;

        if self.opts.recursive {
            let subdirs = entries
                .iter()
                .filter(|e| e.is_dir() && e.special.is_none());
            for subdir in subdirs {
                writeln!(self.out)?;
                self.list_directory(&subdir.path, true)?;
            }
        }
        Ok(())
    }

    fn render(&mut self, entries: &[Entry]) -> io::Result<()> {
        if self.opts.long_format {
            write_long(&mut self.out, entries, self.ids.as_ref(), self.now)
        } else {
            write_grid(&mut self.out, entries, self.term_width)
        }
    }
}
