use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use nix::libc;
use nix::sys::stat::{major, minor};

use crate::error::{LsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
}

impl FileKind {
    fn from_file_type(ft: fs::FileType) -> FileKind {
        if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_char_device() {
            FileKind::CharDevice
        } else if ft.is_block_device() {
            FileKind::BlockDevice
        } else if ft.is_fifo() {
            FileKind::Fifo
        } else if ft.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Regular
        }
    }

    pub fn is_device(self) -> bool {
        matches!(self, FileKind::CharDevice | FileKind::BlockDevice)
    }
}

/// The synthetic entries added when hidden files are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Special {
    CurrentDir,
    ParentDir,
}

impl Special {
    pub fn name(self) -> &'static str {
        match self {
            Special::CurrentDir => ".",
            Special::ParentDir => "..",
        }
    }
}

/// Major/minor pair of a character or block device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Device {
    pub major: u64,
    pub minor: u64,
}

impl Device {
    fn from_rdev(rdev: u64) -> Device {
        let dev = rdev as libc::dev_t;
        Device {
            major: major(dev) as u64,
            minor: minor(dev) as u64,
        }
    }

    /// The value shown in the size column for device files.
    pub fn synthetic_size(self) -> u64 {
        self.major * 256 + self.minor
    }
}

/// Snapshot of one filesystem object, taken once at listing time.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub special: Option<Special>,
    pub kind: FileKind,
    /// Permission bits including setuid, setgid and sticky.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub device: Option<Device>,
    pub modified: SystemTime,
    /// Present only for symlinks whose target could be read.
    pub link_target: Option<PathBuf>,
}

impl Entry {
    /// Build an entry from lstat metadata.
    pub fn from_metadata(name: String, path: PathBuf, md: &fs::Metadata) -> Entry {
        let kind = FileKind::from_file_type(md.file_type());
        let device = kind.is_device().then(|| Device::from_rdev(md.rdev()));
        let link_target = if kind == FileKind::Symlink {
            match fs::read_link(&path) {
                Ok(target) => Some(target),
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "unreadable symlink target");
                    None
                }
            }
        } else {
            None
        };

        Entry {
            name,
            kind,
            special: None,
            mode: md.mode() & 0o7777,
            nlink: md.nlink(),
            uid: md.uid(),
            gid: md.gid(),
            size: md.len(),
            device,
            // mtime is always set on Unix; the epoch only covers exotic filesystems
            modified: md.modified().unwrap_or(UNIX_EPOCH),
            link_target,
            path,
        }
    }

    /// A `.` or `..` entry for `dir`.
    ///
    /// Uses the lstat of the directory (or its parent) when available and
    /// falls back to a bare directory with zeroed fields otherwise.
    pub fn synthetic(special: Special, dir: &Path) -> Entry {
        let path = match special {
            Special::CurrentDir => dir.to_path_buf(),
            Special::ParentDir => dir.join(".."),
        };
        let name = special.name().to_string();

        let mut entry = match fs::symlink_metadata(&path) {
            Ok(md) => Entry::from_metadata(name, path, &md),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "synthetic entry without metadata");
                Entry {
                    name,
                    path,
                    special: None,
                    kind: FileKind::Directory,
                    mode: 0,
                    nlink: 0,
                    uid: 0,
                    gid: 0,
                    size: 0,
                    device: None,
                    modified: UNIX_EPOCH,
                    link_target: None,
                }
            }
        };
        entry.special = Some(special);
        entry
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Any of the three execute bits.
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// lstat a single path given on the command line.
///
/// The entry is named after the last path component; paths without one
/// (`.`, `..`, `/`) keep the full argument text.
pub fn stat_path(path: &Path) -> Result<Entry> {
    let md = fs::symlink_metadata(path).map_err(|err| LsError::access(path, err))?;
    let name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();
    Ok(Entry::from_metadata(name, path.to_path_buf(), &md))
}

/// List the direct entries of `dir` without following symlinks.
///
/// Hidden entries are skipped unless `show_hidden` is set, in which case
/// synthetic `.` and `..` entries are added as well. Any entry that cannot
/// be stat'd fails the whole listing.
pub fn read_entries(dir: &Path, show_hidden: bool) -> Result<Vec<Entry>> {
    let read_dir = fs::read_dir(dir).map_err(|err| LsError::access(dir, err))?;

    let mut entries = Vec::new();
    if show_hidden {
        entries.push(Entry::synthetic(Special::CurrentDir, dir));
        entries.push(Entry::synthetic(Special::ParentDir, dir));
    }

    for item in read_dir {
        let item = item.map_err(|err| LsError::access(dir, err))?;
        let name = item.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        let path = item.path();
        let md = fs::symlink_metadata(&path).map_err(|err| LsError::access(&path, err))?;
        entries.push(Entry::from_metadata(name, path, &md));
    }

    tracing::trace!(dir = %dir.display(), count = entries.len(), "read directory");
    Ok(entries)
}
