use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::entry::{Entry, FileKind};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const BLUE: &str = "\x1b[1;34m";
const GREEN: &str = "\x1b[1;32m";
const CYAN: &str = "\x1b[1;36m";
const YELLOW: &str = "\x1b[1;33m";

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m").expect("escape pattern is valid")
});

fn paint(color: &str, name: &str) -> String {
    format!("{}{}{}", color, name, RESET)
}

/// The entry's name with its type color, plus ` -> target` for symlinks
/// whose target could be read.
pub fn colored_name(entry: &Entry) -> String {
    let name = entry.name.as_str();
    match entry.kind {
        FileKind::CharDevice => paint(YELLOW, name),
        FileKind::BlockDevice => paint(&format!("{}{}", YELLOW, BOLD), name),
        FileKind::Directory => paint(BLUE, name),
        FileKind::Symlink => match &entry.link_target {
            Some(target) => format!("{} -> {}", paint(CYAN, name), target.display()),
            None => paint(CYAN, name),
        },
        _ if entry.is_executable() => paint(GREEN, name),
        _ => name.to_string(),
    }
}

pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Columns the text occupies on a terminal; escape sequences count as zero.
pub fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(text).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::UNIX_EPOCH;

    fn entry(name: &str, kind: FileKind, mode: u32) -> Entry {
        Entry {
            name: name.to_string(),
            path: PathBuf::from(name),
            special: None,
            kind,
            mode,
            nlink: 1,
            uid: 0,
            gid: 0,
            size: 0,
            device: None,
            modified: UNIX_EPOCH,
            link_target: None,
        }
    }

    #[test]
    fn colors_follow_file_type() {
        assert_eq!(
            colored_name(&entry("src", FileKind::Directory, 0o755)),
            "\x1b[1;34msrc\x1b[0m"
        );
        assert_eq!(
            colored_name(&entry("run", FileKind::Regular, 0o700)),
            "\x1b[1;32mrun\x1b[0m"
        );
        assert_eq!(
            colored_name(&entry("tty", FileKind::CharDevice, 0o666)),
            "\x1b[1;33mtty\x1b[0m"
        );
        assert_eq!(
            colored_name(&entry("sda", FileKind::BlockDevice, 0o660)),
            "\x1b[1;33m\x1b[1msda\x1b[0m"
        );
        assert_eq!(colored_name(&entry("notes.txt", FileKind::Regular, 0o644)), "notes.txt");
    }

    #[test]
    fn symlinks_show_target_when_known() {
        let mut link = entry("latest", FileKind::Symlink, 0o777);
        assert_eq!(colored_name(&link), "\x1b[1;36mlatest\x1b[0m");

        link.link_target = Some(PathBuf::from("v1.2"));
        assert_eq!(colored_name(&link), "\x1b[1;36mlatest\x1b[0m -> v1.2");
        assert_eq!(visible_width(&colored_name(&link)), "latest -> v1.2".len());
    }

    #[test]
    fn escapes_have_no_width() {
        assert_eq!(strip_ansi("\x1b[1;33m\x1b[1msda\x1b[0m"), "sda");
        assert_eq!(visible_width("\x1b[1;34mdir\x1b[0m"), 3);
        assert_eq!(visible_width("日本"), 4);
    }
}
