use std::io::{self, Write};
use std::time::SystemTime;

use chrono::{DateTime, Local, Months};
use users::{Groups, Users, UsersCache};

use crate::color::colored_name;
use crate::entry::{Entry, FileKind};

/// Resolves numeric owner and group ids to names.
pub trait Identities {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

impl Identities for UsersCache {
    fn user_name(&self, uid: u32) -> Option<String> {
        self.get_user_by_uid(uid)
            .map(|u| u.name().to_string_lossy().into_owned())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        self.get_group_by_gid(gid)
            .map(|g| g.name().to_string_lossy().into_owned())
    }
}

fn owner_name(ids: &dyn Identities, uid: u32) -> String {
    ids.user_name(uid).unwrap_or_else(|| {
        tracing::debug!(uid, "no user name for uid");
        uid.to_string()
    })
}

fn group_name(ids: &dyn Identities, gid: u32) -> String {
    ids.group_name(gid).unwrap_or_else(|| {
        tracing::debug!(gid, "no group name for gid");
        gid.to_string()
    })
}

/// The ten-character `drwxr-xr-x` style string.
pub fn permission_string(kind: FileKind, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(match kind {
        FileKind::Regular => '-',
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::CharDevice => 'c',
        FileKind::BlockDevice => 'b',
        FileKind::Fifo => 'p',
        FileKind::Socket => 's',
    });

    let triplets = [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')];
    for (shift, special_bit, special) in triplets {
        let bits = (mode >> shift) & 0o7;
        perms.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        perms.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        perms.push(match (mode & special_bit != 0, bits & 0o1 != 0) {
            (true, true) => special,
            (true, false) => special.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    perms
}

/// Text of the size column: `0` for symlinks, `major*256+minor` for devices.
pub fn size_field(entry: &Entry) -> String {
    if entry.kind == FileKind::Symlink {
        return "0".to_string();
    }
    match entry.device {
        Some(dev) => dev.synthetic_size().to_string(),
        None => entry.size.to_string(),
    }
}

/// Timestamps older than six months, or in the future, show the year
/// instead of the time of day.
pub fn format_time(modified: SystemTime, now: DateTime<Local>) -> String {
    let modified: DateTime<Local> = modified.into();
    let six_months_ago = now.checked_sub_months(Months::new(6)).unwrap_or(now);
    if modified < six_months_ago || modified > now {
        modified.format("%b %e  %Y").to_string()
    } else {
        modified.format("%b %e %H:%M").to_string()
    }
}

struct Row {
    perms: String,
    links: String,
    owner: String,
    group: String,
    size: String,
    time: String,
    name: String,
}

#[derive(Default)]
struct Widths {
    links: usize,
    owner: usize,
    group: usize,
    size: usize,
}

impl Widths {
    fn fit(&mut self, row: &Row) {
        self.links = self.links.max(row.links.chars().count());
        self.owner = self.owner.max(row.owner.chars().count());
        self.group = self.group.max(row.group.chars().count());
        self.size = self.size.max(row.size.chars().count());
    }
}

/// Long-form output: one aligned row per entry.
pub fn write_long<W: Write>(
    out: &mut W,
    entries: &[Entry],
    ids: &dyn Identities,
    now: DateTime<Local>,
) -> io::Result<()> {
    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| Row {
            perms: permission_string(entry.kind, entry.mode),
            links: entry.nlink.to_string(),
            owner: owner_name(ids, entry.uid),
            group: group_name(ids, entry.gid),
            size: size_field(entry),
            time: format_time(entry.modified, now),
            name: colored_name(entry),
        })
        .collect();

    let mut widths = Widths::default();
    for row in &rows {
        widths.fit(row);
    }

    for row in &rows {
        writeln!(
            out,
            "{} {:>lw$} {:<ow$} {:<gw$} {:>sw$} {} {}",
            row.perms,
            row.links,
            row.owner,
            row.group,
            row.size,
            row.time,
            row.name,
            lw = widths.links,
            ow = widths.owner,
            gw = widths.group,
            sw = widths.size,
        )?;
    }
    Ok(())
}
