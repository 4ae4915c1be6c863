use std::cmp::Ordering;

use crate::cli::DisplayOptions;
use crate::entry::Entry;

/// Case-insensitive name order.
///
/// Names are lowercased with Unicode simple case mapping and compared by code
/// point, so the result does not depend on the host locale. Names that only
/// differ in case fall back to a plain code point comparison.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// `.` and `..` rank ahead of everything and are not affected by reverse.
fn fixed_rank(entry: &Entry) -> u8 {
    match entry.special {
        Some(special) => special as u8,
        None => u8::MAX,
    }
}

fn compare_entries(a: &Entry, b: &Entry, opts: &DisplayOptions) -> Ordering {
    if a.special.is_some() || b.special.is_some() {
        return fixed_rank(a).cmp(&fixed_rank(b));
    }

    let ord = if opts.sort_by_time {
        b.modified
            .cmp(&a.modified)
            .then_with(|| compare_names(&a.name, &b.name))
    } else {
        compare_names(&a.name, &b.name)
    };

    if opts.reverse {
        ord.reverse()
    } else {
        ord
    }
}

fn compare_devices(a: &Entry, b: &Entry, opts: &DisplayOptions) -> Ordering {
    let ord = a
        .device
        .cmp(&b.device)
        .then_with(|| compare_names(&a.name, &b.name));
    if opts.reverse {
        ord.reverse()
    } else {
        ord
    }
}

/// Sort a listing in place.
///
/// Entries are ordered by name (or by modification time with `-t`). Device
/// files are then reordered among the positions they occupy so that any two
/// devices compare by (major, minor) instead.
pub fn sort_entries(entries: &mut [Entry], opts: &DisplayOptions) {
    entries.sort_by(|a, b| compare_entries(a, b, opts));

    let slots: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.special.is_none() && e.kind.is_device())
        .map(|(i, _)| i)
        .collect();
    if slots.len() < 2 {
        return;
    }

    let mut devices: Vec<Entry> = slots.iter().map(|&i| entries[i].clone()).collect();
    devices.sort_by(|a, b| compare_devices(a, b, opts));
    for (slot, device) in slots.into_iter().zip(devices) {
        entries[slot] = device;
    }
}
