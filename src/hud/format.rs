//! Text formatting helpers for HUD widgets.

/// Flags for [`format_number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberFlags(u32);

impl NumberFlags {
    /// Produce an empty string for zero.
    pub const WHEN_NOT_ZERO: u32 = 0x1;
    /// Pad with zeros instead of spaces.
    pub const FILL_ZEROS: u32 = 0x2;

    pub const fn new(flags: u32) -> Self {
        Self(flags)
    }

    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) == flag
    }
}

const MAX_VALUES: [i32; 10] = [
    1, 9, 99, 999, 9999, 99999, 999999, 9999999, 99999999, 999999999,
];

/// Format a number for a HUD counter.
///
/// With `maxsize` in 1..=9 the value is clamped to what fits in that many
/// digits. `minsize > 1` pads to that width.
pub fn format_number(number: i32, minsize: i32, maxsize: i32, flags: NumberFlags, prefix: &str) -> String {
    if number == 0 && flags.contains(NumberFlags::WHEN_NOT_ZERO) {
        return String::new();
    }
    let number = if maxsize > 0 && maxsize < 10 {
        let lo = -MAX_VALUES[(maxsize - 1) as usize];
        let hi = MAX_VALUES[maxsize as usize];
        number.clamp(lo, hi)
    } else {
        number
    };

    if minsize <= 1 {
        format!("{}{}", prefix, number)
    } else if flags.contains(NumberFlags::FILL_ZEROS) {
        format!("{}{:0width$}", prefix, number, width = minsize as usize)
    } else {
        format!("{}{:width$}", prefix, number, width = minsize as usize)
    }
}

/// Level naming used by the automap title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapLabel<'a> {
    /// Lump name, e.g. `MAP01`.
    pub map_name: &'a str,
    /// Human readable title.
    pub level_name: &'a str,
    pub in_hub: bool,
}

/// Automap title, optionally prefixed with the map's lump name.
///
/// `show_label` follows `am_showmaplabel`: 0 never, 1 always, 2 outside hubs.
/// `color` is an escape sequence placed before the title.
pub fn format_map_name(label: &MapLabel<'_>, show_label: i32, color: &str) -> String {
    let mut out = String::new();
    if show_label == 1 || (show_label == 2 && !label.in_hub) {
        out.push_str(label.map_name);
        out.push_str(": ");
    }
    out.push_str(color);
    out.push_str(label.level_name);
    out
}
