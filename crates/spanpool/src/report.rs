//! Textual structure reports.
//!
//! Both reports render as a single line (no trailing newline):
//!
//! ```text
//! active: 30 [20]
//! available: 0 [30], 50 [50]
//! ```
//!
//! Entries are `offset [length]` in address order. An empty pool renders
//! `active: none`; a full one renders `available: none`.

use std::fmt;

use crate::pool::Pool;

/// Live regions of a pool, as `offset [len]` entries.
#[derive(Clone, Copy)]
pub struct ActiveReport<'a> {
    pool: &'a Pool,
}

impl<'a> ActiveReport<'a> {
    pub(crate) fn new(pool: &'a Pool) -> Self {
        Self { pool }
    }
}

impl fmt::Display for ActiveReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pool.is_empty() {
            return f.write_str("active: none");
        }
        f.write_str("active: ")?;
        write_entries(f, self.pool.regions().map(|r| (r.offset, r.len)))
    }
}

/// Free spans of a pool, as `offset [len]` entries.
///
/// The leading gap is listed only when non-zero; every region's trailing
/// gap is listed, even when empty.
#[derive(Clone, Copy)]
pub struct AvailableReport<'a> {
    pool: &'a Pool,
}

impl<'a> AvailableReport<'a> {
    pub(crate) fn new(pool: &'a Pool) -> Self {
        Self { pool }
    }
}

impl fmt::Display for AvailableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pool.available() == 0 {
            return f.write_str("available: none");
        }
        f.write_str("available: ")?;
        write_entries(f, self.pool.gaps().map(|g| (g.offset, g.len)))
    }
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (usize, usize)>,
) -> fmt::Result {
    for (i, (offset, len)) in entries.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{offset} [{len}]")?;
    }
    Ok(())
}
