//! Startup banner.
//!
//! Two blank lines, the title centered in 80 columns, a `═` rule sized to the
//! longer text line plus six (at least 50), the subtitle centered, then two
//! more blank lines.

use std::io::{self, Write};

/// Width the banner is centered in.
pub const BANNER_WIDTH: usize = 80;

/// Narrowest separator drawn.
pub const MIN_SEPARATOR_WIDTH: usize = 50;

/// Banner title line.
pub const TITLE: &str = "Multi Programming Language Codebase";

/// Banner subtitle line.
pub const SUBTITLE: &str = "A software development education project";

const SEPARATOR_GLYPH: char = '═';

/// `text` padded on both sides to center it in [`BANNER_WIDTH`] columns.
/// Odd leftovers go to the right. Text that does not fit is returned as is.
#[must_use]
pub fn centered(text: &str) -> String {
    let width = text.chars().count();
    if width >= BANNER_WIDTH {
        return text.to_owned();
    }
    let total = BANNER_WIDTH - width;
    let left = total / 2;
    let right = total - left;
    format!("{:left$}{text}{:right$}", "", "")
}

/// A horizontal rule of `width` glyphs, left-padded to center it.
///
/// Widths below [`MIN_SEPARATOR_WIDTH`] are raised to it; widths of
/// [`BANNER_WIDTH`] or more fill the whole line with no padding.
#[must_use]
pub fn separator(width: usize) -> String {
    let width = width.max(MIN_SEPARATOR_WIDTH);
    if width >= BANNER_WIDTH {
        return SEPARATOR_GLYPH.to_string().repeat(BANNER_WIDTH);
    }
    let left = (BANNER_WIDTH - width) / 2;
    let mut line = " ".repeat(left);
    line.extend(std::iter::repeat_n(SEPARATOR_GLYPH, width));
    line
}

/// Separator width for the banner: the longer text line plus six.
#[must_use]
pub fn separator_width() -> usize {
    TITLE.chars().count().max(SUBTITLE.chars().count()) + 6
}

/// Write the full banner to `out`.
pub fn write_banner<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "{}", centered(TITLE))?;
    writeln!(out, "{}", separator(separator_width()))?;
    writeln!(out, "{}", centered(SUBTITLE))?;
    writeln!(out)?;
    writeln!(out)?;
    out.flush()
}
