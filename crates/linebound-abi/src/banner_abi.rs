//! ABI layer for the startup banner.

use std::io;

use linebound_core::banner::write_banner;

/// C `print_banner`: write the startup banner to stdout.
#[unsafe(no_mangle)]
pub extern "C" fn print_banner() {
    let mut out = io::stdout().lock();
    let _ = write_banner(&mut out);
}
