#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use linebound_core::Session;

fuzz_target!(|data: &[u8]| {
    let Some((&cap, input)) = data.split_first() else {
        return;
    };
    let cap = usize::from(cap).max(1);
    let mut session = Session::new(Cursor::new(input), std::io::sink());

    let mut buf = vec![0u8; cap];
    if let Ok(copy) = session.read_line_into(&mut buf) {
        assert!(copy.len < cap);
        assert_eq!(buf[copy.len], 0);
        assert!(!buf[..copy.len].contains(&b'\n'));
    }
    if let Some(line) = session.read_line_alloc(cap) {
        assert!(line.len() < cap);
        assert_eq!(line.as_bytes_with_nul().last(), Some(&0));
    }
    let managed = session.read_line_managed();
    assert!(!managed.ends_with('\n'));
});
