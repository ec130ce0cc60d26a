#![no_main]
use libfuzzer_sys::fuzz_target;
use linebound_core::bounded_copy;
use linebound_core::copy::content_len;

fuzz_target!(|data: &[u8]| {
    let Some((&cap, src)) = data.split_first() else {
        return;
    };
    let cap = usize::from(cap);
    let mut dest = vec![0xAAu8; cap];
    let copy = bounded_copy(&mut dest, src);

    if cap == 0 {
        assert_eq!(copy.len, 0);
        return;
    }
    let content = content_len(src);
    assert!(copy.len < cap);
    assert_eq!(copy.len, content.min(cap - 1));
    assert_eq!(&dest[..copy.len], &src[..copy.len]);
    assert_eq!(dest[copy.len], 0);
    assert_eq!(copy.truncated, content > cap - 1);
    // Bytes past the terminator are untouched.
    assert!(dest[copy.len + 1..].iter().all(|&b| b == 0xAA));
});
