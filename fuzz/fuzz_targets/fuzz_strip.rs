#![no_main]

use libfuzzer_sys::fuzz_target;
use termtext::strip::strip_ansi_units;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }

    // Raw bytes, valid UTF-8 or not, must never panic.
    if let Some(stripped) = strip_ansi_units(data) {
        assert!(stripped.len() < data.len());
    }

    // Reinterpret pairs of bytes as UTF-16 code units, lone surrogates included.
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let _ = strip_ansi_units(&units);

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Stripping twice removes nothing more.
    let once = termtext::strip_ansi_cow(text);
    assert!(termtext::strip_ansi(&once).is_none(), "strip is not idempotent: {text:?}");
});
