#![no_main]

use libfuzzer_sys::fuzz_target;

// Any IR the encoder accepts must come out as a well-formed container.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(result) = wordfont_sf2::encode_json(text) {
        let report = wordfont_sf2::inspect(&result.data).expect("encoder output must inspect");
        assert_eq!(report.root.size + 8, result.data.len());
        assert_eq!(report.root.children.len(), 3);
    }
});
