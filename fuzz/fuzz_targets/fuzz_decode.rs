#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Container sniffing and decoding must never panic
    let _ = zenstego::codec::decode(data, enough::Unstoppable);

    // Neither must payload extraction from arbitrary carriers
    if let Ok(mut reader) = zenstego::StegoReader::new(data) {
        let mut buf = [0u8; 64];
        while !reader.read_chunk(&mut buf).end_of_stream {}
    }
});
