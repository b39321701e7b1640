#![no_main]
use libfuzzer_sys::fuzz_target;
use zenstego::*;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the cover size, the rest is the payload
    let [w, h, payload @ ..] = data else { return };
    let (w, h) = (usize::from(*w % 32) + 1, usize::from(*h % 32) + 1);
    let Ok(cap) = capacity(w as u32, h as u32) else { return };

    let grid = CarrierGrid::from_fn(w, h, SampleDepth::Eight, false, |x, y| {
        RGBA16::new((x * 8) as u16, (y * 8) as u16, 128, 255)
    });
    let cover = codec::encode(&grid, ContainerFormat::Ppm, enough::Unstoppable)
        .expect("encoding a valid grid failed");

    let mut carrier = Vec::new();
    let mut writer = StegoWriter::new(cover.as_slice(), &mut carrier).expect("cover rejected");
    let written = writer.write_payload(payload).unwrap_or(cap);
    assert_eq!(written, payload.len().min(cap));
    writer.finalize().expect("finalize failed");

    let mut reader = StegoReader::new(carrier.as_slice()).expect("carrier rejected");
    let mut out = vec![0u8; written];
    let chunk = reader.read_chunk(&mut out);
    assert_eq!(chunk.len, written);
    assert!(chunk.end_of_stream);
    assert_eq!(out, payload[..written]);
});
