//! Test corpus: payload roundtrips over generated covers of various
//! patterns, sizes, and formats.

use enough::Unstoppable;
use zenstego::*;

fn checkerboard(w: usize, h: usize, depth: SampleDepth) -> CarrierGrid {
    let scale = if depth == SampleDepth::Sixteen { 257 } else { 1 };
    CarrierGrid::from_fn(w, h, depth, false, |x, y| {
        let base: u16 = if (x + y) % 2 == 0 { 200 } else { 10 };
        RGBA16::new(
            base * scale,
            (base + 20) * scale,
            (base + 40) * scale,
            depth.max_value(),
        )
    })
}

fn noise_pattern(w: usize, h: usize, alpha: bool) -> CarrierGrid {
    let mut state: u32 = 0xDEAD_BEEF;
    CarrierGrid::from_fn(w, h, SampleDepth::Eight, alpha, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        RGBA16::new(
            u16::from(state as u8),
            u16::from((state >> 8) as u8),
            u16::from((state >> 16) as u8),
            u16::from((state >> 24) as u8),
        )
    })
}

fn noise_payload(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn embed(cover: &[u8], format: Option<ContainerFormat>, payload: &[u8]) -> Vec<u8> {
    let mut carrier = Vec::new();
    let mut builder = StegoWriter::<&mut Vec<u8>>::builder();
    if let Some(format) = format {
        builder = builder.format(format);
    }
    let mut writer = builder.open(cover, &mut carrier).unwrap();
    writer.write_payload(payload).unwrap();
    writer.finalize().unwrap();
    carrier
}

/// Read the whole payload in `chunk`-sized pieces, checking the
/// end-of-stream signal arrives exactly with the last byte.
fn read_in_chunks(carrier: &[u8], chunk: usize) -> Vec<u8> {
    let mut reader = StegoReader::new(carrier).unwrap();
    let total = reader.len();
    let mut out = Vec::with_capacity(total);
    let mut buf = vec![0u8; chunk];
    loop {
        let got = reader.read_chunk(&mut buf);
        out.extend_from_slice(&buf[..got.len]);
        assert_eq!(got.end_of_stream, out.len() == total);
        if got.end_of_stream {
            break;
        }
        assert!(got.len > 0, "reader stalled before end of stream");
    }
    out
}

// ── Sizes ────────────────────────────────────────────────────────────

#[test]
fn full_payload_across_sizes() {
    for (w, h) in [(2, 1), (1, 2), (3, 3), (16, 1), (1, 16), (17, 13), (64, 48)] {
        let cover = codec::encode(&checkerboard(w, h, SampleDepth::Eight), ContainerFormat::Ppm, Unstoppable)
            .unwrap();
        let cap = capacity(w as u32, h as u32).unwrap();
        let payload = noise_payload(cap, (w * 31 + h) as u32);
        let carrier = embed(&cover, None, &payload);
        assert_eq!(read_in_chunks(&carrier, 7), payload, "{w}x{h}");
    }
}

#[test]
fn chunk_sizes_do_not_matter() {
    let cover = codec::encode(&noise_pattern(12, 9, false), ContainerFormat::Bmp, Unstoppable).unwrap();
    let payload = noise_payload(250, 0xC0FFEE);
    let carrier = embed(&cover, None, &payload);
    for chunk in [1, 2, 3, 64, 250, 251, 4096] {
        assert_eq!(read_in_chunks(&carrier, chunk), payload, "chunk {chunk}");
    }
}

// ── Formats ──────────────────────────────────────────────────────────

#[test]
fn noise_cover_through_each_output() {
    let grid = noise_pattern(20, 15, true);
    let cover = codec::encode(&grid, ContainerFormat::Pam, Unstoppable).unwrap();
    let payload = noise_payload(500, 42);

    let mut outputs = vec![
        ContainerFormat::Ppm,
        ContainerFormat::Pam,
        ContainerFormat::Bmp,
        ContainerFormat::Farbfeld,
    ];
    #[cfg(feature = "png")]
    outputs.push(ContainerFormat::Png);
    #[cfg(feature = "qoi")]
    outputs.push(ContainerFormat::Qoi);

    for format in outputs {
        let carrier = embed(&cover, Some(format), &payload);
        assert_eq!(codec::detect(&carrier), Some(format));
        assert_eq!(read_in_chunks(&carrier, 33), payload, "{format}");
    }
}

#[test]
fn sixteen_bit_checkerboard() {
    let grid = checkerboard(11, 7, SampleDepth::Sixteen);
    let mut formats = vec![ContainerFormat::Ppm, ContainerFormat::Pam, ContainerFormat::Farbfeld];
    #[cfg(feature = "png")]
    formats.push(ContainerFormat::Png);
    for format in formats {
        let cover = codec::encode(&grid, format, Unstoppable).unwrap();
        let payload = noise_payload(capacity(11, 7).unwrap(), 7);
        let carrier = embed(&cover, None, &payload);
        assert_eq!(read_in_chunks(&carrier, 16), payload, "{format}");
    }
}

// ── Re-embedding ─────────────────────────────────────────────────────

#[test]
fn carrier_can_be_reused_as_cover() {
    let cover = codec::encode(&checkerboard(8, 8, SampleDepth::Eight), ContainerFormat::Ppm, Unstoppable)
        .unwrap();
    let first = embed(&cover, None, b"a much longer first message");
    let second = embed(&first, None, b"short");
    assert_eq!(read_in_chunks(&second, 8), b"short");
}

#[test]
fn same_cover_different_lengths_differ_only_in_frame() {
    let grid = checkerboard(10, 10, SampleDepth::Eight);
    let cover = codec::encode(&grid, ContainerFormat::Ppm, Unstoppable).unwrap();
    let short = embed(&cover, None, b"abc");
    let long = embed(&cover, None, b"abcdefgh");

    let (short, _) = codec::decode(&short, Unstoppable).unwrap();
    let (long, _) = codec::decode(&long, Unstoppable).unwrap();
    let differing = cursor::ChannelCursor::for_grid(&grid)
        .filter(|&slot| cursor::peek_low_byte(&short, slot) != cursor::peek_low_byte(&long, slot))
        .count();
    // Header byte 3 and payload bytes 3..8 are the only candidates.
    assert!(differing <= 1 + 5, "{differing} samples differ");
}
