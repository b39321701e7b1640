#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // PPM 2x2 carrying "HI": header 00 00 00 02 then 'H' 'I' in the low bytes
    let ppm = b"P6\n2 2\n255\n\x00\x00\x00\x02HI\x00\x00\x00\x00\x00\x00";
    fs::write(format!("{dir}/ppm_hi_2x2.ppm"), ppm).unwrap();

    // PPM 2x2 whose header claims more than the carrier holds
    let ppm = b"P6\n2 2\n255\n\x00\x00\x00\x09abcdefgh";
    fs::write(format!("{dir}/ppm_truncated_2x2.ppm"), ppm).unwrap();

    // 16-bit PPM 2x1 carrying one byte
    let ppm16 = b"P6\n2 1\n65535\n\xaa\x00\xaa\x00\xaa\x00\xaa\x01\xaa\x2a";
    fs::write(format!("{dir}/ppm16_2x1.ppm"), ppm16).unwrap();

    // PAM RGBA 2x1, alpha ignored
    let pam = b"P7\nWIDTH 2\nHEIGHT 1\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n\x00\x00\x00\x10\x01\x20\x30\x40";
    fs::write(format!("{dir}/pam_rgba_2x1.pam"), pam).unwrap();

    // farbfeld 2x1, empty payload
    let mut ff = b"farbfeld".to_vec();
    ff.extend_from_slice(&2u32.to_be_bytes());
    ff.extend_from_slice(&1u32.to_be_bytes());
    ff.extend_from_slice(&[0u8; 16]);
    fs::write(format!("{dir}/farbfeld_2x1.ff"), ff).unwrap();

    // Minimal BMP 2x1 24-bit, empty payload
    let mut bmp = vec![0u8; 62]; // 54 header + 8 pixel (6 + 2 padding)
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&62u32.to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&54u32.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&2i32.to_le_bytes()); // width
    bmp[22..26].copy_from_slice(&1i32.to_le_bytes()); // height
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&24u16.to_le_bytes()); // bpp
    fs::write(format!("{dir}/bmp_2x1.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_p6.bin"), b"P6").unwrap();
    fs::write(format!("{dir}/one_pixel.ppm"), b"P6\n1 1\n255\n\x00\x00\x00").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/p7_no_endhdr.bin"), b"P7\nWIDTH 1\nHEIGHT 1\n").unwrap();
    fs::write(format!("{dir}/qoi_short.bin"), b"qoif\x00\x00").unwrap();
    fs::write(
        format!("{dir}/qoi_huge_header.bin"),
        b"qoif\x80\x00\x00\x00\x80\x00\x00\x00\x04\x00\x00\x00\x00\x00\x00\x00\x00\x01",
    )
    .unwrap();
    fs::write(format!("{dir}/png_signature_only.bin"), b"\x89PNG\r\n\x1a\n").unwrap();

    println!("Generated seed corpus in {dir}/");
}
