#![allow(dead_code)]

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn make_png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    let crc = hasher.finalize();
    chunk.extend_from_slice(&crc.to_be_bytes());
    chunk
}

pub fn make_valid_ihdr() -> Vec<u8> {
    let mut ihdr_payload = Vec::new();
    ihdr_payload.extend_from_slice(&512u32.to_be_bytes());
    ihdr_payload.extend_from_slice(&768u32.to_be_bytes());
    ihdr_payload.push(8);
    ihdr_payload.push(6);
    ihdr_payload.extend_from_slice(&[0, 0, 0]);
    make_png_chunk(b"IHDR", &ihdr_payload)
}

pub fn make_text_chunk(keyword: &str, value: &str) -> Vec<u8> {
    let mut payload = keyword.as_bytes().to_vec();
    payload.push(0);
    payload.extend_from_slice(value.as_bytes());
    make_png_chunk(b"tEXt", &payload)
}

pub fn make_phys_chunk(x: u32, y: u32, unit: u8) -> Vec<u8> {
    let mut payload = x.to_be_bytes().to_vec();
    payload.extend_from_slice(&y.to_be_bytes());
    payload.push(unit);
    make_png_chunk(b"pHYs", &payload)
}

pub fn make_iend() -> Vec<u8> {
    make_png_chunk(b"IEND", &[])
}

pub fn assemble(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    data
}

/// Signature, IHDR, gAMA, pHYs, a `parameters` text chunk, IDAT and IEND.
pub fn make_generated_png(prompt: &str) -> Vec<u8> {
    assemble(&[
        make_valid_ihdr(),
        make_png_chunk(b"gAMA", &45455u32.to_be_bytes()),
        make_phys_chunk(3780, 3780, 1),
        make_text_chunk("parameters", prompt),
        make_png_chunk(b"IDAT", &[0x78, 0x9C, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01]),
        make_iend(),
    ])
}
