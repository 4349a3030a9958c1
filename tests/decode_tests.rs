mod common;

use common::*;
use pngprompt::png::{ChunkReader, ChunkType, ResolutionUnit, TextDecodeMode};
use pngprompt::{ExtractorConfig, FormatError, MetadataResolver, PromptSource, decode_metadata};

fn resolver() -> MetadataResolver {
    MetadataResolver::new(&ExtractorConfig::default()).unwrap()
}

#[test]
fn test_well_formed_parameters() {
    let data = assemble(&[make_valid_ihdr(), make_text_chunk("parameters", "x"), make_iend()]);

    let res = resolver().resolve(&data).unwrap();
    assert!(!res.outcome.truncated);
    assert_eq!(res.prompt_text(), Some("x"));
}

#[test]
fn test_missing_iend_keeps_prompt() {
    let data = assemble(&[make_valid_ihdr(), make_text_chunk("parameters", "x")]);

    let res = resolver().resolve(&data).unwrap();
    assert!(res.outcome.truncated);
    assert_eq!(res.prompt_text(), Some("x"));
}

#[test]
fn test_truncated_mid_length_field() {
    let full = assemble(&[
        make_valid_ihdr(),
        make_text_chunk("parameters", "x"),
        make_iend(),
    ]);
    let text_end = 8 + 25 + 12 + "parameters\0x".len();
    let cut = &full[..text_end + 2];

    let stream = ChunkReader::read_all(cut).unwrap();
    assert!(stream.truncated);
    assert_eq!(stream.chunks.len(), 2);
    assert_eq!(stream.chunks[1].chunk_type, ChunkType::TEXT);
}

#[test]
fn test_full_generated_png() {
    let prompt = "masterpiece, a lighthouse at dusk\n\
                  Negative prompt: blurry\n\
                  Steps: 28, Sampler: Euler a";
    let data = make_generated_png(prompt);

    let outcome = decode_metadata(&data, TextDecodeMode::Lenient).unwrap();
    assert!(!outcome.truncated);

    let record = &outcome.record;
    assert_eq!(record.text_value("parameters"), Some(prompt));
    let phys = record.physical.unwrap();
    assert_eq!(phys.pixels_per_unit_x, 3780);
    assert_eq!(phys.unit, ResolutionUnit::Meters);
    for t in [ChunkType::IHDR, ChunkType::GAMA, ChunkType::IDAT, ChunkType::IEND] {
        assert!(record.has_chunk(t), "missing {t}");
    }
}

#[test]
fn test_duplicate_keyword_last_wins() {
    let data = assemble(&[
        make_text_chunk("parameters", "first"),
        make_text_chunk("Software", "tool"),
        make_text_chunk("parameters", "second"),
        make_iend(),
    ]);

    let outcome = decode_metadata(&data, TextDecodeMode::Lenient).unwrap();
    assert_eq!(outcome.record.text_value("parameters"), Some("second"));
    assert_eq!(outcome.record.text.len(), 2);
}

#[test]
fn test_invalid_signature_yields_no_chunks() {
    let mut data = make_generated_png("x");
    data[0] = 0x88;

    assert_eq!(ChunkReader::read_all(&data).unwrap_err(), FormatError::BadSignature);
    assert_eq!(resolver().resolve(&data).unwrap_err(), FormatError::BadSignature);
}

#[test]
fn test_crlf_mangled_signature() {
    let mut data = make_generated_png("x");
    data.remove(4);
    assert!(ChunkReader::read_all(&data).is_err());
}

#[test]
fn test_heuristic_recovers_from_raw_bytes() {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(b"\xFF\xFF\xFF\xF0...someprefixXtparameters");
    data.extend_from_slice(b"SOMELONGTEXTOVERFIFTYCHARSAAAAAAAAAAAAAAAAAAAAAAA");
    data.extend_from_slice(b"IDATrest\x9C\xFE\x00");

    let res = resolver().resolve(&data).unwrap();
    let prompt = res.prompt.unwrap();
    assert_eq!(prompt.source, PromptSource::Heuristic);
    assert_eq!(
        prompt.text,
        "parametersSOMELONGTEXTOVERFIFTYCHARSAAAAAAAAAAAAAAAAAAAAAAA"
    );
    assert!(prompt.text.len() > 50);
    assert!(!prompt.text.contains("IDAT"));
    assert!(!prompt.text.contains("someprefix"));
}

#[test]
fn test_heuristic_short_text_rejected() {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(b"\xFF\xFF\xFF\xF0Xtparameters");
    data.extend_from_slice("short prompt".as_bytes());
    data.extend_from_slice(b"IDAT");

    assert!(resolver().resolve(&data).unwrap().prompt.is_none());
}

#[test]
fn test_heuristic_on_damaged_text_length() {
    let prompt = "an astronaut riding a horse on the moon, highly detailed, 8k, trending";
    let mut data = make_generated_png(prompt);

    // signature, IHDR, gAMA, pHYs
    let text_offset = 8 + 25 + 16 + 21;
    data[text_offset..text_offset + 4].copy_from_slice(&0x00FF_FFFFu32.to_be_bytes());

    let res = resolver().resolve(&data).unwrap();
    assert!(res.outcome.truncated);
    assert!(res.outcome.record.text.is_empty());
    let prompt_found = res.prompt.unwrap();
    assert_eq!(prompt_found.source, PromptSource::Heuristic);
    assert!(prompt_found.text.starts_with(&format!("parameters{prompt}")));
}

#[test]
fn test_plain_png_has_no_prompt() {
    let data = assemble(&[
        make_valid_ihdr(),
        make_png_chunk(b"sRGB", &[0]),
        make_png_chunk(b"IDAT", &[0x78, 0x9C, 0x01]),
        make_iend(),
    ]);

    let res = resolver().resolve(&data).unwrap();
    assert!(res.prompt.is_none());
    assert!(res.outcome.record.has_chunk(ChunkType::SRGB));
}

#[test]
fn test_strict_mode_fails_on_nul_in_value() {
    let data = assemble(&[make_text_chunk("parameters", "a\0b"), make_iend()]);

    let lenient = resolver().resolve(&data).unwrap();
    assert_eq!(lenient.prompt_text(), Some("a"));

    let strict = MetadataResolver::new(
        &ExtractorConfig::default().with_text_mode(TextDecodeMode::Strict),
    )
    .unwrap();
    assert!(matches!(
        strict.resolve(&data),
        Err(FormatError::UnexpectedNul { .. })
    ));
}

#[test]
fn test_undersized_phys_is_presence_only() {
    let data = assemble(&[
        make_png_chunk(b"pHYs", &[0, 0, 0, 1]),
        make_text_chunk("parameters", "still here"),
        make_iend(),
    ]);

    let res = resolver().resolve(&data).unwrap();
    assert!(res.outcome.record.physical.is_none());
    assert!(res.outcome.record.has_chunk(ChunkType::PHYS));
    assert_eq!(res.prompt_text(), Some("still here"));
}
