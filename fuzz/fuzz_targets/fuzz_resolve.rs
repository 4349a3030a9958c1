#![no_main]

use libfuzzer_sys::fuzz_target;
use pngprompt::png::PNG_SIGNATURE;
use pngprompt::{ExtractorConfig, MetadataResolver};

fuzz_target!(|data: &[u8]| {
    let Ok(resolver) = MetadataResolver::new(&ExtractorConfig::default()) else {
        return;
    };
    let _ = resolver.resolve(data);

    let mut framed = PNG_SIGNATURE.to_vec();
    framed.extend_from_slice(data);
    let _ = resolver.resolve(&framed);
});
