#![no_main]

use arch_asset_check::CheckConfig;
use arch_asset_check::archive::{
    AssetArchive, validate_contents, validate_payload, validate_size,
};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let cursor = Cursor::new(data);
    let Ok(archive) = AssetArchive::from_reader(cursor, Path::new("fuzz.zip"), data.len() as u64)
    else {
        return;
    };

    let config = CheckConfig::default();
    let _ = validate_size(&archive, &config);
    let _ = validate_contents(&archive, &config);
    let _ = validate_payload(&archive, &config);
});
