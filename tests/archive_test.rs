//! Archive Inspector tests over real ZIP files on disk

mod common;

use arch_asset_check::archive::{
    AssetArchive, is_ground_fbx, is_oks_fbx, validate_contents, validate_payload, validate_size,
};
use arch_asset_check::{CheckConfig, Status};
use common::{rgb_png, write_zip};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn open(entries: &[(&str, &[u8])]) -> AssetArchive {
    let bytes = common::zip_bytes(entries);
    let size = bytes.len() as u64;
    AssetArchive::from_reader(Cursor::new(bytes), Path::new("asset.zip"), size).unwrap()
}

#[test]
fn test_ground_with_oks_entries_passes() {
    let oks: Vec<String> = (1..=20)
        .map(|n| format!("0001_Lenina_12_{:02}.fbx", n))
        .collect();
    let mut entries: Vec<(&str, &[u8])> = oks.iter().map(|n| (n.as_str(), &b"fbx"[..])).collect();
    entries.push(("0001_Lenina_12_Ground.fbx", b"fbx"));
    let archive = open(&entries);

    let finding = validate_contents(&archive, &CheckConfig::default());
    assert_eq!(finding.status, Status::Passed, "{:?}", finding.messages);
}

#[test]
fn test_ground_only_passes() {
    let archive = open(&[("SM_Lenina_Ground.FBX", b"fbx")]);
    assert_eq!(
        validate_contents(&archive, &CheckConfig::default()).status,
        Status::Passed
    );
}

#[test]
fn test_missing_ground_fails() {
    let archive = open(&[("0001_Lenina_12_01.fbx", b"fbx")]);
    let finding = validate_contents(&archive, &CheckConfig::default());
    assert_eq!(finding.status, Status::Failed);
    assert!(finding.messages[0].contains("No Ground FBX file found"));
}

#[test]
fn test_two_grounds_fail() {
    let archive = open(&[("a_Ground.fbx", b"fbx"), ("b/c_Ground.fbx", b"fbx")]);
    let finding = validate_contents(&archive, &CheckConfig::default());
    assert!(finding.messages[0].starts_with("Multiple Ground FBX files found"));
}

#[test]
fn test_misnamed_oks_fails() {
    let archive = open(&[
        ("0001_Lenina_Ground.fbx", b"fbx"),
        ("0001_Lenina_21.fbx", b"fbx"),
    ]);
    let finding = validate_contents(&archive, &CheckConfig::default());
    assert_eq!(
        finding.messages,
        vec!["Invalid OKS FBX name: 0001_Lenina_21.fbx, expected [xxxx]_[address]_[01-20].fbx"]
    );
}

#[test]
fn test_too_many_fbx_entries() {
    let names: Vec<String> = (0..22).map(|n| format!("{}_Ground.fbx", n)).collect();
    let entries: Vec<(&str, &[u8])> = names.iter().map(|n| (n.as_str(), &b"x"[..])).collect();
    let archive = open(&entries);
    assert_eq!(
        validate_contents(&archive, &CheckConfig::default()).messages,
        vec!["Found 22 FBX files, expected 1 to 21"]
    );
}

#[test]
fn test_entry_classification() {
    let png = rgb_png(4);
    let archive = open(&[
        ("scenes/0001_Lenina_01.fbx", b"fbx"),
        ("scenes/textures/T_Lenina_1.png", png.as_slice()),
        ("notes.txt", b"n"),
    ]);
    assert_eq!(archive.fbx_entries, vec!["scenes/0001_Lenina_01.fbx"]);
    assert_eq!(archive.texture_entries, vec!["scenes/textures/T_Lenina_1.png"]);
    assert_eq!(archive.len(), 3);

    assert!(is_oks_fbx("scenes/0001_Lenina_01.fbx"));
    assert!(!is_oks_fbx("0001_Lenina_00.fbx"));
    assert!(is_ground_fbx("dir/x_ground.fbx"));
    assert!(!is_ground_fbx("x_Groundfloor.fbx"));
}

#[test]
fn test_size_limit() {
    let archive = open(&[("a_Ground.fbx", b"fbx")]);
    let config = CheckConfig {
        max_archive_bytes: 10,
        ..CheckConfig::default()
    };
    let finding = validate_size(&archive, &config);
    assert_eq!(finding.status, Status::Failed);
    assert_eq!(
        finding.messages,
        vec!["Archive size 0 MB exceeds 10 bytes limit"]
    );

    assert_eq!(
        validate_size(&archive, &CheckConfig::default()).messages,
        vec!["Archive size 0 MB"]
    );
}

#[test]
fn test_open_errors() {
    let dir = TempDir::new().unwrap();
    let missing = AssetArchive::open(&dir.path().join("missing.zip")).unwrap_err();
    assert!(missing.to_string().contains("[E1004]"));

    let bogus = dir.path().join("bogus.zip");
    std::fs::write(&bogus, b"not a zip at all").unwrap();
    let err = AssetArchive::open(&bogus).unwrap_err();
    assert!(err.to_string().contains("[E1002]"));
    assert!(err.is_fatal());

    let good = dir.path().join("good.zip");
    write_zip(&good, &[("a_Ground.fbx", b"fbx")]);
    let archive = AssetArchive::open(&good).unwrap();
    assert_eq!(archive.size, std::fs::metadata(&good).unwrap().len());
    assert_eq!(archive.len(), 1);
}

#[test]
fn test_payload_sizes_come_from_entry_metadata() {
    let png = rgb_png(8);
    let fbx = vec![0u8; 4096];
    let archive = open(&[
        ("0001_Lenina_12_Ground.fbx", fbx.as_slice()),
        ("textures/T_Lenina_12_Ground_1.png", png.as_slice()),
    ]);
    assert_eq!(archive.entry_size("0001_Lenina_12_Ground.fbx"), 4096);
    assert_eq!(
        archive.uncompressed_size(),
        4096 + png.len() as u64
    );

    let config = CheckConfig {
        warn_fbx_entry_bytes: 1024,
        ..CheckConfig::default()
    };
    let finding = validate_payload(&archive, &config);
    assert_eq!(finding.status, Status::Passed);
    assert_eq!(
        finding.messages,
        vec!["Warning: FBX entry 0001_Lenina_12_Ground.fbx exceeds 1 KB"]
    );

    let bare = open(&[("0001_Lenina_12_Ground.fbx", b"fbx")]);
    assert_eq!(
        validate_payload(&bare, &CheckConfig::default()).messages,
        vec!["Warning: No texture entries found in archive"]
    );
}
