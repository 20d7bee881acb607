use crate::codec::helpers::fixtures::{Monster, NestedIn, NestedOut, StatBlock};
use crate::codec::helpers::scratch_dir;
use anyhow::Result;
use bso_codec::BsoFile;
use bso_types::types::NoAssets;
use std::fs;

/// Magic mismatch is the one fatal failure: the load errors out and the
/// destination keeps every pre-set sentinel value.
#[test]
fn bad_magic_aborts_and_leaves_the_object_alone() -> Result<()> {
    let dir = scratch_dir("recovery_bad_magic")?;
    let path = dir.join("mangled.bso");
    let file = BsoFile::at_path(&path);

    file.save(&Monster::specimen(), &NoAssets)?;

    let mut bytes = fs::read(&path)?;
    bytes[0] = b'X';
    fs::write(&path, &bytes)?;

    let mut back = Monster::specimen();
    back.base.name = String::from("sentinel");
    back.hp = 424_242;

    let res = file.load_into(&mut back, &NoAssets);
    assert!(res.is_err());
    assert_eq!(back.base.name, "sentinel");
    assert_eq!(back.hp, 424_242);

    Ok(())
}

/// A stored object block arriving at a scalar destination is skipped
/// wholesale through its length prefix; the fields around it decode.
#[test]
fn mismatched_nested_block_is_skipped_wholesale() -> Result<()> {
    let dir = scratch_dir("recovery_block_skip")?;
    let file = BsoFile::at_path(dir.join("nested.bso"));

    let out = NestedOut {
        pad: 5,
        inner: StatBlock {
            attack: 100,
            defense: 200,
            grade: 'B',
        },
        tail: String::from("still here"),
    };
    file.save(&out, &NoAssets)?;

    let back: NestedIn = file.load(&NoAssets)?;
    assert_eq!(back.pad, 5);
    assert_eq!(back.inner, 0);
    assert_eq!(back.tail, "still here");

    Ok(())
}

/// A corrupted index offset costs exactly the field it points at: the
/// recorded ID check refuses it, and the rest of the object decodes.
#[test]
fn corrupt_index_entry_costs_one_field() -> Result<()> {
    let dir = scratch_dir("recovery_corrupt_index")?;
    let path = dir.join("poked.bso");
    let file = BsoFile::at_path(&path);

    let out = NestedIn {
        pad: 5,
        inner: 23,
        tail: String::from("intact"),
    };
    file.save(&out, &NoAssets)?;

    // Walk to the root block's index section and bend field 1's offset so
    // it lands inside field 2's record. Layout after the 10-byte envelope:
    // tag(2) block_len(4) base_len(4) field_count(2) idx_len(4), then the
    // index entries of (id: u16, offset: i32).
    let mut bytes = fs::read(&path)?;
    let idx_start = 10 + 2 + 4 + 4 + 2 + 4;
    let second_offset = i32::from_le_bytes(bytes[idx_start + 8..idx_start + 12].try_into()?);
    bytes[idx_start + 2..idx_start + 6].copy_from_slice(&second_offset.to_le_bytes());
    fs::write(&path, &bytes)?;

    let mut back = NestedIn {
        pad: -1,
        inner: -1,
        tail: String::new(),
    };
    file.load_into(&mut back, &NoAssets)?;

    assert_eq!(back.pad, -1, "the redirected field must be refused");
    assert_eq!(back.inner, 23);
    assert_eq!(back.tail, "intact");

    Ok(())
}
