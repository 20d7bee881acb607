use crate::codec::helpers::fixtures::GadgetV1;
use crate::codec::helpers::scratch_dir;
use anyhow::{ensure, Result};
use bso_codec::{BsoFile, ReadSeek};
use bso_types::serde::Value;
use bso_types::types::{NoAssets, ValueKind};
use std::io::{Read, Write};

const MARKER: u16 = 0xBEEF;
const MASK: i32 = 0x55AA;

/// A matched pair of per-field overrides that replace the default wire
/// form of every `I32` field with a marked, masked record, and decline
/// everything else to the default codec.
#[test]
fn override_hooks_replace_one_kind() -> Result<()> {
    let dir = scratch_dir("hooks_i32_mask")?;
    let file = BsoFile::at_path(dir.join("hooked.bso"));

    let out = GadgetV1 {
        label: String::from("masked"),
        power: 1234,
    };

    let mut hook_writes = 0u32;
    let mut write_hook = |w: &mut dyn Write, val: &Value, kind: &ValueKind| -> Result<bool> {
        match (val, kind) {
            (Value::I32(i), ValueKind::I32) => {
                w.write_all(&MARKER.to_le_bytes())?;
                w.write_all(&(i ^ MASK).to_le_bytes())?;
                hook_writes += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    };
    file.save_with(&out, &NoAssets, &mut write_hook)?;
    assert_eq!(hook_writes, 1);

    // The file is now unreadable without the matching read override: the
    // marker is not a known type tag, so the field degrades to default.
    let plain: GadgetV1 = file.load(&NoAssets)?;
    assert_eq!(plain.label, "masked");
    assert_eq!(plain.power, 0);

    let mut hook_reads = 0u32;
    let mut read_hook = |r: &mut dyn ReadSeek, kind: &ValueKind| -> Result<Option<Value>> {
        match kind {
            ValueKind::I32 => {
                let mut marker = [0u8; 2];
                r.read_exact(&mut marker)?;
                ensure!(u16::from_le_bytes(marker) == MARKER, "marker missing");
                let mut quad = [0u8; 4];
                r.read_exact(&mut quad)?;
                hook_reads += 1;
                Ok(Some(Value::I32(i32::from_le_bytes(quad) ^ MASK)))
            }
            _ => Ok(None),
        }
    };
    let mut back = GadgetV1::default();
    file.load_into_with(&mut back, &NoAssets, &mut read_hook)?;
    assert_eq!(hook_reads, 1);
    assert_eq!(back.label, "masked");
    assert_eq!(back.power, 1234);

    Ok(())
}

/// A read hook that fails a field leaves that field alone and nothing
/// else.
#[test]
fn failing_read_hook_costs_only_its_field() -> Result<()> {
    let dir = scratch_dir("hooks_failing_read")?;
    let file = BsoFile::at_path(dir.join("refused.bso"));

    let out = GadgetV1 {
        label: String::from("kept"),
        power: 555,
    };
    file.save(&out, &NoAssets)?;

    let mut read_hook = |_r: &mut dyn ReadSeek, kind: &ValueKind| -> Result<Option<Value>> {
        match kind {
            ValueKind::I32 => Err(anyhow::anyhow!("refusing every I32")),
            _ => Ok(None),
        }
    };
    let mut back = GadgetV1 {
        label: String::new(),
        power: -1,
    };
    file.load_into_with(&mut back, &NoAssets, &mut read_hook)?;

    assert_eq!(back.label, "kept");
    assert_eq!(back.power, -1);

    Ok(())
}
