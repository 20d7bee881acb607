use crate::codec::helpers::fixtures::Monster;
use crate::codec::helpers::scratch_dir;
use crate::codec::helpers::store::{doc_file_path, FakeStore, IconAsset, PaletteDoc};
use anyhow::Result;
use bso_codec::BsoFile;
use bso_types::types::{Asset, SharedAsset};
use std::sync::Arc;

fn icon_key(monster: &Monster) -> Option<&str> {
    let asset = monster.icon.as_ref()?;
    let icon = asset.as_any().downcast_ref::<IconAsset>()?;
    Some(&icon.key)
}

fn store_with_icon() -> (FakeStore, SharedAsset) {
    let mut store = FakeStore::new();
    let icon: SharedAsset = Arc::new(IconAsset {
        key: String::from("umbrella"),
    });
    store.add("icon-guid-1", "art/icons/umbrella.png", Arc::clone(&icon));
    (store, icon)
}

#[test]
fn reference_resolves_by_identifier() -> Result<()> {
    let dir = scratch_dir("assets_by_identifier")?;
    let file = BsoFile::at_path(dir.join("ref.bso"));

    let (store, icon) = store_with_icon();
    let mut out = Monster::specimen();
    out.icon = Some(icon);
    file.save(&out, &store)?;

    let back: Monster = file.load(&store)?;
    assert_eq!(icon_key(&back), Some("umbrella"));

    Ok(())
}

#[test]
fn reference_falls_back_to_path_then_bare_name() -> Result<()> {
    let dir = scratch_dir("assets_fallbacks")?;
    let file = BsoFile::at_path(dir.join("ref.bso"));

    let (mut store, icon) = store_with_icon();
    let mut out = Monster::specimen();
    out.icon = Some(icon);
    file.save(&out, &store)?;

    // Identifier gone: the stored path still finds it.
    store.forget_guids();
    let back: Monster = file.load(&store)?;
    assert_eq!(icon_key(&back), Some("umbrella"));

    // Identifier gone and the asset moved: the bare file name finds it.
    store.scramble_paths();
    let back: Monster = file.load(&store)?;
    assert_eq!(icon_key(&back), Some("umbrella"));

    Ok(())
}

/// A reference nothing can resolve decodes to no value; every other field
/// still arrives.
#[test]
fn unresolvable_reference_degrades_to_none() -> Result<()> {
    let dir = scratch_dir("assets_unresolvable")?;
    let file = BsoFile::at_path(dir.join("ref.bso"));

    let (store, icon) = store_with_icon();
    let mut out = Monster::specimen();
    out.icon = Some(icon);
    file.save(&out, &store)?;

    let empty_store = FakeStore::new();
    let back: Monster = file.load(&empty_store)?;
    assert!(back.icon.is_none());
    assert_eq!(back.base, out.base);
    assert_eq!(back.hp, out.hp);

    Ok(())
}

/// An asset the store has no location for is written as null, silently
/// (logged only); the load then sees no reference at all.
#[test]
fn unlocatable_asset_is_written_as_null() -> Result<()> {
    let dir = scratch_dir("assets_unlocatable")?;
    let file = BsoFile::at_path(dir.join("ref.bso"));

    let (store, _) = store_with_icon();
    let stray: SharedAsset = Arc::new(IconAsset {
        key: String::from("stray"),
    });
    let mut out = Monster::specimen();
    out.icon = Some(stray); // never registered with the store

    file.save(&out, &store)?;
    let back: Monster = file.load(&store)?;
    assert!(back.icon.is_none());

    Ok(())
}

/// Referencing an asset that owns its own file cascades into a save of
/// that file, which then loads standalone.
#[test]
fn referencing_a_document_cascades_its_save() -> Result<()> {
    let dir = scratch_dir("assets_cascade")?;
    let file = BsoFile::at_path(dir.join("ref.bso"));

    let palette = Arc::new(PaletteDoc {
        shade: 17,
        ..PaletteDoc::default()
    });
    let palette_asset_path = dir.join("palette.asset");
    let palette_asset_path = palette_asset_path.to_str().unwrap();

    let mut store = FakeStore::new();
    let palette_shared: SharedAsset = palette.clone();
    store.add("palette-guid-1", palette_asset_path, palette_shared);

    let mut out = Monster::specimen();
    let palette_icon: SharedAsset = palette.clone();
    out.icon = Some(palette_icon);
    file.save(&out, &store)?;

    assert_eq!(palette.saves.get(), 1);

    let standalone: PaletteDoc =
        BsoFile::at_path(doc_file_path(palette_asset_path)).load(&store)?;
    assert_eq!(standalone.shade, 17);

    Ok(())
}
