//! File-level I/O paths: kind detection, buffered load, all-or-nothing
//! save, reload.

use std::path::Path;

use ragemap::io::{detect_kind, load_map, load_types, save_map, save_types, DocumentKind};
use ragemap_files::AbortSignal;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("ragemap-files/tests/data")
        .join(name)
}

#[test]
fn types_document_saves_and_reloads() -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    let doc = load_types(&fixture("corner_store.ytyp.xml"), &abort)?;

    let out = std::env::temp_dir().join("ragemap_reexport.ytyp.xml");
    save_types(&doc, &out)?;
    assert_eq!(detect_kind(&out), Some(DocumentKind::Types));

    let reloaded = load_types(&out, &abort)?;
    assert_eq!(reloaded.name, doc.name);
    assert_eq!(reloaded.archetypes.len(), doc.archetypes.len());
    std::fs::remove_file(&out)?;
    Ok(())
}

#[test]
fn map_document_saves_and_reloads() -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    let doc = load_map(&fixture("corner_store.ymap.xml"), &abort)?;

    let out = std::env::temp_dir().join("ragemap_reexport.ymap.xml");
    save_map(&doc, &out)?;
    let reloaded = load_map(&out, &abort)?;
    assert_eq!(reloaded.entities.len(), doc.entities.len());
    assert_eq!(reloaded.car_generators.len(), 1);
    std::fs::remove_file(&out)?;
    Ok(())
}

#[test]
fn aborted_load_surfaces_as_an_error() {
    let abort = AbortSignal::new();
    abort.abort();
    let result = load_types(&fixture("corner_store.ytyp.xml"), &abort);
    assert!(result.is_err());
}
