//! Document I/O front door: extension detection and buffered load/save
//! wrappers over the codec crates. One file handle per call, nothing is
//! kept open across operations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use ragemap_files::ymap::reader::MapReader;
use ragemap_files::ymap::types::MapDocument;
use ragemap_files::ymap::writer::MapWriter;
use ragemap_files::ynv::reader::NavReader;
use ragemap_files::ynv::types::NavMesh;
use ragemap_files::ynv::writer::NavWriter;
use ragemap_files::ytyp::reader::TypesReader;
use ragemap_files::ytyp::types::TypesDocument;
use ragemap_files::ytyp::writer::TypesWriter;
use ragemap_files::{AbortSignal, CodecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Types,
    Map,
    Nav,
}

impl DocumentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Types => ".ytyp.xml",
            DocumentKind::Map => ".ymap.xml",
            DocumentKind::Nav => ".ynv.xml",
        }
    }
}

/// Detects the document kind from the double extension.
pub fn detect_kind(path: &Path) -> Option<DocumentKind> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    for kind in [DocumentKind::Types, DocumentKind::Map, DocumentKind::Nav] {
        if name.ends_with(kind.extension()) {
            return Some(kind);
        }
    }
    None
}

pub fn load_types(path: &Path, abort: &AbortSignal) -> Result<TypesDocument, CodecError> {
    info!("loading types document {}", path.display());
    let file = BufReader::new(File::open(path)?);
    TypesReader::read(file, abort)
}

pub fn load_map(path: &Path, abort: &AbortSignal) -> Result<MapDocument, CodecError> {
    info!("loading map document {}", path.display());
    let file = BufReader::new(File::open(path)?);
    MapReader::read(file, abort)
}

pub fn load_nav(path: &Path, abort: &AbortSignal) -> Result<NavMesh, CodecError> {
    info!("loading navmesh document {}", path.display());
    let file = BufReader::new(File::open(path)?);
    NavReader::read(file, abort)
}

// Writers serialize fully in memory first so an export error never
// leaves a truncated file behind.

pub fn save_types(doc: &TypesDocument, path: &Path) -> Result<(), CodecError> {
    let mut buffer = Vec::new();
    TypesWriter::write(doc, &mut buffer)?;
    std::fs::write(path, buffer)?;
    info!("wrote types document {}", path.display());
    Ok(())
}

pub fn save_map(doc: &MapDocument, path: &Path) -> Result<(), CodecError> {
    let mut buffer = Vec::new();
    MapWriter::write(doc, &mut buffer)?;
    std::fs::write(path, buffer)?;
    info!("wrote map document {}", path.display());
    Ok(())
}

pub fn save_nav(mesh: &NavMesh, path: &Path) -> Result<(), CodecError> {
    let mut buffer = Vec::new();
    NavWriter::write(mesh, &mut buffer)?;
    std::fs::write(path, buffer)?;
    info!("wrote navmesh document {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_detection_uses_the_double_extension() {
        assert_eq!(detect_kind(Path::new("a/b/int_01.ytyp.xml")), Some(DocumentKind::Types));
        assert_eq!(detect_kind(Path::new("CITY.YMAP.XML")), Some(DocumentKind::Map));
        assert_eq!(detect_kind(Path::new("nav_12.ynv.xml")), Some(DocumentKind::Nav));
        assert_eq!(detect_kind(Path::new("model.xml")), None);
        assert_eq!(detect_kind(Path::new("archive.ytyp")), None);
    }
}
