/*!
 * OOXML package container.
 *
 * An OOXML document is a ZIP archive of parts. The package reads every part
 * into memory in archive order, lets the document layer replace individual
 * parts, and serializes the archive back. Parts that were never replaced are
 * written out byte-identical.
 */

use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;

/// In-memory OOXML package
#[derive(Debug, Clone)]
pub struct Package {
    // Part name -> bytes, in original archive order.
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read a package from raw bytes.
    ///
    /// Fails with [`DocumentError::Open`] when the bytes are not a readable
    /// ZIP archive - this is the fatal-open error class, nothing was
    /// processed yet.
    pub fn open(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocumentError::Open(e.to_string()))?;
        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocumentError::Open(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .map_err(|e| DocumentError::Open(e.to_string()))?;
            parts.push((name, data));
        }
        Ok(Self { parts })
    }

    /// Bytes of a part, or a [`DocumentError::MissingPart`] error.
    pub fn part(&self, name: &str) -> Result<&[u8], DocumentError> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))
    }

    /// Whether the package holds a part with this name.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|(part_name, _)| part_name == name)
    }

    /// Part bytes as UTF-8 text.
    pub fn part_text(&self, name: &str) -> Result<&str, DocumentError> {
        std::str::from_utf8(self.part(name)?).map_err(|e| DocumentError::MalformedXml {
            part: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Replace a part's bytes, keeping its position in the archive.
    pub fn replace_part(&mut self, name: &str, data: Vec<u8>) -> Result<(), DocumentError> {
        let entry = self
            .parts
            .iter_mut()
            .find(|(part_name, _)| part_name == name)
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))?;
        entry.1 = data;
        Ok(())
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Serialize the package back to a ZIP byte stream.
    pub fn save(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            writer
                .start_file(name.clone(), options)
                .map_err(|e| DocumentError::Serialize(e.to_string()))?;
            writer
                .write_all(data)
                .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}
