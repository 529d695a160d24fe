use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::DocumentKind;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @detects: Document kind from the file extension
    pub fn detect_document_kind<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| anyhow!("File has no extension: {}", path.as_ref().display()))?;
        DocumentKind::from_extension(extension)
            .map_err(|e| anyhow!("{}: {}", path.as_ref().display(), e))
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let file_name = input_file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        output_dir
            .as_ref()
            .join(format!("{target_language}_translated_{file_name}"))
    }

    /// Read a file's raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(path.as_ref())
            .with_context(|| format!("Failed to read file {}", path.as_ref().display()))
    }

    /// Write raw bytes to a file
    pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        fs::write(path.as_ref(), bytes)
            .with_context(|| format!("Failed to write file {}", path.as_ref().display()))
    }
}
