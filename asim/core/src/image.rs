//! Saved program archives.
//!
//! An image is a zip archive with two entries: `program.json` carrying the
//! metadata and `items.txt` holding one item per line.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use zip::read::ZipArchive;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::MachineConfig;
use crate::source::ProgramSource;
use crate::{AsimError, Result};

pub const IMAGE_MAGIC: &str = "asim.program";
pub const IMAGE_VERSION: u32 = 1;

const METADATA_ENTRY: &str = "program.json";
const ITEMS_ENTRY: &str = "items.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub magic: String,
    pub version: u32,
    pub config: MachineConfig,
    #[serde(default)]
    pub labels: BTreeMap<String, usize>,
    #[serde(default)]
    pub include_files: Vec<String>,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramImage {
    pub metadata: ImageMetadata,
    pub items: Vec<String>,
}

impl From<ProgramSource> for ProgramImage {
    fn from(source: ProgramSource) -> Self {
        Self::new(source.config, source.labels, source.items)
            .with_include_files(source.include_files)
    }
}

impl ProgramImage {
    pub fn new(config: MachineConfig, labels: BTreeMap<String, usize>, items: Vec<String>) -> Self {
        Self {
            metadata: ImageMetadata {
                magic: IMAGE_MAGIC.to_string(),
                version: IMAGE_VERSION,
                config,
                labels,
                include_files: Vec::new(),
                item_count: items.len(),
            },
            items,
        }
    }

    pub fn with_include_files(mut self, include_files: Vec<String>) -> Self {
        self.metadata.include_files = include_files;
        self
    }

    pub fn config(&self) -> &MachineConfig {
        &self.metadata.config
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_from(file)
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        if let Some(bad) = self.items.iter().position(|item| item.contains(['\n', '\r'])) {
            return Err(AsimError::InvalidImage(format!(
                "item {bad} contains a line break"
            )));
        }

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut meta = self.metadata.clone();
        meta.item_count = self.items.len();
        zip.start_file(METADATA_ENTRY, options)?;
        zip.write_all(&serde_json::to_vec_pretty(&meta)?)?;

        zip.start_file(ITEMS_ENTRY, options)?;
        for item in &self.items {
            zip.write_all(item.as_bytes())?;
            zip.write_all(b"\n")?;
        }

        zip.finish()?;
        Ok(())
    }

    pub fn read_from<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let metadata: ImageMetadata = {
            let mut buf = Vec::new();
            archive
                .by_name(METADATA_ENTRY)
                .map_err(|e| AsimError::InvalidImage(format!("{METADATA_ENTRY} missing: {e}")))?
                .read_to_end(&mut buf)?;
            serde_json::from_slice(&buf)?
        };
        if metadata.magic != IMAGE_MAGIC || metadata.version != IMAGE_VERSION {
            return Err(AsimError::InvalidImage(
                "image magic/version mismatch".to_string(),
            ));
        }

        let items: Vec<String> = {
            let mut text = String::new();
            archive
                .by_name(ITEMS_ENTRY)
                .map_err(|e| AsimError::InvalidImage(format!("{ITEMS_ENTRY} missing: {e}")))?
                .read_to_string(&mut text)?;
            text.lines().map(str::to_string).collect()
        };
        if items.len() != metadata.item_count {
            return Err(AsimError::InvalidImage(format!(
                "item count mismatch (expected {}, got {})",
                metadata.item_count,
                items.len()
            )));
        }

        Ok(Self { metadata, items })
    }
}
