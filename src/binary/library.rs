// Fri Oct 16 2026 - Alex

use crate::binary::BinaryError;
use crate::codec::Architecture;
use goblin::elf::header::{EM_AARCH64, EM_ARM};
use goblin::elf::Elf;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// A shared library held read-only for the whole run.
pub struct LibraryFile {
    path: PathBuf,
    backing: Backing,
}

impl LibraryFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BinaryError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file) }?;
        log::debug!("Mapped {} ({} bytes)", path.display(), mmap.len());

        Ok(Self {
            path,
            backing: Backing::Mapped(mmap),
        })
    }

    pub fn from_bytes(name: &str, data: Vec<u8>) -> Self {
        Self {
            path: PathBuf::from(name),
            backing: Backing::Owned(data),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => mmap.as_ref(),
            Backing::Owned(data) => data.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn detect_architecture(&self) -> Result<Architecture, BinaryError> {
        let header = Elf::parse_header(self.bytes()).map_err(|e| {
            BinaryError::UnknownArchitecture(format!(
                "{} is not a valid ELF file ({}). Is it an ARM or ARM64 .so file?",
                self.name(),
                e
            ))
        })?;

        let architecture = match header.e_machine {
            EM_ARM => Architecture::Arm32,
            EM_AARCH64 => Architecture::Arm64,
            other => {
                return Err(BinaryError::UnknownArchitecture(format!(
                    "{} targets {}, but it must be ARM or ARM64",
                    self.name(),
                    goblin::elf::header::machine_to_str(other)
                )))
            }
        };

        log::info!("Detected architecture of {}: {}", self.name(), architecture);
        Ok(architecture)
    }

    /// Reads up to `count` bytes at `offset`. Reads that run past the end of the file are
    /// shortened rather than rejected.
    pub fn read_at(&self, offset: u64, count: usize) -> Result<&[u8], BinaryError> {
        let data = self.bytes();
        let start = usize::try_from(offset).unwrap_or(usize::MAX);

        if start >= data.len() || count == 0 {
            return Err(BinaryError::OffsetNotFound {
                offset,
                library: self.name(),
            });
        }

        let end = start.saturating_add(count).min(data.len());
        let bytes = &data[start..end];
        log::debug!(
            "Read {} bytes at offset {:X} in {} (requested {})",
            bytes.len(),
            offset,
            self.name(),
            count
        );
        Ok(bytes)
    }
}

impl std::fmt::Debug for LibraryFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryFile")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}
