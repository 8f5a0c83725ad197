// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Memory-mapped input for read sessions.
//!
//! The source owns the mapping; codecs only ever see `&[u8]` slices borrowed
//! from it through a [`ByteCursor`](crate::codec::ByteCursor), so no decoded
//! reference can outlive the file.

use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::core::{Result, SwathError};

enum Backing {
    Mapped(memmap2::Mmap),
    /// Zero-length files cannot be mapped on every platform.
    Empty,
}

/// Read-only view of a whole input file.
pub struct MappedSource {
    backing: Backing,
    path: PathBuf,
}

impl MappedSource {
    /// Open and map `path`.
    ///
    /// # Errors
    ///
    /// `UnableToOpenFile` if the file cannot be opened, is a directory, or
    /// cannot be mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SwathError::unable_to_open_file(path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| SwathError::unable_to_open_file(path, e))?;
        if metadata.is_dir() {
            return Err(SwathError::unable_to_open_file(path, "is a directory"));
        }

        let backing = if metadata.len() == 0 {
            Backing::Empty
        } else {
            // The mapping is owned here and only lent out as slices tied to
            // this value's lifetime.
            let mmap = unsafe { memmap2::Mmap::map(&file) }
                .map_err(|e| SwathError::unable_to_open_file(path, e))?;
            Backing::Mapped(mmap)
        };

        Ok(Self {
            backing,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => mmap,
            Backing::Empty => &[],
        }
    }
}

impl Deref for MappedSource {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data()
    }
}

impl std::fmt::Debug for MappedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedSource")
            .field("path", &self.path)
            .field("len", &self.data().len())
            .finish()
    }
}
