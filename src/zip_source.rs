use crate::error::SourceError;
use crate::segment::ReadOptions;
use crate::source::SlimeSource;
use crate::world::World;
use crate::read_world_with_options;
use log::debug;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

pub use zip::result::ZipError;

/// The worlds are read from `.slime` entries of a zip file, at any depth.
#[derive(Debug)]
pub struct ZipSlimeSource<R: Read + Seek> {
    zip_archive: ZipArchive<R>,
    // World name to entry path inside the archive.
    entries: HashMap<String, String>,
    // Raw world bytes, so each entry is only uncompressed once
    cache: HashMap<String, Vec<u8>>,
    options: ReadOptions,
}

#[derive(Debug)]
pub enum ZipSourceError {
    Io(io::Error),
    Zip(ZipError),
    /// Two entries in different folders share a world name.
    DuplicateWorld { name: String },
}

impl From<io::Error> for ZipSourceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ZipError> for ZipSourceError {
    fn from(e: ZipError) -> Self {
        Self::Zip(e)
    }
}

// Maps each world name to the path of its entry.
// For example: "lobby" => "worlds/lobby.slime"
fn find_world_entries<R: Read + Seek>(
    zip_archive: &mut ZipArchive<R>,
) -> Result<HashMap<String, String>, ZipSourceError> {
    let mut entries = HashMap::new();

    for i in 0..zip_archive.len() {
        let file = zip_archive.by_index(i)?;
        let entry_path = file.name().to_string();

        let file_name = entry_path.rsplit('/').next().unwrap_or_default();
        let name = match file_name.strip_suffix(".slime") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        if entries.insert(name.clone(), entry_path).is_some() {
            return Err(ZipSourceError::DuplicateWorld { name });
        }
    }

    Ok(entries)
}

impl<R: Read + Seek> ZipSlimeSource<R> {
    pub fn new(reader: R) -> Result<Self, ZipSourceError> {
        Self::with_options(reader, ReadOptions::default())
    }

    pub fn with_options(reader: R, options: ReadOptions) -> Result<Self, ZipSourceError> {
        let mut zip_archive = ZipArchive::new(reader)?;
        let entries = find_world_entries(&mut zip_archive)?;

        debug!(target: "slime-loader", "Found {} worlds in zip archive", entries.len());

        Ok(ZipSlimeSource {
            zip_archive,
            entries,
            cache: HashMap::new(),
            options,
        })
    }

    pub fn iter_world_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn load_world(&mut self, name: &str) -> Result<World, SourceError> {
        if !self.cache.contains_key(name) {
            let entry_path = self
                .entries
                .get(name)
                .ok_or_else(|| SourceError::WorldNotFound {
                    name: name.to_string(),
                })?;

            let mut world_file = match self.zip_archive.by_name(entry_path) {
                Ok(x) => x,
                Err(ZipError::FileNotFound) => {
                    return Err(SourceError::WorldNotFound {
                        name: name.to_string(),
                    })
                }
                Err(ZipError::Io(io_error)) => return Err(SourceError::IOError { io_error }),
                Err(e) => {
                    return Err(SourceError::IOError {
                        io_error: io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
                    })
                }
            };

            let mut buf = Vec::with_capacity(world_file.size() as usize);
            world_file.read_to_end(&mut buf)?;

            self.cache.insert(name.to_string(), buf);
        }

        let mut bytes = self.cache[name].as_slice();

        Ok(read_world_with_options(&mut bytes, &self.options)?)
    }
}

impl ZipSlimeSource<File> {
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self, ZipSourceError> {
        let file = OpenOptions::new()
            .write(false)
            .read(true)
            .create(false)
            .open(path)?;

        Self::new(file)
    }
}

impl<R: Read + Seek> SlimeSource for ZipSlimeSource<R> {
    fn load_world(&mut self, name: &str) -> Result<World, SourceError> {
        self.load_world(name)
    }
}
