use crate::error::SourceError;
use crate::segment::ReadOptions;
use crate::world::World;
use crate::read_world_with_options;
use std::fs::{read_dir, File};
use std::io;
use std::io::BufReader;
use std::path::Path;

/// Extension of slime world files.
const SLIME_EXTENSION: &str = "slime";

/// Place worlds are loaded from by name.
pub trait SlimeSource {
    fn load_world(&mut self, name: &str) -> Result<World, SourceError>;
}

/// Adjusts a world after it is loaded, for example to upgrade old data.
pub trait WorldFixer {
    fn fix_world(&self, world: World) -> World;
}

/// Fixer returning worlds unchanged.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoOpFixer;

impl WorldFixer for NoOpFixer {
    fn fix_world(&self, world: World) -> World {
        world
    }
}

impl<F: Fn(World) -> World> WorldFixer for F {
    fn fix_world(&self, world: World) -> World {
        self(world)
    }
}

/// Source passing every loaded world through a fixer.
pub struct FixedSource<S, F> {
    source: S,
    fixer: F,
}

impl<S: SlimeSource, F: WorldFixer> FixedSource<S, F> {
    pub fn new(source: S, fixer: F) -> FixedSource<S, F> {
        FixedSource { source, fixer }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: SlimeSource, F: WorldFixer> SlimeSource for FixedSource<S, F> {
    fn load_world(&mut self, name: &str) -> Result<World, SourceError> {
        let world = self.source.load_world(name)?;

        Ok(self.fixer.fix_world(world))
    }
}

/// Loads `<name>.slime` files from a folder.
pub struct FolderSlimeSource<'a> {
    /// Folder where world files located.
    folder_path: &'a Path,
    options: ReadOptions,
}

impl<'a> FolderSlimeSource<'a> {
    pub fn new(folder_path: &'a Path) -> FolderSlimeSource<'a> {
        Self::with_options(folder_path, ReadOptions::default())
    }

    pub fn with_options(folder_path: &'a Path, options: ReadOptions) -> FolderSlimeSource<'a> {
        FolderSlimeSource {
            folder_path,
            options,
        }
    }

    /// Names of the worlds in the folder, files without the `.slime` extension are skipped.
    pub fn iter_world_names(&self) -> Result<impl Iterator<Item = String>, io::Error> {
        let names: Vec<_> = read_dir(self.folder_path)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| world_name_from_filename(&entry.path()).ok())
            .collect();

        Ok(names.into_iter())
    }
}

impl<'a> SlimeSource for FolderSlimeSource<'a> {
    fn load_world(&mut self, name: &str) -> Result<World, SourceError> {
        let world_path = self.folder_path.join(world_filename(name));

        if !world_path.is_file() {
            return Err(SourceError::WorldNotFound {
                name: name.to_string(),
            });
        }

        let mut reader = BufReader::new(File::open(world_path)?);

        Ok(read_world_with_options(&mut reader, &self.options)?)
    }
}

fn world_name_from_filename(path: &Path) -> Result<String, io::Error> {
    let extension = path.extension().unwrap_or_default();
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();

    if extension != SLIME_EXTENSION || stem.is_empty() {
        return Err(io::ErrorKind::InvalidInput.into());
    }

    Ok(stem.into_owned())
}

fn world_filename(name: &str) -> String {
    format!("{}.{}", name, SLIME_EXTENSION)
}
