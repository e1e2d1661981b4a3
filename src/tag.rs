//! Read-only access to NBT tag trees.
//!
//! Accessors return `None` when a field is absent or has another type, so callers decide
//! which fields are required.
use crate::error::SlimeReadError;
use nbt::decode::read_compound_tag;
use nbt::{CompoundTag, Tag};

/// Runtime kind of a tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TagKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

/// Parses a named root compound. An empty buffer yields an empty compound.
pub fn read_tag(bytes: &[u8]) -> Result<CompoundTag, SlimeReadError> {
    if bytes.is_empty() {
        return Ok(CompoundTag::new());
    }

    let mut reader = bytes;

    Ok(read_compound_tag(&mut reader)?)
}

/// Like [`read_tag`] but an empty buffer means the tag is absent.
pub fn read_optional_tag(bytes: &[u8]) -> Result<Option<CompoundTag>, SlimeReadError> {
    if bytes.is_empty() {
        return Ok(None);
    }

    read_tag(bytes).map(Some)
}

/// Typed field lookup on a compound.
pub trait CompoundTagExt {
    fn tag(&self, name: &str) -> Option<&Tag>;

    fn list(&self, name: &str) -> Option<&[Tag]> {
        match self.tag(name)? {
            Tag::List(tags) => Some(tags.as_slice()),
            _ => None,
        }
    }

    fn long_array(&self, name: &str) -> Option<&[i64]> {
        match self.tag(name)? {
            Tag::LongArray(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    fn compound(&self, name: &str) -> Option<&CompoundTag> {
        self.tag(name)?.as_compound()
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.tag(name)?.as_str()
    }
}

impl CompoundTagExt for CompoundTag {
    fn tag(&self, name: &str) -> Option<&Tag> {
        self.iter()
            .find(|(key, _)| key == &name)
            .map(|(_, tag)| tag)
    }
}

/// Variant inspection on a single tag.
pub trait TagExt {
    fn kind(&self) -> TagKind;

    fn as_compound(&self) -> Option<&CompoundTag>;

    fn as_str(&self) -> Option<&str>;
}

impl TagExt for Tag {
    fn kind(&self) -> TagKind {
        match self {
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    fn as_compound(&self) -> Option<&CompoundTag> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}
