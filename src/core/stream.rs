//! Stream data model for mediascope.
//!
//! Holds the [StreamKind] enumeration and the records exchanged with the backend:
//! stream counts, per-instance property maps, parameter catalog entries and version info.
//! Values are always kept as the raw strings the backend produced.

use phf::phf_map;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;

/// Property name to raw value, ordered by name.
pub type PropertyMap = BTreeMap<String, String>;

/// Category of a media stream.
///
/// `Max` is the backend's end marker and never describes real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamKind {
    General,
    Video,
    Audio,
    Text,
    Other,
    Image,
    Menu,
    Max,
}

static STREAM_KIND_NAMES: phf::Map<&'static str, StreamKind> = phf_map! {
    "General" => StreamKind::General,
    "Video" => StreamKind::Video,
    "Audio" => StreamKind::Audio,
    "Text" => StreamKind::Text,
    "Other" => StreamKind::Other,
    "Image" => StreamKind::Image,
    "Menu" => StreamKind::Menu,
};

impl StreamKind {
    /// Every real stream kind, in backend order.
    pub const ALL: [StreamKind; 7] = [
        StreamKind::General,
        StreamKind::Video,
        StreamKind::Audio,
        StreamKind::Text,
        StreamKind::Other,
        StreamKind::Image,
        StreamKind::Menu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::General => "General",
            StreamKind::Video => "Video",
            StreamKind::Audio => "Audio",
            StreamKind::Text => "Text",
            StreamKind::Other => "Other",
            StreamKind::Image => "Image",
            StreamKind::Menu => "Menu",
            StreamKind::Max => "Max",
        }
    }

    /// Parses a kind name. Unknown names and the `Max` marker yield `None`.
    pub fn parse(name: &str) -> Option<StreamKind> {
        STREAM_KIND_NAMES.get(name.trim()).copied()
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of stream instances per kind for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounts {
    counts: BTreeMap<StreamKind, usize>,
}

impl StreamCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a count. The `Max` marker is ignored.
    pub fn set(&mut self, kind: StreamKind, count: usize) {
        if kind != StreamKind::Max {
            self.counts.insert(kind, count);
        }
    }

    #[inline]
    pub fn count(&self, kind: StreamKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds with at least one instance, in backend order.
    pub fn present_kinds(&self) -> Vec<StreamKind> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StreamKind, usize)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|count| *count == 0)
    }
}

impl FromIterator<(StreamKind, usize)> for StreamCounts {
    fn from_iter<I: IntoIterator<Item = (StreamKind, usize)>>(iter: I) -> Self {
        let mut counts = StreamCounts::new();
        for (kind, count) in iter {
            counts.set(kind, count);
        }
        counts
    }
}

/// All fetched properties of one stream instance.
///
/// Serialized with the same field names the JSON export has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamProperties {
    pub stream: StreamKind,
    #[serde(rename = "num")]
    pub index: usize,
    #[serde(rename = "propertyMap")]
    pub properties: PropertyMap,
}

impl StreamProperties {
    pub fn new(stream: StreamKind, index: usize, properties: PropertyMap) -> Self {
        Self {
            stream,
            index,
            properties,
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// One property to request from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyRequest {
    pub stream: StreamKind,
    pub property: String,
}

impl PropertyRequest {
    pub fn new(stream: StreamKind, property: impl Into<String>) -> Self {
        Self {
            stream,
            property: property.into(),
        }
    }
}

/// Entry of the backend's parameter catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: usize,
    pub stream: StreamKind,
    pub property: String,
}

/// Application and backend versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    pub app_version: String,
    pub backend_version: String,
}

impl About {
    /// Backend version reduced to digits and dots, e.g. "MediaInfoLib - v24.06" -> "24.06".
    pub fn backend_version_number(&self) -> String {
        self.backend_version
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect::<String>()
            .trim_matches('.')
            .to_string()
    }
}
