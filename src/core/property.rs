//! Property definitions for the summary views.
//!
//! Each [StreamKind] that shows up in the card and grid views has a static table of
//! [PropertyDefinition]s describing the header, alignment, sort classification and view
//! membership of a column, and whether its value is stored by the backend or derived
//! from other values of the same row.
//!
//! Derived columns are never requested from the backend. [common_property_requests]
//! builds the request list for a file from these tables.

use crate::core::format::{
    format_bit_rate, format_default, format_duration, format_fps, format_resolution,
    format_sampling_rate, format_size, format_time,
};
use crate::core::stream::{PropertyMap, PropertyRequest, StreamCounts, StreamKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// How a column compares when the grid is sorted by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    None,
    Numeric,
    Lexicographic,
}

/// Unit conversion applied to a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Default,
    Size,
    BitRate,
    SamplingRate,
    Duration,
    Fps,
}

impl ValueFormat {
    pub fn apply(&self, value: Option<&str>) -> String {
        match self {
            ValueFormat::Default => format_default(value),
            ValueFormat::Size => format_size(value),
            ValueFormat::BitRate => format_bit_rate(value),
            ValueFormat::SamplingRate => format_sampling_rate(value),
            ValueFormat::Duration => format_duration(value),
            ValueFormat::Fps => format_fps(value),
        }
    }
}

/// Values computed from other properties of the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// `HH:MM:SS.mmm` play time from Duration
    Time,
    /// `WxH` from Width and Height
    Resolution,
    /// Instance count of a kind, filled in from the stream count table
    StreamCount(StreamKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySource {
    Stored(ValueFormat),
    Derived(Derivation),
}

/// One column of the summary views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub name: &'static str,
    pub header: Option<&'static str>,
    pub align: Align,
    pub sort: SortKind,
    pub in_card: bool,
    pub in_grid: bool,
    pub source: PropertySource,
}

impl PropertyDefinition {
    const fn stored(name: &'static str) -> Self {
        Self {
            name,
            header: None,
            align: Align::Left,
            sort: SortKind::Lexicographic,
            in_card: false,
            in_grid: false,
            source: PropertySource::Stored(ValueFormat::Default),
        }
    }

    const fn derived(name: &'static str, derivation: Derivation) -> Self {
        Self {
            name,
            header: None,
            align: Align::Left,
            sort: SortKind::None,
            in_card: false,
            in_grid: false,
            source: PropertySource::Derived(derivation),
        }
    }

    const fn count(kind: StreamKind, name: &'static str, header: &'static str) -> Self {
        Self::derived(name, Derivation::StreamCount(kind))
            .header(header)
            .sort(SortKind::Numeric)
            .grid()
    }

    const fn header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }

    const fn format(mut self, format: ValueFormat) -> Self {
        self.source = PropertySource::Stored(format);
        self
    }

    const fn sort(mut self, sort: SortKind) -> Self {
        self.sort = sort;
        self
    }

    const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    const fn numeric(self) -> Self {
        self.sort(SortKind::Numeric).right()
    }

    const fn card(mut self) -> Self {
        self.in_card = true;
        self
    }

    const fn grid(mut self) -> Self {
        self.in_grid = true;
        self
    }

    const fn both(self) -> Self {
        self.card().grid()
    }

    /// Column title, falling back to the property name.
    #[inline]
    pub fn title(&self) -> &'static str {
        self.header.unwrap_or(self.name)
    }

    #[inline]
    pub fn is_derived(&self) -> bool {
        matches!(self.source, PropertySource::Derived(_))
    }

    /// Grid column id, `{kind}:{name}`.
    pub fn column_id(&self, kind: StreamKind) -> String {
        format!("{}:{}", kind.name(), self.name)
    }

    /// Formats the cell of this column for a row.
    ///
    /// `key` is the row key holding the stored value: the bare name for instance rows,
    /// the column id for grid rows.
    pub fn render(&self, row: &PropertyMap, key: &str) -> String {
        match self.source {
            PropertySource::Stored(format) => format.apply(row.get(key).map(String::as_str)),
            PropertySource::Derived(Derivation::Time) => format_time(row),
            PropertySource::Derived(Derivation::Resolution) => format_resolution(row),
            PropertySource::Derived(Derivation::StreamCount(_)) => {
                row.get(key).cloned().unwrap_or_default()
            }
        }
    }
}

type Def = PropertyDefinition;

#[rustfmt::skip]
const GENERAL: &[PropertyDefinition] = &[
    Def::stored("CompleteName").header("File Path").grid(),
    Def::stored("Format").both(),
    Def::stored("FileSize").header("Size").format(ValueFormat::Size).numeric().both(),
    Def::stored("Duration").format(ValueFormat::Duration).numeric().both(),
    Def::derived("Time", Derivation::Time).right().both(),
    Def::stored("Title").both(),
    Def::stored("Encoded_Date").header("Encoded Date").both(),
    Def::count(StreamKind::Video, "Video:Count", "V"),
    Def::count(StreamKind::Audio, "Audio:Count", "A"),
    Def::count(StreamKind::Text, "Text:Count", "T"),
    Def::count(StreamKind::Image, "Image:Count", "I"),
    Def::count(StreamKind::Menu, "Menu:Count", "M"),
];

#[rustfmt::skip]
const VIDEO: &[PropertyDefinition] = &[
    Def::stored("ID").card(),
    Def::stored("Format").both(),
    Def::stored("Language").both(),
    Def::stored("Title").both(),
    Def::derived("Resolution", Derivation::Resolution).both(),
    Def::stored("HDR_Format_Compatibility").header("HDR").both(),
    Def::stored("ScanType").header("Scan Type").both(),
    Def::stored("Default").header("D").card(),
    Def::stored("Forced").header("F").card(),
    Def::stored("BitDepth").header("Depth").numeric().both(),
    Def::stored("FrameRate").header("FPS").format(ValueFormat::Fps).numeric().both(),
    Def::stored("BitRate").header("Bit Rate").format(ValueFormat::BitRate).numeric().both(),
    Def::stored("StreamSize").header("Size").format(ValueFormat::Size).numeric().both(),
    Def::stored("Width"),
    Def::stored("Height"),
];

#[rustfmt::skip]
const AUDIO: &[PropertyDefinition] = &[
    Def::stored("ID").card(),
    Def::stored("Format_Commercial").header("Format").both(),
    Def::stored("Language").both(),
    Def::stored("Title").both(),
    Def::stored("Channel(s)").header("CH").numeric().both(),
    Def::stored("BitDepth").header("Depth").numeric().both(),
    Def::stored("SamplingRate").header("Sampling").format(ValueFormat::SamplingRate).numeric().both(),
    Def::stored("Default").header("D").card(),
    Def::stored("Forced").header("F").card(),
    Def::stored("BitRate_Mode").header("Mode").both(),
    Def::stored("BitRate").header("Bit Rate").format(ValueFormat::BitRate).numeric().both(),
    Def::stored("StreamSize").header("Size").format(ValueFormat::Size).numeric().both(),
];

#[rustfmt::skip]
const TEXT: &[PropertyDefinition] = &[
    Def::stored("ID").card(),
    Def::stored("Format").both(),
    Def::stored("Language").both(),
    Def::stored("Title").both(),
    Def::stored("Default").header("D").card(),
    Def::stored("Forced").header("F").card(),
    Def::stored("BitRate").header("Bit Rate").format(ValueFormat::BitRate).numeric().both(),
    Def::stored("StreamSize").header("Size").format(ValueFormat::Size).numeric().both(),
];

/// Kinds that have a definition table, in display order.
pub const DEFINED_KINDS: [StreamKind; 4] = [
    StreamKind::General,
    StreamKind::Video,
    StreamKind::Audio,
    StreamKind::Text,
];

/// Definition table of a kind. Kinds without summary columns get an empty slice.
pub fn definitions(kind: StreamKind) -> &'static [PropertyDefinition] {
    match kind {
        StreamKind::General => GENERAL,
        StreamKind::Video => VIDEO,
        StreamKind::Audio => AUDIO,
        StreamKind::Text => TEXT,
        _ => &[],
    }
}

/// A grid column: the kind it belongs to plus its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub kind: StreamKind,
    pub def: &'static PropertyDefinition,
}

impl Column {
    pub fn id(&self) -> String {
        self.def.column_id(self.kind)
    }
}

/// All grid columns, in display order.
pub fn grid_columns() -> Vec<Column> {
    DEFINED_KINDS
        .iter()
        .flat_map(|kind| {
            definitions(*kind)
                .iter()
                .filter(|def| def.in_grid)
                .map(move |def| Column { kind: *kind, def })
        })
        .collect()
}

/// Card columns of one kind, in display order.
pub fn card_columns(kind: StreamKind) -> impl Iterator<Item = &'static PropertyDefinition> {
    definitions(kind).iter().filter(|def| def.in_card)
}

/// Builds the common-property request list for a file.
///
/// Only kinds that exist in the file contribute, and derived columns are skipped.
pub fn common_property_requests(counts: &StreamCounts) -> Vec<PropertyRequest> {
    DEFINED_KINDS
        .iter()
        .filter(|kind| counts.count(**kind) > 0)
        .flat_map(|kind| {
            definitions(*kind)
                .iter()
                .filter(|def| !def.is_derived())
                .map(move |def| PropertyRequest::new(*kind, def.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_columns_are_never_requested() {
        let counts: StreamCounts = [(StreamKind::General, 1), (StreamKind::Video, 1)]
            .into_iter()
            .collect();
        let requests = common_property_requests(&counts);

        assert!(!requests.is_empty());
        for name in ["Time", "Resolution", "Video:Count", "Menu:Count"] {
            assert!(
                !requests.iter().any(|r| r.property == name),
                "{} should not be requested",
                name
            );
        }
        assert!(requests.contains(&PropertyRequest::new(StreamKind::Video, "Width")));
        assert!(!requests.iter().any(|r| r.stream == StreamKind::Audio));
    }

    #[test]
    fn no_requests_without_streams() {
        let counts: StreamCounts = [(StreamKind::Menu, 2)].into_iter().collect();
        assert!(common_property_requests(&counts).is_empty());
    }

    #[test]
    fn grid_columns_have_unique_ids() {
        let columns = grid_columns();
        let mut ids: Vec<_> = columns.iter().map(Column::id).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len);
        assert!(ids.contains(&"General:Video:Count".to_string()));
        assert!(ids.contains(&"Video:Resolution".to_string()));
    }

    #[test]
    fn render_stored_and_derived() {
        let mut row = PropertyMap::new();
        row.insert("Video:Width".into(), "1920".into());
        row.insert("Video:Height".into(), "1080".into());
        row.insert("Video:BitRate".into(), "1500000".into());

        let resolution = VIDEO.iter().find(|d| d.name == "Resolution").unwrap();
        let bit_rate = VIDEO.iter().find(|d| d.name == "BitRate").unwrap();
        assert_eq!(resolution.render(&row, "Video:Resolution"), "1920x1080");
        assert_eq!(bit_rate.render(&row, "Video:BitRate"), "1.5Mbps");
        assert_eq!(bit_rate.title(), "Bit Rate");
        assert_eq!(bit_rate.align, Align::Right);
    }
}
