//! Formatting tests for mediascope
//!
//! Check the property definitions as the views use them: raw values in, display text out.
//! The randomized cases feed arbitrary strings through every formatter, none may panic.

use mediascope::core::format::{
    format_bit_rate, format_duration, format_sampling_rate, format_size, format_time_ms,
    shrink_file_name,
};
use mediascope::core::property::{Column, definitions, grid_columns};
use mediascope::core::stream::{PropertyMap, StreamKind};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

fn row(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn column(kind: StreamKind, name: &str) -> Column {
    grid_columns()
        .into_iter()
        .find(|c| c.kind == kind && c.def.name == name)
        .unwrap_or_else(|| panic!("no grid column {}:{}", kind.name(), name))
}

#[test]
fn grid_columns_render_raw_cells() {
    let cells = row(&[
        ("General:FileSize", "1073741824"),
        ("General:Duration", "3723004"),
        ("Video:Width", "3840"),
        ("Video:Height", "2160"),
        ("Audio:SamplingRate", "48000"),
        ("Audio:BitRate", "640000"),
    ]);

    let cases = [
        (StreamKind::General, "FileSize", "1GB"),
        (StreamKind::General, "Duration", "3723.004"),
        (StreamKind::General, "Time", "01:02:03.004"),
        (StreamKind::Video, "Resolution", "3840x2160"),
        (StreamKind::Audio, "SamplingRate", "48kHz"),
        (StreamKind::Audio, "BitRate", "640Kbps"),
        (StreamKind::Audio, "Language", ""),
    ];
    for (kind, name, expected) in cases {
        let column = column(kind, name);
        assert_eq!(
            column.def.render(&cells, &column.id()),
            expected,
            "column {}",
            column.id()
        );
    }
}

#[test]
fn card_rows_use_bare_keys() {
    let audio = row(&[("SamplingRate", "44100"), ("BitRate", "1509000")]);
    let defs = definitions(StreamKind::Audio);
    let render = |name: &str| {
        defs.iter()
            .find(|d| d.name == name)
            .map(|d| d.render(&audio, d.name))
            .unwrap_or_default()
    };
    assert_eq!(render("SamplingRate"), "44.1kHz");
    assert_eq!(render("BitRate"), "1.51Mbps");
    assert_eq!(render("Channel(s)"), "");
}

#[test]
fn every_grid_column_has_a_unique_id() {
    let mut ids: Vec<String> = grid_columns().iter().map(Column::id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(
        grid_columns().first().map(|c| c.def.title()),
        Some("File Path")
    );
}

#[test]
fn formatters_are_total_on_random_input() {
    let mut rng = rng();
    for _ in 0..500 {
        let len = rng.random_range(0..12);
        let text: String = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();

        let starts_numeric = text.starts_with(|c: char| c.is_ascii_digit());
        for out in [
            format_size(Some(&text)),
            format_bit_rate(Some(&text)),
            format_sampling_rate(Some(&text)),
            format_duration(Some(&text)),
        ] {
            assert_eq!(out.is_empty(), !starts_numeric, "input {:?} gave {:?}", text, out);
        }
    }
}

#[test]
fn random_sizes_always_carry_a_unit() {
    let mut rng = rng();
    for _ in 0..500 {
        let bytes: u64 = rng.random_range(0..(1 << 42));
        let text = format_size(Some(&bytes.to_string()));
        assert!(
            ["GB", "MB", "KB", "B"].iter().any(|u| text.ends_with(u)),
            "{} -> {}",
            bytes,
            text
        );
        let number = text.trim_end_matches(char::is_alphabetic);
        assert!(
            !number.contains('.') || !number.ends_with(['0', '.']),
            "{} -> {}",
            bytes,
            text
        );
    }
}

#[test]
fn time_splits_into_components() {
    let mut rng = rng();
    for _ in 0..200 {
        let (h, m, s, ms) = (
            rng.random_range(0..24u64),
            rng.random_range(0..60u64),
            rng.random_range(0..60u64),
            rng.random_range(0..1000u64),
        );
        let days = rng.random_range(0..3u64);
        let total = (((days * 24 + h) * 60 + m) * 60 + s) * 1000 + ms;

        let time = format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms);
        let expected = if days > 0 {
            format!("{}d {}", days, time)
        } else {
            time
        };
        assert_eq!(format_time_ms(total), expected);
    }
}

#[test]
fn long_names_keep_their_tail() {
    let name = "/very/long/library/path/Some Movie (2019)/Some Movie (2019).mkv";
    let short = shrink_file_name(name, 20);
    assert_eq!(short.chars().count(), 20);
    assert!(short.starts_with("..."));
    assert!(short.ends_with("(2019).mkv"));
    assert_eq!(shrink_file_name("a.mkv", 20), "a.mkv");
}
