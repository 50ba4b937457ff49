//! The `mediainfo` command line backend.
//!
//! Implements [MediaBackend] by running the external `mediainfo` program:
//! - `--Version` for the backend version,
//! - `--Info-Parameters` for the parameter catalog,
//! - `--Full --Language=raw <file>` for stream counts and properties.
//!
//! The raw report keeps machine values (durations in ms, sizes in bytes, rates in
//! bits per second), which is what the formatting engine expects.
//!
//! Parsing is done by the pure functions at the bottom of this module so it can be tested
//! without the program being installed.

use crate::config::{Config, General};
use crate::core::backend::{BackendError, MediaBackend};
use crate::core::scan::expand_paths;
use crate::core::stream::{
    About, Parameter, PropertyMap, PropertyRequest, StreamCounts, StreamKind, StreamProperties,
};

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const PROGRAM: &str = "mediainfo";

/// Backend driving the `mediainfo` executable.
pub struct MediaInfoCli {
    program: PathBuf,
    general: General,
    config_path: PathBuf,
}

impl MediaInfoCli {
    /// Locates `mediainfo`: `MSCOPE_MEDIAINFO` if set, else PATH.
    ///
    /// `config_path` is where `set_config` persists the `[general]` table.
    pub fn locate(general: General, config_path: PathBuf) -> Result<Self, BackendError> {
        let name = std::env::var_os("MSCOPE_MEDIAINFO").unwrap_or_else(|| PROGRAM.into());
        let program = which::which(&name).map_err(|e| {
            BackendError::Process(format!(
                "{} was not found in PATH ({}). Please install MediaInfo CLI",
                PROGRAM, e
            ))
        })?;
        log::info!("Using {}", program.display());
        Ok(Self::with_program(program, general, config_path))
    }

    pub fn with_program(program: PathBuf, general: General, config_path: PathBuf) -> Self {
        Self {
            program,
            general,
            config_path,
        }
    }

    fn run<I, S>(&self, args: I) -> Result<String, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    BackendError::Process(format!("{} could not be started", PROGRAM))
                } else {
                    BackendError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Process(format!(
                "{} exited with {}: {}",
                PROGRAM,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn report(&self, file: &Path) -> Result<Vec<StreamProperties>, BackendError> {
        if !file.is_file() {
            return Err(BackendError::Unsupported(format!(
                "{} is not a file",
                file.display()
            )));
        }
        let text = self.run([
            OsStr::new("--Full"),
            OsStr::new("--Language=raw"),
            file.as_os_str(),
        ])?;
        let streams = parse_report(&text);
        if streams.is_empty() {
            return Err(BackendError::Parse(format!(
                "no streams reported for {}",
                file.display()
            )));
        }
        Ok(streams)
    }
}

impl MediaBackend for MediaInfoCli {
    fn about(&self) -> Result<About, BackendError> {
        let text = self.run(["--Version"])?;
        Ok(About {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            backend_version: parse_version(&text),
        })
    }

    fn config(&self) -> Result<General, BackendError> {
        Ok(self.general.clone())
    }

    fn set_config(&mut self, config: General) -> Result<General, BackendError> {
        let config = config.normalized();
        Config::save_general(&self.config_path, &config)?;
        log::info!("Saved settings to {}", self.config_path.display());
        self.general = config.clone();
        Ok(config)
    }

    fn files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, BackendError> {
        Ok(expand_paths(paths, &self.general.active_extensions())?)
    }

    fn parameters(&self) -> Result<Vec<Parameter>, BackendError> {
        let text = self.run(["--Info-Parameters"])?;
        Ok(parse_info_parameters(&text))
    }

    fn stream_counts(&self, file: &Path) -> Result<StreamCounts, BackendError> {
        Ok(count_streams(&self.report(file)?))
    }

    fn properties(
        &self,
        file: &Path,
        requests: Option<&[PropertyRequest]>,
    ) -> Result<Vec<StreamProperties>, BackendError> {
        let streams = self.report(file)?;
        Ok(match requests {
            Some(requests) => filter_properties(streams, requests),
            None => streams,
        })
    }

    fn write_text_file(&self, path: &Path, text: &str) -> Result<(), BackendError> {
        fs::write(path, text)?;
        Ok(())
    }
}

/// Last non-empty line of `--Version`, e.g. "MediaInfoLib - v24.06".
pub fn parse_version(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Parses the `--Info-Parameters` catalog.
///
/// Blocks are separated by blank lines and start with a stream kind header. Each following
/// line names one parameter before its `:` or `;` separator. Blocks of unknown kinds are skipped.
pub fn parse_info_parameters(text: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut kind: Option<StreamKind> = None;
    let mut expect_header = true;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            expect_header = true;
            continue;
        }
        if expect_header {
            expect_header = false;
            kind = StreamKind::parse(line);
            if kind.is_none() {
                log::warn!("Unexpected parameter section {:?}", line);
            }
            continue;
        }
        let Some(stream) = kind else {
            continue;
        };
        let name = line.split([':', ';']).next().unwrap_or_default().trim();
        if !name.is_empty() {
            parameters.push(Parameter {
                id: parameters.len(),
                stream,
                property: name.to_string(),
            });
        }
    }
    parameters
}

/// Splits a `Key   : Value` report line. Returns None for section headers.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(" : ").or_else(|| line.split_once(':'))?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Parses a `--Full --Language=raw` report into stream instances.
///
/// Section headers ("General", "Audio #2") open a new instance. Instances are numbered per
/// kind in report order. When a key repeats inside a section the first value is kept.
pub fn parse_report(text: &str) -> Vec<StreamProperties> {
    let mut streams = Vec::new();
    let mut indices: HashMap<StreamKind, usize> = HashMap::new();
    let mut current: Option<StreamProperties> = None;
    let mut skipping = false;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some((key, value)) = split_field(line) {
            if let Some(stream) = current.as_mut() {
                stream
                    .properties
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            } else if !skipping {
                log::debug!("Property outside of a section: {:?}", line);
            }
            continue;
        }

        streams.extend(current.take());
        let name = line.split('#').next().unwrap_or_default().trim();
        match StreamKind::parse(name) {
            Some(kind) => {
                let index = indices.entry(kind).or_insert(0);
                current = Some(StreamProperties::new(kind, *index, PropertyMap::new()));
                *index += 1;
                skipping = false;
            }
            None => {
                log::debug!("Skipping report section {:?}", line);
                skipping = true;
            }
        }
    }
    streams.extend(current);
    streams
}

/// Counts instances per kind. Kinds that do not appear get an explicit zero.
pub fn count_streams(streams: &[StreamProperties]) -> StreamCounts {
    let mut counts: StreamCounts = StreamKind::ALL.iter().map(|k| (*k, 0)).collect();
    for kind in StreamKind::ALL {
        let n = streams.iter().filter(|s| s.stream == kind).count();
        counts.set(kind, n);
    }
    counts
}

/// Keeps the requested kinds and, within them, only the requested properties.
pub fn filter_properties(
    streams: Vec<StreamProperties>,
    requests: &[PropertyRequest],
) -> Vec<StreamProperties> {
    let wanted: HashSet<(StreamKind, &str)> = requests
        .iter()
        .map(|r| (r.stream, r.property.as_str()))
        .collect();
    let kinds: HashSet<StreamKind> = requests.iter().map(|r| r.stream).collect();

    streams
        .into_iter()
        .filter(|s| kinds.contains(&s.stream))
        .map(|mut s| {
            let kind = s.stream;
            s.properties
                .retain(|name, _| wanted.contains(&(kind, name.as_str())));
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "General
Count                                    : 331
CompleteName                             : /media/movie.mkv
Format                                   : Matroska
FileSize                                 : 1073741824
Duration                                 : 5000.000
Duration                                 : 5 s

Video
Count                                    : 381
ID                                       : 1
Format                                   : AVC
Width                                    : 1920
Height                                   : 1080
Duration/String3                         : 00:00:05.000

Audio #1
ID                                       : 2
Format_Commercial                        : AAC
Language                                 : en

Audio #2
ID                                       : 3
Format_Commercial                        : AC-3
Language                                 :
";

    #[test]
    fn report_sections_become_instances() {
        let streams = parse_report(REPORT);
        assert_eq!(streams.len(), 4);

        assert_eq!(streams[0].stream, StreamKind::General);
        assert_eq!(streams[0].get("Duration"), Some("5000.000"));
        assert_eq!(streams[1].get("Duration/String3"), Some("00:00:05.000"));

        assert_eq!(streams[2].stream, StreamKind::Audio);
        assert_eq!(streams[2].index, 0);
        assert_eq!(streams[3].index, 1);
        assert_eq!(streams[3].get("Format_Commercial"), Some("AC-3"));
        assert_eq!(streams[3].get("Language"), Some(""));
    }

    #[test]
    fn counts_cover_every_kind() {
        let counts = count_streams(&parse_report(REPORT));
        assert_eq!(counts.count(StreamKind::General), 1);
        assert_eq!(counts.count(StreamKind::Video), 1);
        assert_eq!(counts.count(StreamKind::Audio), 2);
        assert_eq!(counts.count(StreamKind::Menu), 0);
    }

    #[test]
    fn filtering_keeps_requested_pairs_only() {
        let requests = vec![
            PropertyRequest::new(StreamKind::General, "Format"),
            PropertyRequest::new(StreamKind::Audio, "Language"),
            PropertyRequest::new(StreamKind::Audio, "Missing"),
        ];
        let streams = filter_properties(parse_report(REPORT), &requests);

        assert_eq!(streams.len(), 3);
        assert!(streams.iter().all(|s| s.stream != StreamKind::Video));
        assert_eq!(streams[0].properties.len(), 1);
        assert_eq!(streams[1].get("Language"), Some("en"));
        assert_eq!(streams[1].get("Format_Commercial"), None);
    }

    #[test]
    fn info_parameters_catalog() {
        let text = "General
Count                            : Count of objects available in this stream
Format;Format used

Video
Width                            : Width (aperture size if present) in pixel

Chapters
Total                            : ignored

Audio
SamplingRate                     : Sampling rate
";
        let params = parse_info_parameters(text);
        let names: Vec<_> = params
            .iter()
            .map(|p| (p.stream, p.property.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (StreamKind::General, "Count"),
                (StreamKind::General, "Format"),
                (StreamKind::Video, "Width"),
                (StreamKind::Audio, "SamplingRate"),
            ]
        );
        assert_eq!(params[3].id, 3);
    }

    #[test]
    fn version_is_last_line() {
        assert_eq!(
            parse_version("MediaInfo Command line,\nMediaInfoLib - v24.06\n\n"),
            "MediaInfoLib - v24.06"
        );
        assert_eq!(parse_version(""), "");
    }
}
