//! Replay file loading.
//!
//! Two formats are understood:
//!
//! - JSON: `{"samples": [{"x": .., "y": .., "left_click": .., "right_click": ..}]}`
//!   or a bare array of samples
//! - osu! action stream: the decompressed frame text `delta|x|y|keys,` repeated

use std::path::Path;

use serde::Deserialize;

use super::sample::{Replay, Sample};
use crate::error::ReplayError;

/// Delta value marking the RNG seed frame at the end of an action stream.
const SEED_FRAME_DELTA: i64 = -12345;

const KEY_LEFT: u32 = 1;
const KEY_RIGHT: u32 = 2;

/// Replay file format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayFormat {
    Json,
    ActionStream,
}

impl ReplayFormat {
    /// Guess the format from the file extension; anything but `.json` is
    /// treated as an action stream.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReplayFormat::Json,
            _ => ReplayFormat::ActionStream,
        }
    }
}

#[derive(Deserialize)]
struct JsonDocument {
    samples: Vec<Sample>,
}

/// Load a replay from disk.
///
/// # Errors
///
/// Returns [`ReplayError`] when the file cannot be read, does not parse, or
/// holds no samples.
pub fn load_replay(path: impl AsRef<Path>) -> Result<Replay, ReplayError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ReplayFormat::from_path(path);
    let replay = match format {
        ReplayFormat::Json => parse_json(&text)?,
        ReplayFormat::ActionStream => parse_action_stream(&text)?,
    };

    let (max_x, max_y) = replay.bounds();
    tracing::info!(
        "Loaded {} samples from {} ({:?}, bounds {}x{})",
        replay.len(),
        path.display(),
        format,
        max_x,
        max_y
    );
    Ok(replay)
}

/// Parse a JSON replay document.
///
/// # Errors
///
/// Returns [`ReplayError::Json`] for malformed input and
/// [`ReplayError::Empty`] when there are no samples.
pub fn parse_json(text: &str) -> Result<Replay, ReplayError> {
    let samples = if text.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Sample>>(text)?
    } else {
        serde_json::from_str::<JsonDocument>(text)?.samples
    };
    Replay::new(samples)
}

/// Parse an osu! action stream.
///
/// Frames are comma separated `delta|x|y|keys`. Blank frames are skipped, as is
/// the seed frame. Frame numbers in errors are 1-based.
///
/// # Errors
///
/// Returns [`ReplayError::Frame`] for a frame with the wrong field count or an
/// unparsable number, and [`ReplayError::Empty`] when no frames remain.
pub fn parse_action_stream(text: &str) -> Result<Replay, ReplayError> {
    let mut samples = Vec::new();
    let mut deltas = Vec::new();

    for (idx, frame) in text.split(',').enumerate() {
        let frame = frame.trim();
        if frame.is_empty() {
            continue;
        }
        let number = idx + 1;
        let fields: Vec<&str> = frame.split('|').collect();
        if fields.len() != 4 {
            return Err(ReplayError::Frame {
                frame: number,
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let delta: i64 = parse_field(fields[0], "delta", number)?;
        if delta == SEED_FRAME_DELTA {
            continue;
        }
        let x: f32 = parse_field(fields[1], "x", number)?;
        let y: f32 = parse_field(fields[2], "y", number)?;
        let keys: u32 = parse_field(fields[3], "keys", number)?;

        samples.push(Sample::new(x, y).with_buttons(keys & KEY_LEFT != 0, keys & KEY_RIGHT != 0));
        deltas.push(delta);
    }

    Ok(Replay::new(samples)?.with_frame_deltas(deltas))
}

fn parse_field<T: std::str::FromStr>(raw: &str, name: &str, frame: usize) -> Result<T, ReplayError> {
    raw.trim().parse().map_err(|_| ReplayError::Frame {
        frame,
        reason: format!("invalid {name} {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_document() {
        let replay = parse_json(
            r#"{"samples": [{"x": 1.0, "y": 2.0}, {"x": 3.5, "y": 4.0, "left_click": true}]}"#,
        )
        .unwrap();
        assert_eq!(replay.len(), 2);
        assert!(replay.samples()[1].left_click);
        assert!(!replay.samples()[1].right_click);
    }

    #[test]
    fn test_parse_json_bare_array() {
        let replay = parse_json(r#"[{"x": 1.0, "y": 2.0, "right_click": true}]"#).unwrap();
        assert_eq!(replay.len(), 1);
        assert!(replay.samples()[0].right_click);
    }

    #[test]
    fn test_parse_json_errors() {
        assert!(matches!(parse_json("{\"samples\": []}"), Err(ReplayError::Empty)));
        assert!(matches!(parse_json("[]"), Err(ReplayError::Empty)));
        assert!(matches!(parse_json("{\"samples\": 3}"), Err(ReplayError::Json(_))));
        assert!(matches!(parse_json("not json"), Err(ReplayError::Json(_))));
    }

    #[test]
    fn test_parse_action_stream() {
        let replay =
            parse_action_stream("0|256|-500|0,-1|256|-500|0,16|100.5|50|1,17|120|60|3,-12345|0|0|7,")
                .unwrap();
        assert_eq!(replay.len(), 4);
        let s = replay.samples();
        assert_eq!(s[2], Sample::new(100.5, 50.0).with_buttons(true, false));
        assert_eq!(s[3], Sample::new(120.0, 60.0).with_buttons(true, true));
        assert_eq!(replay.frame_deltas(), &[0, -1, 16, 17]);
    }

    #[test]
    fn test_parse_action_stream_bad_frame() {
        let err = parse_action_stream("16|1|2|0,17|x|2|0").unwrap_err();
        match err {
            ReplayError::Frame { frame, .. } => assert_eq!(frame, 2),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_action_stream("16|1|2").unwrap_err();
        assert!(matches!(err, ReplayError::Frame { frame: 1, .. }));
    }

    #[test]
    fn test_parse_action_stream_only_seed() {
        assert!(matches!(
            parse_action_stream("-12345|0|0|123,"),
            Err(ReplayError::Empty)
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReplayFormat::from_path(Path::new("a.JSON")), ReplayFormat::Json);
        assert_eq!(ReplayFormat::from_path(Path::new("a.txt")), ReplayFormat::ActionStream);
        assert_eq!(ReplayFormat::from_path(Path::new("frames")), ReplayFormat::ActionStream);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_replay("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ReplayError::Read { .. }));
    }
}
