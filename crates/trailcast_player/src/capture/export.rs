//! PNG export of captured frames.
//!
//! A dump writes every stored frame as `<out_dir>/<prefix>/<prefix>NNNNNN.png`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::framebuffer::{CapturedFrame, FrameStore};
use crate::config::{ExportConfig, ExportNaming};
use crate::error::ExportError;

/// Outcome of one dump.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Files written, in export order.
    pub written: Vec<PathBuf>,
    /// Ticks that failed to export, with the reason.
    pub failed: Vec<(usize, ExportError)>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes a [`FrameStore`] to disk as numbered PNG files.
#[derive(Clone, Debug)]
pub struct Exporter {
    out_dir: PathBuf,
    prefix: String,
    naming: ExportNaming,
}

impl Exporter {
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidPrefix`] for an unusable prefix.
    pub fn new(
        out_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        naming: ExportNaming,
    ) -> Result<Self, ExportError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            out_dir: out_dir.into(),
            prefix,
            naming,
        })
    }

    /// Build from the `[export]` section, using `fallback_prefix` when the
    /// section sets none.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidPrefix`] for an unusable prefix.
    pub fn from_config(config: &ExportConfig, fallback_prefix: &str) -> Result<Self, ExportError> {
        let prefix = config.prefix.as_deref().unwrap_or(fallback_prefix);
        Self::new(config.out_dir.clone(), prefix, config.naming)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn naming(&self) -> ExportNaming {
        self.naming
    }

    /// Directory a dump with `prefix` writes into.
    pub fn target_dir(&self, prefix: &str) -> PathBuf {
        self.out_dir.join(prefix)
    }

    /// Dump every stored frame under the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns an error only when the target directory cannot be created.
    /// Per-frame failures are collected in the report.
    pub fn dump(&self, store: &FrameStore) -> Result<ExportReport, ExportError> {
        self.dump_from(store, &self.prefix, 0)
    }

    /// Dump every stored frame under `prefix`.
    ///
    /// # Errors
    ///
    /// See [`Exporter::dump`]; also rejects an invalid prefix.
    pub fn dump_as(&self, store: &FrameStore, prefix: &str) -> Result<ExportReport, ExportError> {
        validate_prefix(prefix)?;
        self.dump_from(store, prefix, 0)
    }

    /// Dump with sequential numbering starting at `first_index`, so a long
    /// render can be exported in chunks into one contiguous sequence.
    ///
    /// # Errors
    ///
    /// See [`Exporter::dump`].
    pub fn dump_from(
        &self,
        store: &FrameStore,
        prefix: &str,
        first_index: usize,
    ) -> Result<ExportReport, ExportError> {
        let dir = self.target_dir(prefix);
        std::fs::create_dir_all(&dir).map_err(|source| ExportError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut report = ExportReport::default();
        for (ordinal, frame) in store.iter().enumerate() {
            let index = match self.naming {
                ExportNaming::Sequential => first_index + ordinal,
                ExportNaming::TickIndex => frame.tick,
            };
            let path = dir.join(frame_file_name(prefix, index));
            match save_png(frame, &path) {
                Ok(()) => report.written.push(path),
                Err(err) => {
                    tracing::error!("Failed to export tick {}: {}", frame.tick, err);
                    report.failed.push((frame.tick, err));
                }
            }
        }

        tracing::info!(
            "Exported {} frames to {} ({} failed)",
            report.written.len(),
            dir.display(),
            report.failed.len()
        );
        Ok(report)
    }
}

/// `<prefix><6-digit index>.png`
pub fn frame_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index:06}.png")
}

fn validate_prefix(prefix: &str) -> Result<(), ExportError> {
    let invalid = prefix.trim().is_empty()
        || prefix == "."
        || prefix == ".."
        || prefix.contains(['/', '\\']);
    if invalid {
        return Err(ExportError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Encode one frame as an RGBA8 PNG.
///
/// # Errors
///
/// Returns [`ExportError::CreateFile`] or [`ExportError::Encode`].
pub fn save_png(frame: &CapturedFrame, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let encode_err = |source| ExportError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(encode_err)?;
    writer.write_image_data(&frame.data).map_err(encode_err)?;
    writer.finish().map_err(encode_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name("run1", 0), "run1000000.png");
        assert_eq!(frame_file_name("run1", 1234), "run1001234.png");
    }

    #[test]
    fn test_invalid_prefixes() {
        for prefix in ["", "  ", "a/b", "a\\b", "..", "."] {
            assert!(
                matches!(
                    Exporter::new(".", prefix, ExportNaming::Sequential),
                    Err(ExportError::InvalidPrefix(_))
                ),
                "prefix {prefix:?} should be rejected"
            );
        }
        assert!(Exporter::new(".", "run1", ExportNaming::Sequential).is_ok());
    }

    #[test]
    fn test_from_config_fallback() {
        let config = ExportConfig::default();
        let exporter = Exporter::from_config(&config, "replay").unwrap();
        assert_eq!(exporter.prefix(), "replay");

        let config = ExportConfig {
            prefix: Some("custom".into()),
            ..Default::default()
        };
        assert_eq!(Exporter::from_config(&config, "replay").unwrap().prefix(), "custom");
    }

    #[test]
    fn test_tick_index_naming() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FrameStore::new(1, 1);
        store.capture(4, &[1, 2, 3, 255]).unwrap();
        store.capture(17, &[4, 5, 6, 255]).unwrap();

        let exporter = Exporter::new(dir.path(), "ticks", ExportNaming::TickIndex).unwrap();
        let report = exporter.dump(&store).unwrap();
        assert!(report.is_success());
        assert!(dir.path().join("ticks/ticks000004.png").exists());
        assert!(dir.path().join("ticks/ticks000017.png").exists());
    }

    #[test]
    fn test_dump_from_offsets_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FrameStore::new(1, 1);
        store.capture(0, &[0; 4]).unwrap();
        store.capture(1, &[0; 4]).unwrap();

        let exporter = Exporter::new(dir.path(), "seq", ExportNaming::Sequential).unwrap();
        let report = exporter.dump_from(&store, "seq", 10).unwrap();
        assert_eq!(
            report.written,
            vec![
                dir.path().join("seq/seq000010.png"),
                dir.path().join("seq/seq000011.png")
            ]
        );
    }

    #[test]
    fn test_directory_creation_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut store = FrameStore::new(1, 1);
        store.capture(0, &[0; 4]).unwrap();
        let exporter = Exporter::new(&blocker, "run", ExportNaming::Sequential).unwrap();
        assert!(matches!(
            exporter.dump(&store),
            Err(ExportError::CreateDir { .. })
        ));
    }

    #[test]
    fn test_failed_frame_does_not_stop_dump() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FrameStore::new(1, 1);
        for tick in 0..3 {
            store.capture(tick, &[tick as u8, 0, 0, 255]).unwrap();
        }
        // A directory where the second file should go.
        std::fs::create_dir_all(dir.path().join("run1/run1000001.png")).unwrap();

        let exporter = Exporter::new(dir.path(), "run1", ExportNaming::Sequential).unwrap();
        let report = exporter.dump(&store).unwrap();

        assert!(!report.is_success());
        assert_eq!(
            report.written,
            vec![
                dir.path().join("run1/run1000000.png"),
                dir.path().join("run1/run1000002.png"),
            ]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, 1);
        assert!(matches!(report.failed[0].1, ExportError::CreateFile { .. }));
    }

    #[test]
    fn test_empty_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path(), "empty", ExportNaming::Sequential).unwrap();
        let report = exporter.dump(&FrameStore::new(1, 1)).unwrap();
        assert!(report.written.is_empty());
        assert!(dir.path().join("empty").is_dir());
    }
}
