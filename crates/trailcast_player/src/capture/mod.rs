//! Frame capture and PNG export.

mod export;
mod framebuffer;

pub use export::{frame_file_name, save_png, ExportReport, Exporter};
pub use framebuffer::{CapturedFrame, FrameStore};
