//! Frame persistence module

pub mod writer;

pub use writer::FrameWriter;

/// File name of the `index`-th persisted frame (1-based)
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:06}.jpg", index)
}
