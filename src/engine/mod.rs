//! Frame assembly engine module

pub mod demuxer;
pub mod frame;

pub use demuxer::FrameDemuxer;
pub use frame::{Frame, FrameSequence};
