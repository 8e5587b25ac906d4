// src/protocol/mod.rs
pub mod error;
pub mod frame;
pub mod sample;
pub mod scanner;
pub mod source;
pub mod stream;
pub use error::{DecodeError, SourceError};
pub use frame::{
    checksum, decode, DecodedFields, FrameProfile, RawFrame, EXTENDED_FRAME_LEN, HEADER1,
    HEADER2, SIMPLE_FRAME_LEN,
};
pub use sample::{to_sample, Sample};
pub use scanner::{FrameScanner, ScanReport};
pub use source::{ByteSource, ManualSource, SerialSource, SimulatedSource, TcpSource};
pub use stream::{StreamDecoder, StreamStats};
