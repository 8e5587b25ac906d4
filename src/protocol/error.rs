use thiserror::Error;
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("checksum mismatch: computed {computed:#04x}, frame carries {received:#04x}")]
    ChecksumMismatch { computed: u8, received: u8 },
    #[error("malformed frame length: expected {expected} bytes, got {actual}")]
    MalformedLength { expected: usize, actual: usize },
    #[error("missing second header byte: got {0:#04x}")]
    MissingHeader(u8),
}
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transport i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial port failed: {0}")]
    Serial(#[from] serialport::Error),
    #[error("byte source closed by peer")]
    Closed,
}
