//! Wire layout of a single sensor packet.
//!
//! ```text
//! 0xAA | 0x86 | ax ay az (3x i16 LE) | disp (u16 LE) | vel (i16 LE) | event (u8) | xor
//! ```
//!
//! `0xAA` is consumed by the scanner as the delimiter, so a [`RawFrame`] starts
//! at the second header byte. The simple profile carries only the accel triple.
use serde::{Deserialize, Serialize};
use crate::protocol::DecodeError;
/// First-level header, used as the frame delimiter.
pub const HEADER1: u8 = 0xAA;
/// Second-level header, first byte of every extended frame.
pub const HEADER2: u8 = 0x86;
/// Length of an extended frame after the delimiter.
pub const EXTENDED_FRAME_LEN: usize = 13;
/// Length of a simple (accel-only) frame after the delimiter.
pub const SIMPLE_FRAME_LEN: usize = 6;
/// Frame layout, chosen once when the decoder is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameProfile {
    /// Early firmware: 6-byte accel payload, no second header, no checksum.
    Simple,
    /// Current firmware: second header, motion fields, event byte, XOR checksum.
    #[default]
    Extended,
}
impl FrameProfile {
    pub fn frame_len(self) -> usize {
        match self {
            FrameProfile::Simple => SIMPLE_FRAME_LEN,
            FrameProfile::Extended => EXTENDED_FRAME_LEN,
        }
    }
    /// Byte every candidate run must start with, if the profile has one.
    pub fn leading_byte(self) -> Option<u8> {
        match self {
            FrameProfile::Simple => None,
            FrameProfile::Extended => Some(HEADER2),
        }
    }
    pub fn decode(self, frame: &RawFrame) -> Result<DecodedFields, DecodeError> {
        match self {
            FrameProfile::Simple => decode_simple(frame),
            FrameProfile::Extended => decode(frame),
        }
    }
    pub fn encode(self, fields: &DecodedFields) -> RawFrame {
        match self {
            FrameProfile::Simple => {
                let mut bytes = Vec::with_capacity(SIMPLE_FRAME_LEN);
                for axis in fields.accel {
                    bytes.extend_from_slice(&axis.to_le_bytes());
                }
                RawFrame(bytes)
            }
            FrameProfile::Extended => fields.encode(),
        }
    }
}
/// Candidate frame bytes, delimiter already stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame(Vec<u8>);
impl RawFrame {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Delimiter plus frame, as the device puts it on the wire.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        out.push(HEADER1);
        out.extend_from_slice(&self.0);
        out
    }
}
/// Packet fields in raw integer form; unit scaling happens in [`crate::protocol::to_sample`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodedFields {
    pub accel: [i16; 3],
    pub displacement: u16,
    pub velocity: i16,
    pub event: u8,
}
impl DecodedFields {
    /// Extended-profile frame with a freshly computed checksum.
    pub fn encode(&self) -> RawFrame {
        let mut bytes = Vec::with_capacity(EXTENDED_FRAME_LEN);
        bytes.push(HEADER2);
        for axis in self.accel {
            bytes.extend_from_slice(&axis.to_le_bytes());
        }
        bytes.extend_from_slice(&self.displacement.to_le_bytes());
        bytes.extend_from_slice(&self.velocity.to_le_bytes());
        bytes.push(self.event);
        bytes.push(checksum(&bytes));
        RawFrame(bytes)
    }
    pub fn to_wire(&self) -> Vec<u8> {
        self.encode().to_wire()
    }
}
/// XOR over everything after the second header. `bytes` must not include the
/// trailing checksum byte.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().skip(1).fold(0u8, |acc, b| acc ^ b)
}
/// Validate and decode an extended frame. Stateless: a rejected frame has no
/// effect on the next call.
pub fn decode(frame: &RawFrame) -> Result<DecodedFields, DecodeError> {
    let bytes = frame.as_bytes();
    if bytes.len() != EXTENDED_FRAME_LEN {
        return Err(DecodeError::MalformedLength {
            expected: EXTENDED_FRAME_LEN,
            actual: bytes.len(),
        });
    }
    if bytes[0] != HEADER2 {
        return Err(DecodeError::MissingHeader(bytes[0]));
    }
    let computed = checksum(&bytes[..EXTENDED_FRAME_LEN - 1]);
    let received = bytes[EXTENDED_FRAME_LEN - 1];
    if computed != received {
        return Err(DecodeError::ChecksumMismatch { computed, received });
    }
    Ok(DecodedFields {
        accel: [
            i16::from_le_bytes([bytes[1], bytes[2]]),
            i16::from_le_bytes([bytes[3], bytes[4]]),
            i16::from_le_bytes([bytes[5], bytes[6]]),
        ],
        displacement: u16::from_le_bytes([bytes[7], bytes[8]]),
        velocity: i16::from_le_bytes([bytes[9], bytes[10]]),
        event: bytes[11],
    })
}
fn decode_simple(frame: &RawFrame) -> Result<DecodedFields, DecodeError> {
    let bytes = frame.as_bytes();
    if bytes.len() != SIMPLE_FRAME_LEN {
        return Err(DecodeError::MalformedLength {
            expected: SIMPLE_FRAME_LEN,
            actual: bytes.len(),
        });
    }
    Ok(DecodedFields {
        accel: [
            i16::from_le_bytes([bytes[0], bytes[1]]),
            i16::from_le_bytes([bytes[2], bytes[3]]),
            i16::from_le_bytes([bytes[4], bytes[5]]),
        ],
        ..DecodedFields::default()
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    fn fields() -> DecodedFields {
        DecodedFields {
            accel: [1200, -3400, 9800],
            displacement: 512,
            velocity: -77,
            event: 1,
        }
    }
    #[test]
    fn encode_lays_out_fields_little_endian() {
        let frame = fields().encode();
        let b = frame.as_bytes();
        assert_eq!(b.len(), EXTENDED_FRAME_LEN);
        assert_eq!(b[0], HEADER2);
        assert_eq!(&b[1..3], &1200i16.to_le_bytes());
        assert_eq!(&b[7..9], &512u16.to_le_bytes());
        assert_eq!(&b[9..11], &(-77i16).to_le_bytes());
        assert_eq!(b[11], 1);
        let xor = b[1..12].iter().fold(0u8, |acc, x| acc ^ x);
        assert_eq!(b[12], xor);
    }
    #[test]
    fn decode_roundtrips_valid_frames() {
        let samples = [
            fields(),
            DecodedFields::default(),
            DecodedFields {
                accel: [i16::MIN, i16::MAX, 0],
                displacement: u16::MAX,
                velocity: i16::MIN,
                event: 2,
            },
        ];
        for fields in samples {
            let decoded = decode(&fields.encode()).unwrap();
            assert_eq!(decoded, fields);
        }
    }
    #[test]
    fn any_flipped_checksum_bit_is_rejected() {
        let frame = fields().encode();
        for bit in 0..8 {
            let mut bytes = frame.as_bytes().to_vec();
            bytes[12] ^= 1 << bit;
            let err = decode(&RawFrame::new(bytes)).unwrap_err();
            assert!(matches!(err, DecodeError::ChecksumMismatch { .. }));
        }
    }
    #[test]
    fn corrupted_payload_is_rejected() {
        let mut bytes = fields().encode().as_bytes().to_vec();
        bytes[4] ^= 0x10;
        assert!(matches!(
            decode(&RawFrame::new(bytes)),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
    }
    #[test]
    fn wrong_length_is_malformed() {
        let mut bytes = fields().encode().as_bytes().to_vec();
        bytes.pop();
        assert_eq!(
            decode(&RawFrame::new(bytes)),
            Err(DecodeError::MalformedLength {
                expected: 13,
                actual: 12
            })
        );
    }
    #[test]
    fn missing_second_header_is_reported() {
        let mut bytes = fields().encode().as_bytes().to_vec();
        bytes[0] = 0x42;
        assert_eq!(
            decode(&RawFrame::new(bytes)),
            Err(DecodeError::MissingHeader(0x42))
        );
    }
    #[test]
    fn simple_profile_decodes_accel_only() {
        let original = DecodedFields {
            accel: [10, -20, 30],
            ..DecodedFields::default()
        };
        let frame = FrameProfile::Simple.encode(&original);
        assert_eq!(frame.len(), SIMPLE_FRAME_LEN);
        assert_eq!(FrameProfile::Simple.decode(&frame).unwrap(), original);
        assert!(matches!(
            FrameProfile::Simple.decode(&fields().encode()),
            Err(DecodeError::MalformedLength { .. })
        ));
    }
}
