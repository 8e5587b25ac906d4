use serde::Serialize;
use crate::protocol::DecodedFields;
/// Raw accel counts per g.
pub const ACCEL_COUNTS_PER_UNIT: f64 = 1.0e4;
/// Raw displacement/velocity counts per unit.
pub const MOTION_COUNTS_PER_UNIT: f64 = 1.0e6;
/// One decoded packet in physical units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    /// Seconds since stream start, assigned on receipt.
    pub time: f64,
    pub accel: [f64; 3],
    pub accel_magnitude: f64,
    pub displacement: f64,
    pub velocity: f64,
    /// 0 = no event, otherwise the device's event class.
    pub event: u8,
}
/// Scale raw fields to physical units and stamp the receipt time.
pub fn to_sample(fields: DecodedFields, time: f64) -> Sample {
    let [x, y, z] = fields.accel.map(|axis| f64::from(axis) / ACCEL_COUNTS_PER_UNIT);
    Sample {
        time,
        accel: [x, y, z],
        accel_magnitude: (x * x + y * y + z * z).sqrt(),
        displacement: f64::from(fields.displacement) / MOTION_COUNTS_PER_UNIT,
        velocity: f64::from(fields.velocity) / MOTION_COUNTS_PER_UNIT,
        event: fields.event,
    }
}
