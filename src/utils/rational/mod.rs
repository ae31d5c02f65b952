mod conversion;
mod rounding;

pub use conversion::{error_bits, to_f64, FixedPoint, QuantizeError};
pub use rounding::RoundBinary;
