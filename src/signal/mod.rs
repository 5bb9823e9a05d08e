// Signal module - conditioning pipeline for raw pedal input
//
// raw axis counts → normalize (zero, deadzone, invert, clamp) → Smoother
// (time-keyed EMA) → (t_ms, value) samples for the drill engine.

pub mod axes;
pub mod normalize;
pub mod pipeline;
pub mod smoother;

pub use axes::{AxisFrame, AxisName, AXIS_COUNT};
pub use normalize::{normalize, raw_to_unit, NormalizationConfig, RAW_AXIS_MAX};
pub use pipeline::{AxisSource, PedalPipeline, PedalSample};
pub use smoother::Smoother;
