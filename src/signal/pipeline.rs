//! Pedal input pipeline: device polling, normalization and smoothing.
//!
//! The device layer is abstracted behind [`AxisSource`] so the conditioning
//! chain can be driven by real hardware, a recorded trace or a scripted stub.

use log::{debug, info};

use super::axes::{AxisFrame, AxisName};
use super::normalize::{normalize, raw_to_unit, NormalizationConfig};
use super::smoother::Smoother;

/// Capability that yields raw axis counts per device id.
///
/// Implementations wrap whatever joystick API the host platform offers.
pub trait AxisSource {
    /// Ids of devices that currently answer a poll
    fn list_devices(&mut self) -> Vec<u32>;

    /// Read one frame from `device_id`, `None` if the device did not answer
    fn read_raw(&mut self, device_id: u32) -> Option<AxisFrame>;
}

/// One conditioned poll result
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PedalSample {
    /// Milliseconds since the first poll on the current device
    pub t_ms: f64,
    /// Brake position in [0, 1]
    pub brake: f64,
    /// Throttle position in [0, 1]
    pub throttle: f64,
    /// Raw frame the sample was derived from
    pub raw: AxisFrame,
}

/// Conditioning state for one pedal channel
#[derive(Debug, Clone)]
struct Channel {
    axis: AxisName,
    norm: NormalizationConfig,
    smoother: Smoother,
}

impl Channel {
    fn new(axis: AxisName, norm: NormalizationConfig, smoothing_ms: f64) -> Self {
        Self {
            axis,
            norm,
            smoother: Smoother::new(smoothing_ms),
        }
    }

    fn condition(&mut self, frame: &AxisFrame, now_s: f64) -> f64 {
        let value = normalize(frame.get(self.axis), &self.norm);
        self.smoother.step(value, now_s)
    }
}

/// Brake + throttle conditioning pipeline over an [`AxisSource`]
pub struct PedalPipeline<S: AxisSource> {
    source: S,
    device_id: u32,
    brake: Channel,
    throttle: Channel,
    origin_s: Option<f64>,
}

impl<S: AxisSource> PedalPipeline<S> {
    /// Create a pipeline on device 0 with brake on X and throttle on Y
    pub fn new(source: S) -> Self {
        Self::with_config(
            source,
            AxisName::X,
            AxisName::Y,
            NormalizationConfig::default(),
            NormalizationConfig::default(),
            20.0,
        )
    }

    /// Create a pipeline with explicit axis mapping and normalization
    pub fn with_config(
        source: S,
        brake_axis: AxisName,
        throttle_axis: AxisName,
        brake_norm: NormalizationConfig,
        throttle_norm: NormalizationConfig,
        smoothing_ms: f64,
    ) -> Self {
        Self {
            source,
            device_id: 0,
            brake: Channel::new(brake_axis, brake_norm, smoothing_ms),
            throttle: Channel::new(throttle_axis, throttle_norm, smoothing_ms),
            origin_s: None,
        }
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn brake_config(&self) -> &NormalizationConfig {
        &self.brake.norm
    }

    pub fn throttle_config(&self) -> &NormalizationConfig {
        &self.throttle.norm
    }

    pub fn brake_config_mut(&mut self) -> &mut NormalizationConfig {
        &mut self.brake.norm
    }

    pub fn throttle_config_mut(&mut self) -> &mut NormalizationConfig {
        &mut self.throttle.norm
    }

    pub fn list_devices(&mut self) -> Vec<u32> {
        self.source.list_devices()
    }

    /// Switch device, restarting the clock and both smoothers
    pub fn apply_device(&mut self, device_id: u32) {
        info!("[PedalPipeline] Switching to device {}", device_id);
        self.device_id = device_id;
        self.origin_s = None;
        self.brake.smoother.reset();
        self.throttle.smoother.reset();
    }

    /// Remap which axis feeds each channel
    pub fn set_axes(&mut self, brake: AxisName, throttle: AxisName) {
        self.brake.axis = brake;
        self.throttle.axis = throttle;
    }

    pub fn axes(&self) -> (AxisName, AxisName) {
        (self.brake.axis, self.throttle.axis)
    }

    /// Set the smoothing time constant for both channels
    pub fn set_smoothing(&mut self, time_constant_ms: f64) {
        self.brake.smoother.set_time_constant_ms(time_constant_ms);
        self.throttle.smoother.set_time_constant_ms(time_constant_ms);
    }

    /// Store the current resting position of each channel as its zero
    ///
    /// Returns the new `(brake, throttle)` zeros, or `(0.0, 0.0)` without
    /// touching the configuration if the device does not answer.
    pub fn calibrate_zero(&mut self) -> (f64, f64) {
        let Some(frame) = self.source.read_raw(self.device_id) else {
            debug!(
                "[PedalPipeline] Zero calibration skipped, device {} not readable",
                self.device_id
            );
            return (0.0, 0.0);
        };

        self.brake.norm.zero_raw = raw_to_unit(frame.get(self.brake.axis));
        self.throttle.norm.zero_raw = raw_to_unit(frame.get(self.throttle.axis));
        info!(
            "[PedalPipeline] Zero calibrated: brake={:.3} throttle={:.3}",
            self.brake.norm.zero_raw, self.throttle.norm.zero_raw
        );
        (self.brake.norm.zero_raw, self.throttle.norm.zero_raw)
    }

    /// Poll the device once at `now_s` (seconds on a monotonic clock)
    pub fn poll(&mut self, now_s: f64) -> Option<PedalSample> {
        let raw = self.source.read_raw(self.device_id)?;
        let origin = *self.origin_s.get_or_insert(now_s);

        let brake = self.brake.condition(&raw, now_s);
        let throttle = self.throttle.condition(&raw, now_s);

        Some(PedalSample {
            t_ms: (now_s - origin) * 1000.0,
            brake,
            throttle,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::normalize::RAW_AXIS_MAX;
    use std::collections::VecDeque;

    /// Scripted source replaying queued frames for device 0 only
    #[derive(Default)]
    struct ScriptedSource {
        frames: VecDeque<AxisFrame>,
        hold: Option<AxisFrame>,
    }

    impl ScriptedSource {
        fn holding(frame: AxisFrame) -> Self {
            Self {
                frames: VecDeque::new(),
                hold: Some(frame),
            }
        }
    }

    impl AxisSource for ScriptedSource {
        fn list_devices(&mut self) -> Vec<u32> {
            vec![0]
        }

        fn read_raw(&mut self, device_id: u32) -> Option<AxisFrame> {
            if device_id != 0 {
                return None;
            }
            self.frames.pop_front().or(self.hold)
        }
    }

    fn frame(x: u32, y: u32) -> AxisFrame {
        AxisFrame([x, y, 0, 0, 0, 0])
    }

    #[test]
    fn test_poll_conditions_both_channels() {
        let source = ScriptedSource::holding(frame(RAW_AXIS_MAX, 0));
        let mut pipeline = PedalPipeline::new(source);

        let sample = pipeline.poll(10.0).expect("device answers");
        assert_eq!(sample.t_ms, 0.0);
        assert_eq!(sample.brake, 1.0);
        assert_eq!(sample.throttle, 0.0);

        let sample = pipeline.poll(10.25).expect("device answers");
        assert!((sample.t_ms - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_unreadable_device_yields_none() {
        let source = ScriptedSource::holding(frame(0, 0));
        let mut pipeline = PedalPipeline::new(source);
        pipeline.apply_device(3);
        assert!(pipeline.poll(0.0).is_none());
        assert_eq!(pipeline.calibrate_zero(), (0.0, 0.0));
        assert_eq!(pipeline.brake_config().zero_raw, 0.0);
    }

    #[test]
    fn test_calibrate_zero_uses_selected_axes() {
        let rest = AxisFrame([0, 6_553, 13_107, 0, 0, 0]);
        let mut pipeline = PedalPipeline::new(ScriptedSource::holding(rest));
        pipeline.set_axes(AxisName::Z, AxisName::Y);

        let (brake_zero, throttle_zero) = pipeline.calibrate_zero();
        assert!((brake_zero - 0.2).abs() < 1e-4);
        assert!((throttle_zero - 0.1).abs() < 1e-4);

        // Resting frame now reads zero on both channels
        let sample = pipeline.poll(0.0).expect("device answers");
        assert_eq!(sample.brake, 0.0);
        assert_eq!(sample.throttle, 0.0);
    }

    #[test]
    fn test_apply_device_resets_smoothing_and_clock() {
        let mut source = ScriptedSource::holding(frame(RAW_AXIS_MAX, 0));
        source.frames.push_back(frame(0, 0));
        let mut pipeline = PedalPipeline::new(source);
        pipeline.set_smoothing(1_000.0);

        let first = pipeline.poll(1.0).expect("device answers");
        assert_eq!(first.brake, 0.0);
        let lagged = pipeline.poll(1.01).expect("device answers");
        assert!(lagged.brake < 0.05);

        pipeline.apply_device(0);
        let reseeded = pipeline.poll(2.0).expect("device answers");
        assert_eq!(reseeded.brake, 1.0);
        assert_eq!(reseeded.t_ms, 0.0);
    }
}
