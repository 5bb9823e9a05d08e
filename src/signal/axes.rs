// Axis naming for the joystick-layer device API
//
// Pedal boxes show up as a generic six-axis controller. Each poll yields one
// raw count per axis in the fixed order X, Y, Z, Rx, Ry, Rz.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of axes reported per poll
pub const AXIS_COUNT: usize = 6;

/// Named axis slot in an [`AxisFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisName {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
}

impl AxisName {
    pub const ALL: [AxisName; AXIS_COUNT] = [
        AxisName::X,
        AxisName::Y,
        AxisName::Z,
        AxisName::Rx,
        AxisName::Ry,
        AxisName::Rz,
    ];

    /// Slot index within an [`AxisFrame`]
    pub fn index(self) -> usize {
        match self {
            AxisName::X => 0,
            AxisName::Y => 1,
            AxisName::Z => 2,
            AxisName::Rx => 3,
            AxisName::Ry => 4,
            AxisName::Rz => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisName::X => "X",
            AxisName::Y => "Y",
            AxisName::Z => "Z",
            AxisName::Rx => "Rx",
            AxisName::Ry => "Ry",
            AxisName::Rz => "Rz",
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AxisName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisName::ALL
            .iter()
            .copied()
            .find(|axis| axis.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown axis '{}' (expected one of X, Y, Z, Rx, Ry, Rz)", s))
    }
}

/// One poll worth of raw axis counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisFrame(pub [u32; AXIS_COUNT]);

impl AxisFrame {
    pub fn get(&self, axis: AxisName) -> u32 {
        self.0[axis.index()]
    }

    /// Iterate `(axis, raw)` pairs in slot order (used by axis monitors)
    pub fn iter(&self) -> impl Iterator<Item = (AxisName, u32)> + '_ {
        AxisName::ALL.iter().map(move |&axis| (axis, self.get(axis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_parse_roundtrip() {
        for axis in AxisName::ALL {
            assert_eq!(axis.label().parse::<AxisName>().unwrap(), axis);
        }
        assert_eq!("rz".parse::<AxisName>().unwrap(), AxisName::Rz);
        assert!("W".parse::<AxisName>().is_err());
    }

    #[test]
    fn test_frame_lookup() {
        let frame = AxisFrame([10, 20, 30, 40, 50, 60]);
        assert_eq!(frame.get(AxisName::X), 10);
        assert_eq!(frame.get(AxisName::Ry), 50);
        let pairs: Vec<_> = frame.iter().collect();
        assert_eq!(pairs[5], (AxisName::Rz, 60));
    }
}
