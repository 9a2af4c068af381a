/// One frame's readout of a device
///
/// Index `i` of `buttons`/`axes` corresponds to index `i` of the active
/// profile's id lists. Samples are shorter than a profile whenever the device
/// reports fewer inputs than declared; the accessors treat the gap as released
/// buttons and centered axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveInputSample {
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

impl LiveInputSample {
    pub fn new(buttons: Vec<bool>, axes: Vec<f32>) -> Self {
        Self { buttons, axes }
    }

    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Axis value at `index`, clamped to [-1, 1]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes
            .get(index)
            .map(|v| v.clamp(-1.0, 1.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_default() {
        let sample = LiveInputSample::new(vec![true], vec![0.5]);
        assert!(sample.pressed(0));
        assert!(!sample.pressed(1));
        assert!(!sample.pressed(100));
        assert_eq!(sample.axis(0), 0.5);
        assert_eq!(sample.axis(3), 0.0);
    }

    #[test]
    fn axis_values_are_clamped() {
        let sample = LiveInputSample::new(vec![], vec![1.7, -3.0]);
        assert_eq!(sample.axis(0), 1.0);
        assert_eq!(sample.axis(1), -1.0);
    }
}
