//! Weighted recursive smoother.
//!
//! A two-state filter: a running window sum feeds a moving average, and the
//! output blends the current value with the *previous output*:
//!
//! ```text
//! O[0] = M[0]
//! O[i] = (src[i] * weight + O[i-1] * (length - weight)) / length
//! ```
//!
//! The output therefore depends on the whole history of the source, not just
//! the current window. During warm-up the moving average divides by the number
//! of values seen so far instead of `length`.

/// Accumulator carried across the source sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmootherState {
    /// Number of source values consumed.
    pub count: usize,
    /// Sum of the last `length` source values.
    pub sum: f64,
    /// Moving average after the last value.
    pub average: f64,
    /// Recursive output after the last value.
    pub output: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSmoother {
    length: usize,
    weight: usize,
}

impl WeightedSmoother {
    /// Create a smoother. `weight` is capped at `length`.
    pub fn new(length: usize, weight: usize) -> Self {
        Self {
            length,
            weight: weight.min(length),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn weight(&self) -> usize {
        self.weight
    }

    /// Consume one source value.
    ///
    /// `dropped` is the value leaving the window (`src[i - length]`), present
    /// only once `i >= length`.
    pub fn advance(&self, state: SmootherState, value: f64, dropped: Option<f64>) -> SmootherState {
        if self.length == 0 {
            return SmootherState {
                count: state.count + 1,
                ..SmootherState::default()
            };
        }

        let i = state.count;
        let length = self.length as f64;

        let sum = match dropped {
            Some(old) => state.sum - old + value,
            None => state.sum + value,
        };

        let average = if i + 1 >= self.length {
            sum / length
        } else {
            sum / (i + 1) as f64
        };

        let output = if i == 0 {
            average
        } else {
            let weight = self.weight as f64;
            (value * weight + state.output * (length - weight)) / length
        };

        SmootherState {
            count: i + 1,
            sum,
            average,
            output,
        }
    }

    /// State after every source value, in order.
    pub fn states(&self, src: &[f64]) -> Vec<SmootherState> {
        src.iter()
            .enumerate()
            .scan(SmootherState::default(), |state, (i, &value)| {
                let dropped = i.checked_sub(self.length).map(|j| src[j]);
                *state = self.advance(*state, value, dropped);
                Some(*state)
            })
            .collect()
    }

    /// Output sequence, one value per source value.
    pub fn smooth(&self, src: &[f64]) -> Vec<f64> {
        self.states(src).into_iter().map(|s| s.output).collect()
    }

    /// Output after the last source value, 0 for an empty source.
    pub fn last(&self, src: &[f64]) -> f64 {
        self.states(src).last().map(|s| s.output).unwrap_or(0.0)
    }
}
