//! Generator expressions.
//!
//! An [`Operation`] is a postfix (Sporth-style) expression: operands first,
//! then the function name, wrapped in parentheses. Operations are only
//! described here; an external interpreter runs them.
//!
//! ```
//! use knoten::Operation;
//!
//! let cutoff = Operation::sine_wave(1.0, 0.5).scale(500.0, 1000.0);
//! let resonance = Operation::sine_wave(0.3, 0.5).abs() * 0.95;
//! let filter = Operation::input().moog_ladder_filter(cutoff, resonance) * 3.0;
//!
//! assert_eq!(
//!     filter.to_string(),
//!     "(((0 p) ((1 0.5 sine) 500 1000 biscale) (((0.3 0.5 sine) abs) 0.95 *) moogladder) 3 *)"
//! );
//! ```

use core::fmt;
use core::ops::{Add, Mul, Sub};

use itertools::Itertools;

/// A textual signal expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation(String);

impl Operation {
    /// A constant signal.
    pub fn constant(value: f64) -> Self {
        Self(value.to_string())
    }

    fn call(name: &str, operands: &[Operation]) -> Self {
        Self(format!("({} {})", operands.iter().join(" "), name))
    }

    /// Sine oscillator. Frequency in Hz (0 to 20000), amplitude 0 to 1.
    pub fn sine_wave(frequency: impl Into<Operation>, amplitude: impl Into<Operation>) -> Self {
        Self::call("sine", &[frequency.into(), amplitude.into()])
    }

    /// Band-limited sawtooth. Frequency in Hz (0 to 20000), amplitude 0 to 1.
    pub fn sawtooth_wave(
        frequency: impl Into<Operation>,
        amplitude: impl Into<Operation>,
    ) -> Self {
        Self::call("blsaw", &[frequency.into(), amplitude.into()])
    }

    /// Band-limited square. Pulse width 0 to 1, 0.5 is a square.
    pub fn square_wave(
        frequency: impl Into<Operation>,
        amplitude: impl Into<Operation>,
        pulse_width: impl Into<Operation>,
    ) -> Self {
        Self::call(
            "blsquare",
            &[frequency.into(), amplitude.into(), pulse_width.into()],
        )
    }

    /// Band-limited triangle. Frequency in Hz (0 to 20000), amplitude 0 to 1.
    pub fn triangle_wave(
        frequency: impl Into<Operation>,
        amplitude: impl Into<Operation>,
    ) -> Self {
        Self::call("bltriangle", &[frequency.into(), amplitude.into()])
    }

    /// The signal coming into the effect running the operation.
    pub fn input() -> Self {
        Self("(0 p)".to_owned())
    }

    /// Moog ladder low-pass. Cutoff in Hz (12 to 20000), resonance 0 to 2.
    pub fn moog_ladder_filter(
        self,
        cutoff_frequency: impl Into<Operation>,
        resonance: impl Into<Operation>,
    ) -> Self {
        Self::call(
            "moogladder",
            &[self, cutoff_frequency.into(), resonance.into()],
        )
    }

    /// Map a bipolar (-1 to 1) signal onto `minimum..maximum`.
    pub fn scale(self, minimum: impl Into<Operation>, maximum: impl Into<Operation>) -> Self {
        Self::call("biscale", &[self, minimum.into(), maximum.into()])
    }

    pub fn abs(self) -> Self {
        Self::call("abs", &[self])
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<f64> for Operation {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $symbol:literal) => {
        impl<T: Into<Operation>> $trait<T> for Operation {
            type Output = Operation;

            fn $method(self, rhs: T) -> Operation {
                Operation::call($symbol, &[self, rhs.into()])
            }
        }
    };
}

binary_operator!(Add, add, "+");
binary_operator!(Sub, sub, "-");
binary_operator!(Mul, mul, "*");
