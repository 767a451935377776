//! Bounded, continuously variable parameters.
//!
//! Every parameter declares a valid range and a default. Writes are clamped to
//! the range, never rejected:
//!
//! ```
//! use knoten::{Parameter, ParameterSpec};
//!
//! const CUTOFF: ParameterSpec = ParameterSpec::new("cutoffFrequency", 10.0, 22050.0, 6900.0);
//!
//! let mut cutoff = Parameter::new(&CUTOFF);
//! assert_eq!(cutoff.set(50000.0), 22050.0);
//! assert_eq!(cutoff.set(-5.0), 10.0);
//! ```

/// Index of a parameter inside a unit's parameter tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ParameterAddress(pub u32);

/// How a node-facing value is scaled before it reaches the unit.
///
/// Made explicit per parameter rather than guessed from the magnitude of the
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitScale {
    /// The unit takes the value as-is (Hz, seconds, dB, 0-1 fractions)
    #[default]
    Identity,

    /// The unit takes a percentage: `unit = value * 100`
    Percent,
}

impl UnitScale {
    #[inline]
    pub fn to_unit(self, value: f64) -> f32 {
        match self {
            UnitScale::Identity => value as f32,
            UnitScale::Percent => (value * 100.0) as f32,
        }
    }

    #[inline]
    pub fn from_unit(self, value: f32) -> f64 {
        match self {
            UnitScale::Identity => value as f64,
            UnitScale::Percent => value as f64 / 100.0,
        }
    }
}

/// Static description of a parameter: name, range, default and unit scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub scale: UnitScale,
}

impl ParameterSpec {
    pub const fn new(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            min,
            max,
            default,
            scale: UnitScale::Identity,
        }
    }

    pub const fn with_scale(mut self, scale: UnitScale) -> Self {
        self.scale = scale;
        self
    }

    /// Clamp `value` into `[min, max]`. NaN clamps to `min`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The node-side cached value of one parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    spec: &'static ParameterSpec,
    value: f64,
}

impl Parameter {
    /// A parameter holding its spec's default.
    pub fn new(spec: &'static ParameterSpec) -> Self {
        Self {
            spec,
            value: spec.clamp(spec.default),
        }
    }

    /// A parameter holding `value`, clamped.
    pub fn with_value(spec: &'static ParameterSpec, value: f64) -> Self {
        Self {
            spec,
            value: spec.clamp(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Store `value` clamped to the declared range and return what was stored.
    #[inline]
    pub fn set(&mut self, value: f64) -> f64 {
        self.value = self.spec.clamp(value);
        self.value
    }

    /// The stored value in the unit's own scale.
    #[inline]
    pub fn unit_value(&self) -> f32 {
        self.spec.scale.to_unit(self.value)
    }

    #[inline]
    pub fn spec(&self) -> &'static ParameterSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIX: ParameterSpec =
        ParameterSpec::new("dryWetMix", 0.0, 1.0, 0.5).with_scale(UnitScale::Percent);

    #[test]
    fn percent_scale_is_explicit() {
        let mut mix = Parameter::new(&MIX);
        assert_eq!(mix.unit_value(), 50.0);
        mix.set(2.0);
        assert_eq!(mix.unit_value(), 100.0);
        assert_eq!(UnitScale::Percent.from_unit(25.0), 0.25);
    }

    #[test]
    fn nan_clamps_to_min() {
        let mut mix = Parameter::new(&MIX);
        assert_eq!(mix.set(f64::NAN), 0.0);
    }

    #[test]
    fn boundaries_are_legal() {
        let mut mix = Parameter::with_value(&MIX, 1.0);
        assert_eq!(mix.get(), 1.0);
        assert_eq!(mix.set(0.0), 0.0);
    }
}
