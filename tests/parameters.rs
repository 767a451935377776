mod common;

use approx::assert_relative_eq;
use proptest::prelude::*;

use knoten::nodes::delay::DelaySettings;
use knoten::nodes::{
    CombFilterReverb, CombFilterReverbSettings, CostelloReverb, Delay, LowPassFilter,
    LowShelfParametricEqualizerFilter, Mixer, Oscillator, Panner, StringResonator,
};
use knoten::ParameterSpec;

use common::{engine, render};

#[test]
fn filter_cutoff_clamps_to_its_range() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut filter = LowPassFilter::new(&mut engine, &mut osc);

    filter.set_cutoff_frequency(50000.0);
    assert_eq!(filter.cutoff_frequency(), 22050.0);

    filter.set_cutoff_frequency(-5.0);
    assert_eq!(filter.cutoff_frequency(), 10.0);

    filter.set_cutoff_frequency(1234.5);
    assert_eq!(filter.cutoff_frequency(), 1234.5);
}

#[test]
fn reverb_feedback_of_one_is_accepted() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut reverb = CostelloReverb::new(&mut engine, &mut osc);

    reverb.set_feedback(1.0);
    assert_eq!(reverb.feedback(), 1.0);

    let tree = reverb.parameter_tree().unwrap();
    let address = tree.parameter("feedback").unwrap();
    assert_eq!(tree.value(address), Some(1.0));
}

#[test]
fn settings_are_clamped_at_construction() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let delay = Delay::with_settings(
        &mut engine,
        &mut osc,
        DelaySettings {
            time: 10.0,
            feedback: -1.0,
            low_pass_cutoff: 1.0e9,
            dry_wet_mix: 0.25,
        },
    );

    assert_eq!(delay.time(), 2.0);
    assert_eq!(delay.feedback(), 0.0);
    assert_eq!(delay.low_pass_cutoff(), 22050.0);
    assert_eq!(delay.dry_wet_mix(), 0.25);
}

#[test]
fn defaults() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    assert_eq!(osc.frequency(), 440.0);

    let resonator = StringResonator::new(&mut engine, &mut osc);
    assert_eq!(resonator.fundamental_frequency(), 100.0);
    assert_eq!(resonator.feedback(), 0.95);

    let mut eq_input = Oscillator::new(&mut engine);
    let eq = LowShelfParametricEqualizerFilter::new(&mut engine, &mut eq_input);
    assert_eq!(eq.corner_frequency(), 1000.0);
    assert_eq!(eq.gain(), 1.0);
    assert_eq!(eq.q(), 0.707);

    let mut comb_input = Oscillator::new(&mut engine);
    let comb = CombFilterReverb::new(&mut engine, &mut comb_input);
    assert_eq!(comb.reverb_duration(), 1.0);
    assert_relative_eq!(comb.loop_duration(), 0.1, epsilon = 1e-6);
}

#[test]
fn comb_loop_duration_is_bounded() {
    let mut engine = engine();
    let cases = [
        (f64::INFINITY, 10.0),
        (1.0e12, 10.0),
        (-1.0, 0.0),
        (f64::NAN, 0.0),
        (0.25, 0.25),
    ];
    for (requested, expected) in cases {
        let mut osc = Oscillator::new(&mut engine);
        let comb = CombFilterReverb::with_settings(
            &mut engine,
            &mut osc,
            CombFilterReverbSettings {
                loop_duration: requested,
                ..CombFilterReverbSettings::default()
            },
        );
        assert_eq!(comb.loop_duration(), expected);
        assert!(!comb.as_ref().is_inert());
    }
    render(&mut engine, 1);
}

#[test]
fn automated_writes_reach_the_tree_clamped() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut panner = Panner::new(&mut engine, &mut osc);

    panner.set_pan(-3.0);
    assert_eq!(panner.pan(), -1.0);

    let tree = panner.parameter_tree().unwrap();
    assert_eq!(tree.value(tree.parameter("pan").unwrap()), Some(-1.0));
}

fn clamped(spec_min: f64, spec_max: f64, v: f64) -> f64 {
    v.clamp(spec_min, spec_max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn spec_clamp_matches_min_max(min in -1.0e4f64..0.0, span in 0.0f64..1.0e4, v in -1.0e6f64..1.0e6) {
        let spec = ParameterSpec::new("x", min, min + span, min);
        let stored = spec.clamp(v);
        prop_assert_eq!(stored, clamped(min, min + span, v));
        if spec.contains(v) {
            prop_assert_eq!(stored, v);
        }
    }

    #[test]
    fn direct_node_setters_clamp(v in -1.0e5f64..1.0e5) {
        let mut engine = engine();
        let mut osc = Oscillator::new(&mut engine);
        let mut delay = Delay::new(&mut engine, &mut osc);
        let mut filter = LowPassFilter::new(&mut engine, &mut delay);
        let mut mixer = Mixer::new(&mut engine, &mut []);

        delay.set_time(v);
        delay.set_feedback(v);
        delay.set_low_pass_cutoff(v);
        delay.set_dry_wet_mix(v);
        prop_assert_eq!(delay.time(), clamped(0.0, 2.0, v));
        prop_assert_eq!(delay.feedback(), clamped(0.0, 1.0, v));
        prop_assert_eq!(delay.low_pass_cutoff(), clamped(10.0, 22050.0, v));
        prop_assert_eq!(delay.dry_wet_mix(), clamped(0.0, 1.0, v));

        filter.set_cutoff_frequency(v);
        filter.set_resonance(v);
        filter.set_dry_wet_mix(v);
        prop_assert_eq!(filter.cutoff_frequency(), clamped(10.0, 22050.0, v));
        prop_assert_eq!(filter.resonance(), clamped(-20.0, 40.0, v));
        prop_assert_eq!(filter.dry_wet_mix(), clamped(0.0, 1.0, v));

        osc.set_frequency(v);
        prop_assert_eq!(osc.frequency(), clamped(0.0, 20000.0, v));

        mixer.set_volume(v);
        prop_assert_eq!(mixer.volume(), clamped(0.0, 10.0, v));
    }

    #[test]
    fn automated_node_setters_clamp(v in -1.0e5f64..1.0e5) {
        let mut engine = engine();
        let mut osc = Oscillator::new(&mut engine);
        let mut resonator = StringResonator::new(&mut engine, &mut osc);
        let mut reverb = CostelloReverb::new(&mut engine, &mut resonator);
        let mut comb = CombFilterReverb::new(&mut engine, &mut reverb);
        let mut eq = LowShelfParametricEqualizerFilter::new(&mut engine, &mut comb);

        resonator.set_fundamental_frequency(v);
        resonator.set_feedback(v);
        prop_assert_eq!(resonator.fundamental_frequency(), clamped(12.0, 10000.0, v));
        prop_assert_eq!(resonator.feedback(), clamped(0.0, 1.0, v));

        reverb.set_feedback(v);
        reverb.set_cutoff_frequency(v);
        prop_assert_eq!(reverb.feedback(), clamped(0.0, 1.0, v));
        prop_assert_eq!(reverb.cutoff_frequency(), clamped(12.0, 20000.0, v));

        comb.set_reverb_duration(v);
        prop_assert_eq!(comb.reverb_duration(), clamped(0.0, 10.0, v));

        eq.set_corner_frequency(v);
        eq.set_gain(v);
        eq.set_q(v);
        prop_assert_eq!(eq.corner_frequency(), clamped(12.0, 20000.0, v));
        prop_assert_eq!(eq.gain(), clamped(0.0, 10.0, v));
        prop_assert_eq!(eq.q(), clamped(0.0, 2.0, v));
    }
}
