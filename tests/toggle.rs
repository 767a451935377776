mod common;

use knoten::nodes::delay::DelaySettings;
use knoten::nodes::{
    CostelloReverb, Delay, LowPassFilter, Mixer, Oscillator, Panner, StringResonator, Toggleable,
};

use common::engine;

#[test]
fn delay_stop_zeroes_mix_and_start_restores_it() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut delay = Delay::with_settings(
        &mut engine,
        &mut osc,
        DelaySettings {
            time: 1.0,
            feedback: 0.5,
            low_pass_cutoff: 15000.0,
            dry_wet_mix: 0.5,
        },
    );
    assert!(delay.is_started());

    delay.stop();
    assert_eq!(delay.dry_wet_mix(), 0.0);
    assert!(delay.is_stopped());
    assert!(delay.is_bypassed());

    delay.start();
    assert_eq!(delay.dry_wet_mix(), 0.5);
    assert!(delay.is_playing());
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut delay = Delay::new(&mut engine, &mut osc);
    delay.set_dry_wet_mix(0.8);

    delay.start();
    delay.start();
    assert!(delay.is_started());
    assert_eq!(delay.dry_wet_mix(), 0.8);

    delay.stop();
    delay.stop();
    assert!(delay.is_stopped());
    assert_eq!(delay.dry_wet_mix(), 0.0);

    // A second stop must not overwrite the saved mix with 0
    delay.start();
    assert_eq!(delay.dry_wet_mix(), 0.8);
}

#[test]
fn round_trip_restores_the_latest_mix() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut filter = LowPassFilter::new(&mut engine, &mut osc);

    for mix in [0.1, 0.9, 0.35] {
        filter.set_dry_wet_mix(mix);
    }
    filter.bypass();
    assert_eq!(filter.dry_wet_mix(), 0.0);
    filter.play();
    assert_eq!(filter.dry_wet_mix(), 0.35);
}

#[test]
fn mix_set_while_stopped_applies_on_start() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut delay = Delay::new(&mut engine, &mut osc);

    delay.stop();
    delay.set_dry_wet_mix(2.0);
    assert_eq!(delay.dry_wet_mix(), 0.0);
    assert!(delay.is_stopped());

    delay.start();
    assert_eq!(delay.dry_wet_mix(), 1.0);
}

#[test]
fn oscillator_starts_stopped() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    assert!(osc.is_stopped());
    assert_eq!(osc.amplitude(), 0.0);

    osc.set_amplitude(0.25);
    osc.start();
    assert_eq!(osc.amplitude(), 0.25);

    osc.stop();
    assert_eq!(osc.amplitude(), 0.0);
    osc.start();
    assert_eq!(osc.amplitude(), 0.25);
}

#[test]
fn mixer_bypasses_by_volume() {
    let mut engine = engine();
    let mut mixer = Mixer::new(&mut engine, &mut []);
    mixer.set_volume(3.0);

    mixer.stop();
    assert_eq!(mixer.volume(), 0.0);
    mixer.start();
    assert_eq!(mixer.volume(), 3.0);
}

#[test]
fn automated_nodes_report_live_unit_state() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    let mut reverb = CostelloReverb::new(&mut engine, &mut resonator);
    let mut panner = Panner::new(&mut engine, &mut reverb);

    assert!(resonator.is_started());
    assert!(reverb.is_started());

    resonator.stop();
    resonator.stop();
    assert!(resonator.is_bypassed());
    assert!(!resonator.parameter_tree().unwrap().is_playing());

    // Parameters survive a bypass untouched
    assert_eq!(resonator.feedback(), 0.95);

    resonator.start();
    assert!(resonator.is_playing());

    // The tree is the single source of truth
    panner.parameter_tree().unwrap().stop();
    assert!(panner.is_stopped());
    panner.play();
    assert!(panner.parameter_tree().unwrap().is_playing());
}
