mod common;

use knoten::nodes::{panner, string_resonator, Delay, Oscillator, Panner, StringResonator, Toggleable};
use knoten::{
    ComponentDescription, ComponentType, Engine, EngineConfig, Error, Format, FourCC, Kernel,
    ParameterAddress, ParameterSpec, ProcessContext, Result,
};
use dasp_graph::{Buffer, Input};

use common::engine;

fn failing_factory(_format: &Format) -> Result<Box<dyn Kernel>> {
    Err(Error::Instantiation {
        name: "broken".into(),
        reason: "no DSP today".into(),
    })
}

/// A kernel without any parameters.
struct Silence;

impl Kernel for Silence {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &[]
    }

    fn set_parameter(&mut self, _address: ParameterAddress, _value: f32) {}

    fn parameter(&self, _address: ParameterAddress) -> f32 {
        0.0
    }

    fn process(&mut self, _ctx: &ProcessContext, _inputs: &[Input], outputs: &mut [Buffer]) {
        for buffer in outputs.iter_mut() {
            buffer.iter_mut().for_each(|s| *s = 0.0);
        }
    }
}

fn silence_factory(_format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(Silence))
}

#[test]
fn invalid_configs_are_rejected() {
    common::init_tracing();
    let bad = [
        EngineConfig::default().with_sample_rate(0),
        EngineConfig::default().with_channels(0),
        EngineConfig::default().with_channels(9),
        EngineConfig::default().with_message_queue_size(0),
        EngineConfig::default().with_event_queue_size(0),
    ];
    for config in bad {
        assert!(matches!(Engine::new(config), Err(Error::InvalidConfig(_))));
    }
}

#[test]
fn format_is_shared_and_fixed() {
    common::init_tracing();
    let engine = Engine::new(EngineConfig::default().with_sample_rate(48000).with_channels(1)).unwrap();
    assert_eq!(engine.format(), Format::new(48000, 1));
    assert_eq!(engine.config().message_queue_size, 64);
}

#[test]
fn registration_is_idempotent() {
    let mut engine = engine();
    let description = ComponentDescription {
        component_type: ComponentType::Effect,
        sub_type: FourCC::new(b"test"),
        manufacturer: FourCC::new(b"Demo"),
    };

    assert!(engine.register_unit(description, "first", 1, silence_factory));
    assert!(!engine.register_unit(description, "second", 2, failing_factory));

    assert!(engine.is_registered(&description));
    assert_eq!(engine.registration(&description), Some(("first", 1)));
    assert!(engine.instantiate(&description).is_ok());
}

#[test]
fn nodes_register_their_units() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let _resonator = StringResonator::new(&mut engine, &mut osc);
    let mut other = Oscillator::new(&mut engine);
    let _again = StringResonator::new(&mut engine, &mut other);

    assert!(engine.is_registered(&string_resonator::DESCRIPTION));
    assert_eq!(
        string_resonator::DESCRIPTION.sub_type.as_u32(),
        u32::from_be_bytes(*b"stre")
    );
}

#[test]
fn unregistered_components_fail_to_instantiate() {
    let engine = engine();
    let description = ComponentDescription::effect(b"none");
    assert!(matches!(
        engine.instantiate(&description),
        Err(Error::ComponentNotRegistered(d)) if d == description
    ));
}

#[test]
fn failed_instantiation_leaves_the_node_inert() {
    let mut engine = engine();
    engine.register_unit(string_resonator::DESCRIPTION, "broken", 1, failing_factory);

    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);

    assert!(resonator.as_ref().is_inert());
    assert!(resonator.parameter_tree().is_none());
    assert!(!resonator.is_started());
    // No dangling edge toward a unit that doesn't exist
    assert!(osc.as_ref().connection_points().is_empty());

    // Setters still clamp and cache, they just go nowhere
    resonator.set_feedback(3.0);
    assert_eq!(resonator.feedback(), 1.0);
    resonator.ramp_feedback(0.0, 64);
    resonator.sync();
    assert_eq!(resonator.feedback(), 1.0);

    // Downstream nodes build fine; the inert input just isn't wired
    let delay = Delay::new(&mut engine, &mut resonator);
    assert_eq!(engine.input_count(delay.as_ref().unit().unwrap()), 0);
    engine.set_output(&mut resonator);
    assert_eq!(engine.input_count(engine.output()), 0);
}

#[test]
#[should_panic(expected = "never instantiated")]
fn starting_an_inert_automated_node_panics() {
    let mut engine = engine();
    engine.register_unit(string_resonator::DESCRIPTION, "broken", 1, failing_factory);

    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    resonator.start();
}

#[test]
fn missing_tree_entries_are_skipped() {
    let mut engine = engine();
    engine.register_unit(panner::DESCRIPTION, "silent", 1, silence_factory);

    let mut osc = Oscillator::new(&mut engine);
    let mut panner = Panner::new(&mut engine, &mut osc);
    assert!(!panner.as_ref().is_inert());
    assert!(panner.parameter_tree().unwrap().parameter("pan").is_none());

    panner.set_pan(0.5);
    panner.ramp_pan(-0.5, 64);
    assert_eq!(panner.pan(), 0.5);
}

#[test]
fn blocks_are_counted() {
    let mut engine = engine();
    assert_eq!(engine.blocks_processed(), 0);
    for _ in 0..3 {
        engine.process();
    }
    assert_eq!(engine.blocks_processed(), 3);
}
