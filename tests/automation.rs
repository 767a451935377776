mod common;

use approx::assert_relative_eq;

use knoten::nodes::{Oscillator, StringResonator, Toggleable};
use knoten::ParameterEvent;

use common::{engine, render};

#[test]
fn observers_never_see_their_own_writes() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);

    let tree = resonator.parameter_tree_mut().unwrap();
    let host = tree.add_observer();
    let editor = tree.add_observer();
    let feedback = tree.parameter("feedback").unwrap();

    tree.set_value(feedback, 7.0, host);

    assert_eq!(tree.poll(host).count(), 0);
    let seen: Vec<ParameterEvent> = tree.poll(editor).collect();
    assert_eq!(
        seen,
        vec![ParameterEvent {
            address: feedback,
            value: 1.0
        }]
    );
    // Drained
    assert_eq!(tree.poll(editor).count(), 0);

    tree.remove_observer(editor);
    tree.set_value(feedback, 0.5, host);
    assert_eq!(tree.poll(editor).count(), 0);
}

#[test]
fn host_automation_updates_the_cached_value() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);

    let tree = resonator.parameter_tree_mut().unwrap();
    let host = tree.add_observer();
    let frequency = tree.parameter("fundamentalFrequency").unwrap();
    tree.set_value(frequency, 440.0, host);

    // Nothing changes until the node syncs
    assert_eq!(resonator.fundamental_frequency(), 100.0);
    resonator.sync();
    assert_eq!(resonator.fundamental_frequency(), 440.0);
}

#[test]
fn node_writes_do_not_echo_back() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);

    resonator.set_feedback(0.3);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.3);

    let tree = resonator.parameter_tree().unwrap();
    let address = tree.parameter("feedback").unwrap();
    assert_relative_eq!(tree.value(address).unwrap(), 0.3f32);
}

#[test]
fn ramps_arrive_through_sync() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);
    osc.start();

    resonator.ramp_feedback(0.5, 128);
    assert_eq!(resonator.feedback(), 0.95);

    render(&mut engine, 1);
    resonator.sync();
    assert_relative_eq!(resonator.feedback(), 0.725, epsilon = 1e-6);

    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.5);

    // Finished ramps go quiet
    render(&mut engine, 2);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.5);
}

#[test]
fn ramp_targets_are_clamped() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);

    resonator.ramp_fundamental_frequency(1.0e6, 64);
    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.fundamental_frequency(), 10000.0);
}

#[test]
fn ramps_still_run_while_bypassed() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);

    resonator.stop();
    resonator.ramp_feedback(0.0, 64);
    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.0);
    assert!(resonator.is_stopped());
}

#[test]
fn set_during_ramp_wins_after_sync() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);

    resonator.ramp_feedback(0.0, 640);
    render(&mut engine, 3);
    resonator.set_feedback(0.8);
    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.8);

    let tree = resonator.parameter_tree().unwrap();
    let address = tree.parameter("feedback").unwrap();
    assert_relative_eq!(tree.value(address).unwrap(), 0.8f32);

    // The ramp is gone for good
    render(&mut engine, 4);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.8);
}

#[test]
fn set_during_ramp_wins_over_progress_already_delivered() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);
    let host = resonator.parameter_tree_mut().unwrap().add_observer();

    resonator.ramp_feedback(0.0, 640);
    render(&mut engine, 3);
    // Another observer polling moves ramp progress into every mailbox
    let seen = resonator.parameter_tree_mut().unwrap().poll(host).count();
    assert_eq!(seen, 1);

    resonator.set_feedback(0.8);
    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.feedback(), 0.8);
}

#[test]
fn host_write_during_ramp_cancels_it() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);

    resonator.ramp_feedback(0.0, 640);
    render(&mut engine, 3);

    let tree = resonator.parameter_tree_mut().unwrap();
    let host = tree.add_observer();
    let feedback = tree.parameter("feedback").unwrap();
    tree.set_value(feedback, 0.8, host);

    render(&mut engine, 1);
    resonator.sync();
    assert_relative_eq!(resonator.feedback(), 0.8, epsilon = 1e-6);

    render(&mut engine, 4);
    resonator.sync();
    assert_relative_eq!(resonator.feedback(), 0.8, epsilon = 1e-6);

    // The host hears nothing more from the cancelled ramp
    let tree = resonator.parameter_tree_mut().unwrap();
    assert_eq!(tree.poll(host).count(), 0);
    assert_relative_eq!(tree.value(feedback).unwrap(), 0.8f32);
}

#[test]
fn a_new_ramp_replaces_one_in_flight() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);
    engine.set_output(&mut resonator);

    resonator.ramp_feedback(0.0, 6400);
    render(&mut engine, 1);
    resonator.ramp_feedback(1.0, 64);
    render(&mut engine, 1);
    resonator.sync();
    assert_eq!(resonator.feedback(), 1.0);
}

#[test]
fn unpolled_mailboxes_keep_only_the_latest_value() {
    let mut engine = engine();
    let mut osc = Oscillator::new(&mut engine);
    let mut resonator = StringResonator::new(&mut engine, &mut osc);

    let tree = resonator.parameter_tree_mut().unwrap();
    let host = tree.add_observer();
    let editor = tree.add_observer();
    let feedback = tree.parameter("feedback").unwrap();
    let frequency = tree.parameter("fundamentalFrequency").unwrap();

    for i in 0..1000 {
        tree.set_value(feedback, i as f32 / 1000.0, host);
    }
    tree.set_value(frequency, 220.0, host);

    let seen: Vec<ParameterEvent> = tree.poll(editor).collect();
    assert_eq!(
        seen,
        vec![
            ParameterEvent {
                address: feedback,
                value: 0.999
            },
            ParameterEvent {
                address: frequency,
                value: 220.0
            },
        ]
    );

    resonator.sync();
    assert_relative_eq!(resonator.feedback(), 0.999, epsilon = 1e-6);
    assert_eq!(resonator.fundamental_frequency(), 220.0);
}
