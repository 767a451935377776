use criterion::{black_box, criterion_group, criterion_main, Criterion};

use knoten::nodes::{
    CostelloReverb, Delay, LowPassFilter, Oscillator, Panner, StringResonator, Toggleable,
};
use knoten::{Engine, EngineConfig, Operation};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("Engine.process() oscillator", |b| {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut osc = Oscillator::new(&mut engine);
        engine.set_output(&mut osc);
        osc.start();

        b.iter(|| {
            black_box(engine.process());
        })
    });

    c.bench_function("Engine.process() effect chain", |b| {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut osc = Oscillator::new(&mut engine);
        let mut filter = LowPassFilter::new(&mut engine, &mut osc);
        let mut delay = Delay::new(&mut engine, &mut filter);
        let mut resonator = StringResonator::new(&mut engine, &mut delay);
        let mut reverb = CostelloReverb::new(&mut engine, &mut resonator);
        let mut panner = Panner::new(&mut engine, &mut reverb);
        engine.set_output(&mut panner);
        osc.start();

        b.iter(|| {
            black_box(engine.process());
        })
    });

    c.bench_function("Operation build", |b| {
        b.iter(|| {
            let cutoff = Operation::sine_wave(black_box(1.0), 0.5).scale(500.0, 1000.0);
            let resonance = Operation::sine_wave(0.3, 0.5).abs() * 0.95;
            black_box(Operation::input().moog_ladder_filter(cutoff, resonance) * 3.0)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
