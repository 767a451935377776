#![allow(dead_code)]

use knoten::{Engine, EngineConfig};

/// Surface `tracing` output in failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn engine() -> Engine {
    init_tracing();
    Engine::new(EngineConfig::default()).unwrap()
}

/// Render `blocks` blocks, returning the last one per channel.
pub fn render(engine: &mut Engine, blocks: usize) -> Vec<Vec<f32>> {
    let mut last = Vec::new();
    for _ in 0..blocks {
        last = engine.process().iter().map(|b| b.to_vec()).collect();
    }
    last
}

pub fn peak(channel: &[f32]) -> f32 {
    channel.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}
