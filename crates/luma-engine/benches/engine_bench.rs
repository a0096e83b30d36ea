use criterion::{black_box, criterion_group, criterion_main, Criterion};
use luma_engine::{Sequencer, SequencerConfig, TimedEvent};
use luma_ir::{Note, Pattern, PitchClass, RepeatCount, Scale};

/// Eight looping tracks of sixteenth notes across two octaves.
fn busy_sequencer() -> Sequencer {
    let mut seq = Sequencer::new(SequencerConfig::default());
    for track in 0..8 {
        let mut pattern = Pattern::new().with_repeat(RepeatCount::Infinite);
        for step in 0..16 {
            let pc = PitchClass::new(Scale::CMajor, 3 + (track % 2) as i8, (step + track) % 7);
            pattern.add_note(Note::new(pc, 100, 0.25));
        }
        seq.add_track(pattern);
    }
    seq
}

fn bench_advance(c: &mut Criterion) {
    // 512 frames at 44.1 kHz
    let block_ms = 512.0 / 44100.0 * 1000.0;

    c.bench_function("advance_one_block_8_tracks", |b| {
        let mut seq = busy_sequencer();
        let mut out: Vec<TimedEvent> = Vec::with_capacity(256);
        b.iter(|| {
            out.clear();
            seq.advance(black_box(block_ms), &mut out);
            black_box(out.len())
        })
    });

    c.bench_function("advance_ten_seconds_8_tracks", |b| {
        b.iter(|| {
            let mut seq = busy_sequencer();
            black_box(seq.advance_collect(black_box(10_000.0)).len())
        })
    });
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
