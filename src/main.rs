//! luma: headless sequencer driver.
//!
//! Builds a small demo song in code and steps it in fixed slices, the way
//! an audio callback would, printing every slice's events.
//!
//! Usage:
//!   luma [--bpm 120] [--slice-ms 500] [--slices 30] [--sample-rate 44100]
//!
//! Set `RUST_LOG=debug` to see track lifecycle logging.

use std::env;
use std::process;
use std::str::FromStr;

use luma_engine::{Sequencer, SequencerConfig, TimedEvent};
use luma_ir::{Note, Pattern, PitchClass, RepeatCount, Scale, Tempo};

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

const MAX_EVENTS_PER_SLICE: usize = 512;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: luma [--bpm N] [--slice-ms N] [--slices N] [--sample-rate N]");
        return;
    }

    let bpm: f64 = flag_value(&args, "--bpm", 120.0);
    let slice_ms: f64 = flag_value(&args, "--slice-ms", 500.0);
    let slices: u32 = flag_value(&args, "--slices", 30);
    let sample_rate: u32 = flag_value(&args, "--sample-rate", 44100);

    let tempo = Tempo::new(bpm).unwrap_or_else(|e| {
        eprintln!("Invalid tempo: {}", e);
        process::exit(1);
    });
    if !(slice_ms.is_finite() && slice_ms > 0.0) {
        eprintln!("--slice-ms must be a positive number of milliseconds");
        process::exit(1);
    }

    let mut seq = demo_song(tempo);
    println!("Tempo:    {} BPM ({} ms per beat)", tempo.bpm(), tempo.ms_per_beat());
    for (id, track) in seq.tracks().iter().enumerate() {
        println!("Track {}:  {:<8} {}", id, track.name, track.pattern());
    }
    println!();

    let mut events: Vec<TimedEvent> = Vec::with_capacity(MAX_EVENTS_PER_SLICE);
    for slice in 0..slices {
        println!("--- slice {} ({} ms) ---", slice, slice_ms);
        seq.advance(slice_ms, &mut events);
        for event in &events {
            let name = seq.track(event.track).map_or("", |t| t.name.as_str());
            println!(
                "{}  frame {:>6}  {}",
                event,
                event.frame_offset(sample_rate),
                name
            );
        }
        events.clear();

        if seq.is_finished() {
            println!();
            println!("Done after {} slices.", slice + 1);
            return;
        }
    }

    seq.all_notes_off(&mut events);
    if !events.is_empty() {
        println!("--- stop ---");
        for event in &events {
            println!("{}", event);
        }
    }
}

/// Parse the value following `flag`, or fall back to `default`.
fn flag_value<T: FromStr>(args: &[String], flag: &str, default: T) -> T {
    match args.iter().position(|a| a == flag).map(|i| args.get(i + 1)) {
        None => default,
        Some(Some(raw)) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value for {}: {}", flag, raw);
            process::exit(1);
        }),
        Some(None) => {
            eprintln!("Missing value for {}", flag);
            process::exit(1);
        }
    }
}

/// A melody, a bass line and an echo voice that collides with the melody.
fn demo_song(tempo: Tempo) -> Sequencer {
    let major = |octave, degree, beats| Note::new(PitchClass::new(Scale::CMajor, octave, degree), 100, beats);
    let minor = |octave, degree, beats| Note::new(PitchClass::new(Scale::CMinor, octave, degree), 90, beats);

    let mut phrase = Pattern::new().with_repeat(2);
    for degree in [0, 2, 4, 2] {
        phrase.add_note(major(4, degree, 1.0));
    }
    let mut melody = Pattern::new().with_repeat(2);
    melody.add_pattern(&phrase);
    melody.add_note(Note::rest(2.0));

    let mut bass = Pattern::new().with_repeat(5);
    bass.add_note(minor(2, 0, 2.0));
    bass.add_note(minor(2, 4, 2.0));

    let mut echo = Pattern::new().with_repeat(RepeatCount::Finite(3));
    echo.add_note(Note::rest(3.5));
    echo.add_note(major(4, 0, 1.5));

    let mut seq = Sequencer::new(SequencerConfig::default().with_tempo(tempo));
    seq.add_named_track("melody", melody);
    seq.add_named_track("bass", bass);
    seq.add_named_track("echo", echo);
    seq
}
