use std::f32::consts::TAU;

/// Pitches of the two notes of the chime, in Hz.
const NOTES: [f32; 2] = [880.0, 1318.5];

/// Length of each note in milliseconds.
const NOTE_MILLISECONDS: u32 = 140;

/// How fast a note decays; larger is shorter.
const DECAY: f32 = 9.0;

/// Converts a duration in milliseconds to the equivalent number of audio
/// samples at the given sample rate.
pub(crate) fn milliseconds_to_samples(milliseconds: u32, sample_rate: u32) -> usize {
    ((sample_rate as u64 * milliseconds as u64) / 1000) as usize
}

/// Renders the notification chime as mono samples in range `[-volume, volume]`.
///
/// Each note starts with a short linear attack to avoid a click and then
/// decays exponentially.
pub fn chime(sample_rate: u32, volume: f32) -> Vec<f32> {
    let volume = volume.clamp(0.0, 1.0);
    let note_samples = milliseconds_to_samples(NOTE_MILLISECONDS, sample_rate);
    let attack_samples = (note_samples / 50).max(1);

    let mut samples = Vec::with_capacity(note_samples * NOTES.len());
    for frequency in NOTES {
        for i in 0..note_samples {
            let t = i as f32 / sample_rate as f32;
            let attack = (i as f32 / attack_samples as f32).min(1.0);
            let envelope = attack * (-DECAY * t).exp();
            samples.push((TAU * frequency * t).sin() * envelope * volume);
        }
    }
    samples
}
