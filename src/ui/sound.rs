/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_step: [Arc<Vec<u8>>; 2],
        sfx_chop: Arc<Vec<u8>>,
        sfx_eat: Arc<Vec<u8>>,
        sfx_drink: Arc<Vec<u8>>,
        sfx_hit: Arc<Vec<u8>>,
        sfx_exit: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
        step_toggle: std::cell::Cell<bool>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            // Two footstep variants, alternated so walking doesn't drone.
            let sfx_step = [
                Arc::new(make_wav(&gen_step(170.0))),
                Arc::new(make_wav(&gen_step(195.0))),
            ];
            let sfx_chop = Arc::new(make_wav(&gen_chop()));
            let sfx_eat = Arc::new(make_wav(&gen_eat()));
            let sfx_drink = Arc::new(make_wav(&gen_drink()));
            let sfx_hit = Arc::new(make_wav(&gen_hit()));
            let sfx_exit = Arc::new(make_wav(&gen_exit()));
            let sfx_game_over = Arc::new(make_wav(&gen_game_over()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_step,
                sfx_chop,
                sfx_eat,
                sfx_drink,
                sfx_hit,
                sfx_exit,
                sfx_game_over,
                step_toggle: std::cell::Cell::new(false),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_step(&self) {
            let which = self.step_toggle.get();
            self.step_toggle.set(!which);
            self.play(&self.sfx_step[which as usize]);
        }

        pub fn play_chop(&self) { self.play(&self.sfx_chop); }
        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_drink(&self) { self.play(&self.sfx_drink); }
        pub fn play_hit(&self) { self.play(&self.sfx_hit); }
        pub fn play_exit(&self) { self.play(&self.sfx_exit); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Footstep: short muffled tap, mostly noise with a low thump
    fn gen_step(thump_freq: f32) -> Vec<f32> {
        let duration = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 54321;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let thump = (ti * thump_freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(1.5);
                (thump * 0.6 + noise * 0.4) * env * 0.2
            })
            .collect()
    }

    /// Chop: harsh noise burst with descending pitch, like an axe on wood
    fn gen_chop() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 99991;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 150.0 + (1.0 - t) * 250.0; // descending
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.3 + noise * 0.7) * env * 0.3
            })
            .collect()
    }

    /// Eat: two quick munching blips
    fn gen_eat() -> Vec<f32> {
        let notes = [523.0_f32, 659.0]; // C5, E5
        let note_dur = 0.06;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                // Square-ish wave (sine + 3rd harmonic) for retro feel
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Drink: bubbly ascending slide
    fn gen_drink() -> Vec<f32> {
        let duration = 0.18;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 400.0 + t * 600.0; // 400Hz → 1000Hz
                let ti = i as f32 / SAMPLE_RATE as f32;
                let wobble = 1.0 + 0.04 * (ti * 30.0 * 2.0 * std::f32::consts::PI).sin();
                let env = (1.0 - t).powf(0.4);
                (ti * freq * wobble * 2.0 * std::f32::consts::PI).sin() * env * 0.22
            })
            .collect()
    }

    /// Enemy hit: harsh low buzz
    fn gen_hit() -> Vec<f32> {
        let duration = 0.16;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let freq = 110.0;
                // Saw-ish: stacked odd harmonics
                let wave = (ti * freq * 2.0 * std::f32::consts::PI).sin() * 0.5
                    + (ti * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (ti * freq * 5.0 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                let env = (1.0 - t).powf(0.5);
                wave * env * 0.35
            })
            .collect()
    }

    /// Exit reached: short ascending fanfare
    fn gen_exit() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0]; // C5→E5→G5→C6
        let note_dur = 0.09;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.28);
            }
        }
        samples
    }

    /// Starvation: slow sad descending tone
    fn gen_game_over() -> Vec<f32> {
        let notes = [392.0_f32, 330.0, 277.0, 220.0]; // G4→E4→C#4→A3
        let note_dur = 0.16;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin();
                samples.push(wave * env * 0.3);
            }
        }
        // Final fade
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_step(&self) {}
    pub fn play_chop(&self) {}
    pub fn play_eat(&self) {}
    pub fn play_drink(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_exit(&self) {}
    pub fn play_game_over(&self) {}
}
