//! Sound effects
//!
//! Every clip is a handful of sine tones synthesized on the fly, played
//! to completion before returning.

use log::debug;
#[cfg(feature = "audio")]
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    RoundStart,
    Bonus,
    Wall,
    Exit,
    GameOver,
}

impl Clip {
    /// Notes of the clip as (frequency in Hz, length in ms)
    pub fn notes(&self) -> &'static [(f32, u64)] {
        match self {
            Clip::RoundStart => &[(392.0, 90), (523.0, 90), (659.0, 140)],
            Clip::Bonus => &[(880.0, 60), (1175.0, 90)],
            Clip::Wall => &[(140.0, 120)],
            Clip::Exit => &[(523.0, 80), (659.0, 80), (784.0, 80), (1047.0, 180)],
            Clip::GameOver => &[(440.0, 180), (349.0, 180), (262.0, 320)],
        }
    }
}

pub struct SoundManager {
    #[cfg(feature = "audio")]
    output: Option<(rodio::OutputStream, rodio::OutputStreamHandle)>,
}

impl SoundManager {
    #[cfg(feature = "audio")]
    pub fn new(mute: bool) -> Self {
        if mute {
            return SoundManager { output: None };
        }
        let output = match rodio::OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("No audio output, playing silently: {e}");
                None
            }
        };
        SoundManager { output }
    }

    #[cfg(not(feature = "audio"))]
    pub fn new(mute: bool) -> Self {
        debug!("Built without audio support (mute={mute})");
        SoundManager {}
    }

    /// Blocks until the clip is over.
    #[cfg(feature = "audio")]
    pub fn play(&self, clip: Clip) {
        use std::time::Duration;

        use rodio::source::{SineWave, Source};

        debug!("Playing {:?}", clip);
        let Some((_, handle)) = &self.output else {
            return;
        };
        let sink = match rodio::Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("Could not play {:?}: {e}", clip);
                return;
            }
        };
        for &(frequency, millis) in clip.notes() {
            sink.append(
                SineWave::new(frequency)
                    .take_duration(Duration::from_millis(millis))
                    .amplify(0.20),
            );
        }
        sink.sleep_until_end();
    }

    #[cfg(not(feature = "audio"))]
    pub fn play(&self, clip: Clip) {
        debug!("Playing {:?} ({} notes, no audio)", clip, clip.notes().len());
    }
}
