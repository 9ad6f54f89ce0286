#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Win,
    Fail,
    Click,
    RoundTransition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// A short synthesized tone: a pitch ramp with an exponential fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub gain: f32,
    pub duration_ms: u32,
}

impl SoundCue {
    pub fn tone(self) -> Tone {
        match self {
            SoundCue::Win => Tone {
                waveform: Waveform::Sine,
                start_hz: 600.0,
                end_hz: 800.0,
                gain: 0.5,
                duration_ms: 500,
            },
            SoundCue::Fail => Tone {
                waveform: Waveform::Square,
                start_hz: 300.0,
                end_hz: 200.0,
                gain: 0.4,
                duration_ms: 400,
            },
            SoundCue::Click => Tone {
                waveform: Waveform::Triangle,
                start_hz: 1000.0,
                end_hz: 1000.0,
                gain: 0.3,
                duration_ms: 100,
            },
            SoundCue::RoundTransition => Tone {
                waveform: Waveform::Sine,
                start_hz: 500.0,
                end_hz: 700.0,
                gain: 0.4,
                duration_ms: 300,
            },
        }
    }
}

/// Audio backend. Playback is fire-and-forget; failures stay inside the sink.
pub trait SoundSink {
    fn play(&self, cue: SoundCue, volume: f32);
}

pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&self, _cue: SoundCue, _volume: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rises_and_fail_falls() {
        let win = SoundCue::Win.tone();
        let fail = SoundCue::Fail.tone();
        assert!(win.end_hz > win.start_hz);
        assert!(fail.end_hz < fail.start_hz);
    }

    #[test]
    fn test_click_is_shortest() {
        let click = SoundCue::Click.tone().duration_ms;
        for cue in [SoundCue::Win, SoundCue::Fail, SoundCue::RoundTransition] {
            assert!(cue.tone().duration_ms > click);
        }
    }
}
