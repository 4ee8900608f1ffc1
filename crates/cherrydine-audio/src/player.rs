use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Errors that can occur while playing the notification cue.
#[derive(Debug, thiserror::Error)]
pub enum CueError {
    /// The host reports no default output device.
    #[error("no output device available")]
    NoOutputDevice,
    /// The device's default output configuration uses a sample format the
    /// cue is not rendered in.
    #[error("unsupported output sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),
    /// Failed to obtain the device's default output stream configuration.
    #[error("failed to build device config: {0}")]
    BuildStreamConfig(#[from] cpal::DefaultStreamConfigError),
    /// Failed to construct an output audio stream.
    #[error("failed to build device output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    /// The stream was built but refused to start, e.g. because of the
    /// platform's autoplay policy.
    #[error("failed to start playback: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Something that can play the notification cue.
pub trait CuePlayer {
    /// Plays the cue from its start. A cue still playing is cut off.
    fn play(&mut self) -> Result<(), CueError>;
}

/// [`CuePlayer`] playing the chime on the host's default output device.
pub struct OutputCuePlayer {
    device: Option<cpal::Device>,
    volume: f32,
    active_stream: Option<cpal::Stream>,
}

impl OutputCuePlayer {
    /// Creates a player for the default output device of the default host.
    /// A missing device is only reported when playback is attempted.
    pub fn new(volume: f32) -> Self {
        let device = cpal::default_host().default_output_device();
        if device.is_none() {
            log::warn!("No default output device, notification cues will be silent");
        }
        Self {
            device,
            volume,
            active_stream: None,
        }
    }
}

impl CuePlayer for OutputCuePlayer {
    fn play(&mut self) -> Result<(), CueError> {
        let device = self.device.as_ref().ok_or(CueError::NoOutputDevice)?;
        let supported_config = device.default_output_config()?;
        if supported_config.sample_format() != cpal::SampleFormat::F32 {
            return Err(CueError::UnsupportedFormat(supported_config.sample_format()));
        }

        let channels = supported_config.channels() as usize;
        let config: cpal::StreamConfig = supported_config.into();
        let samples = crate::cue::chime(config.sample_rate, self.volume);

        let mut position = 0usize;
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    frame.fill(samples.get(position).copied().unwrap_or(0.0));
                    position += 1;
                }
            },
            |error| log::error!("Notification cue stream failed: {error}"),
            None,
        )?;
        stream.play()?;

        // dropping the previous stream stops it, so every cue starts over
        self.active_stream = Some(stream);
        Ok(())
    }
}
