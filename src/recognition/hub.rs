use log::{debug, error, info, warn};

use super::session::{
    RecognitionChannel, RecognitionEvent, RecognitionTarget, RecognitionUpdate, Recognizer,
    RecognizerFactory, RecognizerSettings, SessionTag,
};
use crate::errors::RecognitionError;

// @module: Per-channel recognition state machines

/// State of one channel
pub enum ChannelState {
    Idle,
    Listening {
        tag: SessionTag,
        target: RecognitionTarget,
        recognizer: Box<dyn Recognizer>,
    },
    /// Stop requested; results may still arrive until `End`
    Stopping {
        tag: SessionTag,
        target: RecognitionTarget,
    },
}

impl ChannelState {
    fn tag(&self) -> Option<SessionTag> {
        match self {
            ChannelState::Idle => None,
            ChannelState::Listening { tag, .. } | ChannelState::Stopping { tag, .. } => Some(*tag),
        }
    }

    fn target(&self) -> Option<&RecognitionTarget> {
        match self {
            ChannelState::Idle => None,
            ChannelState::Listening { target, .. } | ChannelState::Stopping { target, .. } => Some(target),
        }
    }
}

/// Owns the three dictation channels.
///
/// Starting a session on a channel first tears down whatever that channel
/// was doing. Every session gets a new generation number, so a late `End`
/// from a replaced session cannot close its successor.
pub struct RecognitionHub {
    factory: Box<dyn RecognizerFactory>,
    language: String,
    generation: u64,
    channels: [ChannelState; 3],
}

impl RecognitionHub {
    pub fn new(factory: Box<dyn RecognizerFactory>, language: impl Into<String>) -> Self {
        Self {
            factory,
            language: language.into(),
            generation: 0,
            channels: [ChannelState::Idle, ChannelState::Idle, ChannelState::Idle],
        }
    }

    pub fn is_supported(&self) -> bool {
        self.factory.is_supported()
    }

    pub fn state(&self, channel: RecognitionChannel) -> &ChannelState {
        &self.channels[channel.slot()]
    }

    /// True while the channel is listening for this exact target
    pub fn is_listening(&self, target: &RecognitionTarget) -> bool {
        match self.state(target.channel()) {
            ChannelState::Listening { target: active, .. } => active == target,
            _ => false,
        }
    }

    /// Target currently listened to on a channel
    pub fn active_target(&self, channel: RecognitionChannel) -> Option<&RecognitionTarget> {
        match self.state(channel) {
            ChannelState::Listening { target, .. } => Some(target),
            _ => None,
        }
    }

    fn settings_for(&self, channel: RecognitionChannel) -> RecognizerSettings {
        RecognizerSettings {
            language: self.language.clone(),
            continuous: channel.mode() == super::RecognitionMode::Continuous,
            interim_results: false,
        }
    }

    /// Start dictating into `target`
    pub fn start(&mut self, target: RecognitionTarget) -> Result<SessionTag, RecognitionError> {
        if !self.factory.is_supported() {
            warn!("Speech recognition requested but not supported");
            return Err(RecognitionError::Unsupported);
        }

        let channel = target.channel();
        self.cancel(channel);

        self.generation += 1;
        let tag = SessionTag {
            channel,
            generation: self.generation,
        };
        let settings = self.settings_for(channel);

        let mut recognizer = self.factory.create(&settings, tag)?;
        if let Err(e) = recognizer.start() {
            error!("Failed to start {} recognition: {}", channel, e);
            return Err(RecognitionError::StartFailed(e));
        }

        info!("Listening on {} channel (session {})", channel, tag.generation);
        self.channels[channel.slot()] = ChannelState::Listening {
            tag,
            target,
            recognizer,
        };
        Ok(tag)
    }

    /// Ask the channel's recognizer to stop; the session closes on `End`
    pub fn stop(&mut self, channel: RecognitionChannel) {
        let slot = channel.slot();
        let state = std::mem::replace(&mut self.channels[slot], ChannelState::Idle);
        self.channels[slot] = match state {
            ChannelState::Listening { tag, target, mut recognizer } => {
                recognizer.stop();
                debug!("Stopping {} channel (session {})", channel, tag.generation);
                ChannelState::Stopping { tag, target }
            }
            other => other,
        };
    }

    /// Stop and forget the channel's session immediately, whatever its state
    fn cancel(&mut self, channel: RecognitionChannel) {
        let slot = channel.slot();
        if let ChannelState::Listening { mut recognizer, tag, .. } =
            std::mem::replace(&mut self.channels[slot], ChannelState::Idle)
        {
            recognizer.stop();
            debug!("Cancelled {} channel (session {})", channel, tag.generation);
        }
    }

    /// Cancel all channels, e.g. before the whole script is replaced
    pub fn cancel_all(&mut self) {
        for channel in RecognitionChannel::ALL {
            self.cancel(channel);
        }
    }

    /// Cancel every channel writing into a scene that is going away
    pub fn cancel_scene(&mut self, scene_id: &str) {
        for channel in RecognitionChannel::ALL {
            let targets_scene = self
                .state(channel)
                .target()
                .is_some_and(|t| t.scene_id() == scene_id);
            if targets_scene {
                self.cancel(channel);
            }
        }
    }

    /// Cancel every channel writing into a dialogue that is going away
    pub fn cancel_dialogue(&mut self, dialogue_id: &str) {
        for channel in RecognitionChannel::ALL {
            let targets_dialogue = self
                .state(channel)
                .target()
                .is_some_and(|t| t.dialogue_id() == Some(dialogue_id));
            if targets_dialogue {
                self.cancel(channel);
            }
        }
    }

    /// Feed a platform callback; returns the text to apply, if any
    pub fn handle_event(&mut self, tag: SessionTag, event: RecognitionEvent) -> Option<RecognitionUpdate> {
        let slot = tag.channel.slot();
        if self.channels[slot].tag() != Some(tag) {
            debug!("Ignoring stale {} event from session {}", tag.channel, tag.generation);
            return None;
        }

        match event {
            RecognitionEvent::Result { result_index, results } => {
                let text: String = results
                    .iter()
                    .skip(result_index)
                    .filter(|r| r.is_final)
                    .map(|r| r.transcript.as_str())
                    .collect();
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                self.channels[slot]
                    .target()
                    .map(|target| target.update(text.to_string()))
            }
            RecognitionEvent::End => {
                debug!("{} session {} ended", tag.channel, tag.generation);
                self.channels[slot] = ChannelState::Idle;
                None
            }
            RecognitionEvent::Error(message) => {
                warn!("{} recognition error: {}", tag.channel, message);
                self.channels[slot] = ChannelState::Idle;
                None
            }
        }
    }
}
