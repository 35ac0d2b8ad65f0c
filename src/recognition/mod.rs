/*!
 * Speech dictation sessions.
 *
 * The platform recognizer is injected through `RecognizerFactory`; this
 * module only tracks which session owns which channel and turns final
 * transcripts into state updates.
 */

pub mod session;
pub mod hub;

pub use session::{
    RecognitionChannel, RecognitionEvent, RecognitionMode, RecognitionResult, RecognitionTarget,
    RecognitionUpdate, Recognizer, RecognizerFactory, RecognizerSettings, SessionTag,
    UnsupportedRecognizer,
};
pub use hub::{ChannelState, RecognitionHub};
