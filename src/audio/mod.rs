pub mod backend;
pub mod decode;
pub mod file;
pub mod mic;
pub mod resample;
pub mod utterance;
pub mod wav;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use decode::DecodedAudio;
pub use file::FileBackend;
pub use mic::{list_input_devices, MicBackend};
pub use utterance::UtteranceBuffer;
pub use wav::write_temp_wav;
