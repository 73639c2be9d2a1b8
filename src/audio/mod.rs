pub mod source;

pub use source::{BufferSource, SampleSource, WavFileSource, downmix};
