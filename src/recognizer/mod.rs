//! Contract with the external speech engine, its error taxonomy, and the
//! glue that feeds engine output into the matcher and session manager.

pub mod adapter;
pub mod error;
pub mod pipeline;

pub use adapter::{RecognizerAdapter, RecognizerEvent, DEFAULT_FINAL_CONFIDENCE};
pub use error::{RecognitionError, RecognitionErrorKind};
pub use pipeline::{PipelineOutput, VoicePipeline, DEFAULT_CONFIRMATION_THRESHOLD};
