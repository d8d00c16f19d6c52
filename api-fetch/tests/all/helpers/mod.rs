
pub use recording_transport::{FailingTransport, RecordingTransport};

pub const API_URL: &str = "http://localhost:8000/api";
