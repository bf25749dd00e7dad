pub mod registration;
pub mod result_recording;
