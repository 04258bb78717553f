mod extract;
mod model;
mod probe;

pub use extract::extract_video_data;
pub use model::VideoMetadata;
pub use probe::{check_transcript_availability, extract_video_id, find_channel_name};
