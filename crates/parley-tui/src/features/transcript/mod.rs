//! Transcript feature: the ordered rendering of one conversation.

mod render;
mod state;

pub use render::{line_count, render_transcript};
pub use state::{ScrollMode, ScrollState, TranscriptState};
