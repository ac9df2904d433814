// Conversation: transcript ownership, the one-in-flight ask lifecycle,
// shortcut prompts and the audible cues fired on transitions.

pub mod controller;
pub mod cues;
pub mod input;
pub mod shortcuts;
