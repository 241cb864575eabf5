//! Audio backend: a `rodio` sink driven from a dedicated thread.
//!
//! [`AudioPlayer`] implements [`crate::player::MediaElement`] by forwarding
//! commands to the thread, which answers with position, metadata and
//! end-of-track notifications.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
