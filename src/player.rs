//! Player core: the state behind the playlist panel and now-playing card.
//!
//! [`Player`] owns all player state and drives a [`MediaElement`]. It never
//! blocks; the backend answers through [`MediaEvent`]s that the runtime feeds
//! back in with [`Player::handle_media_event`].

mod flyout;
mod media;
mod model;
mod state;

pub use media::*;
pub use model::*;
pub use state::*;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
