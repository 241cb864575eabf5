use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::fake::{FakeMedia, MediaCall};
use super::*;
use crate::catalog::{Catalog, Track};

fn t(name: &str) -> Track {
    Track {
        source: PathBuf::from(format!("/music/{name}.mp3")),
        title: name.into(),
        artist: Some("Artist".into()),
        cover: None,
    }
}

fn catalog(n: usize) -> Catalog {
    Catalog::new((0..n).map(|i| t(&format!("track{i}"))).collect()).unwrap()
}

fn player(n: usize) -> Player<FakeMedia> {
    let mut p = Player::new(catalog(n), FakeMedia::default(), PlayerOptions::default());
    p.media_mut().take_calls();
    p
}

fn send(p: &mut Player<FakeMedia>, kind: MediaEventKind) {
    let event = p.media().event(kind);
    p.handle_media_event(event);
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[test]
fn new_player_loads_first_track_paused() {
    let mut p = Player::new(catalog(3), FakeMedia::default(), PlayerOptions::default());
    assert_eq!(
        p.media_mut().take_calls(),
        vec![
            MediaCall::SetVolume(0.5),
            MediaCall::Load(PathBuf::from("/music/track0.mp3")),
        ]
    );
    assert_eq!(p.state().current_track_index, 0);
    assert!(!p.state().is_playing);
    assert!(!p.is_volume_visible());
}

#[test]
fn next_from_last_track_wraps_to_first_and_plays() {
    let mut p = player(3);
    assert!(p.select_track(2));
    p.media_mut().take_calls();

    p.next();
    assert_eq!(p.state().current_track_index, 0);
    assert!(p.state().is_playing);
    assert_eq!(
        p.media_mut().take_calls(),
        vec![
            MediaCall::Load(PathBuf::from("/music/track0.mp3")),
            MediaCall::Play,
        ]
    );
}

#[test]
fn previous_from_first_track_wraps_to_last() {
    let mut p = player(3);
    p.previous();
    assert_eq!(p.state().current_track_index, 2);
    assert!(p.state().is_playing);
    assert_eq!(p.current_track().title, "track2");
}

#[test]
fn toggle_play_drives_the_media() {
    let mut p = player(2);
    p.toggle_play();
    assert!(p.state().is_playing);
    p.toggle_play();
    assert!(!p.state().is_playing);
    assert_eq!(
        p.media_mut().take_calls(),
        vec![MediaCall::Play, MediaCall::Pause]
    );
}

#[test]
fn track_change_resets_position_and_duration() {
    let mut p = player(2);
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(200) });
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(50) });
    assert_eq!(p.state().progress, 25.0);

    p.next();
    assert_eq!(p.state().current_time, Duration::ZERO);
    assert_eq!(p.state().progress, 0.0);
    assert_eq!(p.state().duration, None);
}

#[test]
fn ended_advances_and_wraps() {
    let mut p = player(2);
    p.toggle_play();
    send(&mut p, MediaEventKind::Ended);
    assert_eq!(p.state().current_track_index, 1);
    send(&mut p, MediaEventKind::Ended);
    assert_eq!(p.state().current_track_index, 0);
    assert!(p.state().is_playing);
}

#[test]
fn ended_on_a_single_track_catalog_replays_it() {
    let mut p = player(1);
    p.toggle_play();
    p.media_mut().take_calls();

    send(&mut p, MediaEventKind::Ended);
    assert_eq!(
        p.media_mut().take_calls(),
        vec![
            MediaCall::Load(PathBuf::from("/music/track0.mp3")),
            MediaCall::Play,
        ]
    );
}

#[test]
fn notifications_from_a_previous_load_are_ignored() {
    let mut p = player(3);
    let stale = p.media().last_load;
    p.next();

    p.handle_media_event(MediaEvent::new(
        stale,
        MediaEventKind::MetadataReady { duration: secs(100) },
    ));
    p.handle_media_event(MediaEvent::new(
        stale,
        MediaEventKind::TimeUpdate { position: secs(40) },
    ));
    p.handle_media_event(MediaEvent::new(stale, MediaEventKind::Ended));

    assert_eq!(p.state().current_track_index, 1);
    assert_eq!(p.state().duration, None);
    assert_eq!(p.state().current_time, Duration::ZERO);
}

#[test]
fn time_update_tracks_progress_when_duration_known() {
    let mut p = player(1);
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(180) });
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(45) });
    assert_eq!(p.state().current_time, secs(45));
    assert_eq!(p.state().progress, 25.0);
}

#[test]
fn progress_stays_zero_without_duration() {
    let mut p = player(1);
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(45) });
    assert_eq!(p.state().current_time, secs(45));
    assert_eq!(p.state().progress, 0.0);

    send(&mut p, MediaEventKind::MetadataReady { duration: Duration::ZERO });
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(46) });
    assert_eq!(p.state().progress, 0.0);
    assert!(!p.state().progress.is_nan());
}

#[test]
fn pointer_down_pauses_and_freezes_position() {
    let mut p = player(1);
    p.toggle_play();
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(100) });
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(10) });
    p.media_mut().take_calls();

    p.seek_pointer_down();
    assert!(p.state().is_seeking());
    assert_eq!(p.media_mut().take_calls(), vec![MediaCall::Pause]);

    p.seek_drag(60.0);
    assert_eq!(p.state().progress, 60.0);
    assert_eq!(p.state().current_time, secs(60));

    send(&mut p, MediaEventKind::TimeUpdate { position: secs(11) });
    assert_eq!(p.state().progress, 60.0);
    assert_eq!(p.state().current_time, secs(60));
    assert!(p.media_mut().take_calls().is_empty());
}

#[test]
fn pointer_up_seeks_and_resumes_when_playing() {
    let mut p = player(1);
    p.toggle_play();
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(200) });
    p.seek_pointer_down();
    p.seek_drag(30.0);
    p.media_mut().take_calls();

    p.seek_pointer_up(50.0);
    assert!(!p.state().is_seeking());
    assert_eq!(p.state().current_time, secs(100));
    assert_eq!(
        p.media_mut().take_calls(),
        vec![MediaCall::SeekTo(secs(100)), MediaCall::Play]
    );

    // Back to following playback.
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(101) });
    assert_eq!(p.state().current_time, secs(101));
}

#[test]
fn pointer_up_stays_paused_when_not_playing() {
    let mut p = player(1);
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(200) });
    p.seek_pointer_down();
    p.media_mut().take_calls();

    p.seek_pointer_up(10.0);
    assert_eq!(
        p.media_mut().take_calls(),
        vec![MediaCall::SeekTo(secs(20))]
    );
}

#[test]
fn pointer_up_without_duration_does_not_seek() {
    let mut p = player(1);
    p.toggle_play();
    p.seek_pointer_down();
    p.seek_drag(40.0);
    assert_eq!(p.state().current_time, Duration::ZERO);
    p.media_mut().take_calls();

    p.seek_pointer_up(40.0);
    assert_eq!(p.media_mut().take_calls(), vec![MediaCall::Play]);
    assert!(!p.state().is_seeking());
    assert_eq!(p.state().progress, 0.0);
    assert_eq!(p.state().current_time, Duration::ZERO);
}

#[test]
fn paused_release_without_duration_keeps_reported_position() {
    let mut p = player(1);
    send(&mut p, MediaEventKind::TimeUpdate { position: secs(12) });
    p.seek_pointer_down();
    p.seek_drag(75.0);
    assert_eq!(p.state().progress, 75.0);

    p.seek_pointer_up(75.0);
    assert!(!p.state().is_seeking());
    assert_eq!(p.state().progress, 0.0);
    assert_eq!(p.state().current_time, secs(12));
}

#[test]
fn toggle_play_while_dragging_defers_to_pointer_up() {
    let mut p = player(1);
    p.toggle_play();
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(100) });
    p.seek_pointer_down();
    p.media_mut().take_calls();

    p.toggle_play();
    assert!(!p.state().is_playing);
    assert!(p.media_mut().take_calls().is_empty());

    p.seek_pointer_up(50.0);
    assert_eq!(
        p.media_mut().take_calls(),
        vec![MediaCall::SeekTo(secs(50))]
    );
}

#[test]
fn drag_and_release_without_press_are_ignored() {
    let mut p = player(1);
    send(&mut p, MediaEventKind::MetadataReady { duration: secs(100) });
    p.seek_drag(70.0);
    p.seek_pointer_up(70.0);
    assert_eq!(p.state().progress, 0.0);
    assert!(p.media_mut().take_calls().is_empty());
}

#[test]
fn seek_buttons_step_by_configured_seconds() {
    let mut p = player(1);
    p.seek_forward();
    p.seek_backward();
    assert_eq!(
        p.media_mut().take_calls(),
        vec![MediaCall::SeekBy(10), MediaCall::SeekBy(-10)]
    );

    let options = PlayerOptions {
        seek_seconds: 5,
        ..PlayerOptions::default()
    };
    let mut p = Player::new(catalog(1), FakeMedia::default(), options);
    p.media_mut().take_calls();
    p.seek_forward();
    assert_eq!(p.media_mut().take_calls(), vec![MediaCall::SeekBy(5)]);
}

#[test]
fn set_volume_clamps_and_unmutes() {
    let mut p = player(1);
    p.set_volume(1.7);
    assert_eq!(p.state().volume, 1.0);
    p.set_volume(-0.2);
    assert_eq!(p.state().volume, 0.0);
    p.set_volume(f32::NAN);
    assert_eq!(p.state().volume, 0.0);

    p.set_volume(0.4);
    p.toggle_mute();
    assert!(p.state().is_muted);
    p.set_volume(0.3);
    assert!(!p.state().is_muted);
    assert_eq!(p.media_mut().take_calls().last(), Some(&MediaCall::SetVolume(0.3)));
}

#[test]
fn toggle_mute_restores_previous_volume() {
    let mut p = player(1);
    p.set_volume(0.7);

    p.toggle_mute();
    assert_eq!(p.state().volume, 0.0);
    assert!(p.state().is_muted);
    assert!(p.state().shows_muted());

    p.toggle_mute();
    assert_eq!(p.state().volume, 0.7);
    assert!(!p.state().is_muted);
}

#[test]
fn toggle_mute_at_zero_volume_restores_default() {
    let mut p = player(1);
    p.set_volume(0.0);
    assert!(!p.state().is_muted);
    assert!(p.state().shows_muted());

    p.toggle_mute();
    assert_eq!(p.state().volume, DEFAULT_VOLUME);
    assert!(!p.state().is_muted);
}

#[test]
fn flyout_stays_visible_when_reentered_before_the_delay() {
    let mut p = player(1);
    let t0 = Instant::now();

    p.volume_pointer_enter();
    assert!(p.is_volume_visible());
    p.volume_pointer_leave(t0 + Duration::from_millis(50));
    assert!(p.volume_hide_pending());
    p.tick(t0 + Duration::from_millis(200));
    p.volume_pointer_enter();
    assert!(!p.volume_hide_pending());

    p.tick(t0 + Duration::from_millis(1000));
    assert!(p.is_volume_visible());
}

#[test]
fn flyout_hides_once_the_delay_elapses() {
    let mut p = player(1);
    let t0 = Instant::now();

    p.volume_pointer_enter();
    p.volume_pointer_leave(t0);
    assert!(!p.tick(t0 + Duration::from_millis(299)));
    assert!(p.is_volume_visible());
    assert!(p.tick(t0 + Duration::from_millis(300)));
    assert!(!p.is_volume_visible());
    assert!(!p.volume_hide_pending());
}

#[test]
fn leaving_a_hidden_flyout_arms_nothing() {
    let mut p = player(1);
    let t0 = Instant::now();
    p.volume_pointer_leave(t0);
    assert!(!p.is_volume_visible());
    assert!(!p.volume_hide_pending());

    p.volume_pointer_enter();
    p.volume_pointer_leave(t0);
    p.tick(t0 + Duration::from_millis(300));
    p.volume_pointer_leave(t0 + Duration::from_millis(400));
    assert!(!p.volume_hide_pending());
}

#[test]
fn flash_volume_shows_then_hides() {
    let mut p = player(1);
    let t0 = Instant::now();
    p.flash_volume(t0);
    assert!(p.is_volume_visible());
    p.tick(t0 + Duration::from_millis(400));
    assert!(!p.is_volume_visible());
}

#[test]
fn selecting_the_current_track_resumes_without_reloading() {
    let mut p = player(3);
    assert!(p.select_track(0));
    assert!(p.state().is_playing);
    assert_eq!(p.media_mut().take_calls(), vec![MediaCall::Play]);

    assert!(p.select_track(0));
    assert!(p.media_mut().take_calls().is_empty());
}

#[test]
fn selecting_out_of_range_is_rejected() {
    let mut p = player(3);
    assert!(!p.select_track(3));
    assert_eq!(p.state().current_track_index, 0);
    assert!(!p.state().is_playing);
}

#[test]
fn shutdown_cancels_the_hide_timer_and_the_subscription() {
    let mut p = player(2);
    let t0 = Instant::now();
    p.volume_pointer_enter();
    p.volume_pointer_leave(t0);
    p.shutdown();
    assert!(!p.volume_hide_pending());
    assert_eq!(p.media_mut().take_calls(), vec![MediaCall::Pause]);

    send(&mut p, MediaEventKind::Ended);
    assert_eq!(p.state().current_track_index, 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any sequence of next/previous keeps the index inside the catalog.
        #[test]
        fn skipping_never_leaves_the_catalog(
            len in 1usize..12,
            start in 0usize..12,
            moves in prop::collection::vec(any::<bool>(), 0..40),
        ) {
            let mut p = player(len);
            p.select_track(start % len);
            for forward in moves {
                if forward { p.next() } else { p.previous() }
                prop_assert!(p.state().current_track_index < len);
            }
        }

        /// Muting twice gives back exactly the volume we started with.
        #[test]
        fn double_toggle_mute_restores_volume(volume in 0.01f32..=1.0) {
            let mut p = player(1);
            p.set_volume(volume);
            p.toggle_mute();
            prop_assert_eq!(p.state().volume, 0.0);
            p.toggle_mute();
            prop_assert_eq!(p.state().volume, volume);
        }

        /// Progress mirrors position / duration while following playback.
        #[test]
        fn progress_matches_position_over_duration(
            duration_ms in 1u64..3_600_000,
            fraction in 0.0f64..=1.0,
        ) {
            let mut p = player(1);
            let duration = Duration::from_millis(duration_ms);
            let position = duration.mul_f64(fraction);
            send(&mut p, MediaEventKind::MetadataReady { duration });
            send(&mut p, MediaEventKind::TimeUpdate { position });

            let expected = position.as_secs_f64() / duration.as_secs_f64() * 100.0;
            prop_assert!((p.state().progress - expected).abs() < 1e-6);
            prop_assert_eq!(p.state().current_time, position);
        }

        /// Position reports never move a seek bar that is being dragged.
        #[test]
        fn dragging_ignores_position_reports(
            drag in 0.0f64..=100.0,
            reports in prop::collection::vec(0u64..600, 1..20),
        ) {
            let mut p = player(1);
            send(&mut p, MediaEventKind::MetadataReady { duration: secs(600) });
            p.seek_pointer_down();
            p.seek_drag(drag);
            let frozen = p.state().clone();
            for s in reports {
                send(&mut p, MediaEventKind::TimeUpdate { position: secs(s) });
                prop_assert_eq!(p.state().progress, frozen.progress);
                prop_assert_eq!(p.state().current_time, frozen.current_time);
            }
        }
    }
}
