//! End-to-end playback scenarios: load, render, scrub, export.

use std::fs::File;
use std::path::Path;

use trailcast_paint::Color;
use trailcast_platform::{HeadlessPresenter, InputState, Key, KeyMap};
use trailcast_player::config::MIN_PLAYBACK_RATE;
use trailcast_player::replay::{load_replay, Scaler};
use trailcast_player::{
    CapturePolicy, ConfigError, ExportNaming, Exporter, PlaybackConfig, PlaybackController,
    PlaybackMode, PlayerError, Replay, Sample, TrailStyle,
};

fn controller_for(replay: Replay, size: u32, config: PlaybackConfig, out_dir: &Path) -> PlaybackController {
    let exporter = Exporter::new(out_dir, "run1", ExportNaming::Sequential).unwrap();
    let style = TrailStyle {
        cursor_size: 2.0,
        ..Default::default()
    };
    PlaybackController::new(replay, size, size, config, style, exporter).unwrap()
}

fn diagonal(len: usize) -> Replay {
    Replay::new(
        (0..len)
            .map(|i| Sample::new(i as f32 + 1.0, i as f32 + 1.0))
            .collect(),
    )
    .unwrap()
}

fn decode_png(path: &Path) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

#[test]
fn three_sample_replay_puts_pressed_cursor_in_corner() {
    let replay = Replay::new(vec![
        Sample::new(0.0, 0.0),
        Sample::new(10.0, 0.0),
        Sample::new(10.0, 20.0).with_buttons(true, false),
    ])
    .unwrap();

    let scaler = Scaler::for_replay(&replay, 100, 100).unwrap();
    assert_eq!(scaler.factor().sx(), 10.0);
    assert_eq!(scaler.factor().sy(), 5.0);

    let dir = tempfile::tempdir().unwrap();
    let mut player = controller_for(replay, 100, PlaybackConfig::default(), dir.path());
    let mut presenter = HeadlessPresenter::new();
    let idle = InputState::default();

    for expected in 0..3 {
        let report = player.update(&idle, &mut presenter).unwrap();
        assert_eq!(report.rendered, Some(expected));
    }

    let trail = player.renderer().trail().snapshot();
    assert_eq!(trail.last().map(|p| (p.x, p.y)), Some((100.0, 100.0)));
    assert_eq!(
        player.renderer().canvas().pixel(99, 99),
        Some(Color::YELLOW.to_rgba8())
    );
}

#[test]
fn dump_writes_numbered_pngs_that_decode_to_captured_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let mut player = controller_for(diagonal(5), 16, PlaybackConfig::default(), dir.path());
    let mut presenter = HeadlessPresenter::new();

    assert_eq!(player.render_range(0..5, &mut presenter).unwrap(), 5);
    assert_eq!(player.frames().count(), 5);

    let report = player.export().unwrap();
    assert!(report.is_success());

    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("run1"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "run1000000.png",
            "run1000001.png",
            "run1000002.png",
            "run1000003.png",
            "run1000004.png"
        ]
    );

    for (path, frame) in report.written.iter().zip(player.frames().iter()) {
        let (width, height, pixels) = decode_png(path);
        assert_eq!((width, height), (16, 16));
        assert_eq!(pixels, frame.data, "{} does not round-trip", path.display());
    }
}

#[test]
fn play_toggle_twice_returns_to_idle_on_same_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut player = controller_for(diagonal(10), 32, PlaybackConfig::default(), dir.path());
    let mut presenter = HeadlessPresenter::new();
    let idle = InputState::default();
    for _ in 0..4 {
        player.update(&idle, &mut presenter).unwrap();
    }

    let tick = player.tick_index();
    player.toggle_play();
    assert_eq!(player.mode(), PlaybackMode::AutoPlay);
    player.toggle_play();
    assert_eq!(player.mode(), PlaybackMode::Idle);
    assert_eq!(player.tick_index(), tick);
}

#[test]
fn held_speed_down_stops_at_floor() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlaybackConfig {
        playback_rate: 8,
        ..Default::default()
    };
    let mut player = controller_for(diagonal(40), 32, config, dir.path());
    let mut presenter = HeadlessPresenter::new();
    let mut input = InputState::new(KeyMap::default());

    input.key_down(Key::char('p'));
    player.update(&input, &mut presenter).unwrap();
    input.key_up(Key::char('p'));
    input.end_tick();
    assert_eq!(player.mode(), PlaybackMode::AutoPlay);

    input.key_down(Key::ArrowDown);
    for _ in 0..10 {
        player.update(&input, &mut presenter).unwrap();
        input.end_tick();
        assert!(player.playback_rate() >= MIN_PLAYBACK_RATE);
    }
    assert_eq!(player.playback_rate(), MIN_PLAYBACK_RATE);
    assert_eq!(player.current_rate(), MIN_PLAYBACK_RATE);
}

#[test]
fn step_forward_on_last_tick_captures_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut player = controller_for(diagonal(3), 32, PlaybackConfig::default(), dir.path());
    let mut presenter = HeadlessPresenter::new();

    player.update(&InputState::default(), &mut presenter).unwrap();
    player.toggle_pause();
    while player.step_forward(&mut presenter).unwrap().is_some() {}
    assert_eq!(player.tick_index(), 2);
    let captured: Vec<usize> = player.frames().ticks().collect();
    assert_eq!(captured, vec![0, 1]);

    assert_eq!(player.step_forward(&mut presenter).unwrap(), None);
    assert_eq!(player.tick_index(), 2);
    assert_eq!(player.frames().count(), 2);
}

#[test]
fn every_render_policy_recaptures_revisited_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlaybackConfig {
        capture_policy: CapturePolicy::EveryRender,
        ..Default::default()
    };
    let mut player = controller_for(diagonal(4), 32, config, dir.path());
    let mut presenter = HeadlessPresenter::new();

    player.toggle_pause();
    player.step_forward(&mut presenter).unwrap();
    let first = player.frames().get(1).unwrap().data.clone();
    player.step_forward(&mut presenter).unwrap();
    player.step_backward(&mut presenter).unwrap();

    // Same tick, longer trail behind it.
    assert_eq!(player.frames().count(), 2);
    assert_ne!(player.frames().get(1).unwrap().data, first);
}

#[test]
fn action_stream_file_loads_and_plays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt");
    std::fs::write(&path, "0|0|0|0,16|256|192|0,17|512|384|1,-12345|0|0|42,").unwrap();

    let replay = load_replay(&path).unwrap();
    assert_eq!(replay.len(), 3);
    assert_eq!(replay.bounds(), (512.0, 384.0));

    let mut player = controller_for(replay, 64, PlaybackConfig::default(), dir.path());
    let mut presenter = HeadlessPresenter::new();
    assert_eq!(player.render_range(0..3, &mut presenter).unwrap(), 3);
    assert_eq!(presenter.frames_presented(), 3);
}

#[test]
fn enter_exports_captured_frames_during_update() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlaybackConfig {
        capture_policy: CapturePolicy::EveryRender,
        ..Default::default()
    };
    let mut player = controller_for(diagonal(5), 16, config, dir.path());
    let mut presenter = HeadlessPresenter::new();
    let idle = InputState::default();
    player.update(&idle, &mut presenter).unwrap();
    player.update(&idle, &mut presenter).unwrap();

    let mut input = InputState::new(KeyMap::default());
    input.key_down(Key::Enter);
    let report = player.update(&input, &mut presenter).unwrap();

    let export = report.export.expect("export should fire").unwrap();
    assert!(export.is_success());
    assert_eq!(export.written.len(), 2);
    assert!(dir.path().join("run1/run1000000.png").exists());
    assert!(dir.path().join("run1/run1000001.png").exists());
    // The tick still advances after exporting.
    assert_eq!(report.rendered, Some(2));
}

#[test]
fn floor_below_five_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path(), "run1", ExportNaming::Sequential).unwrap();
    let config = PlaybackConfig {
        playback_rate: 6,
        min_playback_rate: 1,
        ..Default::default()
    };
    let result = PlaybackController::new(
        diagonal(4),
        16,
        16,
        config,
        TrailStyle::default(),
        exporter,
    );
    assert!(matches!(
        result,
        Err(PlayerError::Config(ConfigError::RateFloor(1)))
    ));
}
