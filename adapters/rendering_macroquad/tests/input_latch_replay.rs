use glam::Vec2;
use zombie_pop_core::{InputEvent, ScreenPoint};
use zombie_pop_rendering_macroquad::InputLatch;

/// Feeds one frame of observations per entry and returns what each scene update saw.
fn run_sequence(frames: &[(Option<Vec2>, bool)]) -> Vec<Vec<InputEvent>> {
    let mut latch = InputLatch::default();
    let mut observed = Vec::new();
    for &(press, quit) in frames {
        if let Some(position) = press {
            latch.register_pointer_press(position);
        }
        if quit {
            latch.register_quit();
        }
        observed.push(latch.take().events);
    }
    observed
}

#[test]
fn pointer_presses_are_delivered_once_in_order() {
    let frames = [
        (Some(Vec2::new(5.0, 6.0)), false),
        (None, false),
        (Some(Vec2::new(100.5, 40.0)), false),
    ];

    let first_run = run_sequence(&frames);
    let second_run = run_sequence(&frames);

    assert_eq!(
        first_run,
        vec![
            vec![InputEvent::PointerDown(ScreenPoint::new(5, 6))],
            Vec::new(),
            vec![InputEvent::PointerDown(ScreenPoint::new(100, 40))],
        ]
    );
    assert_eq!(first_run, second_run);
}

#[test]
fn quit_is_latched_once_per_frame_after_presses() {
    let mut latch = InputLatch::default();
    latch.register_pointer_press(Vec2::new(1.0, 2.0));
    latch.register_quit();
    latch.register_quit();

    assert_eq!(
        latch.take().events,
        vec![
            InputEvent::PointerDown(ScreenPoint::new(1, 2)),
            InputEvent::Quit,
        ]
    );

    latch.register_quit();
    assert_eq!(latch.take().events, vec![InputEvent::Quit]);
}

#[test]
fn every_press_latched_before_a_take_is_delivered() {
    let mut latch = InputLatch::default();
    for x in [10.0, 20.0, 30.0] {
        latch.register_pointer_press(Vec2::new(x, 5.0));
    }

    assert_eq!(
        latch.take().events,
        vec![
            InputEvent::PointerDown(ScreenPoint::new(10, 5)),
            InputEvent::PointerDown(ScreenPoint::new(20, 5)),
            InputEvent::PointerDown(ScreenPoint::new(30, 5)),
        ]
    );
}
