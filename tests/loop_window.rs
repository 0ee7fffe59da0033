//! Tests for the loop window addressing

use freeze_dsp::freeze::loop_window::LoopWindow;
use freeze_dsp::utils::random::Random;

#[test]
fn wrapped_index_always_lands_in_window() {
    let mut random = Random::new(99);

    for _ in 0..2_000 {
        let buffer_size = 2 + (random.get_word() % 10_000) as usize;
        let length = random.get_float();
        let centre = random.get_float();
        let window = LoopWindow::from_parameters(length, centre, buffer_size);

        assert!(window.start() < window.end());
        assert!(window.end() < buffer_size);

        for _ in 0..50 {
            let magnitude = match random.get_word() % 3 {
                0 => 16,
                1 => 1 << 20,
                _ => 1 << 40,
            };
            let index = (random.get_word() as i64 % magnitude) - magnitude / 2;
            let wrapped = window.wrap_index_to_loop_section(index);
            assert!(wrapped >= window.start() && wrapped < window.end());
        }
    }
}

#[test]
fn wrap_is_periodic_in_window_length() {
    let window = LoopWindow::new(100, 137);
    let len = window.len() as i64;

    for index in -500..500 {
        assert_eq!(
            window.wrap_index_to_loop_section(index),
            window.wrap_index_to_loop_section(index + len)
        );
        assert_eq!(
            window.wrap_index_to_loop_section(index),
            window.wrap_index_to_loop_section(index - 7 * len)
        );
    }
}

#[test]
fn indices_inside_window_are_unchanged() {
    let window = LoopWindow::new(20, 30);
    for index in 20..30 {
        assert_eq!(window.wrap_index_to_loop_section(index), index as usize);
    }
}

#[test]
fn extreme_indices_are_total() {
    let window = LoopWindow::new(3, 10);
    for index in [i64::MIN / 2, i64::MAX / 2, -1, 0] {
        let wrapped = window.wrap_index_to_loop_section(index);
        assert!((3..10).contains(&wrapped));
    }
}

#[test]
fn fractional_positions_land_in_window() {
    let window = LoopWindow::new(50, 60);
    let mut position = 55.0f32;
    for _ in 0..1_000 {
        position = window.wrap_position(position + 3.7);
        assert!(window.contains(position));
    }
    for _ in 0..1_000 {
        position = window.wrap_position(position - 23.3);
        assert!(window.contains(position));
    }
}

#[test]
fn tiny_buffer_still_has_a_window() {
    let window = LoopWindow::from_parameters(0.0, 0.5, 2);
    assert_eq!(window.start(), 0);
    assert_eq!(window.end(), 1);
}
