// src/surface/tests.rs

use super::*;
use crate::config::SurfaceConfig;
use crate::snapshot::Snapshot;

const WINDOW: NativeWindow = NativeWindow(0x1000);

fn context_with(configs: Vec<ConfigDescriptor>) -> SurfaceContext<HeadlessGraphicsDriver> {
    SurfaceContext::new(
        HeadlessGraphicsDriver::with_configs(800, 600, configs),
        SurfaceConfig::default(),
    )
}

#[test_log::test]
fn it_should_select_the_exact_format_match() {
    let mut surface = context_with(vec![
        HeadlessGraphicsDriver::window_config(8, 8, 8, 24),
        HeadlessGraphicsDriver::window_config(8, 8, 8, 0),
    ]);

    let dimensions = surface.acquire(WINDOW).unwrap();

    assert_eq!(surface.driver().surface_config(), Some(ConfigId(1)));
    assert_eq!(
        dimensions,
        Dimensions {
            width: 800,
            height: 600
        }
    );
    assert_eq!(surface.dimensions(), Some(dimensions));
    assert_eq!(surface.validity(), Validity::Live);
    surface.release();
}

#[test_log::test]
fn it_should_fall_back_to_the_first_candidate_without_an_exact_match() {
    let mut surface = context_with(vec![
        HeadlessGraphicsDriver::window_config(8, 8, 8, 24),
        HeadlessGraphicsDriver::window_config(10, 10, 10, 0),
    ]);

    assert!(surface.acquire(WINDOW).is_ok());
    assert_eq!(surface.driver().surface_config(), Some(ConfigId(0)));
    // Each candidate once, then the chosen one for its native visual id.
    assert_eq!(surface.driver().count("describe_config"), 3);
    surface.release();
}

#[test_log::test]
fn it_should_ignore_configs_that_cannot_render_to_a_window() {
    let mut pbuffer_only = HeadlessGraphicsDriver::window_config(8, 8, 8, 0);
    pbuffer_only.surface_type = SurfaceType::PBUFFER;
    let mut surface = context_with(vec![
        pbuffer_only,
        HeadlessGraphicsDriver::window_config(8, 8, 8, 16),
    ]);

    assert!(surface.acquire(WINDOW).is_ok());
    assert_eq!(surface.driver().surface_config(), Some(ConfigId(1)));
    surface.release();
}

#[test_log::test]
fn it_should_fail_with_no_config_and_leak_nothing() {
    let mut surface = context_with(Vec::new());

    let err = surface.acquire(WINDOW).unwrap_err();

    assert_eq!(err, AcquisitionError::NoConfig);
    assert_eq!(surface.validity(), Validity::Invalid);
    assert_eq!(surface.dimensions(), None);
    assert!(!surface.driver().holds_resources());
}

#[test_log::test]
fn it_should_fail_when_the_context_cannot_be_made_current() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    surface.driver_mut().set_fail_make_current(true);

    let err = surface.acquire(WINDOW).unwrap_err();

    assert!(matches!(err, AcquisitionError::MakeCurrentFailed(_)));
    assert_eq!(surface.validity(), Validity::Invalid);
    assert!(!surface.driver().holds_resources());
    assert_eq!(surface.driver().count("destroy_context"), 1);
    assert_eq!(surface.driver().count("destroy_surface"), 1);
}

#[test_log::test]
fn it_should_recover_on_the_next_acquire_after_a_failure() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    surface.driver_mut().set_fail_make_current(true);
    assert!(surface.acquire(WINDOW).is_err());

    surface.driver_mut().set_fail_make_current(false);
    assert!(surface.acquire(WINDOW).is_ok());
    assert!(surface.is_live());
    surface.release();
}

#[test_log::test]
fn it_should_release_idempotently() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    surface.release();
    assert_eq!(surface.driver().history().len(), 0);

    surface.acquire(WINDOW).unwrap();
    surface.release();
    surface.release();

    assert_eq!(surface.validity(), Validity::Absent);
    assert_eq!(surface.driver().count("close_display"), 1);
    assert_eq!(surface.driver().current_binding(), None);
    assert!(!surface.driver().holds_resources());
}

#[test_log::test]
fn it_should_release_the_previous_surface_when_acquiring_while_live() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    surface.acquire(WINDOW).unwrap();
    surface.acquire(NativeWindow(0x2000)).unwrap();

    assert_eq!(surface.driver().count("open_display"), 2);
    assert_eq!(surface.driver().count("close_display"), 1);
    assert!(surface.is_live());
    surface.release();
}

#[test_log::test]
fn it_should_not_present_without_a_live_surface() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);

    assert_eq!(surface.present(&Snapshot::default()), Ok(false));
    assert_eq!(surface.present(&Snapshot::default()), Ok(false));
    assert!(surface.driver().history().is_empty());
    assert!(surface.driver().frames().is_empty());
}

#[test_log::test]
fn it_should_clear_to_a_color_derived_from_the_snapshot() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    surface.acquire(WINDOW).unwrap();

    let snapshot = Snapshot {
        angle: 0.25,
        last_x: 400,
        last_y: 150,
    };
    assert_eq!(surface.present(&snapshot), Ok(true));

    let frames = surface.driver().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(
        frames[0],
        ClearColor {
            red: 0.5,
            green: 0.25,
            blue: 0.25,
            alpha: 1.0
        }
    );
    surface.release();
}

#[test_log::test]
fn it_should_pick_up_a_new_window_size_on_the_next_acquire() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);
    let snapshot = Snapshot {
        angle: 0.0,
        last_x: 400,
        last_y: 300,
    };
    surface.acquire(WINDOW).unwrap();

    // The size is queried at acquisition only.
    surface.driver_mut().resize(1600, 1200);
    assert_eq!(
        surface.dimensions(),
        Some(Dimensions {
            width: 800,
            height: 600
        })
    );
    surface.present(&snapshot).unwrap();

    surface.release();
    assert_eq!(surface.dimensions(), None);
    let dimensions = surface.acquire(WINDOW).unwrap();
    assert_eq!(
        dimensions,
        Dimensions {
            width: 1600,
            height: 1200
        }
    );
    assert_eq!(surface.dimensions(), Some(dimensions));
    surface.present(&snapshot).unwrap();

    let frames = surface.driver().frames();
    assert_eq!((frames[0].red, frames[0].blue), (0.5, 0.5));
    assert_eq!((frames[1].red, frames[1].blue), (0.25, 0.25));
    surface.release();
}

#[test_log::test]
fn it_should_map_a_zero_extent_to_zero_instead_of_dividing() {
    let color = clear_color(
        &Snapshot {
            angle: 0.1,
            last_x: 10,
            last_y: 10,
        },
        Dimensions {
            width: 0,
            height: 0,
        },
    );
    assert_eq!(color.red, 0.0);
    assert_eq!(color.blue, 0.0);
    assert_eq!(color.green, 0.1);
}

#[test_log::test]
fn it_should_probe_the_renderer_and_prepare_state_after_binding() {
    let mut surface = context_with(vec![HeadlessGraphicsDriver::window_config(8, 8, 8, 0)]);

    surface.acquire(WINDOW).unwrap();

    let history = surface.driver().history();
    let bound = history.iter().position(|r| *r == "make_current").unwrap();
    let probed = history
        .iter()
        .position(|r| *r == "query_renderer_info")
        .unwrap();
    let prepared = history
        .iter()
        .position(|r| *r == "prepare_render_state")
        .unwrap();
    assert!(bound < probed && probed < prepared);
    surface.release();
}
