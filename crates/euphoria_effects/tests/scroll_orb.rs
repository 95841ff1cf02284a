//! Scroll orb against the in-memory host

use std::rc::Rc;

use euphoria_core::{Point, Size};
use euphoria_effects::testing::TestHost;
use euphoria_effects::{EffectHost, PointerCapability, ScrollOrb, ScrollOrbConfig};

const VIEWPORT: Size = Size::new(1000.0, 800.0);

fn assert_near(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 0.01 && (actual.y - expected.y).abs() < 0.01,
        "{actual:?} is not near {expected:?}"
    );
}

fn mount(host: &Rc<TestHost>) -> ScrollOrb {
    let dyn_host: Rc<dyn EffectHost> = host.clone();
    ScrollOrb::mount(&dyn_host, &ScrollOrbConfig::new("/dasha1.jpg"))
        .unwrap()
        .expect("fine pointer mounts the orb")
}

#[test]
fn test_coarse_pointer_mounts_nothing() {
    let host = Rc::new(TestHost::new(VIEWPORT).with_capability(PointerCapability::Coarse));
    let dyn_host: Rc<dyn EffectHost> = host.clone();

    assert!(ScrollOrb::mount(&dyn_host, &ScrollOrbConfig::default())
        .unwrap()
        .is_none());
    assert!(host.peepholes().is_empty());
    assert_eq!(host.window_listener_count(), 0);
}

#[test]
fn test_starts_upper_right_then_heads_for_scroll_target() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let orb = mount(&host);

    let peephole = &host.peepholes()[0];
    assert_eq!(peephole.class_name, "scroll-orb mirror-orb");
    assert_eq!(peephole.diameter, 330.0);
    assert_eq!(peephole.root.property("--cursor-ring-size").as_deref(), Some("330px"));

    let start = orb.driver().current();
    assert_eq!(start.point, Point::new(700.0, 200.0));
    assert_eq!(start.intensity, 1.0);

    // Retargeted at mount, before any scroll event
    assert_near(orb.driver().target_point(), Point::new(500.0, 400.0));
    assert_eq!(host.frames().pending_count(), 1);

    host.frames().run_until_idle(1000);
    assert_near(orb.driver().current().point, Point::new(500.0, 400.0));
    assert_eq!(orb.listener_count(), 2);
}

#[test]
fn test_scroll_sweeps_sideways() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let orb = mount(&host);
    host.frames().run_until_idle(1000);

    // Quarter of a 960px wavelength: full 220px swing to the right
    host.scroll_to(240.0);
    assert_near(orb.driver().target_point(), Point::new(720.0, 400.0));

    host.frames().run_until_idle(1000);
    assert_near(orb.driver().current().point, Point::new(720.0, 400.0));
    assert_eq!(orb.driver().current().intensity, 1.0);

    host.scroll_to(720.0);
    assert_near(orb.driver().target_point(), Point::new(280.0, 400.0));
}

#[test]
fn test_resize_recomputes_target_and_metrics() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let orb = mount(&host);
    host.scroll_to(240.0);

    host.resize(Size::new(400.0, 800.0));

    // Amplitude shrinks to a quarter of the width
    assert_near(orb.driver().target_point(), Point::new(300.0, 400.0));
    assert_eq!(orb.metrics().container, Size::new(400.0, 800.0));
}

#[test]
fn test_unmount_stops_following_scroll() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let orb = mount(&host);
    let root = host.peepholes()[0].root.clone();
    drop(orb);

    assert_eq!(host.frames().pending_count(), 0);
    assert_eq!(host.window_listener_count(), 0);
    assert!(root.is_removed());
    assert_eq!(host.scroll_to(500.0), 0);
    assert_eq!(host.frames().run_frame(), 0);
}
