//! Cursor ring against the in-memory host

use std::rc::Rc;

use euphoria_background::{BackgroundStyle, ImageError, ImageLoad};
use euphoria_core::events::event_types;
use euphoria_core::{Event, Point, Rect, Size};
use euphoria_effects::testing::{TestBackgroundSource, TestHost};
use euphoria_effects::{CursorRing, CursorRingConfig, EffectHost, PointerCapability};

const VIEWPORT: Size = Size::new(1280.0, 720.0);
const IMAGE: Size = Size::new(320.0, 160.0);

fn background(attachment: &str, rect: Rect) -> Rc<TestBackgroundSource> {
    Rc::new(TestBackgroundSource::new(
        BackgroundStyle {
            image: r#"url("/dasha1.jpg")"#.into(),
            size: "cover".into(),
            position: "50% 50%".into(),
            attachment: attachment.into(),
            repeat: "no-repeat".into(),
        },
        rect,
    ))
}

fn fixed_host() -> Rc<TestHost> {
    let source = background("fixed", Rect::new(0.0, 0.0, 1280.0, 3000.0));
    Rc::new(TestHost::new(VIEWPORT).with_background(source))
}

fn mount(host: &Rc<TestHost>) -> CursorRing {
    let dyn_host: Rc<dyn EffectHost> = host.clone();
    CursorRing::mount(&dyn_host, &CursorRingConfig::new("/fallback.jpg"))
        .unwrap()
        .expect("fine pointer mounts the ring")
}

fn move_to(host: &TestHost, x: f32, y: f32) {
    host.dispatch(&Event::pointer(event_types::POINTER_MOVE, x, y));
}

#[test]
fn test_coarse_pointer_mounts_nothing() {
    let host = Rc::new(TestHost::new(VIEWPORT).with_capability(PointerCapability::Coarse));
    let dyn_host: Rc<dyn EffectHost> = host.clone();

    let ring = CursorRing::mount(&dyn_host, &CursorRingConfig::new("/bg.jpg")).unwrap();

    assert!(ring.is_none());
    assert!(host.peepholes().is_empty());
    assert_eq!(host.window_listener_count(), 0);
    assert!(host.requested_images().is_empty());
    assert_eq!(host.frames().pending_count(), 0);
}

#[test]
fn test_mount_builds_peephole_contract() {
    let host = fixed_host();
    let ring = mount(&host);

    let peepholes = host.peepholes();
    assert_eq!(peepholes.len(), 1);
    let peephole = &peepholes[0];
    assert_eq!(peephole.class_name, "cursor-ring");
    assert_eq!(peephole.root.attribute("aria-hidden").as_deref(), Some("true"));
    assert_eq!(peephole.layer.attribute("class").as_deref(), Some("cursor-ring__bg"));
    assert_eq!(peephole.root.property("--cursor-ring-size").as_deref(), Some("140px"));

    // Base styles mirror the source
    let layer = &peephole.layer;
    assert_eq!(layer.style("background-image").as_deref(), Some(r#"url("/dasha1.jpg")"#));
    assert_eq!(layer.style("background-repeat").as_deref(), Some("no-repeat"));
    assert_eq!(layer.style("background-attachment").as_deref(), Some("fixed"));
    // No natural size yet: drawn size is the viewport
    assert_eq!(layer.style("background-size").as_deref(), Some("1280px 720px"));

    // Starts hidden at the viewport centre
    assert_eq!(
        peephole.root.style("transform").as_deref(),
        Some("translate3d(570px, 290px, 0)")
    );
    assert_eq!(peephole.root.property("--cursor-active").as_deref(), Some("0"));

    assert_eq!(host.requested_images(), vec!["/dasha1.jpg".to_string()]);
    assert_eq!(ring.listener_count(), 5);
    assert_eq!(host.window_listener_count(), 5);
}

#[test]
fn test_image_load_recomputes_metrics() {
    let host = fixed_host();
    let ring = mount(&host);

    assert!(host.finish_image("/dasha1.jpg", Ok(IMAGE)));

    // cover: scale = max(1280/320, 720/160) = 4.5
    let metrics = ring.metrics();
    assert_eq!(metrics.drawn, Size::new(1440.0, 720.0));
    assert_eq!(metrics.offset, Point::new(-80.0, 0.0));
    assert_eq!(ring.image(), ImageLoad::Loaded(IMAGE));

    let layer = &host.peepholes()[0].layer;
    assert_eq!(layer.style("background-size").as_deref(), Some("1440px 720px"));
}

#[test]
fn test_failed_image_keeps_container_geometry() {
    let host = fixed_host();
    let ring = mount(&host);

    host.finish_image(
        "/dasha1.jpg",
        Err(ImageError::Failed {
            url: "/dasha1.jpg".into(),
            reason: "404".into(),
        }),
    );

    assert!(matches!(ring.image(), ImageLoad::Failed(_)));
    assert_eq!(ring.metrics().drawn, VIEWPORT);

    move_to(&host, 100.0, 100.0);
    host.frames().run_until_idle(500);
    assert_eq!(ring.driver().current().point, Point::new(100.0, 100.0));
}

#[test]
fn test_pointer_move_tracks_and_aligns_fixed_background() {
    let host = fixed_host();
    let ring = mount(&host);
    host.finish_image("/dasha1.jpg", Ok(IMAGE));

    move_to(&host, 300.0, 200.0);
    let frames = host.frames().run_until_idle(500);
    assert!(frames > 1 && frames < 500);

    let current = ring.driver().current();
    assert_eq!(current.point, Point::new(300.0, 200.0));
    assert_eq!(current.intensity, 1.0);

    let peephole = &host.peepholes()[0];
    assert_eq!(
        peephole.root.style("transform").as_deref(),
        Some("translate3d(230px, 130px, 0)")
    );
    assert_eq!(peephole.root.property("--cursor-active").as_deref(), Some("1"));
    // offset - point + size / 2
    assert_eq!(
        peephole.layer.style("background-position").as_deref(),
        Some("-310px -130px")
    );
}

#[test]
fn test_scrolling_background_uses_source_origin() {
    let source = background("scroll", Rect::new(0.0, -500.0, 1280.0, 3000.0));
    let host = Rc::new(TestHost::new(VIEWPORT).with_background(source));
    let ring = mount(&host);
    host.finish_image("/dasha1.jpg", Ok(IMAGE));

    // cover in 1280x3000: scale = 18.75
    assert_eq!(ring.metrics().drawn, Size::new(6000.0, 3000.0));
    assert_eq!(ring.metrics().offset, Point::new(-2360.0, 0.0));

    host.dispatch(&Event::pointer(event_types::POINTER_DOWN, 300.0, 200.0));
    host.frames().run_until_idle(500);

    // local point = (300, 700)
    let layer = &host.peepholes()[0].layer;
    assert_eq!(
        layer.style("background-position").as_deref(),
        Some("-2590px -630px")
    );
}

#[test]
fn test_leave_and_blur_fade_in_place() {
    let host = fixed_host();
    let ring = mount(&host);

    move_to(&host, 300.0, 200.0);
    host.frames().run_until_idle(500);

    host.dispatch(&Event::new(event_types::POINTER_LEAVE));
    host.frames().run_until_idle(500);
    let current = ring.driver().current();
    assert_eq!(current.intensity, 0.0);
    assert_eq!(current.point, Point::new(300.0, 200.0));

    move_to(&host, 310.0, 200.0);
    host.frames().run_until_idle(500);
    assert_eq!(ring.driver().current().intensity, 1.0);

    host.dispatch(&Event::new(event_types::WINDOW_BLUR));
    host.frames().run_until_idle(500);
    assert_eq!(ring.driver().current().intensity, 0.0);
}

#[test]
fn test_bursts_of_moves_coalesce() {
    let host = fixed_host();
    let ring = mount(&host);

    for step in 0..10 {
        move_to(&host, 10.0 * step as f32, 50.0);
    }

    assert_eq!(host.frames().pending_count(), 1);
    assert!(ring.driver().is_pending());
    assert_eq!(ring.driver().target_point(), Point::new(90.0, 50.0));
}

#[test]
fn test_resize_remeasures_against_new_viewport() {
    let host = fixed_host();
    let ring = mount(&host);
    host.finish_image("/dasha1.jpg", Ok(IMAGE));

    host.resize(Size::new(640.0, 360.0));

    // scale = max(2, 2.25)
    let metrics = ring.metrics();
    assert_eq!(metrics.container, Size::new(640.0, 360.0));
    assert_eq!(metrics.drawn, Size::new(720.0, 360.0));
    let layer = &host.peepholes()[0].layer;
    assert_eq!(layer.style("background-size").as_deref(), Some("720px 360px"));
}

#[test]
fn test_configured_image_stands_in_for_missing_background() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let _ring = mount(&host);

    let layer = &host.peepholes()[0].layer;
    assert_eq!(layer.style("background-image").as_deref(), Some("url(/fallback.jpg)"));
    assert_eq!(host.requested_images(), vec!["/fallback.jpg".to_string()]);
}

#[test]
fn test_no_image_anywhere_skips_loading() {
    let host = Rc::new(TestHost::new(VIEWPORT));
    let dyn_host: Rc<dyn EffectHost> = host.clone();
    let ring = CursorRing::mount(&dyn_host, &CursorRingConfig::default())
        .unwrap()
        .unwrap();

    assert!(host.requested_images().is_empty());
    assert_eq!(ring.image(), ImageLoad::Failed(ImageError::EmptyUrl));
    assert_eq!(ring.metrics().drawn, VIEWPORT);
}

#[test]
fn test_unmount_releases_everything() {
    let host = fixed_host();
    let ring = mount(&host);
    move_to(&host, 300.0, 200.0);
    assert_eq!(host.frames().pending_count(), 1);

    let peephole = host.peepholes()[0].clone();
    let layer_writes = peephole.layer.write_count();
    ring.unmount();

    assert_eq!(host.frames().pending_count(), 0);
    assert_eq!(host.window_listener_count(), 0);
    assert!(peephole.root.is_removed());

    assert_eq!(host.dispatch(&Event::pointer(event_types::POINTER_MOVE, 1.0, 1.0)), 0);
    assert_eq!(host.frames().run_frame(), 0);
    // A late image load must not touch the layer either
    assert!(host.finish_image("/dasha1.jpg", Ok(IMAGE)));

    assert_eq!(peephole.layer.write_count(), layer_writes);
    assert_eq!(peephole.root.writes_after_removal(), 0);
}

#[test]
fn test_rejects_invalid_size() {
    let host = fixed_host();
    let dyn_host: Rc<dyn EffectHost> = host.clone();
    let result = CursorRing::mount(&dyn_host, &CursorRingConfig::new("/bg.jpg").size(-4.0));

    assert!(result.is_err());
    assert!(host.peepholes().is_empty());
}
