//! Page-level helpers: cursor glow and background height sync

use std::rc::Rc;

use euphoria_core::events::event_types;
use euphoria_core::{Event, EventSource, Rect, Size};
use euphoria_effects::testing::{TestElement, TestHost};
use euphoria_effects::{BackgroundHeightSync, CursorGlow, EffectHost, GlowConfig, StyleTarget};

fn page() -> Rc<TestElement> {
    Rc::new(TestElement::new(Rect::new(0.0, 0.0, 1280.0, 720.0)))
}

#[test]
fn test_glow_follows_pointer_without_easing() {
    let container = page();
    let glow = CursorGlow::mount(container.clone(), container.clone(), &GlowConfig::default()).unwrap();

    container.dispatch(&Event::pointer(event_types::POINTER_MOVE, 120.0, 48.5));

    assert_eq!(container.property("--cursor-x").as_deref(), Some("120px"));
    assert_eq!(container.property("--cursor-y").as_deref(), Some("48.5px"));
    assert_eq!(container.property("--reveal-x").as_deref(), Some("120px"));
    assert_eq!(container.property("--reveal-y").as_deref(), Some("48.5px"));
    assert_eq!(container.property("--reveal-size").as_deref(), Some("600px"));
    assert_eq!(container.property("--cursor-active").as_deref(), Some("1"));

    container.dispatch(&Event::new(event_types::POINTER_LEAVE));
    assert_eq!(container.property("--cursor-active").as_deref(), Some("0"));
    assert_eq!(container.property("--cursor-x").as_deref(), Some("120px"));

    assert_eq!(glow.listener_count(), 2);
    glow.unmount();
    assert_eq!(container.listener_count(), 0);
}

#[test]
fn test_height_sync_tracks_content() {
    let host = Rc::new(TestHost::new(Size::new(1280.0, 720.0)));
    let dyn_host: Rc<dyn EffectHost> = host.clone();
    let container = page();
    container.set_scroll_height(Some(2400.0));
    let background = Rc::new(TestElement::new(Rect::new(0.0, 0.0, 1280.0, 720.0)));

    let container_target: Rc<dyn StyleTarget> = container.clone();
    let container_events: Rc<dyn EventSource> = container.clone();
    let sync = BackgroundHeightSync::mount(
        &dyn_host,
        container_target,
        container_events,
        background.clone(),
    );
    assert_eq!(background.style("height").as_deref(), Some("2400px"));
    assert_eq!(sync.listener_count(), 2);

    container.set_scroll_height(Some(3000.0));
    container.dispatch(&Event::new(event_types::CONTENT_MUTATED));
    assert_eq!(background.style("height").as_deref(), Some("3000px"));

    container.set_scroll_height(Some(3200.0));
    host.resize(Size::new(800.0, 600.0));
    assert_eq!(background.style("height").as_deref(), Some("3200px"));

    sync.unmount();
    assert_eq!(host.window_listener_count(), 0);
    assert_eq!(container.listener_count(), 0);

    container.set_scroll_height(Some(5000.0));
    container.dispatch(&Event::new(event_types::CONTENT_MUTATED));
    assert_eq!(background.style("height").as_deref(), Some("3200px"));
}
