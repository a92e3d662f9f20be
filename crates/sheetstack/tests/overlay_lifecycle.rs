//! End-to-end lifecycle tests across the store, shells, physics, and a11y.

use sheetstack::{
    BASE_Z_INDEX, DIALOG_CLOSE_DELAY, DialogConfig, DialogShell, DragTransform, HandlebarConfig,
    HandlebarEvent, KeyCode, KeyEvent, KeyResponse, MotionPreference, OpenOptions, OverlayKind,
    OverlayStore, PagePanelShell, PanelConfig, PanelSize, Position, TransitionSpec, Vec2, Viewport,
};
use web_time::Instant;

const VIEWPORT: Viewport = Viewport {
    width: 400.0,
    height: 1000.0,
};

fn panel_shell(store: &OverlayStore<&'static str>) -> PagePanelShell<&'static str> {
    PagePanelShell::new(
        store.clone(),
        PanelConfig::default().handlebar(HandlebarConfig::default().close_threshold(0.15)),
        MotionPreference::Full,
    )
}

// A bottom panel dragged 300 px down against a 150 px budget saturates and
// dismisses on release.
#[test]
fn deep_drag_dismisses_bottom_panel() {
    let store = OverlayStore::new();
    let mut shell = panel_shell(&store);
    let t0 = Instant::now();
    shell.open("sheet", vec![], None, t0);

    shell.on_pointer_down(Vec2::new(200.0, 20.0));
    let moved = shell.on_pointer_move(Vec2::new(200.0, 320.0), VIEWPORT);
    let Some(HandlebarEvent::DragMoved { drag, .. }) = moved else {
        panic!("expected a drag sample, got {moved:?}");
    };
    assert_eq!(drag.close_progress, 1.0);
    assert!(drag.should_close);

    let ended = shell.on_pointer_up(Vec2::new(200.0, 320.0), Vec2::ZERO, VIEWPORT, t0);
    assert_eq!(ended, Some(HandlebarEvent::DragEnded { dismiss: true }));
    assert!(shell.is_closing());

    shell.on_exit_transition_end();
    assert!(store.is_empty());
}

// Dragging away from the close edge builds resistance but never progress,
// and the panel never visually leaves its rest position.
#[test]
fn away_drag_resists_without_progress() {
    let store = OverlayStore::new();
    let mut shell = panel_shell(&store);
    let t0 = Instant::now();
    shell.open("sheet", vec![], None, t0);

    shell.on_pointer_down(Vec2::new(200.0, 20.0));
    let moved = shell.on_pointer_move(Vec2::new(200.0, -30.0), VIEWPORT);
    let Some(HandlebarEvent::DragMoved { drag, .. }) = moved else {
        panic!("expected a drag sample, got {moved:?}");
    };
    assert_eq!(drag.close_progress, 0.0);
    assert!(drag.is_beyond_limit);
    assert!(drag.resistance_intensity > 0.0);
    assert_eq!(shell.transform().offset, Vec2::ZERO);

    let ended = shell.on_pointer_up(Vec2::new(200.0, -30.0), Vec2::ZERO, VIEWPORT, t0);
    assert_eq!(ended, Some(HandlebarEvent::DragEnded { dismiss: false }));
    assert!(shell.is_open());
    assert_eq!(shell.transform(), DragTransform::IDENTITY);
}

// A fast downward flick dismisses well short of the distance budget.
#[test]
fn flick_dismisses_short_drag() {
    let store = OverlayStore::new();
    let mut shell = panel_shell(&store);
    let t0 = Instant::now();
    shell.open("sheet", vec![], None, t0);

    shell.on_pointer_down(Vec2::new(200.0, 20.0));
    shell.on_pointer_move(Vec2::new(200.0, 70.0), VIEWPORT);
    let ended = shell.on_pointer_up(
        Vec2::new(200.0, 70.0),
        Vec2::new(0.0, 450.0),
        VIEWPORT,
        t0,
    );
    assert_eq!(ended, Some(HandlebarEvent::DragEnded { dismiss: true }));
}

// Stacked overlays: z-indices climb from the base, the dialog accessor
// tracks the most recently opened dialog, and close-all applies each kind's
// removal policy.
#[test]
fn stacking_and_kind_accessors() {
    let store: OverlayStore<&str> = OverlayStore::new();
    let t0 = Instant::now();

    let first = store.open(OverlayKind::Dialog, "first", OpenOptions::default());
    let panel = store.open(
        OverlayKind::Panel,
        "panel",
        OpenOptions::default()
            .position(Position::Right)
            .size(PanelSize::Small),
    );
    let second = store.open(OverlayKind::Dialog, "second", OpenOptions::default());

    assert_eq!(store.depth(), 3);
    assert_eq!(
        store.with_instance(second, |e| e.z_index),
        Some(BASE_Z_INDEX + 2)
    );
    assert_eq!(store.dialog_id(), Some(second));
    assert_eq!(store.panel_id(), Some(panel));
    assert_eq!(store.top_id(), Some(second));

    store.close_all(t0);
    let removed = store.poll(t0 + DIALOG_CLOSE_DELAY);
    assert_eq!(removed, vec![first, second]);
    assert!(store.contains(panel));
    store.complete_close(panel);
    assert!(store.is_empty());
}

// Reduced motion collapses every pose to an opacity tween.
#[test]
fn reduced_motion_is_opacity_only_everywhere() {
    let store: OverlayStore<&str> = OverlayStore::new();
    let dialog = DialogShell::new(store.clone(), DialogConfig::default(), MotionPreference::Reduced);
    let mut panel = PagePanelShell::new(store, PanelConfig::default(), MotionPreference::Reduced);
    panel.open("sheet", vec![], None, Instant::now());
    panel.set_position(Position::Left);

    for set in [*dialog.variants(), panel.variants()] {
        for variant in [set.hidden, set.visible, set.exit] {
            assert!(variant.is_opacity_only());
            assert!(matches!(variant.transition, TransitionSpec::Tween { .. }));
        }
    }
}

// Focus moves into the dialog on open, cycles under Tab, and restores to the
// previously focused node exactly once on close.
#[test]
fn focus_round_trip_through_a_dialog() {
    let store: OverlayStore<&str> = OverlayStore::new();
    let mut shell = DialogShell::new(store, DialogConfig::default(), MotionPreference::Full);
    let t0 = Instant::now();

    let (_, initial) = shell.open("body", vec![7, 8, 9], Some(3), t0);
    assert_eq!(initial, Some(7));
    assert_eq!(
        shell.on_key(KeyEvent::plain(KeyCode::Tab), t0),
        KeyResponse::Focused(8)
    );

    assert_eq!(
        shell.on_key(KeyEvent::plain(KeyCode::Escape), t0),
        KeyResponse::Closed {
            restore_focus: Some(3)
        }
    );
    assert!(!shell.accessibility().is_focus_trapped());
}

// The announcer publishes "<kind> opened" after its delay, and identical
// consecutive loading messages still re-announce.
#[test]
fn announcements_flow_through_the_shell() {
    let store: OverlayStore<&str> = OverlayStore::new();
    let mut shell = DialogShell::new(store, DialogConfig::default(), MotionPreference::Full);
    let t0 = Instant::now();
    shell.open("body", vec![], None, t0);

    shell.poll(t0 + sheetstack::a11y::ANNOUNCE_DELAY);
    assert_eq!(shell.accessibility().live_text(), "dialog opened");

    let t1 = t0 + std::time::Duration::from_secs(1);
    shell.set_loading(true, Some("Working".into()), t1);
    shell.poll(t1 + sheetstack::a11y::ANNOUNCE_DELAY);
    assert_eq!(shell.accessibility().live_text(), "Working");

    let t2 = t1 + std::time::Duration::from_secs(1);
    shell.set_loading(true, Some("Working".into()), t2);
    assert_eq!(shell.accessibility().live_text(), "", "cleared before re-announce");
    shell.poll(t2 + sheetstack::a11y::ANNOUNCE_DELAY);
    assert_eq!(shell.accessibility().live_text(), "Working");
}

// Store subscribers observe every lifecycle transition of a full
// open-drag-dismiss cycle.
#[test]
fn subscription_sees_the_full_lifecycle() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let store: OverlayStore<&str> = OverlayStore::new();
    let versions: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&versions);
    let probe = store.clone();
    let _sub = store.subscribe(move || log.borrow_mut().push(probe.version()));

    let t0 = Instant::now();
    let id = store.open(OverlayKind::Dialog, "body", OpenOptions::default());
    store.set_loading(id, true, Some("Working".into()));
    store.set_loading(id, false, None);
    store.close(Some(id), t0);
    store.poll(t0 + DIALOG_CLOSE_DELAY);

    let seen = versions.borrow();
    assert_eq!(seen.len(), 5, "open, two loading flips, close, sweep");
    assert!(seen.windows(2).all(|w| w[0] < w[1]), "versions are monotonic");
}
