#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_mods() -> Modifiers {
    Modifiers::default()
}

fn alt() -> Modifiers {
    Modifiers { alt: true, ..Modifiers::default() }
}

fn drawn(actions: &[Action]) -> Vec<Stroke> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::StrokeDrawn(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn remote(x: f64) -> Stroke {
    Stroke { x0: x, y0: x, x1: x + 1.0, y1: x + 1.0, color: "#ff0000".into(), width: 2.0 }
}

// --- Layout ---

#[test]
fn first_layout_centers_origin() {
    let mut core = EngineCore::new();
    let actions = core.set_viewport(800.0, 600.0, 2.0);
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.viewport().world_to_screen(pt(0.0, 0.0)), pt(400.0, 300.0));
    assert_eq!(core.dpr, 2.0);
}

#[test]
fn later_layouts_keep_offset() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0, 1.0);
    core.set_viewport(1000.0, 1000.0, 1.0);
    assert_eq!(core.viewport().offset(), pt(400.0, 300.0));
    assert_eq!(core.viewport_width, 1000.0);
}

#[test]
fn empty_layout_does_not_consume_centering() {
    let mut core = EngineCore::new();
    core.set_viewport(0.0, 0.0, 1.0);
    assert_eq!(core.viewport().offset(), pt(0.0, 0.0));
    core.set_viewport(200.0, 100.0, 1.0);
    assert_eq!(core.viewport().offset(), pt(100.0, 50.0));
}

#[test]
fn invalid_dpr_falls_back_to_one() {
    let mut core = EngineCore::new();
    core.set_viewport(10.0, 10.0, 0.0);
    assert_eq!(core.dpr, 1.0);
}

// --- Drawing ---

#[test]
fn drag_draws_connected_segments() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_mods()).is_empty());
    let first = drawn(&core.on_pointer_move(pt(20.0, 10.0)));
    let second = drawn(&core.on_pointer_move(pt(20.0, 30.0)));
    core.on_pointer_up();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!((first[0].x0, first[0].y0, first[0].x1, first[0].y1), (10.0, 10.0, 20.0, 10.0));
    assert_eq!((second[0].x0, second[0].y0, second[0].x1, second[0].y1), (20.0, 10.0, 20.0, 30.0));
    assert_eq!(core.strokes.len(), 2);
    assert!(core.gesture.is_idle());
}

#[test]
fn stroke_uses_world_coordinates_and_scaled_width() {
    let mut core = EngineCore::new();
    core.viewport = Viewport { offset_x: 100.0, offset_y: 100.0, scale: 2.0 };
    core.on_pointer_down(pt(100.0, 100.0), Button::Primary, no_mods());
    let strokes = drawn(&core.on_pointer_move(pt(140.0, 100.0)));

    let s = &strokes[0];
    assert_eq!((s.x0, s.y0, s.x1, s.y1), (0.0, 0.0, 20.0, 0.0));
    assert_eq!(s.width, DEFAULT_BRUSH_WIDTH_PX / 2.0);
    assert_eq!(s.color, DEFAULT_BRUSH_COLOR);
}

#[test]
fn eraser_paints_background_wide() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Eraser);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    let s = drawn(&core.on_pointer_move(pt(5.0, 5.0))).remove(0);
    assert_eq!(s.color, BACKGROUND);
    assert_eq!(s.width, ERASER_WIDTH_PX);
}

#[test]
fn brush_settings_apply_to_new_segments() {
    let mut core = EngineCore::new();
    core.set_brush_color("#ff00aa");
    core.set_brush_width(10.0);
    core.set_brush_width(-1.0);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    let s = drawn(&core.on_pointer_move(pt(1.0, 1.0))).remove(0);
    assert_eq!(s.color, "#ff00aa");
    assert_eq!(s.width, 10.0);
}

#[test]
fn hover_reports_cursor_without_drawing() {
    let mut core = EngineCore::new();
    core.viewport = Viewport { offset_x: 10.0, offset_y: 0.0, scale: 1.0 };
    let actions = core.on_pointer_move(pt(30.0, 5.0));
    assert_eq!(actions, vec![Action::CursorMoved(pt(20.0, 5.0))]);
    assert!(core.strokes.is_empty());
}

#[test]
fn drawing_reports_cursor_too() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    let actions = core.on_pointer_move(pt(3.0, 4.0));
    assert!(actions.contains(&Action::RenderNeeded));
    assert_eq!(actions.last(), Some(&Action::CursorMoved(pt(3.0, 4.0))));
}

#[test]
fn second_pointer_down_is_ignored_mid_gesture() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    assert!(core.on_pointer_down(pt(50.0, 50.0), Button::Secondary, no_mods()).is_empty());
    assert!(matches!(core.gesture, Gesture::Drawing { .. }));
}

// --- Panning ---

#[test]
fn alt_drag_pans_without_drawing() {
    let mut core = EngineCore::new();
    let down = core.on_pointer_down(pt(100.0, 100.0), Button::Primary, alt());
    assert_eq!(down, vec![Action::SetCursor(CURSOR_PAN)]);

    let actions = core.on_pointer_move(pt(130.0, 80.0));
    assert!(drawn(&actions).is_empty());
    assert_eq!(core.viewport().offset(), pt(30.0, -20.0));

    assert_eq!(core.on_pointer_up(), vec![Action::SetCursor(CURSOR_DRAW)]);
    assert!(core.strokes.is_empty());
}

#[test]
fn pan_offset_does_not_accumulate_across_moves() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_mods());
    for x in [10.0, 20.0, 30.0, 40.0] {
        core.on_pointer_move(pt(x, 0.0));
    }
    assert_eq!(core.viewport().offset(), pt(40.0, 0.0));
}

#[test]
fn pan_cursor_is_reported_after_pan() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Secondary, no_mods());
    let actions = core.on_pointer_move(pt(10.0, 10.0));
    // The world point under the pointer is where the drag started.
    assert_eq!(actions.last(), Some(&Action::CursorMoved(pt(0.0, 0.0))));
}

#[test]
fn pointer_up_after_draw_keeps_cursor() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    assert!(core.on_pointer_up().is_empty());
}

// --- Wheel ---

#[test]
fn wheel_up_zooms_in_about_pointer() {
    let mut core = EngineCore::new();
    let pointer = pt(200.0, 150.0);
    let before = core.viewport().screen_to_world(pointer);
    let actions = core.on_wheel(pointer, WheelDelta { dx: 0.0, dy: -100.0 });
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert!((core.viewport().scale - 1.1).abs() < 1e-12);
    let after = core.viewport().screen_to_world(pointer);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
}

#[test]
fn wheel_down_zooms_out() {
    let mut core = EngineCore::new();
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 3.0 });
    assert!((core.viewport().scale - 0.9).abs() < 1e-12);
}

#[test]
fn horizontal_only_wheel_is_ignored() {
    let mut core = EngineCore::new();
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 40.0, dy: 0.0 }).is_empty());
    assert_eq!(core.viewport(), Viewport::default());
}

#[test]
fn wheel_at_scale_limit_needs_no_render() {
    let mut core = EngineCore::new();
    core.viewport.scale = crate::consts::MAX_SCALE;
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }).is_empty());
}

// --- Remote data ---

#[test]
fn remote_strokes_append_in_arrival_order() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_mods());
    let local = drawn(&core.on_pointer_move(pt(1.0, 1.0))).remove(0);
    core.apply_remote_stroke(remote(5.0));
    core.apply_remote_stroke(remote(5.0));
    assert_eq!(core.strokes.strokes(), &[local, remote(5.0), remote(5.0)]);
}

#[test]
fn load_history_replaces_and_clear_empties() {
    let mut core = EngineCore::new();
    core.apply_remote_stroke(remote(9.0));
    core.load_history(vec![remote(1.0), remote(2.0)]);
    assert_eq!(core.strokes.strokes(), &[remote(1.0), remote(2.0)]);
    core.clear();
    assert!(core.strokes.is_empty());
}

#[test]
fn frame_reflects_viewport_state() {
    let mut core = EngineCore::new();
    core.set_viewport(320.0, 240.0, 1.5);
    let frame = core.frame();
    assert_eq!((frame.width, frame.height, frame.dpr), (320.0, 240.0, 1.5));
    assert_eq!(frame.viewport, core.viewport());
}
