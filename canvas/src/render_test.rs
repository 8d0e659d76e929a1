#![allow(clippy::float_cmp)]

use super::*;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Transform(f64, f64, f64),
    Rect(f64, f64, f64, f64, String),
    Dot(f64, f64, f64),
    Segment(Stroke),
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
    fail_dots: bool,
}

impl Surface for Recorder {
    type Error = String;

    fn set_transform(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), String> {
        self.ops.push(Op::Transform(scale, dx, dy));
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ops.push(Op::Rect(x, y, w, h, color.to_owned()));
    }

    fn fill_dot(&mut self, x: f64, y: f64, radius: f64, _color: &str) -> Result<(), String> {
        if self.fail_dots {
            return Err("arc failed".into());
        }
        self.ops.push(Op::Dot(x, y, radius));
        Ok(())
    }

    fn stroke_segment(&mut self, stroke: &Stroke) {
        self.ops.push(Op::Segment(stroke.clone()));
    }
}

impl Recorder {
    fn dots(&self) -> Vec<(f64, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Dot(x, y, r) => Some((*x, *y, *r)),
                _ => None,
            })
            .collect()
    }

    fn segments(&self) -> Vec<Stroke> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Segment(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

fn stroke(x: f64, color: &str) -> Stroke {
    Stroke { x0: x, y0: 0.0, x1: x, y1: 10.0, color: color.into(), width: 2.0 }
}

fn frame(viewport: Viewport, width: f64, height: f64) -> Frame {
    Frame { viewport, width, height, dpr: 1.0 }
}

#[test]
fn background_is_painted_first_in_screen_space() {
    let mut rec = Recorder::default();
    draw_scene(&mut rec, &frame(Viewport::default(), 100.0, 80.0), &[]).unwrap();
    assert_eq!(rec.ops[0], Op::Transform(1.0, 0.0, 0.0));
    assert_eq!(rec.ops[1], Op::Rect(0.0, 0.0, 100.0, 80.0, BACKGROUND.to_owned()));
}

#[test]
fn world_transform_follows_viewport_and_dpr() {
    let mut rec = Recorder::default();
    let vp = Viewport { offset_x: 10.0, offset_y: -4.0, scale: 3.0 };
    let f = Frame { viewport: vp, width: 50.0, height: 50.0, dpr: 2.0 };
    draw_scene(&mut rec, &f, &[]).unwrap();
    assert_eq!(rec.ops[0], Op::Transform(2.0, 0.0, 0.0));
    assert_eq!(rec.ops[2], Op::Transform(6.0, 20.0, -8.0));
}

#[test]
fn strokes_draw_after_grid_in_arrival_order() {
    let mut rec = Recorder::default();
    let strokes = vec![stroke(1.0, "#111111"), stroke(2.0, "#222222"), stroke(1.0, "#111111")];
    draw_scene(&mut rec, &frame(Viewport::default(), 100.0, 100.0), &strokes).unwrap();

    assert_eq!(rec.segments(), strokes);
    let last_dot = rec.ops.iter().rposition(|op| matches!(op, Op::Dot(..))).unwrap();
    let first_seg = rec.ops.iter().position(|op| matches!(op, Op::Segment(_))).unwrap();
    assert!(last_dot < first_seg);
}

#[test]
fn grid_covers_visible_world_at_identity() {
    let mut rec = Recorder::default();
    draw_scene(&mut rec, &frame(Viewport::default(), 100.0, 50.0), &[]).unwrap();

    // Columns 0, 40, 80; rows 0, 40.
    let dots = rec.dots();
    assert_eq!(dots.len(), 6);
    assert!(dots.contains(&(0.0, 0.0, GRID_DOT_RADIUS_PX)));
    assert!(dots.contains(&(80.0, 40.0, GRID_DOT_RADIUS_PX)));
}

#[test]
fn grid_is_anchored_at_world_origin_when_panned() {
    let mut rec = Recorder::default();
    let vp = Viewport { offset_x: 50.0, offset_y: 50.0, scale: 1.0 };
    draw_scene(&mut rec, &frame(vp, 100.0, 100.0), &[]).unwrap();

    // Visible world is [-50, 50] on both axes: indices -1..=1.
    let dots = rec.dots();
    assert_eq!(dots.len(), 9);
    for (x, y, _) in dots {
        assert_eq!(x % GRID_SPACING, 0.0);
        assert_eq!(y % GRID_SPACING, 0.0);
        assert!((-50.0..=50.0).contains(&x));
        assert!((-50.0..=50.0).contains(&y));
    }
}

#[test]
fn grid_dot_radius_is_constant_on_screen() {
    let mut rec = Recorder::default();
    let vp = Viewport { scale: 2.0, ..Viewport::default() };
    draw_scene(&mut rec, &frame(vp, 100.0, 100.0), &[]).unwrap();
    let (_, _, r) = rec.dots()[0];
    assert_eq!(r * vp.scale, GRID_DOT_RADIUS_PX);
}

#[test]
fn surface_errors_propagate() {
    let mut rec = Recorder { fail_dots: true, ..Recorder::default() };
    let err = draw_scene(&mut rec, &frame(Viewport::default(), 100.0, 100.0), &[stroke(1.0, "#fff")]);
    assert_eq!(err, Err("arc failed".to_owned()));
    assert!(rec.segments().is_empty());
}

#[test]
fn grid_range_rounds_inward() {
    assert_eq!(grid_range(-50.0, 50.0, GRID_SPACING), (-1, 1));
    assert_eq!(grid_range(0.0, 39.9, GRID_SPACING), (0, 0));
    assert_eq!(grid_range(1.0, 39.0, GRID_SPACING), (1, 0));
}

#[test]
fn grid_step_keeps_base_spacing_when_dots_are_far_apart() {
    assert_eq!(grid_step(1.0), GRID_SPACING);
    assert_eq!(grid_step(0.5), GRID_SPACING);
    assert_eq!(grid_step(20.0), GRID_SPACING);
}

#[test]
fn grid_step_doubles_when_zoomed_out() {
    // 40 * 0.05 = 2px on screen; doubled three times reaches 16px.
    assert_eq!(grid_step(0.05), GRID_SPACING * 8.0);
    assert_eq!(grid_step(0.2), GRID_SPACING * 2.0);
    assert_eq!(grid_step(0.25), GRID_SPACING * 2.0);
}

#[test]
fn grid_step_ignores_degenerate_scale() {
    assert_eq!(grid_step(0.0), GRID_SPACING);
    assert_eq!(grid_step(f64::NAN), GRID_SPACING);
}

#[test]
fn zoomed_out_grid_is_thinned_and_stays_on_base_grid() {
    let mut rec = Recorder::default();
    let vp = Viewport { offset_x: 100.0, offset_y: 100.0, scale: crate::consts::MIN_SCALE };
    draw_scene(&mut rec, &frame(vp, 1920.0, 1080.0), &[]).unwrap();

    // Visible world is about [-2000, 36400] x [-2000, 19600]; at a 320 step
    // that is columns -6..=113 and rows -6..=61.
    let dots = rec.dots();
    assert_eq!(dots.len(), 120 * 68);
    for (x, y, _) in dots {
        assert_eq!(x % (GRID_SPACING * 8.0), 0.0);
        assert_eq!(y % (GRID_SPACING * 8.0), 0.0);
    }
}
