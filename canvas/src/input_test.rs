use super::*;

// --- Tool ---

#[test]
fn tool_default_is_pen() {
    assert_eq!(Tool::default(), Tool::Pen);
}

// --- Button ---

#[test]
fn button_from_dom_codes() {
    assert_eq!(Button::from_dom(0), Some(Button::Primary));
    assert_eq!(Button::from_dom(1), Some(Button::Middle));
    assert_eq!(Button::from_dom(2), Some(Button::Secondary));
    assert_eq!(Button::from_dom(3), None);
    assert_eq!(Button::from_dom(-1), None);
}

// --- Classification ---

#[test]
fn primary_without_alt_draws() {
    assert!(!is_pan_gesture(Button::Primary, Modifiers::default()));
}

#[test]
fn primary_with_alt_pans() {
    let mods = Modifiers { alt: true, ..Modifiers::default() };
    assert!(is_pan_gesture(Button::Primary, mods));
}

#[test]
fn middle_and_secondary_pan() {
    assert!(is_pan_gesture(Button::Middle, Modifiers::default()));
    assert!(is_pan_gesture(Button::Secondary, Modifiers::default()));
}

#[test]
fn other_modifiers_do_not_pan() {
    let mods = Modifiers { shift: true, ctrl: true, meta: true, alt: false };
    assert!(!is_pan_gesture(Button::Primary, mods));
}

// --- Gesture ---

#[test]
fn gesture_default_is_idle() {
    assert!(Gesture::default().is_idle());
}

#[test]
fn active_gestures_are_not_idle() {
    let drawing = Gesture::Drawing { last_world: Point::new(1.0, 2.0) };
    let panning = Gesture::Panning { start_screen: Point::new(0.0, 0.0), start_offset: Point::new(3.0, 4.0) };
    assert!(!drawing.is_idle());
    assert!(!panning.is_idle());
}
