// Touch/drag handling. Visual outcomes:
// - Dragging slides the whole constellation a little (parallax), with or against the finger.
// - Releasing may scatter the points in new random directions.

/// Raw pointer input as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up,
    Cancel,
    /// Pointer left the surface mid-gesture.
    Outside,
}

/// Divisor that turns finger travel into point travel.
pub const PARALLAX_DAMPING: i32 = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging { start: (i32, i32) },
}

/// What the field should do in response to one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureAction {
    /// Consumed, nothing to change.
    Consumed,
    /// Drag from `start` to `end`; the field derives the shift.
    Parallax { start: (i32, i32), end: (i32, i32) },
    /// Finger lifted.
    Release,
    /// Not ours; let the host handle it.
    Ignored,
}

impl GestureAction {
    pub fn handled(self) -> bool {
        self != GestureAction::Ignored
    }
}

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn handle(&mut self, event: PointerEvent) -> GestureAction {
        match (event, self.phase) {
            (PointerEvent::Down { x, y }, _) => {
                self.phase = GesturePhase::Dragging { start: (x, y) };
                GestureAction::Consumed
            }
            (PointerEvent::Move { x, y }, GesturePhase::Dragging { start }) => {
                GestureAction::Parallax { start, end: (x, y) }
            }
            // No recorded start: a stray move is dropped rather than measured from (0,0).
            (PointerEvent::Move { .. }, GesturePhase::Idle) => GestureAction::Ignored,
            (PointerEvent::Up, _) => {
                self.phase = GesturePhase::Idle;
                GestureAction::Release
            }
            (PointerEvent::Cancel | PointerEvent::Outside, _) => {
                self.phase = GesturePhase::Idle;
                GestureAction::Ignored
            }
        }
    }
}

/// Per-point shift for a drag, truncated toward zero.
pub fn parallax_shift(start: (i32, i32), end: (i32, i32), same_direction: bool) -> (i32, i32) {
    if same_direction {
        ((end.0 - start.0) / PARALLAX_DAMPING, (end.1 - start.1) / PARALLAX_DAMPING)
    } else {
        ((start.0 - end.0) / PARALLAX_DAMPING, (start.1 - end.1) / PARALLAX_DAMPING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_cycle() {
        let mut g = GestureTracker::new();
        assert_eq!(g.handle(PointerEvent::Down { x: 10, y: 20 }), GestureAction::Consumed);
        assert_eq!(g.phase(), GesturePhase::Dragging { start: (10, 20) });

        // Every move is measured from the original start, not the previous move.
        assert_eq!(
            g.handle(PointerEvent::Move { x: 50, y: 20 }),
            GestureAction::Parallax { start: (10, 20), end: (50, 20) }
        );
        assert_eq!(
            g.handle(PointerEvent::Move { x: 90, y: 0 }),
            GestureAction::Parallax { start: (10, 20), end: (90, 0) }
        );

        assert_eq!(g.handle(PointerEvent::Up), GestureAction::Release);
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut g = GestureTracker::new();
        let action = g.handle(PointerEvent::Move { x: 400, y: 0 });
        assert_eq!(action, GestureAction::Ignored);
        assert!(!action.handled());
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn cancel_and_outside_end_the_drag_unhandled() {
        for ev in [PointerEvent::Cancel, PointerEvent::Outside] {
            let mut g = GestureTracker::new();
            g.handle(PointerEvent::Down { x: 1, y: 1 });
            assert!(!g.handle(ev).handled());
            assert_eq!(g.phase(), GesturePhase::Idle);
            assert_eq!(g.handle(PointerEvent::Move { x: 100, y: 100 }), GestureAction::Ignored);
        }
    }

    #[test]
    fn shift_sign_follows_direction_flag() {
        assert_eq!(parallax_shift((0, 0), (400, 0), true), (10, 0));
        assert_eq!(parallax_shift((0, 0), (400, 0), false), (-10, 0));
    }

    #[test]
    fn shift_truncates_toward_zero() {
        assert_eq!(parallax_shift((0, 0), (-79, 79), true), (-1, 1));
        assert_eq!(parallax_shift((0, 0), (39, -39), true), (0, 0));
        assert_eq!(parallax_shift((100, 100), (21, 181), false), (1, -2));
    }
}
