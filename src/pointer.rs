use crate::events::{PointerMove, PointerOver};

const PRIMARY_HALF_SIZE: f64 = 12.0;
const TRAIL_HALF_SIZE: f64 = 4.0;
const INTERACTIVE_SCALE: f64 = 1.5;

/// What the overlay needs to know about the element under the pointer.
#[derive(Clone, Copy, Debug)]
pub struct TargetTraits<'a> {
    pub cursor: &'a str,
    pub tag_name: &'a str,
    pub role: Option<&'a str>,
}

pub fn is_interactive(target: TargetTraits<'_>) -> bool {
    if target.cursor.trim().eq_ignore_ascii_case("pointer") {
        return true;
    }

    if target.tag_name.eq_ignore_ascii_case("button") || target.tag_name.eq_ignore_ascii_case("a") {
        return true;
    }

    matches!(
        target.role.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("button" | "link")
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
    pub is_over_interactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    Moved(PointerMove),
    Over(PointerOver),
}

impl PointerState {
    /// Latest write wins; the interactive flag is recomputed from every event.
    pub fn apply(self, action: PointerAction) -> Self {
        match action {
            PointerAction::Moved(event) => Self {
                x: event.client_x,
                y: event.client_y,
                is_over_interactive: event.target_interactive,
            },
            PointerAction::Over(event) => Self {
                is_over_interactive: event.target_interactive,
                ..self
            },
        }
    }

    pub fn primary_transform(&self) -> String {
        let scale = if self.is_over_interactive {
            INTERACTIVE_SCALE
        } else {
            1.0
        };
        format!(
            "transform: translate({:.1}px, {:.1}px) scale({scale});",
            self.x - PRIMARY_HALF_SIZE,
            self.y - PRIMARY_HALF_SIZE
        )
    }

    pub fn trail_transform(&self) -> String {
        format!(
            "transform: translate({:.1}px, {:.1}px);",
            self.x - TRAIL_HALF_SIZE,
            self.y - TRAIL_HALF_SIZE
        )
    }
}
