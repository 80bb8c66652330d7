use serde::Serialize;

use crate::config::ChipTransform;
use crate::ir::{CalendarSignal, Side};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.left, point.y - self.top)
    }

    pub fn to_global(&self, point: Point) -> Point {
        Point::new(point.x + self.left, point.y + self.top)
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        BoundingBox {
            left,
            top,
            width: self.right().max(other.right()) - left,
            height: self.bottom().max(other.bottom()) - top,
        }
    }
}

/// A day resolved onto the 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub day: i32,
    pub row: i32,
    pub col: i32,
    /// Top-left corner of the cell.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Where the connector leaves the cell.
    pub anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChipPlacement {
    pub center: Point,
    /// Centre x before clamping to the panel.
    pub raw_center_x: f32,
    pub side: Side,
    pub transform: ChipTransform,
}

impl ChipPlacement {
    pub fn anchor_css(&self) -> String {
        self.transform.css()
    }

    pub fn was_clamped(&self) -> bool {
        self.raw_center_x != self.center.x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PathCommand {
    Move { to: Point },
    Line { to: Point },
    Cubic { c1: Point, c2: Point, to: Point },
}

impl PathCommand {
    pub fn end(&self) -> Point {
        match self {
            PathCommand::Move { to } | PathCommand::Line { to } | PathCommand::Cubic { to, .. } => {
                *to
            }
        }
    }
}

/// Arrowhead drawn by the rule connector, in the connector's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrow {
    pub at: Point,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorPath {
    /// Drawing surface in panel coordinates; commands are relative to its top-left.
    pub bbox: BoundingBox,
    pub commands: Vec<PathCommand>,
    pub arrow: Option<Arrow>,
}

impl ConnectorPath {
    pub fn start(&self) -> Option<Point> {
        self.commands.first().map(PathCommand::end)
    }

    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(PathCommand::end)
    }

    pub fn is_finite(&self) -> bool {
        self.commands.iter().all(|cmd| match cmd {
            PathCommand::Move { to } | PathCommand::Line { to } => to.is_finite(),
            PathCommand::Cubic { c1, c2, to } => {
                c1.is_finite() && c2.is_finite() && to.is_finite()
            }
        })
    }

    /// SVG path data with two-decimal coordinates.
    pub fn d(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            match cmd {
                PathCommand::Move { to } => {
                    d.push_str(&format!("M {} {}", fmt2(to.x), fmt2(to.y)));
                }
                PathCommand::Line { to } => {
                    d.push_str(&format!("L {} {}", fmt2(to.x), fmt2(to.y)));
                }
                PathCommand::Cubic { c1, c2, to } => {
                    d.push_str(&format!(
                        "C {} {}, {} {}, {} {}",
                        fmt2(c1.x),
                        fmt2(c1.y),
                        fmt2(c2.x),
                        fmt2(c2.y),
                        fmt2(to.x),
                        fmt2(to.y)
                    ));
                }
            }
        }
        d
    }
}

pub(crate) fn fmt2(value: f32) -> String {
    let text = format!("{value:.2}");
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellLayout {
    pub day: i32,
    pub row: i32,
    pub col: i32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub hot: bool,
    /// Signal dot in the cell's top-right corner: centre and diameter.
    pub marker: Option<(Point, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalLayout {
    pub signal: CalendarSignal,
    pub cell: GridCell,
    pub placement: ChipPlacement,
    pub connector: ConnectorPath,
}

impl SignalLayout {
    pub fn anchor(&self) -> Point {
        self.cell.anchor
    }

    pub fn chip_center(&self) -> Point {
        self.placement.center
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSignal {
    pub index: usize,
    pub signal: CalendarSignal,
    pub reason: super::LayoutError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarLayout {
    pub cells: Vec<CellLayout>,
    pub signals: Vec<SignalLayout>,
    pub skipped: Vec<SkippedSignal>,
    pub width: f32,
    pub height: f32,
}

impl CalendarLayout {
    pub fn signal_for_day(&self, day: i32) -> Option<&SignalLayout> {
        self.signals.iter().find(|layout| layout.signal.day == day)
    }
}
