use super::types::{Arrow, BoundingBox, ChipPlacement, ConnectorPath, PathCommand, Point};
use crate::config::{ConnectorConfig, ConnectorStyle};
use crate::ir::Side;

const FIRST_CONTROL: f32 = 0.33;
const SECOND_CONTROL: f32 = 0.66;

pub fn build_connector(
    anchor: Point,
    placement: &ChipPlacement,
    config: &ConnectorConfig,
) -> ConnectorPath {
    match config.style {
        ConnectorStyle::Squiggle => connector_path(anchor, placement.center, config),
        ConnectorStyle::Rule => rule_connector(anchor, placement.center, placement.side, config),
    }
}

fn local_box(a: Point, b: Point, pad: f32) -> BoundingBox {
    BoundingBox {
        left: a.x.min(b.x) - pad,
        top: a.y.min(b.y) - pad,
        width: (a.x - b.x).abs() + pad * 2.0,
        height: (a.y - b.y).abs() + pad * 2.0,
    }
}

/// S-curve from the cell anchor to the chip centre. The two control points
/// sit at a third and two thirds of the chord, pushed to opposite sides of it
/// by `squiggle_amplitude`.
pub fn connector_path(anchor: Point, center: Point, config: &ConnectorConfig) -> ConnectorPath {
    let bbox = local_box(anchor, center, config.padding);
    let start = bbox.to_local(anchor);
    let end = bbox.to_local(center);

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy).max(1.0);
    let nx = (-dy / len) * config.squiggle_amplitude;
    let ny = (dx / len) * config.squiggle_amplitude;

    let c1 = Point::new(
        start.x + dx * FIRST_CONTROL + nx,
        start.y + dy * FIRST_CONTROL + ny,
    );
    let c2 = Point::new(
        start.x + dx * SECOND_CONTROL - nx,
        start.y + dy * SECOND_CONTROL - ny,
    );

    ConnectorPath {
        bbox,
        commands: vec![
            PathCommand::Move { to: start },
            PathCommand::Cubic { c1, c2, to: end },
        ],
        arrow: None,
    }
}

/// Straight hairline with an arrowhead pointing at the chip. Horizontal for
/// side chips. For top chips it is vertical, leaves from the anchor and stops
/// at or before the chip edge.
pub fn rule_connector(
    anchor: Point,
    center: Point,
    side: Side,
    config: &ConnectorConfig,
) -> ConnectorPath {
    let (from, to, arrow) = match side {
        Side::Left | Side::Right => {
            let is_left = side == Side::Left;
            let inset = if is_left {
                config.rule_start_inset_left
            } else {
                config.rule_start_inset_right
            };
            let line_left = anchor.x.min(center.x) + inset;
            let line_right = anchor.x.max(center.x) - config.rule_end_inset;
            let width = (line_right - line_left).max(config.rule_min_length);
            let arrow = if is_left {
                Arrow {
                    at: Point::new(center.x + config.arrow_inset, anchor.y),
                    rotation_deg: 180.0,
                }
            } else {
                Arrow {
                    at: Point::new(center.x - config.arrow_inset, anchor.y),
                    rotation_deg: 0.0,
                }
            };
            (
                Point::new(line_left, anchor.y),
                Point::new(line_left + width, anchor.y),
                arrow,
            )
        }
        Side::Top => {
            // never longer than the gap between anchor and chip edge
            let span = (center.y - anchor.y).abs();
            let direction = if center.y <= anchor.y { -1.0 } else { 1.0 };
            let length = if span - config.rule_end_inset >= config.rule_min_length {
                span - config.rule_end_inset
            } else {
                span
            };
            let tip = Point::new(anchor.x, anchor.y + direction * length);
            let arrow = Arrow {
                at: tip,
                rotation_deg: if direction < 0.0 { -90.0 } else { 90.0 },
            };
            (anchor, tip, arrow)
        }
    };

    let bbox = local_box(from, to, config.padding).union(&local_box(
        arrow.at,
        arrow.at,
        config.padding,
    ));
    ConnectorPath {
        bbox,
        commands: vec![
            PathCommand::Move {
                to: bbox.to_local(from),
            },
            PathCommand::Line {
                to: bbox.to_local(to),
            },
        ],
        arrow: Some(Arrow {
            at: bbox.to_local(arrow.at),
            rotation_deg: arrow.rotation_deg,
        }),
    }
}
