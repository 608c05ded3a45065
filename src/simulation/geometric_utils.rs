//! Geometric utility functions for distance, angle and wrap-around calculations.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use std::f32::consts::{PI, TAU};

/// Euclidean distance between two points on the plane (no wrap-around).
pub fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    Euclidean.distance(a, b)
}

/// Wraps a position around the field boundaries (toroidal topology).
///
/// The result always lies in `[0, width) x [0, height)`.
pub fn wrap_around(p: Point<f32>, width: f32, height: f32) -> Point<f32> {
    Point::new(wrap_axis(p.x(), width), wrap_axis(p.y(), height))
}

fn wrap_axis(v: f32, extent: f32) -> f32 {
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_signed_angle(angle: f32) -> f32 {
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Checks whether `target` lies inside the vision cone of an observer.
///
/// The cone is open on both bounds: the target must be strictly closer than
/// `length` and strictly within `half_angle` of `facing`.
pub fn in_vision_cone(
    observer: Point<f32>,
    facing: f32,
    length: f32,
    half_angle: f32,
    target: Point<f32>,
) -> Option<f32> {
    let dist = distance(observer, target);
    if dist >= length {
        return None;
    }
    let delta = target - observer;
    let bearing = delta.y().atan2(delta.x());
    if wrap_signed_angle(bearing - facing).abs() < half_angle {
        Some(dist)
    } else {
        None
    }
}
