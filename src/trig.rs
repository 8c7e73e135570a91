/*
 *  trig.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sine and cosine, float and fixed-point
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
#![allow(clippy::excessive_precision)]
//! Pure-Rust f32 sine/cosine plus the fixed-point lookups the hand geometry
//! rotates with. Fixed-point results are scaled by [`TRIG_MAX_RATIO`] and
//! take angles in the [`TRIG_MAX_ANGLE`] unit.

use embedded_graphics::prelude::Point;

use crate::angle::TRIG_MAX_ANGLE;

/// Fixed-point 1.0 for sine/cosine lookups.
pub const TRIG_MAX_RATIO: i32 = 0xffff;

const TURN: f32 = 2.0 * core::f32::consts::PI;

/// Compute sin(x) for f32 without libm.
pub fn sinf(x: f32) -> f32 {
    let (r, q) = reduce_pi_over_2(x);
    let s = sin_poly(r);
    let c = cos_poly(r);

    match q & 3 {
        0 =>  s,   //   sin(r)
        1 =>  c,   //   sin(pi/2 + r) =  cos(r)
        2 => -s,   //   sin(pi + r)   = -sin(r)
        _ => -c,   //   sin(3pi/2+r)  = -cos(r)
    }
}

/// Compute cos(x) for f32 without libm.
pub fn cosf(x: f32) -> f32 {
    let (r, q) = reduce_pi_over_2(x);
    let s = sin_poly(r);
    let c = cos_poly(r);

    match q & 3 {
        0 =>  c,   // cos(r)
        1 => -s,   // cos(pi/2 + r)  = -sin(r)
        2 => -c,   // cos(pi + r)    = -cos(r)
        _ =>  s,   // cos(3pi/2 + r) =  sin(r)
    }
}

/// Fixed-point angle to radians, reduced to one turn first.
#[inline]
pub fn angle_to_radians(angle: i32) -> f32 {
    angle.rem_euclid(TRIG_MAX_ANGLE) as f32 * TURN / TRIG_MAX_ANGLE as f32
}

/// sin(angle) scaled by TRIG_MAX_RATIO.
pub fn sin_lookup(angle: i32) -> i32 {
    (sinf(angle_to_radians(angle)) * TRIG_MAX_RATIO as f32).round() as i32
}

/// cos(angle) scaled by TRIG_MAX_RATIO.
pub fn cos_lookup(angle: i32) -> i32 {
    (cosf(angle_to_radians(angle)) * TRIG_MAX_RATIO as f32).round() as i32
}

/// Rotate a point about the origin, clockwise on a y-down screen.
pub fn rotate_point(p: Point, angle: i32) -> Point {
    let s = sin_lookup(angle) as i64;
    let c = cos_lookup(angle) as i64;
    let (x, y) = (p.x as i64, p.y as i64);
    Point::new(
        div_round(x * c - y * s, TRIG_MAX_RATIO as i64) as i32,
        div_round(x * s + y * c, TRIG_MAX_RATIO as i64) as i32,
    )
}

#[inline]
fn div_round(n: i64, d: i64) -> i64 {
    if n >= 0 { (n + d / 2) / d } else { (n - d / 2) / d }
}

// ---------- Internals ----------

#[inline(always)]
fn reduce_pi_over_2(x: f32) -> (f32, i32) {
    // Cody-Waite: n = round(x / (pi/2))
    const INV_PIO2: f32 = 0.63661977236758134308_f32; // 2/pi
    const PIO2_1:  f32 = 1.57079625129699707031_f32;  // High part of pi/2
    const PIO2_2:  f32 = 7.54978941586159635335e-08_f32; // Low part (compensation)

    let n = (x * INV_PIO2).round();
    let n_i = n as i32;
    let r = (x - n * PIO2_1) - n * PIO2_2;

    (r, n_i)
}

#[inline(always)]
fn sin_poly(r: f32) -> f32 {
    // Cephes single-precision minimax for |r| <= pi/4
    const S1: f32 = -1.6666667163e-1;
    const S2: f32 =  8.3333337680e-3;
    const S3: f32 = -1.9841270114e-4;
    const S4: f32 =  2.7557314297e-6;
    const S5: f32 = -2.5050759689e-8;
    const S6: f32 =  1.5896910177e-10;

    let z = r * r;
    let p = (((((S6 * z + S5) * z + S4) * z + S3) * z + S2) * z + S1) * z;
    r + r * p
}

#[inline(always)]
fn cos_poly(r: f32) -> f32 {
    const C1: f32 =  4.1666667908e-2;
    const C2: f32 = -1.3888889225e-3;
    const C3: f32 =  2.4801587642e-5;
    const C4: f32 = -2.7557314297e-7;
    const C5: f32 =  2.0875723372e-9;
    const C6: f32 = -1.1359647598e-11;

    let z = r * r;
    let p = (((((C6 * z + C5) * z + C4) * z + C3) * z + C2) * z + C1) * z;
    1.0 + p
}
