use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

pub const YARDS_PER_NAUTICAL_MILE: f64 = 2025.4;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Knots to yards per second.
pub fn knots_to_yps(knots: f64) -> f64 {
    knots * YARDS_PER_NAUTICAL_MILE / SECONDS_PER_HOUR
}

// ---------------------------------------------------------------------------
// Angle normalization (degrees)
// ---------------------------------------------------------------------------

/// Normalize to the half-open interval (-180, 180].
pub fn normalize_signed(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Normalize to [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Compass heading (clockwise from north) to a unit vector, x = East, y = North.
pub fn heading_vector(heading_deg: f64) -> (f64, f64) {
    let rad = heading_deg.to_radians();
    (rad.sin(), rad.cos())
}

// ---------------------------------------------------------------------------
// Port / starboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    Port,
    #[default]
    Starboard,
}

impl Side {
    /// Starboard for non-negative signed angles, port otherwise.
    pub fn of(signed_angle: f64) -> Self {
        if signed_angle >= 0.0 {
            Side::Starboard
        } else {
            Side::Port
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Side::Port => 'P',
            Side::Starboard => 'S',
        }
    }
}
