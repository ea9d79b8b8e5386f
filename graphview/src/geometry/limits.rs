// Centralized ingestion limits to harden against untrusted markup and payloads

// Fragment caps
pub const MAX_FRAGMENT_BYTES: usize = 8 * 1024 * 1024;
pub const MAX_NODES: usize = 100_000;
pub const MAX_EDGES: usize = 200_000;

// Command input cap (characters)
pub const MAX_COMMAND_LEN: usize = 4096;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const EXTENT_MAX: f32 = 100_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_extent_bounds(w: f32) -> bool { w.is_finite() && w >= 0.0 && w <= EXTENT_MAX }
