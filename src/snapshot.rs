// src/snapshot.rs

//! The persisted interaction state that survives a surface teardown.
//!
//! The host treats the saved form as an opaque, fixed-size blob. It hands the
//! blob back verbatim on the next start, so the layout below must stay stable:
//!
//! | offset | size | field    | encoding         |
//! |--------|------|----------|------------------|
//! | 0      | 4    | `angle`  | f32 little-endian|
//! | 4      | 4    | `last_x` | i32 little-endian|
//! | 8      | 4    | `last_y` | i32 little-endian|

use thiserror::Error;

/// Size in bytes of a serialized [`Snapshot`].
pub const SNAPSHOT_LEN: usize = 12;

/// The opaque blob handed to the host on a save request.
pub type SavedState = [u8; SNAPSHOT_LEN];

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("saved state must be {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("saved angle {0} is outside [0, 1)")]
    AngleOutOfRange(f32),
}

/// Minimal animation and interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    /// Animation phase, always in `[0, 1)`.
    pub angle: f32,
    /// Last motion coordinate on the x axis, in surface pixels.
    pub last_x: i32,
    /// Last motion coordinate on the y axis, in surface pixels.
    pub last_y: i32,
}

impl Snapshot {
    /// Advances the animation phase by `step`, wrapping to zero at 1.0.
    pub fn advance(&mut self, step: f32) {
        self.angle += step;
        if self.angle >= 1.0 {
            self.angle = 0.0;
        }
    }

    /// Records the coordinates of the first pointer of a motion event.
    pub fn record_pointer(&mut self, x: f32, y: f32) {
        // `as` truncates toward zero and saturates at the i32 bounds.
        self.last_x = x as i32;
        self.last_y = y as i32;
    }

    pub fn to_bytes(&self) -> SavedState {
        let mut out = [0u8; SNAPSHOT_LEN];
        out[0..4].copy_from_slice(&self.angle.to_le_bytes());
        out[4..8].copy_from_slice(&self.last_x.to_le_bytes());
        out[8..12].copy_from_slice(&self.last_y.to_le_bytes());
        out
    }

    /// Restores a snapshot from a blob previously produced by [`Snapshot::to_bytes`].
    ///
    /// Rejects a blob whose angle is not a finite value in `[0, 1)`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let blob: &SavedState = bytes.try_into().map_err(|_| SnapshotError::BadLength {
            expected: SNAPSHOT_LEN,
            actual: bytes.len(),
        })?;

        let field = |at: usize| [blob[at], blob[at + 1], blob[at + 2], blob[at + 3]];
        let angle = f32::from_le_bytes(field(0));
        // NaN fails the range check too.
        if !(0.0..1.0).contains(&angle) {
            return Err(SnapshotError::AngleOutOfRange(angle));
        }
        Ok(Self {
            angle,
            last_x: i32::from_le_bytes(field(4)),
            last_y: i32::from_le_bytes(field(8)),
        })
    }
}
