use strata_geom::Vec3;

/// Default interaction reach in blocks.
pub const REACH: f32 = 5.0;
/// Distance between successive samples along the ray.
pub const STEP: f32 = 0.05;
/// Tolerance for matching a sample point to a cell face. Must exceed `STEP`
/// so the first sample inside a cell is always within range of the face it crossed.
pub const FACE_EPSILON: f32 = 0.06;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub block: (i32, i32, i32),
    /// Outward normal of the face that was hit, or (0,0,0) when no face plane
    /// matched (e.g. the ray started inside the block).
    pub normal: (i32, i32, i32),
}

impl RayHit {
    /// The empty cell in front of the hit face, where a new block would go.
    pub fn place_target(&self) -> (i32, i32, i32) {
        (
            self.block.0 + self.normal.0,
            self.block.1 + self.normal.1,
            self.block.2 + self.normal.2,
        )
    }
}

/// Fixed-step march from `origin` along `dir`; the first sample that lands in
/// a solid cell ends the ray. Thin features between samples can be skipped.
pub fn cast<F>(origin: Vec3, dir: Vec3, max_dist: f32, mut is_solid: F) -> Option<RayHit>
where
    F: FnMut(i32, i32, i32) -> bool,
{
    let len = dir.length();
    if len < 1e-6 {
        return None;
    }
    let d = dir / len;
    let steps = (max_dist / STEP).ceil().max(0.0) as u32;
    for k in 0..steps {
        // Scale from the origin each time; accumulating would drift
        let p = origin + d * (k as f32 * STEP);
        let (x, y, z) = p.cell();
        if is_solid(x, y, z) {
            let local = p - Vec3::new(x as f32, y as f32, z as f32);
            return Some(RayHit {
                block: (x, y, z),
                normal: face_normal(local),
            });
        }
    }
    None
}

/// Checks the six face planes in order x-low, x-high, y-low, y-high, z-low, z-high.
fn face_normal(local: Vec3) -> (i32, i32, i32) {
    let hi = 1.0 - FACE_EPSILON;
    if local.x < FACE_EPSILON {
        (-1, 0, 0)
    } else if local.x > hi {
        (1, 0, 0)
    } else if local.y < FACE_EPSILON {
        (0, -1, 0)
    } else if local.y > hi {
        (0, 1, 0)
    } else if local.z < FACE_EPSILON {
        (0, 0, -1)
    } else if local.z > hi {
        (0, 0, 1)
    } else {
        (0, 0, 0)
    }
}
