use std::ops::RangeInclusive;

use strata_blocks::BlockType;
use strata_geom::{Aabb, Vec3};

/// Downward acceleration in blocks/s^2.
pub const GRAVITY: f32 = 20.0;
/// Distance below the feet at which the ground probe samples.
pub const GROUND_PROBE: f32 = 0.1;

/// Movement intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkInput {
    /// Desired horizontal direction; y is ignored and the rest is normalized.
    pub wish: Vec3,
    pub jump: bool,
}

impl WalkInput {
    pub fn toward(wish: Vec3) -> Self {
        Self { wish, jump: false }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Walker {
    pub pos: Vec3, // feet position (x,z at center, y at feet)
    pub vel: Vec3,
    pub on_ground: bool,
    pub height: f32,
    pub radius: f32,     // horizontal half-width of the box
    pub speed: f32,      // walk speed (units/s)
    pub jump_speed: f32, // initial jump velocity
    pub accel: f32,      // easing rate while speeding up or turning
    pub decel: f32,      // easing rate while slowing down
    pub gravity: f32,
}

impl Walker {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            pos: spawn,
            vel: Vec3::ZERO,
            on_ground: false,
            height: 1.8,
            radius: 0.25,
            speed: 5.0,
            jump_speed: 8.0,
            accel: 25.0,
            decel: 20.0,
            gravity: GRAVITY,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(self.pos.x, self.pos.y + self.height * 0.9, self.pos.z)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            Vec3::new(self.pos.x - self.radius, self.pos.y, self.pos.z - self.radius),
            Vec3::new(
                self.pos.x + self.radius,
                self.pos.y + self.height,
                self.pos.z + self.radius,
            ),
        )
    }

    /// True if a block placed at cell (x, y, z) would overlap the body.
    pub fn blocks_placement(&self, x: i32, y: i32, z: i32) -> bool {
        self.aabb().intersects(&Aabb::unit_cell(x, y, z))
    }

    /// Integrates input, jump and gravity for `dt` seconds, then resolves the
    /// candidate position against the world.
    pub fn step<F>(&mut self, dt: f32, input: WalkInput, sample: &F)
    where
        F: Fn(i32, i32, i32) -> Option<BlockType>,
    {
        let wish = Vec3::new(input.wish.x, 0.0, input.wish.z).normalized();
        let target = wish * self.speed;
        self.vel.x = ease_axis(self.vel.x, target.x, self.accel, self.decel, dt);
        self.vel.z = ease_axis(self.vel.z, target.z, self.accel, self.decel, dt);

        if input.jump && self.on_ground {
            self.vel.y = self.jump_speed;
            self.on_ground = false;
        }
        self.vel.y -= self.gravity * dt;

        let next = self.pos + self.vel * dt;
        self.resolve(next, sample);
    }

    /// Moves toward `next`, resolving vertical contacts first and then the
    /// x and z axes independently. Every occupied cell is solid.
    pub fn resolve<F>(&mut self, next: Vec3, sample: &F)
    where
        F: Fn(i32, i32, i32) -> Option<BlockType>,
    {
        let solid = |x: i32, y: i32, z: i32| sample(x, y, z).is_some();
        let mut next = next;
        self.on_ground = false;

        // Ground: snap feet onto the voxel under the footprint
        let check_y = next.y - GROUND_PROBE;
        let probe = check_y.floor() as i32;
        if self.vel.y <= 0.0 && self.any_in_footprint(next, |x, z| solid(x, probe, z)) {
            next.y = probe as f32 + 1.0;
            self.vel.y = 0.0;
            self.on_ground = true;
        }

        // Ceiling: velocity only, position is left as is
        let head = (next.y + self.height).floor() as i32;
        if self.vel.y > 0.0 && self.any_in_footprint(next, |x, z| solid(x, head, z)) {
            self.vel.y = 0.0;
        }

        if self.vel.x != 0.0 {
            let edge = next.x + self.radius.copysign(self.vel.x);
            let ex = edge.floor() as i32;
            let zs = self.span(next.z);
            if self
                .body_band(next.y)
                .any(|y| zs.clone().any(|z| solid(ex, y, z)))
            {
                next.x = self.pos.x;
            }
        }

        if self.vel.z != 0.0 {
            let edge = next.z + self.radius.copysign(self.vel.z);
            let ez = edge.floor() as i32;
            let xs = self.span(next.x);
            if self
                .body_band(next.y)
                .any(|y| xs.clone().any(|x| solid(x, y, ez)))
            {
                next.z = self.pos.z;
            }
        }

        self.pos = next;
    }

    #[inline]
    fn span(&self, c: f32) -> RangeInclusive<i32> {
        (c - self.radius).floor() as i32..=(c + self.radius).floor() as i32
    }

    #[inline]
    fn body_band(&self, feet: f32) -> RangeInclusive<i32> {
        feet.floor() as i32..=(feet + self.height - 0.1).floor() as i32
    }

    fn any_in_footprint(&self, at: Vec3, mut f: impl FnMut(i32, i32) -> bool) -> bool {
        let zs = self.span(at.z);
        self.span(at.x).any(|x| zs.clone().any(|z| f(x, z)))
    }
}

/// Frame-rate independent exponential approach of `v` toward `target`.
fn ease_axis(v: f32, target: f32, accel: f32, decel: f32, dt: f32) -> f32 {
    let rate = if target.abs() > v.abs() || target * v < 0.0 {
        accel
    } else {
        decel
    };
    let k = 1.0 - (-rate * dt).exp();
    let out = v + (target - v) * k;
    if out.abs() < 0.01 && target.abs() < 0.01 {
        0.0
    } else {
        out
    }
}
