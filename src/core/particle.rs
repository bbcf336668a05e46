use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Sentinel returned by [`Particle::time_to_next_collision`] when no collision is predicted.
pub const NO_COLLISION: f64 = -1.0;

/// A hard disk moving in the plane.
///
/// Fields:
/// - `r`: position vector [x, y]
/// - `v`: velocity vector [vx, vy]
/// - `mass`, `radius`: fixed at construction (> 0)
/// - `collision_count`: incremented each time the particle takes part in a resolved collision
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    mass: f64,
    radius: f64,
    collision_count: u64,
}

impl Particle {
    /// Create a resting particle at `(x, y)`. Velocity starts at zero; assign it with
    /// [`Particle::set_velocity`].
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any value is NaN/inf.
    pub fn new(x: f64, y: f64, mass: f64, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        Ok(Self {
            r: [x, y],
            v: [0.0; DIM],
            mass,
            radius,
            collision_count: 0,
        })
    }

    /// Builder-style velocity assignment, validated as finite.
    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Result<Self> {
        self.set_velocity(vx, vy)?;
        Ok(self)
    }

    /// Set velocity (validated as finite).
    pub fn set_velocity(&mut self, vx: f64, vy: f64) -> Result<()> {
        if !vx.is_finite() || !vy.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.v = [vx, vy];
        Ok(())
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.r[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.r[1]
    }

    #[inline]
    pub fn vx(&self) -> f64 {
        self.v[0]
    }

    #[inline]
    pub fn vy(&self) -> f64 {
        self.v[1]
    }

    #[inline]
    pub fn position(&self) -> [f64; DIM] {
        self.r
    }

    #[inline]
    pub fn velocity(&self) -> [f64; DIM] {
        self.v
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of resolved collisions this particle has taken part in.
    #[inline]
    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// Increment the collision counter (used for event invalidation).
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Straight-line drift by `dt`. Box bounds are not enforced.
    pub fn move_by(&mut self, dt: f64) -> &mut Self {
        for (r_k, &v_k) in self.r.iter_mut().zip(self.v.iter()) {
            *r_k += v_k * dt;
        }
        self
    }

    /// Euclidean distance between the two centres.
    pub fn distance(&self, other: &Particle) -> f64 {
        let dx = self.r[0] - other.r[0];
        let dy = self.r[1] - other.r[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Predict the time until `self` and `other` touch, assuming straight-line motion.
    ///
    /// The estimate is taken along a single axis: x when the relative x-velocity is
    /// non-zero, otherwise y. Copies of both particles are drifted to the moment their
    /// centres cross on that axis; the pair collides only if the copies overlap there.
    /// The reported time is backed off from the crossing to where the axis separation
    /// equals the radii sum, clamped at zero.
    ///
    /// Returns [`NO_COLLISION`] when the particles move in lockstep, the crossing lies in
    /// the past, or the copies do not overlap. This is not a closed-form 2D solve.
    pub fn time_to_next_collision(&self, other: &Particle) -> f64 {
        let u = [other.v[0] - self.v[0], other.v[1] - self.v[1]];
        let Some(axis) = (0..DIM).find(|&k| u[k] != 0.0) else {
            return NO_COLLISION;
        };

        let d = other.r[axis] - self.r[axis];
        let crossing = -d / u[axis];
        if !crossing.is_finite() || crossing < 0.0 {
            return NO_COLLISION;
        }

        let r_sum = self.radius + other.radius;
        let mut a = self.clone();
        let mut b = other.clone();
        a.move_by(crossing);
        b.move_by(crossing);
        if a.distance(&b) >= r_sum {
            return NO_COLLISION;
        }
        (crossing - r_sum / u[axis].abs()).max(0.0)
    }

    /// [`Particle::time_to_next_collision`] with the sentinel mapped to `None`.
    pub fn predict_collision(&self, other: &Particle) -> Option<f64> {
        let dt = self.time_to_next_collision(other);
        (dt >= 0.0).then_some(dt)
    }

    /// Resolve an elastic two-body collision along the relative velocity.
    ///
    /// Only velocities change; both particles are expected to already sit at the contact
    /// point.
    pub fn impact(&mut self, other: &mut Particle) {
        let m_sum = self.mass + other.mass;
        let f_self = 2.0 * other.mass / m_sum;
        let f_other = (other.mass - self.mass) / m_sum;
        let v_self = self.v;
        for k in 0..DIM {
            let rel = other.v[k] - v_self[k];
            self.v[k] = v_self[k] + f_self * rel;
            other.v[k] = v_self[k] + f_other * rel;
        }
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(x: f64, y: f64, vx: f64, vy: f64) -> Result<Particle> {
        Particle::new(x, y, 1.0, 1.0)?.with_velocity(vx, vy)
    }

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(0.5, 1.5, 2.0, 0.25)?;
        assert_eq!(p.r, [0.5, 1.5]);
        assert_eq!(p.v, [0.0, 0.0]);
        assert_eq!(p.mass(), 2.0);
        assert_eq!(p.radius(), 0.25);
        assert_eq!(p.collision_count(), 0);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        let err = Particle::new(0.0, 0.0, 1.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn invalid_mass_rejected() {
        let err = Particle::new(0.0, 0.0, -1.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn non_finite_velocity_rejected() -> Result<()> {
        let mut p = Particle::new(0.0, 0.0, 1.0, 1.0)?;
        assert!(p.set_velocity(f64::NAN, 0.0).is_err());
        assert_eq!(p.v, [0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn move_displaces_by_velocity_times_dt() -> Result<()> {
        let original = moving(1.0, 2.0, 0.3, -0.4)?;
        for dt in [0.0, 0.5, 2.0, -3.0, 10.0] {
            let mut p = original.clone();
            p.move_by(dt);
            let expected = ((0.3 * dt).powi(2) + (0.4 * dt).powi(2)).sqrt();
            assert!((p.distance(&original) - expected).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn move_is_chainable() -> Result<()> {
        let mut p = moving(0.0, 0.0, 1.0, 2.0)?;
        p.move_by(1.0).move_by(0.5);
        assert!((p.x() - 1.5).abs() < 1e-12);
        assert!((p.y() - 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn head_on_prediction_along_x() -> Result<()> {
        let a = moving(0.0, 0.0, 1.0, 0.0)?;
        let b = moving(10.0, 0.0, -1.0, 0.0)?;
        // Gap of 10 minus radii sum 2, closing at speed 2.
        assert!((a.time_to_next_collision(&b) - 4.0).abs() < 1e-12);
        assert_eq!(a.predict_collision(&b), Some(a.time_to_next_collision(&b)));
        Ok(())
    }

    #[test]
    fn falls_back_to_y_axis() -> Result<()> {
        let a = moving(3.0, 0.0, 0.5, 1.0)?;
        let b = moving(3.0, 10.0, 0.5, -1.0)?;
        assert!((a.time_to_next_collision(&b) - 4.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn prediction_is_symmetric() -> Result<()> {
        let a = moving(0.0, 0.3, 0.7, 0.1)?;
        let b = moving(6.0, 0.9, -0.4, 0.0)?;
        let ab = a.time_to_next_collision(&b);
        let ba = b.time_to_next_collision(&a);
        assert!(ab >= 0.0 && ba >= 0.0);
        assert!((ab - ba).abs() < 1e-9);

        let c = moving(0.0, 8.0, 1.0, 0.0)?;
        assert_eq!(a.time_to_next_collision(&c), NO_COLLISION);
        assert_eq!(c.time_to_next_collision(&a), NO_COLLISION);
        Ok(())
    }

    #[test]
    fn identical_velocities_never_collide() -> Result<()> {
        let a = Particle::new(0.0, 0.0, 3.0, 0.5)?.with_velocity(0.2, -0.7)?;
        let b = Particle::new(0.1, 0.1, 1.0, 4.0)?.with_velocity(0.2, -0.7)?;
        assert_eq!(a.time_to_next_collision(&b), NO_COLLISION);
        assert_eq!(a.predict_collision(&b), None);
        Ok(())
    }

    #[test]
    fn separating_pair_has_no_collision() -> Result<()> {
        let a = moving(0.0, 0.0, -1.0, 0.0)?;
        let b = moving(10.0, 0.0, 1.0, 0.0)?;
        assert_eq!(a.time_to_next_collision(&b), NO_COLLISION);
        Ok(())
    }

    #[test]
    fn offset_pass_is_rejected_by_distance_check() -> Result<()> {
        let a = moving(0.0, 0.0, 1.0, 0.0)?;
        let b = moving(10.0, 5.0, -1.0, 0.0)?;
        assert_eq!(a.time_to_next_collision(&b), NO_COLLISION);
        Ok(())
    }

    #[test]
    fn equal_mass_impact_exchanges_velocities() -> Result<()> {
        let mut a = moving(4.0, 0.0, 1.0, 0.0)?;
        let mut b = moving(6.0, 0.0, -1.0, 0.0)?;
        a.impact(&mut b);
        assert_eq!(a.v, [-1.0, 0.0]);
        assert_eq!(b.v, [1.0, 0.0]);
        assert_eq!(a.r, [4.0, 0.0]);
        Ok(())
    }

    #[test]
    fn impact_conserves_momentum_and_energy() -> Result<()> {
        let cases = [
            (1.0, [0.3, -1.2], 5.0, [-0.8, 0.4]),
            (0.1, [2.0, 0.0], 7.5, [0.0, -3.0]),
            (3.3, [-0.5, 0.25], 3.3, [1.5, 1.0]),
        ];
        for (m1, v1, m2, v2) in cases {
            let mut a = Particle::new(0.0, 0.0, m1, 1.0)?.with_velocity(v1[0], v1[1])?;
            let mut b = Particle::new(2.0, 0.0, m2, 1.0)?.with_velocity(v2[0], v2[1])?;
            let p0 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
            let e0 = a.kinetic_energy() + b.kinetic_energy();
            a.impact(&mut b);
            let p1 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
            let e1 = a.kinetic_energy() + b.kinetic_energy();
            for k in 0..DIM {
                assert!((p0[k] - p1[k]).abs() < 1e-12, "momentum drift on axis {k}");
            }
            assert!((e0 - e1).abs() < 1e-12 * e0.max(1.0), "energy drift {e0} -> {e1}");
            assert_eq!(a.mass(), m1);
            assert_eq!(b.radius(), 1.0);
        }
        Ok(())
    }

    #[test]
    fn kinetic_energy_computed() -> Result<()> {
        // v = (3,4), |v|^2 = 25; KE = 0.5 * m * 25
        let p = Particle::new(0.0, 0.0, 2.0, 1.0)?.with_velocity(3.0, 4.0)?;
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn bump_collision_count() -> Result<()> {
        let mut p = Particle::new(0.0, 0.0, 1.0, 1.0)?;
        p.bump_collision_count();
        assert_eq!(p.collision_count(), 1);
        Ok(())
    }
}
