use crate::core::particle::DIM;
use crate::core::{Event, MinHeap, Particle, RandomSource};
use crate::error::{Error, Result};
use log::{debug, trace};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Small numeric tolerance for time checks.
const EPS_TIME: f64 = 1e-12;

/// Radius of every generated particle.
pub const PARTICLE_RADIUS: f64 = 1.0;

/// Mass of every generated particle.
pub const PARTICLE_MASS: f64 = 1.0;

/// A simulation algorithm that can describe itself.
pub trait Algorithm {
    fn description(&self) -> String;
}

/// Read-only view of the state a renderer needs: the box and every particle centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: f64,
    pub height: f64,
    pub positions: Vec<[f64; DIM]>,
}

/// Event-driven hard-disk gas in an axis-aligned `width x height` box.
///
/// The box only bounds where particles are generated: walls do not reflect, so particles
/// may leave it. Each particle contributes at most one event to the queue, for its
/// earliest predicted partner.
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    box_size: [f64; DIM],
    particles: Vec<Particle>,
    pq: MinHeap<Event>,
}

impl Simulation {
    /// Create `num_particles` unit disks at uniformly random positions in the box with
    /// velocity components uniform in [-1, 1), then build the event queue.
    pub fn new<R: RandomSource + ?Sized>(
        num_particles: usize,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if num_particles == 0 {
            return Err(Error::InvalidParam("num_particles must be > 0".into()));
        }
        let mut sim = Self::empty(width, height)?;
        sim.generate_particles(num_particles, rng)?;
        sim.generate_priority_queue()?;
        Ok(sim)
    }

    /// [`Simulation::new`] driven by a `StdRng`; `None` draws a seed from the thread RNG.
    pub fn with_seed(num_particles: usize, width: f64, height: f64, seed: Option<u64>) -> Result<Self> {
        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        Self::new(num_particles, width, height, &mut rng)
    }

    /// Build a simulation around prepared particles and schedule their collisions.
    pub fn from_particles(particles: Vec<Particle>, width: f64, height: f64) -> Result<Self> {
        if particles.is_empty() {
            return Err(Error::InvalidParam("at least one particle is required".into()));
        }
        let mut sim = Self::empty(width, height)?;
        sim.particles = particles;
        sim.generate_priority_queue()?;
        Ok(sim)
    }

    fn empty(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidParam(
                "box width and height must be finite and > 0".into(),
            ));
        }
        Ok(Self {
            time_now: 0.0,
            box_size: [width, height],
            particles: Vec::new(),
            pq: MinHeap::new(),
        })
    }

    fn generate_particles<R: RandomSource + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<()> {
        let [width, height] = self.box_size;
        self.particles.reserve(n);
        for _ in 0..n {
            let x = rng.uniform() * width;
            let y = rng.uniform() * height;
            let vx = rng.uniform() * 2.0 - 1.0;
            let vy = rng.uniform() * 2.0 - 1.0;
            let p = Particle::new(x, y, PARTICLE_MASS, PARTICLE_RADIUS)?.with_velocity(vx, vy)?;
            self.particles.push(p);
        }
        Ok(())
    }

    /// Clear the queue and schedule, for every particle `i`, its earliest collision
    /// against any later particle `j > i`.
    ///
    /// Call this after editing particles through [`Simulation::particle_mut`].
    pub fn generate_priority_queue(&mut self) -> Result<()> {
        self.pq.clear();
        let n = self.particles.len();
        for i in 0..n {
            if let Some((dt, j)) = self.earliest_partner(i, (i + 1)..n) {
                self.schedule(i, j, self.time_now + dt)?;
            }
        }
        debug!(
            "built event queue: {} events for {} particles at t={}",
            self.pq.size(),
            n,
            self.time_now
        );
        Ok(())
    }

    /// Translate every particle by `dt` and advance the clock.
    ///
    /// No collision is resolved and the queue is left untouched; events whose time
    /// falls behind the clock are discarded when next reached.
    pub fn move_all(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() {
            return Err(Error::InvalidParam("dt must be finite".into()));
        }
        for p in &mut self.particles {
            p.move_by(dt);
        }
        self.time_now += dt;
        Ok(())
    }

    /// Clock time of the earliest scheduled event.
    ///
    /// For the initial schedule this equals the time until that collision.
    pub fn time_at_next_collision(&self) -> Result<f64> {
        self.pq.try_peek().map(Event::time_f64)
    }

    /// Advance to the earliest valid collision, resolve it and reschedule both participants.
    ///
    /// Returns the resolved event, or `None` once no valid event remains (the clock is then
    /// left where it was).
    pub fn advance_to_next_collision(&mut self) -> Result<Option<Event>> {
        let Some(ev) = self.next_valid_event()? else {
            return Ok(None);
        };
        self.drift_all(ev.time_f64())?;
        self.resolve(ev.first, ev.second)?;
        Ok(Some(ev))
    }

    /// Advance the simulation to `target_time` (must be ≥ current time), resolving every
    /// collision on the way. Returns the number of collisions resolved.
    pub fn advance_to(&mut self, target_time: f64) -> Result<usize> {
        if !target_time.is_finite() {
            return Err(Error::InvalidParam("target_time must be finite".into()));
        }
        if target_time < self.time_now - EPS_TIME {
            return Err(Error::InvalidParam(
                "target_time cannot be earlier than current time".into(),
            ));
        }

        let mut resolved = 0usize;
        while let Some(ev) = self.next_valid_event()? {
            let t_ev = ev.time_f64();
            if t_ev > target_time {
                // Put the event back for future calls
                self.pq.add(ev);
                break;
            }
            self.drift_all(t_ev)?;
            self.resolve(ev.first, ev.second)?;
            resolved += 1;
        }
        self.drift_all(target_time)?;
        Ok(resolved)
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of events in the queue, including ones that have gone stale.
    pub fn queued_events(&self) -> usize {
        self.pq.size()
    }

    /// Box edge lengths `[width, height]`.
    pub fn box_size(&self) -> [f64; DIM] {
        self.box_size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> Result<&Particle> {
        let len = self.particles.len();
        self.particles
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Mutable access to one particle. Its mass and radius stay fixed; queued events
    /// are not updated until [`Simulation::generate_priority_queue`] runs.
    pub fn particle_mut(&mut self, index: usize) -> Result<&mut Particle> {
        let len = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.box_size[0],
            height: self.box_size[1],
            positions: self.positions(),
        }
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn total_momentum(&self) -> [f64; DIM] {
        self.particles.iter().fold([0.0; DIM], |mut acc, p| {
            for (a, m) in acc.iter_mut().zip(p.momentum()) {
                *a += m;
            }
            acc
        })
    }

    // ============ Internal helpers ============

    /// Earliest strictly positive predicted collision of particle `i` against `candidates`.
    fn earliest_partner<I>(&self, i: usize, candidates: I) -> Option<(f64, usize)>
    where
        I: IntoIterator<Item = usize>,
    {
        let pi = &self.particles[i];
        candidates
            .into_iter()
            .filter(|&j| j != i)
            .filter_map(|j| {
                pi.predict_collision(&self.particles[j])
                    .filter(|&dt| dt > EPS_TIME)
                    .map(|dt| (dt, j))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    fn schedule(&mut self, i: usize, j: usize, t_abs: f64) -> Result<()> {
        let ev = Event::new(
            t_abs,
            i,
            j,
            self.particles[i].collision_count(),
            self.particles[j].collision_count(),
        )?;
        self.pq.add(ev);
        Ok(())
    }

    /// Schedule particle `i` against its earliest partner among all other particles.
    fn reschedule_for_particle(&mut self, i: usize) -> Result<()> {
        if let Some((dt, j)) = self.earliest_partner(i, 0..self.particles.len()) {
            self.schedule(i, j, self.time_now + dt)?;
        }
        Ok(())
    }

    /// Pop events until one is still consistent with the particles' state.
    ///
    /// An event is stale if either participant collided since it was scheduled, or if
    /// [`Simulation::move_all`] carried the clock past it. When the owning particle
    /// itself is unchanged, its prediction is rebuilt.
    fn next_valid_event(&mut self) -> Result<Option<Event>> {
        while let Some(ev) = self.pq.pop() {
            let cc_first = self.particles[ev.first].collision_count();
            let cc_second = self.particles[ev.second].collision_count();
            if ev.is_valid(cc_first, cc_second) && ev.time_f64() >= self.time_now - EPS_TIME {
                return Ok(Some(ev));
            }
            trace!(
                "discarding stale event ({}, {}) at t={}",
                ev.first,
                ev.second,
                ev.time_f64()
            );
            if ev.cc_first == cc_first {
                self.reschedule_for_particle(ev.first)?;
            }
        }
        Ok(None)
    }

    /// Drift all particles to the specified clock time by linear motion.
    fn drift_all(&mut self, to_time: f64) -> Result<()> {
        if to_time < self.time_now - EPS_TIME {
            return Err(Error::InvalidParam("cannot drift backwards in time".into()));
        }
        let dt = to_time - self.time_now;
        if dt.abs() > EPS_TIME {
            for p in &mut self.particles {
                p.move_by(dt);
            }
        }
        self.time_now = to_time.max(self.time_now);
        Ok(())
    }

    /// Elastic impact between particles `i` and `j`, then reschedule both.
    fn resolve(&mut self, i: usize, j: usize) -> Result<()> {
        let (a, b) = pair_mut(&mut self.particles, i, j)?;
        a.impact(b);
        a.bump_collision_count();
        b.bump_collision_count();
        debug!("resolved collision ({i}, {j}) at t={}", self.time_now);

        self.reschedule_for_particle(i)?;
        self.reschedule_for_particle(j)?;
        Ok(())
    }
}

impl Algorithm for Simulation {
    fn description(&self) -> String {
        "Algorithm for simulating the behaviour of some gas particles within a box.".to_string()
    }
}

// ============ Utility helpers ============

/// Two distinct mutable borrows into `particles`.
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> Result<(&mut Particle, &mut Particle)> {
    let len = particles.len();
    for index in [i, j] {
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
    }
    if i == j {
        return Err(Error::InvalidParam(format!(
            "particle {i} cannot collide with itself"
        )));
    }
    if i < j {
        let (lo, hi) = particles.split_at_mut(j);
        Ok((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = particles.split_at_mut(i);
        Ok((&mut hi[0], &mut lo[j]))
    }
}
