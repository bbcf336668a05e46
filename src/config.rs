//! Run configuration loaded from TOML.
//!
//! Every key is optional; missing keys fall back to [`SimConfig::default`], which
//! matches the classic setup of twenty particles in a unit box. A minimal file can
//! override just the values you care about:
//!
//! ```toml
//! num_particles = 50
//! box_width = 40.0
//! seed = 7
//! ```

use crate::core::Simulation;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Parameters for building and running a [`Simulation`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of generated particles (> 0).
    pub num_particles: usize,
    /// Box edge along x (> 0).
    pub box_width: f64,
    /// Box edge along y (> 0).
    pub box_height: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// How many collisions a run resolves before reporting.
    pub collisions: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_particles: 20,
            box_width: 1.0,
            box_height: 1.0,
            seed: None,
            collisions: 1,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: SimConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_particles == 0 {
            return Err(Error::InvalidParam("num_particles must be > 0".into()));
        }
        for (name, v) in [("box_width", self.box_width), ("box_height", self.box_height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidParam(format!("{name} must be finite and > 0")));
            }
        }
        Ok(())
    }

    /// Generate the particles and initial schedule described by this configuration.
    pub fn build_simulation(&self) -> Result<Simulation> {
        self.validate()?;
        Simulation::with_seed(self.num_particles, self.box_width, self.box_height, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() -> Result<()> {
        assert_eq!(SimConfig::from_toml_str("")?, SimConfig::default());
        Ok(())
    }

    #[test]
    fn partial_override_keeps_other_defaults() -> Result<()> {
        let cfg = SimConfig::from_toml_str("num_particles = 50\nseed = 7\n")?;
        assert_eq!(cfg.num_particles, 50);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.box_width, 1.0);
        assert_eq!(cfg.collisions, 1);
        Ok(())
    }

    #[test]
    fn bad_values_rejected() {
        let err = SimConfig::from_toml_str("box_height = -2.0").unwrap_err();
        assert!(err.to_string().contains("box_height"));
        assert!(SimConfig::from_toml_str("num_particles = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SimConfig::from_toml_str("num_particles = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(matches!(
            SimConfig::from_toml_str("gravity = 9.8"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn builds_seeded_simulation() -> Result<()> {
        let cfg = SimConfig {
            num_particles: 12,
            box_width: 6.0,
            box_height: 4.0,
            seed: Some(3),
            collisions: 2,
        };
        let sim = cfg.build_simulation()?;
        assert_eq!(sim.num_particles(), 12);
        assert_eq!(sim.box_size(), [6.0, 4.0]);
        Ok(())
    }
}
