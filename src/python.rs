use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::particle::DIM;
use crate::core::{Algorithm, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array(rows: &[[f64; DIM]]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((rows.len(), DIM));
    for (i, row) in rows.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = row[k];
        }
    }
    arr
}

/// Python-facing wrapper around the Rust Simulation core.
///
/// - __new__(num_particles, width=1.0, height=1.0, seed=None)
/// - time_at_next_collision() -> float
/// - advance_to_next_collision() -> (time, i, j) | None
/// - advance_to(time) -> int
/// - move_all(dt)
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct GasSim2D {
    sim: Simulation,
}

#[pymethods]
impl GasSim2D {
    /// Generate `num_particles` unit disks in a `width x height` box and schedule their
    /// first collisions.
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_particles, width=1.0, height=1.0, seed=None))]
    fn new(num_particles: usize, width: f64, height: f64, seed: Option<u64>) -> PyResult<Self> {
        let sim = Simulation::with_seed(num_particles, width, height, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Algorithm description string.
    fn description(&self) -> String {
        self.sim.description()
    }

    /// Current simulation time.
    fn time(&self) -> f64 {
        self.sim.time()
    }

    /// Time of the earliest scheduled collision. Raises ValueError when none is queued.
    fn time_at_next_collision(&self) -> PyResult<f64> {
        self.sim.time_at_next_collision().map_err(py_err)
    }

    /// Resolve the next collision (releases the GIL during computation).
    fn advance_to_next_collision(&mut self, py: Python<'_>) -> PyResult<Option<(f64, usize, usize)>> {
        let ev = py
            .detach(|| self.sim.advance_to_next_collision())
            .map_err(py_err)?;
        Ok(ev.map(|e| (e.time_f64(), e.first, e.second)))
    }

    /// Advance to the given absolute time; returns the number of collisions resolved.
    fn advance_to(&mut self, py: Python<'_>, target_time: f64) -> PyResult<usize> {
        py.detach(|| self.sim.advance_to(target_time))
            .map_err(py_err)
    }

    /// Translate every particle by `dt` without resolving collisions.
    fn move_all(&mut self, dt: f64) -> PyResult<()> {
        self.sim.move_all(dt).map_err(py_err)
    }

    /// Box edge lengths (width, height).
    fn box_size(&self) -> (f64, f64) {
        let [w, h] = self.sim.box_size();
        (w, h)
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        Ok(to_array(&self.sim.positions()).into_pyarray(py).unbind())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        Ok(to_array(&self.sim.velocities()).into_pyarray(py).unbind())
    }

    /// Total kinetic energy.
    fn kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }
}

/// The gassim2d Python module entry point.
#[pymodule]
fn gassim2d(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GasSim2D>()?;
    Ok(())
}
