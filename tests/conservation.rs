use gassim2d::core::Simulation;
use gassim2d::error::Result;

/// Many resolved collisions in a dense random gas must conserve energy and momentum.
#[test]
fn random_gas_conserves_energy_and_momentum() -> Result<()> {
    let mut sim = Simulation::with_seed(80, 12.0, 12.0, Some(12345))?;
    let e0 = sim.kinetic_energy();
    let p0 = sim.total_momentum();

    let mut last_t = sim.time();
    let mut resolved = 0usize;
    while resolved < 500 {
        let Some(ev) = sim.advance_to_next_collision()? else {
            break;
        };
        assert!(ev.time_f64() >= last_t, "clock moved backwards");
        last_t = ev.time_f64();
        resolved += 1;
    }

    let e1 = sim.kinetic_energy();
    let p1 = sim.total_momentum();
    let rel = ((e1 - e0) / e0).abs();
    assert!(
        rel < 1e-9,
        "relative energy drift {} too large (E0={}, E1={}, collisions={})",
        rel,
        e0,
        e1,
        resolved
    );
    for k in 0..2 {
        assert!(
            (p1[k] - p0[k]).abs() < 1e-9,
            "momentum drift on axis {k}: {} -> {}",
            p0[k],
            p1[k]
        );
    }
    Ok(())
}

#[test]
fn advance_to_reaches_target_and_conserves_energy() -> Result<()> {
    let mut sim = Simulation::with_seed(40, 6.0, 6.0, Some(777))?;
    let e0 = sim.kinetic_energy();

    let t_end = 20.0;
    let steps = 40;
    for s in 1..=steps {
        let t = t_end * (s as f64) / (steps as f64);
        sim.advance_to(t)?;
        assert!((sim.time() - t).abs() < 1e-9);
    }

    let e1 = sim.kinetic_energy();
    assert!(((e1 - e0) / e0).abs() < 1e-9);
    Ok(())
}
