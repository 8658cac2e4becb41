use beamline::prelude::*;

/// Circular ring of four quarter-circle dipoles, 1 m bend radius, with the
/// field matched to the injected protons so the design orbit closes.
fn build_ring(field: Scalar) -> Result<Accelerator, BeamlineError> {
    let corners = [
        R3::new(0.0, 1.0, 0.0),
        R3::new(1.0, 0.0, 0.0),
        R3::new(0.0, -1.0, 0.0),
        R3::new(-1.0, 0.0, 0.0),
    ];
    let mut ring = Accelerator::new();
    for i in 0..4 {
        ring.append(Element::dipole(
            corners[i],
            corners[(i + 1) % 4],
            0.1,
            1.0,
            field,
        )?)?;
    }
    ring.close_ring()?;
    Ok(ring)
}

fn main() -> Result<(), BeamlineError> {
    let speed = 0.01 * SPEED_OF_LIGHT;
    // cyclotron condition on the 1 m design orbit: B = m v / (q rho)
    let field = PROTON_MASS * speed / ELEMENTARY_CHARGE;
    let mut ring = build_ring(field)?;

    let model = Particle::new(
        R3::zeros(),
        R3::new(speed, 0.0, 0.0),
        PROTON_MASS,
        ELEMENTARY_CHARGE,
        1.0e-3,
        Rgb::WHITE,
    )?;
    let beam = Beam::new(model, 1_000, 100.0)?;
    beam.activate(&mut ring)?;

    let dt = 1.0e-10;
    println!("time(s), live, lost, mean_energy(GeV), radial_emittance(m rad)");
    for step in 0..=5_000 {
        if step % 500 == 0 {
            println!(
                "{:.4e}, {}, {}, {:.6e}, {:.6e}",
                ring.time(),
                ring.live_particle_count(),
                ring.lost_count(),
                beam.mean_energy(&ring)? / GEV,
                beam.radial_emittance(&ring),
            );
        }
        ring.evolve(dt);
    }
    Ok(())
}
