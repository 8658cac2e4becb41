use beamline::prelude::*;

/// Rounded-square storage ring: four 4 m sides joined by quarter-circle
/// dipoles of 1 m bend radius. One side carries a quadrupole, another an
/// accelerating cavity. Traversal is clockwise seen from above.
fn build_ring() -> Result<Accelerator, BeamlineError> {
    let radius = 0.1; // vacuum chamber, m
    let field = 2.0; // dipole field, T
    let gradient = 1.5; // quadrupole gradient, T/m

    let mut ring = Accelerator::new();
    ring.append(Element::straight(
        R3::new(-2.0, 3.0, 0.0),
        R3::new(2.0, 3.0, 0.0),
        radius,
    )?)?;
    ring.append(Element::dipole(
        R3::new(2.0, 3.0, 0.0),
        R3::new(3.0, 2.0, 0.0),
        radius,
        1.0,
        field,
    )?)?;
    ring.append(Element::quadrupole(
        R3::new(3.0, 2.0, 0.0),
        R3::new(3.0, -2.0, 0.0),
        radius,
        gradient,
    )?)?;
    ring.append(Element::dipole(
        R3::new(3.0, -2.0, 0.0),
        R3::new(2.0, -3.0, 0.0),
        radius,
        1.0,
        field,
    )?)?;
    ring.append(Element::straight(
        R3::new(2.0, -3.0, 0.0),
        R3::new(-2.0, -3.0, 0.0),
        radius,
    )?)?;
    ring.append(Element::dipole(
        R3::new(-2.0, -3.0, 0.0),
        R3::new(-3.0, -2.0, 0.0),
        radius,
        1.0,
        field,
    )?)?;
    ring.append(Element::rf_cavity(
        R3::new(-3.0, -2.0, 0.0),
        R3::new(-3.0, 2.0, 0.0),
        radius,
        0.0,
        1.0e5,
        angular_frequency(500.0e6),
        10.0,
        0.0,
    )?)?;
    ring.append(Element::dipole(
        R3::new(-3.0, 2.0, 0.0),
        R3::new(-2.0, 3.0, 0.0),
        radius,
        1.0,
        field,
    )?)?;
    ring.close_ring()?;
    Ok(ring)
}

fn main() -> Result<(), BeamlineError> {
    let ring = build_ring()?;

    println!("{ring}");
    println!(
        "closed: {}, circumference: {:.3} m",
        ring.is_ring(),
        ring.total_length()
    );
    Ok(())
}
