use shearbox::{Saturation, TestProfile, TestSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure a saturated clay on the dead-weight apparatus
    let mut session = TestSession::new(TestProfile::hm5750())?;
    session.set_cohesion(25.0)?;
    session.set_friction_angle(20.0)?;
    session.set_normal_stress(150.0)?;
    session.set_saturation(Saturation::Saturated)?;

    // Shear the sample to the end of travel
    session.start()?;
    while session.tick().is_some() {}

    // Report the peak and final readings
    let peak = session
        .run()
        .samples()
        .iter()
        .map(|sample| sample.shear_force_n)
        .fold(f64::NEG_INFINITY, f64::max);
    let frame = session.current_frame();
    println!("Peak shear force: {peak:.2} N");
    println!(
        "Final shear force: {:.2} N, vertical strain {:.4}",
        frame.shear_force_n, frame.vertical_strain
    );

    Ok(())
}
