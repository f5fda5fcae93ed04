use shearbox::{SetupError, TestParameters, TestProfile, TestSession};

/// Build a session for `profile` ready to be started.
///
/// Soil parameters stay at the classroom defaults (c = 10 kPa, φ = 30°,
/// σ = 200 kPa) so the curves of different apparatus can be compared.
pub fn prepare_session(profile: TestProfile) -> Result<TestSession, SetupError> {
    let mut session = TestSession::with_parameters(profile, TestParameters::default())?;

    // The pneumatic box refuses to start with its valve closed. Opening it
    // also replaces the normal stress with the load delivered by the ram.
    if session.profile().has_pneumatic_control && !session.parameters().valve_open {
        session.toggle_valve()?;
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shearbox::Phase;

    #[test]
    fn every_builtin_profile_can_start() {
        for profile in TestProfile::builtin() {
            let mut session = prepare_session(profile).expect("session prepared");
            session.start().expect("prepared session starts");
            assert_eq!(session.phase(), Phase::Running);
        }
    }

    #[test]
    fn pneumatic_profile_opens_valve() {
        let session = prepare_session(TestProfile::hm5755()).expect("session prepared");
        assert!(session.parameters().valve_open);
    }
}
