//! Individual engines driven directly against the mock rig.

use std::time::Duration;

use autoenz::Error;
use autoenz::config::{Config, RobotConstants, SlideCalibration};
use autoenz::dosing::{DispenseEngine, PrimeRoutine, WashEngine};
use autoenz::dry::DryController;
use autoenz::motion::{ActuatorState, Direction, MotionController};

use crate::mock_hw::{Bank, Call, INJECTED, Rig, travel};

fn config(lsp_volume_ul: [f32; 3]) -> Config {
    Config::new(
        SlideCalibration {
            edge_to_well_mm: 10.0,
            well_pitch_mm: 9.0,
            lsp_volume_ul,
        },
        RobotConstants::default(),
    )
    .unwrap()
}

// ── Motion ────────────────────────────────────────────────────

#[test]
fn move_brakes_settles_and_coasts() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut delay = rig.delay();
    motion
        .travel(&config([11.5; 3]), Direction::Forward, 30.0, &mut delay)
        .unwrap();
    assert_eq!(rig.calls(), travel(Call::Forward, 30.0));
}

#[test]
fn failed_drive_still_releases_actuator() {
    let rig = Rig::new();
    rig.fail_on(Call::Forward);
    let mut motion = MotionController::new(rig.actuator());
    let mut delay = rig.delay();
    let c = config([11.5; 3]);
    motion.home(&c, &mut delay).unwrap();
    rig.clear();

    let err = motion
        .travel(&c, Direction::Forward, 30.0, &mut delay)
        .unwrap_err();
    assert_eq!(err, Error::Hardware(INJECTED));
    assert_eq!(
        rig.calls(),
        vec![
            Call::Forward,
            Call::Brake,
            Call::Hold(Duration::from_millis(500)),
            Call::Coast,
        ]
    );
    assert_eq!(motion.state(), ActuatorState::Unhomed);
}

// ── Dispense ──────────────────────────────────────────────────

#[test]
fn dispense_rounds_cycles_up() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = DispenseEngine::new(rig.bank(Bank::Lsp));
    let mut delay = rig.delay();

    engine
        .dispense(&config([11.5; 3]), &mut motion, &mut delay, 2, 1, 100.0)
        .unwrap();
    // 100 / 11.5 = 8.7 -> 9
    assert_eq!(rig.count(&Call::On(Bank::Lsp, 1)), 9);
    assert_eq!(rig.count(&Call::Off(Bank::Lsp, 1)), 9);
    assert_eq!(rig.count(&Call::On(Bank::Lsp, 0)), 0);
}

#[test]
fn dispense_rejects_bad_pump_before_hardware() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = DispenseEngine::new(rig.bank(Bank::Lsp));
    let mut delay = rig.delay();

    for id in [0, 4] {
        let err = engine
            .dispense(&config([11.5; 3]), &mut motion, &mut delay, id, 1, 50.0)
            .unwrap_err();
        assert_eq!(err, Error::InvalidPumpId(id));
    }
    assert!(rig.calls().is_empty());
}

// ── Wash ──────────────────────────────────────────────────────

#[test]
fn wash_runs_whole_seconds() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = WashEngine::new(rig.bank(Bank::Peristaltic));
    let mut delay = rig.delay();

    engine
        .wash(&config([11.5; 3]), &mut motion, &mut delay, 3, 2, 5.0)
        .unwrap();
    assert_eq!(rig.count(&Call::Hold(Duration::from_secs(6))), 1);
    assert_eq!(rig.count(&Call::On(Bank::Peristaltic, 2)), 1);
    assert_eq!(rig.count(&Call::Off(Bank::Peristaltic, 2)), 1);
}

#[test]
fn wash_rejects_bad_pump() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = WashEngine::new(rig.bank(Bank::Peristaltic));
    let err = engine
        .wash(&config([11.5; 3]), &mut motion, &mut rig.delay(), 9, 1, 5.0)
        .unwrap_err();
    assert_eq!(err, Error::InvalidPumpId(9));
    assert!(rig.calls().is_empty());
}

#[test]
fn wash_rejects_unreachable_well_before_hardware() {
    let rig = Rig::new();
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = WashEngine::new(rig.bank(Bank::Peristaltic));
    let err = engine
        .wash(&config([11.5; 3]), &mut motion, &mut rig.delay(), 3, 10, 5.0)
        .unwrap_err();
    assert_eq!(
        err,
        Error::DistanceOutOfRange {
            distance: 116.5,
            limit: 94.0
        }
    );
    assert!(rig.calls().is_empty());
}

#[test]
fn wash_pump_fault_still_de_energizes() {
    let rig = Rig::new();
    rig.fail_on(Call::On(Bank::Peristaltic, 0));
    let mut motion = MotionController::new(rig.actuator());
    let mut engine = WashEngine::new(rig.bank(Bank::Peristaltic));
    let err = engine
        .wash(&config([11.5; 3]), &mut motion, &mut rig.delay(), 1, 1, 5.0)
        .unwrap_err();
    assert_eq!(err, Error::Hardware(INJECTED));

    let mut expected = travel(Call::Forward, 18.5);
    expected.extend([
        Call::On(Bank::Peristaltic, 0),
        Call::Off(Bank::Peristaltic, 0),
    ]);
    assert_eq!(rig.calls(), expected);
}

// ── Prime ─────────────────────────────────────────────────────

#[test]
fn prime_pulses_each_pump_to_its_own_count() {
    let rig = Rig::new();
    let mut lsp = rig.bank(Bank::Lsp);
    let mut peristaltic = rig.bank(Bank::Peristaltic);
    let c = config([11.5, 10.0, 23.0]);

    assert_eq!(PrimeRoutine::cycles(&c), [80, 92, 40]);
    PrimeRoutine
        .run(&c, &mut lsp, &mut peristaltic, &mut rig.delay())
        .unwrap();

    assert_eq!(rig.count(&Call::On(Bank::Lsp, 0)), 80);
    assert_eq!(rig.count(&Call::On(Bank::Lsp, 1)), 92);
    assert_eq!(rig.count(&Call::On(Bank::Lsp, 2)), 40);
    // every round turns the whole bank off
    assert_eq!(rig.count(&Call::Off(Bank::Lsp, 2)), 92);
    assert_eq!(rig.count(&Call::Hold(Duration::from_millis(250))), 2 * 92);

    let calls = rig.calls();
    assert_eq!(
        calls[calls.len() - 7..],
        [
            Call::On(Bank::Peristaltic, 0),
            Call::On(Bank::Peristaltic, 1),
            Call::On(Bank::Peristaltic, 2),
            Call::Hold(Duration::from_secs(8)),
            Call::Off(Bank::Peristaltic, 0),
            Call::Off(Bank::Peristaltic, 1),
            Call::Off(Bank::Peristaltic, 2),
        ]
    );
}

#[test]
fn prime_turns_bank_off_after_fault() {
    let rig = Rig::new();
    rig.fail_on(Call::On(Bank::Lsp, 1));
    let c = config([11.5; 3]);
    let err = PrimeRoutine
        .run(
            &c,
            &mut rig.bank(Bank::Lsp),
            &mut rig.bank(Bank::Peristaltic),
            &mut rig.delay(),
        )
        .unwrap_err();
    assert_eq!(err, Error::Hardware(INJECTED));
    for i in 0..3 {
        assert_eq!(rig.count(&Call::Off(Bank::Lsp, i)), 1);
    }
    assert_eq!(rig.count(&Call::Hold(Duration::from_millis(250))), 0);
}

// ── Dry ───────────────────────────────────────────────────────

#[test]
fn dry_cycle_sequence() {
    let rig = Rig::new();
    let mut dryer = DryController::new(rig.duty());
    dryer.dry(Duration::ZERO, &mut rig.delay()).unwrap();
    assert_eq!(
        rig.calls(),
        vec![
            Call::PwmInit(50),
            Call::Duty(100),
            Call::Hold(Duration::ZERO),
            Call::Duty(0),
            Call::PwmRelease,
        ]
    );
}

#[test]
fn dry_releases_element_when_heating_fails() {
    let rig = Rig::new();
    rig.fail_on(Call::Duty(100));
    let mut dryer = DryController::new(rig.duty());
    let err = dryer
        .dry(Duration::from_secs(5), &mut rig.delay())
        .unwrap_err();
    assert_eq!(err, Error::Hardware(INJECTED));
    assert_eq!(
        rig.calls(),
        vec![
            Call::PwmInit(50),
            Call::Duty(100),
            Call::Duty(0),
            Call::PwmRelease,
        ]
    );
}
