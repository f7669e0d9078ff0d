//! Mock hardware for integration tests.
//!
//! Every driver call and every hold lands in one shared, ordered log so
//! tests can assert on the exact sequence the engine produced.  Any call can
//! be made to fail by registering it with [`Rig::fail_on`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use autoenz::app::ports::{ActuatorDriver, BinaryDriver, Delay, DutyDriver, HwResult};
use autoenz::config::RobotConstants;
use autoenz::interpreter::{Hardware, ProtocolInterpreter};
use autoenz::protocol::Row;
use autoenz::protocol::reader::read_rows;
use autoenz::HardwareFault;

pub const INJECTED: HardwareFault = HardwareFault("injected fault");

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Lsp,
    Peristaltic,
    Indicator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Forward,
    Backward,
    Brake,
    Coast,
    On(Bank, usize),
    Off(Bank, usize),
    PwmInit(u32),
    Duty(u8),
    PwmRelease,
    Hold(Duration),
}

// ── Shared probe ──────────────────────────────────────────────

#[derive(Clone, Default)]
struct Probe {
    log: Rc<RefCell<Vec<Call>>>,
    faults: Rc<RefCell<Vec<Call>>>,
}

impl Probe {
    fn record(&self, call: Call) -> HwResult {
        let fail = self.faults.borrow().contains(&call);
        self.log.borrow_mut().push(call);
        if fail { Err(INJECTED) } else { Ok(()) }
    }
}

// ── Mocks ─────────────────────────────────────────────────────

pub struct MockActuator(Probe);

impl ActuatorDriver for MockActuator {
    fn set_forward(&mut self) -> HwResult {
        self.0.record(Call::Forward)
    }

    fn set_backward(&mut self) -> HwResult {
        self.0.record(Call::Backward)
    }

    fn brake(&mut self) -> HwResult {
        self.0.record(Call::Brake)
    }

    fn coast(&mut self) -> HwResult {
        self.0.record(Call::Coast)
    }
}

pub struct MockPump {
    probe: Probe,
    bank: Bank,
    index: usize,
}

impl BinaryDriver for MockPump {
    fn energize(&mut self) -> HwResult {
        self.probe.record(Call::On(self.bank, self.index))
    }

    fn de_energize(&mut self) -> HwResult {
        self.probe.record(Call::Off(self.bank, self.index))
    }
}

pub struct MockDuty(Probe);

impl DutyDriver for MockDuty {
    fn init(&mut self, frequency_hz: u32) -> HwResult {
        self.0.record(Call::PwmInit(frequency_hz))
    }

    fn set_duty(&mut self, percent: u8) -> HwResult {
        self.0.record(Call::Duty(percent))
    }

    fn release(&mut self) -> HwResult {
        self.0.record(Call::PwmRelease)
    }
}

pub struct MockDelay(Probe);

impl Delay for MockDelay {
    fn hold(&mut self, duration: Duration) {
        let _ = self.0.record(Call::Hold(duration));
    }
}

pub type MockInterpreter = ProtocolInterpreter<MockActuator, MockPump, MockDuty, MockDelay>;

// ── Rig ───────────────────────────────────────────────────────

/// Factory for mocks that all write to the same log.
#[derive(Clone, Default)]
pub struct Rig {
    probe: Probe,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, call: Call) {
        self.probe.faults.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.probe.log.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.probe.log.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.probe.log.borrow_mut().clear();
    }

    pub fn actuator(&self) -> MockActuator {
        MockActuator(self.probe.clone())
    }

    pub fn pump(&self, bank: Bank, index: usize) -> MockPump {
        MockPump {
            probe: self.probe.clone(),
            bank,
            index,
        }
    }

    pub fn bank(&self, bank: Bank) -> [MockPump; 3] {
        [0, 1, 2].map(|i| self.pump(bank, i))
    }

    pub fn duty(&self) -> MockDuty {
        MockDuty(self.probe.clone())
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.probe.clone())
    }

    pub fn hardware(&self) -> Hardware<MockActuator, MockPump, MockDuty, MockDelay> {
        Hardware {
            actuator: self.actuator(),
            lsp: self.bank(Bank::Lsp),
            peristaltic: self.bank(Bank::Peristaltic),
            indicator: self.pump(Bank::Indicator, 0),
            dryer: self.duty(),
            delay: self.delay(),
        }
    }

    pub fn interpreter(&self) -> MockInterpreter {
        ProtocolInterpreter::new(self.hardware(), RobotConstants::default())
    }
}

// ── Expected sequences ────────────────────────────────────────

/// Protocol rows from body text (a header line is prepended).
pub fn rows(body: &str) -> Vec<Row> {
    read_rows(&format!("command,f1,f2,f3,f4,f5\n{body}")).unwrap()
}

/// Calls produced by one timed move at the default speed.
pub fn travel(direction: Call, distance_mm: f32) -> Vec<Call> {
    vec![
        direction,
        Call::Hold(Duration::from_secs_f32(
            distance_mm / RobotConstants::default().linear_speed_mm_per_s,
        )),
        Call::Brake,
        Call::Hold(Duration::from_millis(500)),
        Call::Coast,
    ]
}

/// Calls produced by `n` LSP pulse cycles on `index`.
pub fn pulses(index: usize, n: usize) -> Vec<Call> {
    (0..n)
        .flat_map(|_| {
            [
                Call::On(Bank::Lsp, index),
                Call::Hold(Duration::from_millis(250)),
                Call::Off(Bank::Lsp, index),
                Call::Hold(Duration::from_millis(250)),
            ]
        })
        .collect()
}
