//! AutoENZ host runner.
//!
//! ```text
//! autoenz <protocol.csv> [robot.json] [--dry-run]
//! ```
//!
//! Reads a protocol, wires the interpreter to simulated pins numbered as on
//! the controller board, and runs it.  Without `--dry-run` every hold
//! really sleeps; with it a virtual clock is used and the total simulated
//! run time is reported instead.
#![deny(unused_must_use)]

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use env_logger::Env;
use log::{error, info};

use autoenz::adapters::delay::{StdDelay, VirtualClock};
use autoenz::adapters::hal::{HBridge, PwmElement, Switch};
use autoenz::adapters::log_sink::LogEventSink;
use autoenz::adapters::sim::{SimPin, SimPwm};
use autoenz::app::ports::Delay;
use autoenz::config::RobotConstants;
use autoenz::interpreter::{Hardware, ProtocolInterpreter, RunSummary};
use autoenz::pins;
use autoenz::protocol::{Row, reader::read_rows};

struct Args {
    protocol: String,
    robot: Option<String>,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut dry_run = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    let Some(protocol) = positional.next() else {
        bail!("usage: autoenz <protocol.csv> [robot.json] [--dry-run]");
    };
    let robot = positional.next();
    if positional.next().is_some() {
        bail!("too many arguments");
    }
    Ok(Args {
        protocol,
        robot,
        dry_run,
    })
}

fn load_constants(path: Option<&str>) -> Result<RobotConstants> {
    let Some(path) = path else {
        info!("using reference robot constants");
        return Ok(RobotConstants::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let constants: RobotConstants =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    constants.validate()?;
    info!("loaded robot constants from {}", path);
    Ok(constants)
}

type SimInterpreter<C> =
    ProtocolInterpreter<HBridge<SimPin, SimPin>, Switch<SimPin>, PwmElement<SimPwm>, C>;

fn simulated_robot<C: Delay>(delay: C, constants: RobotConstants) -> SimInterpreter<C> {
    let hw = Hardware {
        actuator: HBridge::new(
            SimPin::new(pins::ACTUATOR_IN1_GPIO),
            SimPin::new(pins::ACTUATOR_IN2_GPIO),
        ),
        lsp: pins::LSP_GPIO.map(|gpio| Switch::active_high(SimPin::new(gpio))),
        peristaltic: pins::PERISTALTIC_GPIO.map(|gpio| Switch::active_high(SimPin::new(gpio))),
        indicator: Switch::active_high(SimPin::new(pins::INDICATOR_GPIO)),
        dryer: PwmElement::new(SimPwm::new(pins::DRYER_PWM_GPIO)),
        delay,
    };
    ProtocolInterpreter::new(hw, constants)
}

fn run(args: &Args) -> Result<()> {
    let constants = load_constants(args.robot.as_deref())?;
    let text = fs::read_to_string(&args.protocol)
        .with_context(|| format!("reading {}", args.protocol))?;
    let rows: Vec<Row> = read_rows(&text)?;
    info!("{}: {} rows", args.protocol, rows.len());

    let mut sink = LogEventSink::new();
    let summary: RunSummary = if args.dry_run {
        let mut robot = simulated_robot(VirtualClock::new(), constants);
        let summary = robot.run(&rows, &mut sink)?;
        info!(
            "dry run: {} steps, {:.1} s simulated",
            summary.steps,
            robot.delay().elapsed().as_secs_f32()
        );
        summary
    } else {
        simulated_robot(StdDelay, constants).run(&rows, &mut sink)?
    };

    info!("protocol complete ({} steps)", summary.steps);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let outcome = parse_args().and_then(|args| run(&args));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
