//! Config mapping, controller assembly and trace replay.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use carctl_core::error::Result as CoreResult;
use carctl_core::{
    CarController, ControllerCfg, OutboundMessage, Pacing, Payload, PolicyTable, RunOptions,
    RunSummary, StdTorqueLimiter, torque_limits,
};
use carctl_traits::FrameSink;
use eyre::WrapErr;
use serde_json::{Value, json};

use crate::cli::LAST_CYCLE;

/// Config file could not be read, parsed or validated.
#[derive(Debug, thiserror::Error)]
#[error("config {path:?}: {msg}")]
pub struct ConfigError {
    pub path: PathBuf,
    pub msg: String,
}

pub fn load_config(path: &Path) -> CoreResult<carctl_config::Config> {
    let cfg_err = |msg: String| {
        eyre::Report::new(ConfigError {
            path: path.to_path_buf(),
            msg,
        })
    };
    let text = std::fs::read_to_string(path).map_err(|e| cfg_err(format!("read failed: {e}")))?;
    let cfg = carctl_config::load_toml(&text).map_err(|e| cfg_err(format!("parse failed: {e}")))?;
    cfg.validate().map_err(|e| cfg_err(e.to_string()))?;
    Ok(cfg)
}

/// Policy overrides: `--policy` wins over `[policy].csv`, which resolves relative to the config file.
pub fn load_policies(
    cfg: &carctl_config::Config,
    config_path: &Path,
    cli_override: Option<&Path>,
) -> CoreResult<PolicyTable> {
    let path = match (cli_override, cfg.policy.csv.as_deref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(p)) => {
            let p = Path::new(p);
            match config_path.parent() {
                Some(dir) if p.is_relative() => dir.join(p),
                _ => p.to_path_buf(),
            }
        }
        (None, None) => return Ok(PolicyTable::default()),
    };
    let rows = carctl_config::load_policy_csv(&path)?;
    let table = PolicyTable::try_from(rows.as_slice())
        .wrap_err_with(|| format!("policy CSV {path:?}"))?;
    tracing::info!(path = %path.display(), overrides = table.override_count(), "policy overrides loaded");
    Ok(table)
}

pub fn build_controller(
    cfg: &carctl_config::Config,
    policies: PolicyTable,
) -> CoreResult<CarController> {
    let limiter = StdTorqueLimiter::new(torque_limits(&cfg.steer));
    CarController::builder()
        .with_model_name(&cfg.vehicle.model)?
        .with_config(ControllerCfg::from(cfg))
        .with_limiter(limiter)
        .with_policies(policies)
        .build()
}

/// Writes each cycle's messages as JSON lines once the cycle is complete.
pub struct JsonLinesSink<W: Write> {
    out: W,
    pending: Vec<OutboundMessage>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::with_capacity(8),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn payload_fields(p: &Payload) -> Value {
    match *p {
        Payload::Lkas11 {
            steer_torque,
            steer_request,
            enabled,
            left_lane,
            right_lane,
            hud,
        } => json!({
            "steer_torque": steer_torque,
            "steer_request": steer_request,
            "enabled": enabled,
            "left_lane": left_lane,
            "right_lane": right_lane,
            "sys_warning": hud.steer_warning,
            "sys_state": hud.state.code(),
            "left_lane_warning": hud.left_warning,
            "right_lane_warning": hud.right_warning,
        }),
        Payload::Clu11 { button, speed } => json!({
            "button": button.code(),
            "speed": speed,
        }),
        Payload::Mdps12 => json!({}),
        Payload::Scc12 { accel, enabled } => json!({
            "accel": accel,
            "enabled": enabled,
        }),
        Payload::LfaMfa { enabled } => json!({ "enabled": enabled }),
    }
}

/// One output line for a message.
pub fn message_json(cycle: u64, m: &OutboundMessage) -> Value {
    let kind = m.kind();
    json!({
        "cycle": cycle,
        "bus": m.bus.0,
        "id": format!("0x{:03X}", kind.can_id()),
        "name": kind.name(),
        "counter": m.counter,
        "fields": payload_fields(&m.payload),
    })
}

impl<W: Write> FrameSink<OutboundMessage> for JsonLinesSink<W> {
    fn send(&mut self, msg: &OutboundMessage) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.pending.push(*msg);
        Ok(())
    }

    fn end_cycle(&mut self, cycle: u64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for m in self.pending.drain(..) {
            writeln!(self.out, "{}", message_json(cycle, &m))?;
        }
        Ok(())
    }
}

fn open_trace(path: &Path) -> CoreResult<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let f = File::open(path).map_err(|e| {
        eyre::Report::new(carctl_core::ControllerError::Io(format!(
            "open trace {}: {e}",
            path.display()
        )))
    })?;
    Ok(Box::new(BufReader::new(f)))
}

pub fn run_replay(
    controller: &mut CarController,
    trace: &Path,
    out: Option<&Path>,
    pace_hz: Option<u32>,
    max_cycles: Option<u64>,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let reader = open_trace(trace)?;
    let writer: Box<dyn Write> = match out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).wrap_err_with(|| format!("create output {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let opts = RunOptions {
        pacing: pace_hz.map_or(Pacing::Unpaced, Pacing::Hz),
        max_cycles,
    };

    let mut sink = JsonLinesSink::new(writer);
    let result = carctl_core::run_trace(controller, reader, &mut sink, Some(&shutdown), &opts);
    if let Some(c) = controller.state().last_cycle() {
        let _ = LAST_CYCLE.set(c);
    }
    let summary = result?;
    sink.into_inner()
        .flush()
        .map_err(|e| eyre::Report::new(carctl_core::ControllerError::Sink(e.to_string())))?;
    Ok(summary)
}

/// Latency-free sanity pass: one synthetic cycle must yield an LKAS11 first.
pub fn self_check(controller: &mut CarController) -> CoreResult<usize> {
    let input = carctl_core::CycleInput::default();
    let msgs = controller.try_update(&input)?;
    match msgs.first().map(|m| m.kind()) {
        Some(carctl_core::MessageKind::Lkas11) => Ok(msgs.len()),
        other => eyre::bail!("self-check: expected LKAS11 first, got {other:?}"),
    }
}

/// Print a per-kind summary to stderr.
pub fn print_summary(s: &RunSummary) {
    eprintln!("\n--- Replay Summary ---");
    eprintln!("Cycles: {}", s.cycles);
    if let (Some(a), Some(b)) = (s.first_cycle, s.last_cycle) {
        eprintln!("Cycle range: {a}..={b}");
    }
    eprintln!("Messages: {}", s.messages);
    for (name, n) in &s.per_kind {
        eprintln!("  {name:<12} {n}");
    }
    if s.interrupted {
        eprintln!("Interrupted by signal");
    }
    eprintln!("----------------------\n");
}
