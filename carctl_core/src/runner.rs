use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use carctl_traits::FrameSink;

use crate::controller::CarController;
use crate::error::{ControllerError, Result as CoreResult};
use crate::message::OutboundMessage;
use crate::types::CycleInput;

/// How cycles are paced during replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pacing {
    /// As fast as the sink accepts messages
    #[default]
    Unpaced,
    /// Sleep one period between cycles
    Hz(u32),
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub pacing: Pacing,
    /// Stop after this many cycles
    pub max_cycles: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub messages: u64,
    /// Messages per kind name
    pub per_kind: BTreeMap<&'static str, u64>,
    pub first_cycle: Option<u64>,
    pub last_cycle: Option<u64>,
    /// Stopped by the shutdown flag before the trace ended
    pub interrupted: bool,
}

fn io_err(e: std::io::Error) -> eyre::Report {
    eyre::Report::new(ControllerError::Io(e.to_string()))
}

/// Feed a JSON-lines trace through `controller`, writing every message to `sink` in order.
///
/// `shutdown` is polled between cycles. Per-cycle input is validated before the
/// controller sees it; the first malformed line ends the run.
pub fn run_trace<R, S>(
    controller: &mut CarController,
    reader: R,
    sink: &mut S,
    shutdown: Option<&AtomicBool>,
    opts: &RunOptions,
) -> CoreResult<RunSummary>
where
    R: BufRead,
    S: FrameSink<OutboundMessage> + ?Sized,
{
    let period = match opts.pacing {
        Pacing::Unpaced => None,
        Pacing::Hz(hz) => Some(Duration::from_micros(crate::util::period_us(hz))),
    };
    let mut summary = RunSummary::default();
    tracing::info!(model = %controller.model(), pacing = ?opts.pacing, "replay start");

    for (idx, line) in reader.lines().enumerate() {
        if shutdown.is_some_and(|f| f.load(Ordering::Relaxed)) {
            tracing::info!(cycles = summary.cycles, "replay interrupted");
            summary.interrupted = true;
            break;
        }
        if opts.max_cycles.is_some_and(|m| summary.cycles >= m) {
            break;
        }

        let line = line.map_err(io_err)?;
        let line_no = idx + 1;
        let frame = match carctl_config::parse_trace_line(&line) {
            Ok(Some(f)) => f,
            Ok(None) => continue,
            Err(e) => {
                return Err(eyre::Report::new(ControllerError::Trace {
                    line: line_no,
                    msg: e.to_string(),
                }));
            }
        };
        let input = CycleInput::try_from(&frame).map_err(|source| ControllerError::Input {
            cycle: frame.cycle,
            source,
        })?;

        let messages = controller.try_update(&input)?;
        for msg in &messages {
            if let Err(e) = sink.send(msg) {
                tracing::warn!(cycle = input.cycle, kind = msg.kind().name(), error = %e, "sink rejected message");
                return Err(eyre::Report::new(ControllerError::Sink(e.to_string())));
            }
            *summary.per_kind.entry(msg.kind().name()).or_default() += 1;
        }
        sink.end_cycle(input.cycle).map_err(|e| {
            tracing::warn!(cycle = input.cycle, error = %e, "sink failed to flush cycle");
            eyre::Report::new(ControllerError::Sink(e.to_string()))
        })?;

        summary.cycles += 1;
        summary.messages += messages.len() as u64;
        summary.first_cycle.get_or_insert(input.cycle);
        summary.last_cycle = Some(input.cycle);

        if let Some(p) = period {
            std::thread::sleep(p);
        }
    }

    tracing::info!(
        cycles = summary.cycles,
        messages = summary.messages,
        interrupted = summary.interrupted,
        "replay finished"
    );
    Ok(summary)
}
