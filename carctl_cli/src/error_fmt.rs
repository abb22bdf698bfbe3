//! Human-readable error descriptions and structured JSON error formatting.

use carctl_core::error::{BuildError, ControllerError, InputError};

use crate::cli::LAST_CYCLE;
use crate::replay::ConfigError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingModel => {
                "What happened: No vehicle model was given to the controller.\nLikely causes: The builder was used without with_model(...).\nHow to fix: Set [vehicle].model in the config, e.g. model = \"SONATA\".".to_string()
            }
            BuildError::UnknownModel(name) => format!(
                "What happened: Unknown vehicle model '{name}'.\nLikely causes: Typo in [vehicle].model or in the policy CSV model column.\nHow to fix: Use a supported fingerprint name such as SONATA, KONA_EV or HYUNDAI_GENESIS."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<ConfigError>() {
        return format!(
            "What happened: The config file {:?} could not be used ({}).\nLikely causes: Wrong --config path, a TOML syntax error, or a value out of range.\nHow to fix: Fix the file and rerun; `carctl self-check` validates it without a trace.",
            ce.path, ce.msg
        );
    }

    if let Some(ce) = err.downcast_ref::<ControllerError>() {
        return match ce {
            ControllerError::Input { cycle, source } => {
                let hint = match source {
                    InputError::NonMonotonicCycle { .. } => {
                        "Cycles must be strictly increasing; the trace may be concatenated or unsorted."
                    }
                    InputError::NonFinite(_) | InputError::OutOfRange { .. } => {
                        "The recorder wrote a value outside the range the controller accepts."
                    }
                };
                format!(
                    "What happened: Invalid input at cycle {cycle}: {source}.\nLikely causes: {hint}\nHow to fix: Correct or drop the offending frame and rerun."
                )
            }
            ControllerError::Trace { line, msg } => format!(
                "What happened: Trace line {line} is not a valid frame ({msg}).\nLikely causes: Truncated recording or a non-JSON line.\nHow to fix: Fix the line or prefix it with '#' to skip it."
            ),
            ControllerError::Sink(msg) => format!(
                "What happened: Writing outbound messages failed ({msg}).\nLikely causes: Output file not writable or the downstream pipe closed.\nHow to fix: Check --out and the consumer of stdout."
            ),
            ControllerError::Io(msg) => format!(
                "What happened: I/O error ({msg}).\nLikely causes: Missing trace file or unreadable stdin.\nHow to fix: Check the --trace path."
            ),
        };
    }

    let msg = err.to_string();
    let lower = format!("{err:#}").to_ascii_lowercase();

    // Policy CSV header special-case
    if lower.contains("policy csv must have headers") {
        return "Invalid headers in policy CSV. Expected 'model,low_speed_lkas_fault,low_lane_warning,lfa_mfa'.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 invalid input, 4 config, 5 sink, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<ConfigError>().is_some() {
        return 4;
    }
    if err.to_string().to_ascii_lowercase().contains("policy csv") {
        return 4;
    }
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Input { .. } | ControllerError::Trace { .. }) => 3,
        Some(ControllerError::Sink(_)) => 5,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingModel => "MissingModel",
            BuildError::UnknownModel(_) => "UnknownModel",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Input { .. }) => "InvalidInput",
        Some(ControllerError::Trace { .. }) => "InvalidTrace",
        Some(ControllerError::Sink(_)) => "Sink",
        Some(ControllerError::Io(_)) => "Io",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    let reason = reason_name(err);
    let detail = match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Input { cycle, source }) => match source {
            InputError::OutOfRange { field, value } => {
                Some(json!({ "cycle": cycle, "field": field, "value": value }))
            }
            InputError::NonFinite(field) => Some(json!({ "cycle": cycle, "field": field })),
            InputError::NonMonotonicCycle { prev, next } => {
                Some(json!({ "cycle": cycle, "prev": prev, "next": next }))
            }
        },
        Some(ControllerError::Trace { line, .. }) => Some(json!({ "line": line })),
        Some(ControllerError::Sink(_)) => LAST_CYCLE.get().map(|c| json!({ "last_cycle": c })),
        _ => None,
    };

    let obj = if let Some(d) = detail {
        json!({ "reason": reason, "details": d, "message": msg })
    } else {
        json!({ "reason": reason, "message": msg })
    };
    obj.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_exit_with_three() {
        let err = eyre::Report::new(ControllerError::Input {
            cycle: 3,
            source: InputError::NonFinite("vehicle.v_ego"),
        });
        assert_eq!(exit_code_for_error(&err), 3);
        let j: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(j["reason"], "InvalidInput");
        assert_eq!(j["details"]["field"], "vehicle.v_ego");
    }

    #[test]
    fn build_errors_exit_with_four() {
        let err = eyre::Report::new(BuildError::UnknownModel("X".into()));
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("Unknown vehicle model 'X'"));
    }

    #[test]
    fn sink_errors_exit_with_five() {
        let err = eyre::Report::new(ControllerError::Sink("pipe closed".into()));
        assert_eq!(exit_code_for_error(&err), 5);
    }

    #[test]
    fn untyped_errors_are_generic() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).starts_with("Something went wrong."));
    }
}
