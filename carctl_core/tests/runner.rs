use std::sync::atomic::AtomicBool;

use carctl_config::PolicyRow;
use carctl_core::error::{ControllerError, InputError};
use carctl_core::mocks::{CycleRecorder, FailingSink};
use carctl_core::{
    Button, CarController, CycleInput, MessageKind, OutboundMessage, PolicyTable, RunOptions,
    VehicleModel, run_trace,
};
use rstest::{fixture, rstest};

#[fixture]
fn sonata() -> CarController {
    CarController::builder()
        .with_model(VehicleModel::Sonata)
        .build()
        .unwrap()
}

fn run(c: &mut CarController, trace: &str) -> eyre::Result<carctl_core::RunSummary> {
    let mut sink: Vec<OutboundMessage> = Vec::new();
    run_trace(c, trace.as_bytes(), &mut sink, None, &RunOptions::default())
}

#[rstest]
fn replay_groups_messages_per_cycle(mut sonata: CarController) {
    let trace = r#"
{"cycle": 0, "enabled": true, "vehicle": {"v_ego": 20.0, "lkas_msg_count": 7}}
{"cycle": 1, "enabled": true, "vehicle": {"v_ego": 20.0}}
{"cycle": 2, "enabled": true, "vehicle": {"v_ego": 20.0}}
"#;
    let mut rec = CycleRecorder::default();
    let s = run_trace(&mut sonata, trace.as_bytes(), &mut rec, None, &RunOptions::default())
        .unwrap();
    assert_eq!(s.cycles, 3);
    assert_eq!(rec.cycles.len(), 3);
    let first = rec.messages_at(0).unwrap();
    assert_eq!(first[0].kind(), MessageKind::Lkas11);
    assert_eq!(first[0].counter, 8);
    assert_eq!(first.last().map(|m| m.kind()), Some(MessageKind::LfaMfa));
    assert_eq!(s.per_kind.get("LKAS11"), Some(&3));
    assert_eq!(s.per_kind.get("LFAHDA_MFC"), Some(&1));
}

#[rstest]
fn repeated_cycle_index_is_rejected(mut sonata: CarController) {
    let err = run(&mut sonata, "{\"cycle\": 4}\n{\"cycle\": 4}\n").unwrap_err();
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Input {
            cycle: 4,
            source: InputError::NonMonotonicCycle { prev: 4, next: 4 },
        }) => {}
        other => panic!("expected NonMonotonicCycle, got {other:?}"),
    }
}

#[rstest]
#[case::gas(r#"{"cycle": 1, "actuators": {"gas": 1.5}}"#, "actuators.gas")]
#[case::steer(r#"{"cycle": 1, "actuators": {"steer": -2.0}}"#, "actuators.steer")]
#[case::counter(r#"{"cycle": 1, "vehicle": {"lkas_msg_count": 16}}"#, "vehicle.lkas_msg_count")]
#[case::bus(r#"{"cycle": 1, "vehicle": {"mdps_bus": 3}}"#, "vehicle.mdps_bus")]
#[case::mode(r#"{"cycle": 1, "vehicle": {"cruise": {"mode_sel": 4}}}"#, "vehicle.cruise.mode_sel")]
fn out_of_range_fields_are_named(#[case] line: &str, #[case] field: &str, mut sonata: CarController) {
    let err = run(&mut sonata, line).unwrap_err();
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Input {
            source: InputError::OutOfRange { field: f, .. },
            ..
        }) => assert_eq!(*f, field),
        other => panic!("expected OutOfRange, got {other:?}"),
    }
}

#[rstest]
fn malformed_json_reports_line(mut sonata: CarController) {
    let err = run(&mut sonata, "{\"cycle\": 1}\n{cycle: 2}\n").unwrap_err();
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Trace { line: 2, .. }) => {}
        other => panic!("expected Trace error on line 2, got {other:?}"),
    }
}

#[rstest]
fn sink_failure_is_typed(mut sonata: CarController) {
    let mut sink = FailingSink::new(1);
    let err = run_trace(
        &mut sonata,
        "{\"cycle\": 0}\n".as_bytes(),
        &mut sink,
        None,
        &RunOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ControllerError>(),
        Some(ControllerError::Sink(_))
    ));
}

#[rstest]
fn shutdown_flag_stops_before_next_cycle(mut sonata: CarController) {
    let flag = AtomicBool::new(true);
    let mut sink: Vec<OutboundMessage> = Vec::new();
    let s = run_trace(
        &mut sonata,
        "{\"cycle\": 0}\n{\"cycle\": 1}\n".as_bytes(),
        &mut sink,
        Some(&flag),
        &RunOptions::default(),
    )
    .unwrap();
    assert!(s.interrupted);
    assert_eq!(s.cycles, 0);
    assert!(sink.is_empty());
}

#[rstest]
fn speed_hint_from_trace_reaches_the_bus(mut sonata: CarController) {
    let line = r#"{"cycle": 0, "enabled": true,
        "vehicle": {"v_ego": 22.0, "clu_speed": 80, "scc_bus": 2,
                    "cruise": {"enabled": true, "mode_sel": 1, "lamp_set": true}},
        "speed_hint": {"button": "set_decel", "target_speed": 72}}"#
        .replace('\n', " ");
    let mut sink: Vec<OutboundMessage> = Vec::new();
    run_trace(&mut sonata, line.as_bytes(), &mut sink, None, &RunOptions::default()).unwrap();
    let press = sink
        .iter()
        .find(|m| m.button() == Some(Button::SetCoast))
        .unwrap();
    assert_eq!(press.bus.0, 2);
}

#[rstest]
fn policy_rows_override_builtin_table() {
    let rows = vec![PolicyRow {
        model: "KONA".into(),
        low_speed_lkas_fault: false,
        low_lane_warning: true,
        lfa_mfa: true,
    }];
    let table = PolicyTable::try_from(rows.as_slice()).unwrap();
    let mut c = CarController::builder()
        .with_model(VehicleModel::Kona)
        .with_policies(table)
        .build()
        .unwrap();
    assert!(c.policy().lfa_mfa);
    let msgs = c.update(&CycleInput::default());
    assert_eq!(msgs.last().map(|m| m.kind()), Some(MessageKind::LfaMfa));
}

#[rstest]
fn policy_row_with_unknown_model_fails() {
    let rows = vec![PolicyRow {
        model: "TRABANT".into(),
        low_speed_lkas_fault: false,
        low_lane_warning: false,
        lfa_mfa: false,
    }];
    assert!(PolicyTable::try_from(rows.as_slice()).is_err());
}
