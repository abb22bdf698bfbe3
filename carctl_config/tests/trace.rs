use carctl_config::trace::{TraceAlert, TraceButton};
use carctl_config::parse_trace_line;
use rstest::rstest;

#[rstest]
#[case("")]
#[case("   ")]
#[case("# recorded 2026-03-02")]
fn skips_blank_and_comment_lines(#[case] line: &str) {
    assert!(parse_trace_line(line).unwrap().is_none());
}

#[rstest]
fn minimal_frame_uses_defaults() {
    let f = parse_trace_line(r#"{"cycle": 7}"#).unwrap().unwrap();
    assert_eq!(f.cycle, 7);
    assert!(!f.enabled);
    assert_eq!(f.actuators.gas, 0.0);
    assert_eq!(f.hud.visual_alert, TraceAlert::None);
    assert_eq!(f.vehicle.scc_alive_count, None);
    assert!(f.speed_hint.is_none());
}

#[rstest]
fn full_frame_round_trips_fields() {
    let line = r#"{"cycle":12,"enabled":true,"actuators":{"gas":0.2,"brake":0.0,"steer":-0.1},
        "hud":{"visual_alert":"steerRequired","left_lane":true},
        "vehicle":{"v_ego":20.0,"cruise":{"enabled":true,"mode_sel":3},"scc_alive_count":4,"mdps_bus":1},
        "speed_hint":{"button":"set_decel","target_speed":57.0}}"#
        .replace('\n', " ");
    let f = parse_trace_line(&line).unwrap().unwrap();
    assert!(f.enabled);
    assert_eq!(f.hud.visual_alert, TraceAlert::SteerRequired);
    assert!(f.hud.left_lane);
    assert_eq!(f.vehicle.cruise.mode_sel, 3);
    assert_eq!(f.vehicle.scc_alive_count, Some(4));
    assert_eq!(f.vehicle.mdps_bus, 1);
    let hint = f.speed_hint.unwrap();
    assert_eq!(hint.button, TraceButton::SetDecel);
    assert_eq!(hint.target_speed, 57.0);
}

#[rstest]
fn unknown_alert_maps_to_other() {
    let f = parse_trace_line(r#"{"cycle":1,"hud":{"visual_alert":"fcw"}}"#)
        .unwrap()
        .unwrap();
    assert_eq!(f.hud.visual_alert, TraceAlert::Other);
}

#[rstest]
#[case(r#"{"enabled": true}"#)]
#[case(r#"{"cycle": -1}"#)]
#[case("not json")]
fn rejects_malformed_lines(#[case] line: &str) {
    let err = parse_trace_line(line).unwrap_err();
    assert!(format!("{err}").contains("invalid trace frame"));
}
