use carctl_config::load_toml;
use rstest::rstest;

const MINIMAL: &str = r#"
[vehicle]
model = "SONATA"
"#;

#[test]
fn minimal_config_uses_defaults() {
    let cfg = load_toml(MINIMAL).expect("parse TOML");
    cfg.validate().expect("defaults must validate");
    assert!(cfg.vehicle.lkas_button_default);
    assert!(!cfg.longitudinal.enabled);
    assert_eq!(cfg.accel.max, 1.5);
    assert_eq!(cfg.accel.min, -3.0);
    assert_eq!(cfg.steer.max, 255.0);
    assert_eq!(cfg.lkas.blinker_hold_cycles, 100);
    assert_eq!(cfg.resume.burst_len, 6);
    assert_eq!(cfg.speed_button.max_active_cycles, 10);
    assert!(cfg.policy.csv.is_none());
}

#[test]
fn missing_vehicle_section_is_a_parse_error() {
    assert!(load_toml("[longitudinal]\nenabled = true\n").is_err());
}

#[rstest]
#[case("[accel]\nmax = 0.0", "accel.max must be > 0")]
#[case("[accel]\nmin = 0.5", "accel.min must be < 0")]
#[case("[accel]\nmax = 9.0", "outside the range")]
#[case("[accel]\nhyst_gap = 0.9", "accel.hyst_gap")]
#[case("[steer]\nmax = 0.0", "steer.max")]
#[case("[steer]\ndelta_up = 8.0\ndelta_down = 7.0", "delta_down must be >= steer.delta_up")]
#[case("[steer]\ndriver_factor = -1.0", "driver_*")]
#[case("[lkas]\nlow_speed_kph = -1.0", "lkas.low_speed_kph")]
#[case("[resume]\nburst_len = 0", "resume.burst_len must be >= 1")]
#[case("[speed_button]\nmax_active_cycles = 0", "max_active_cycles")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation")]
fn rejects_out_of_range(#[case] extra: &str, #[case] needle: &str) {
    let toml = format!("{MINIMAL}\n{extra}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "{err}");
}

#[test]
fn rejects_blank_model() {
    let cfg = load_toml("[vehicle]\nmodel = \"  \"\n").unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_full_config() {
    let toml = r#"
[vehicle]
model = "HYUNDAI_GENESIS"
lkas_button_default = false

[longitudinal]
enabled = true

[accel]
max = 2.0
min = -3.5
hyst_gap = 0.03

[steer]
max = 384.0
delta_up = 3.0
delta_down = 7.0

[lkas]
low_speed_kph = 55.0
blinker_hold_cycles = 150

[speed_button]
override_wait_cycles = 10

[logging]
level = "debug"
rotation = "daily"

[policy]
csv = "etc/policy.csv"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert!(!cfg.vehicle.lkas_button_default);
    assert_eq!(cfg.speed_button.override_wait_cycles, 10);
    assert_eq!(cfg.policy.csv.as_deref(), Some("etc/policy.csv"));
}
