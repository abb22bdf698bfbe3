#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validate must reject garbage with an error, never a panic.
    if let Ok(cfg) = carctl_config::load_toml(data) {
        let _ = cfg.validate();
        let _ = carctl_core::ControllerCfg::from(&cfg);
    }
});
