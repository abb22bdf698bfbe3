#![no_main]
use libfuzzer_sys::fuzz_target;

use carctl_core::{CarController, CycleInput, VehicleModel};

fuzz_target!(|data: &str| {
    let Ok(Some(frame)) = carctl_config::parse_trace_line(data) else {
        return;
    };
    let Ok(input) = CycleInput::try_from(&frame) else {
        return;
    };
    // Anything that passes validation must run a cycle without panicking.
    if let Ok(mut c) = CarController::builder()
        .with_model(VehicleModel::Sonata)
        .with_longitudinal(true)
        .build()
    {
        let _ = c.try_update(&input);
    }
});
