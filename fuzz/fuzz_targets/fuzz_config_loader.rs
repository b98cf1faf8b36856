#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = toml::from_str::<extract_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must either build or fail with a typed error.
    let _ = extract_core::Workbench::builder().with_config(&cfg).try_build();
});
