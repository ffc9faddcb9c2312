#![no_main]

use dml_config::config::loader::render;
use dml_config::config::{ConfigFormat, ConfigLoader, PostLoad};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let loader = ConfigLoader::with_defaults();
    for format in [ConfigFormat::Json, ConfigFormat::Yaml] {
        // Parse failures are fine; panics and broken invariants are not.
        let Ok(result) = loader.load_from_str(text, format) else {
            continue;
        };
        let config = &result.config;

        assert!(config.trial.max_time >= 0);
        assert!(config.trial.warmup_time >= config.trial.max_time);
        assert!(config.trial.arena_radius >= 1);
        assert!(config.data_model.basic_data_required >= 1);
        assert!(config.data_model.advanced_data_required >= config.data_model.basic_data_required);
        assert!(
            config.glitch_armor.data_amount_to_self_aware
                >= config.glitch_armor.data_amount_to_superior
        );
        assert!((0.0..=1.0).contains(&config.system_glitch.teleport_chance));
        assert!(config.matter_condenser.process_time >= 1);
        assert!(config.system_glitch.damage_limiter.is_finite());
        assert!(config.glitch_armor.costs.fly.is_finite());

        // Whatever loaded must survive a save and reload unchanged.
        let rendered = render(config, ConfigFormat::Json).expect("render failed");
        let reloaded = loader
            .load_from_str(&rendered, ConfigFormat::Json)
            .expect("rendered configuration failed to load");
        assert_eq!(*reloaded.config, **config);

        let mut again = (**config).clone();
        assert!(again.normalize().is_empty());
    }
});
