#![no_main]

use direct_di::{Generator, GeneratorConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = if data.first() == Some(&b'{') {
        GeneratorConfig::from_json_str(text)
    } else {
        GeneratorConfig::from_toml_str(text)
    };

    if let Ok(mut config) = parsed {
        // Stay in memory
        config.sources.clear();
        if let Ok(generated) = Generator::new(config, ".").run() {
            let source = generated.source().expect("synthesized code renders");
            assert!(syn::parse_file(&source).is_ok());
        }
    }
});
