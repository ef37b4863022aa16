//! Fuzz harness for configuration files (skipset.yaml / skipset.json)
//!
//! Parsing must never panic, and anything that parses must build a set.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skipset::SkipListSet;
use skipset_config::SkipSetConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for parsed in [
        SkipSetConfig::from_yaml_str(input),
        SkipSetConfig::from_json_str(input),
    ] {
        if let Ok(config) = parsed {
            let mut set: SkipListSet<u8> = SkipListSet::from_config(&config);
            set.add_all(data.iter().copied());
            assert!(set.validate().is_ok());
        }
    }
});
