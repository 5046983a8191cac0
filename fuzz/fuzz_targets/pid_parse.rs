#![no_main]

use citeform::PersistentId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(pid) = PersistentId::parse(s) {
            // Parsing the rendered form gives back the same identifier
            let reparsed = PersistentId::parse(&pid.as_string()).expect("rendered PID parses");
            assert_eq!(pid, reparsed);
        }
    }
});
