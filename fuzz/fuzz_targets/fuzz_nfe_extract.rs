#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are not.
    let _ = credito_presumido::nfe::extract_lines(data);
});
