#![no_main]

use credito_presumido::core::{AuditContext, YesNo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((flags, xml)) = data.split_first() else {
        return;
    };
    let ctx = AuditContext::new(
        YesNo::from(flags & 1 == 1),
        YesNo::from(flags & 2 == 2),
    );
    if let Ok(report) = credito_presumido::nfe::audit_nfe(xml, &ctx) {
        let _ = credito_presumido::report::to_csv(&report);
        let _ = report.summary();
    }
});
