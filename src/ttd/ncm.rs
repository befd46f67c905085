//! Steel and copper NCM codes that earn the higher 4% presumed credit.

use std::collections::HashSet;
use std::sync::LazyLock;

/// NCM codes of steel and copper products listed in ato DIAT 35/2024.
pub const STEEL_COPPER_NCM_CODES: [&str; 30] = [
    "74055000", "74031100", "74031200", "73043910", "73043110", "72253000", "72193500",
    "72193400", "72193300", "72193200", "74031300", "72192300", "72191400", "72191300",
    "72191200", "72142000", "72106100", "72091800", "74032900", "74050000", "74072110",
    "74072120", "74081100", "72091700", "72091600", "74081900", "74091100", "74099000",
    "73251000", "73259910",
];

static STEEL_COPPER_NCM: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STEEL_COPPER_NCM_CODES.into_iter().collect());

/// Whether `ncm` is one of the listed steel/copper codes.
///
/// Matching is exact on the 8-digit code; surrounding whitespace is ignored.
pub fn is_steel_copper_ncm(ncm: &str) -> bool {
    STEEL_COPPER_NCM.contains(ncm.trim())
}
