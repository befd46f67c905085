//! Presumed-credit percentage tables of the TTD regime.
//!
//! Both tables are keyed on the declared ICMS rate (`pICMS`). Rates are
//! compared numerically, so `4`, `4.0` and `4.00` select the same entry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::ncm::is_steel_copper_ncm;
use crate::core::AuditContext;

/// Percentages used when the ICMS base differs from the product value.
pub const DELTA_TABLE: &[(Decimal, Decimal)] = &[
    (dec!(4.00), dec!(1.0)),
    (dec!(7.00), dec!(3.4)),
    (dec!(10.00), dec!(3.6)),
    (dec!(12.00), dec!(2.1)),
];

/// Percentages used when the ICMS base equals the product value.
pub const PERCENT_OF_ICMS_TABLE: &[(Decimal, PercentRule)] = &[
    (
        dec!(4.00),
        PercentRule::BySteelCopperNcm {
            listed: dec!(85.0),
            other: dec!(75.0),
        },
    ),
    (dec!(7.00), PercentRule::Fixed(dec!(70.0))),
    (
        dec!(10.00),
        PercentRule::ByIndustryTenPercent {
            yes: dec!(90.0),
            no: dec!(64.0),
        },
    ),
    (
        dec!(12.00),
        PercentRule::BySimplesNacionalClient {
            yes: dec!(70.0),
            no: dec!(82.5),
        },
    ),
];

/// How a percentage-of-ICMS table entry picks its percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentRule {
    Fixed(Decimal),
    /// Depends on membership of the line's NCM in the steel/copper list.
    BySteelCopperNcm { listed: Decimal, other: Decimal },
    /// Depends on [`AuditContext::industry_ten_percent_icms`].
    ByIndustryTenPercent { yes: Decimal, no: Decimal },
    /// Depends on [`AuditContext::simples_nacional_client`].
    BySimplesNacionalClient { yes: Decimal, no: Decimal },
}

impl PercentRule {
    pub fn resolve(&self, ncm: &str, ctx: &AuditContext) -> Decimal {
        match *self {
            PercentRule::Fixed(p) => p,
            PercentRule::BySteelCopperNcm { listed, other } => {
                if is_steel_copper_ncm(ncm) {
                    listed
                } else {
                    other
                }
            }
            PercentRule::ByIndustryTenPercent { yes, no } => {
                if ctx.industry_ten_percent_icms.is_yes() {
                    yes
                } else {
                    no
                }
            }
            PercentRule::BySimplesNacionalClient { yes, no } => {
                if ctx.simples_nacional_client.is_yes() {
                    yes
                } else {
                    no
                }
            }
        }
    }
}

/// Delta-mode percentage for `icms_rate`, if the rate is listed.
pub fn delta_percent(icms_rate: Decimal) -> Option<Decimal> {
    DELTA_TABLE
        .iter()
        .find(|(rate, _)| *rate == icms_rate)
        .map(|(_, percent)| *percent)
}

/// Percentage-of-ICMS percentage for `icms_rate`, if the rate is listed.
pub fn percent_of_icms(icms_rate: Decimal, ncm: &str, ctx: &AuditContext) -> Option<Decimal> {
    PERCENT_OF_ICMS_TABLE
        .iter()
        .find(|(rate, _)| *rate == icms_rate)
        .map(|(_, rule)| rule.resolve(ncm, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::YesNo;

    fn ctx(simples: YesNo, industry: YesNo) -> AuditContext {
        AuditContext::new(simples, industry)
    }

    #[test]
    fn delta_table_entries() {
        assert_eq!(delta_percent(dec!(4)), Some(dec!(1.0)));
        assert_eq!(delta_percent(dec!(7)), Some(dec!(3.4)));
        assert_eq!(delta_percent(dec!(10.0)), Some(dec!(3.6)));
        assert_eq!(delta_percent(dec!(12.00)), Some(dec!(2.1)));
    }

    #[test]
    fn delta_table_unlisted_rate() {
        assert_eq!(delta_percent(dec!(17)), None);
        assert_eq!(delta_percent(dec!(0)), None);
        assert_eq!(delta_percent(dec!(4.01)), None);
    }

    #[test]
    fn four_percent_depends_on_ncm() {
        let c = AuditContext::default();
        assert_eq!(percent_of_icms(dec!(4), "74055000", &c), Some(dec!(85)));
        assert_eq!(percent_of_icms(dec!(4), "84713012", &c), Some(dec!(75)));
    }

    #[test]
    fn seven_percent_is_fixed() {
        for (s, i) in [(YesNo::Yes, YesNo::Yes), (YesNo::No, YesNo::No)] {
            assert_eq!(percent_of_icms(dec!(7), "74055000", &ctx(s, i)), Some(dec!(70)));
        }
    }

    #[test]
    fn ten_percent_depends_on_industry_flag() {
        assert_eq!(
            percent_of_icms(dec!(10), "", &ctx(YesNo::No, YesNo::Yes)),
            Some(dec!(90))
        );
        assert_eq!(
            percent_of_icms(dec!(10), "", &ctx(YesNo::Yes, YesNo::No)),
            Some(dec!(64))
        );
    }

    #[test]
    fn twelve_percent_depends_on_simples_flag() {
        assert_eq!(
            percent_of_icms(dec!(12), "", &ctx(YesNo::Yes, YesNo::No)),
            Some(dec!(70))
        );
        assert_eq!(
            percent_of_icms(dec!(12), "", &ctx(YesNo::No, YesNo::Yes)),
            Some(dec!(82.5))
        );
    }

    #[test]
    fn percent_of_icms_unlisted_rate() {
        assert_eq!(percent_of_icms(dec!(17), "74055000", &AuditContext::default()), None);
    }

    #[test]
    fn tables_cover_the_same_rates() {
        let delta: Vec<_> = DELTA_TABLE.iter().map(|(r, _)| *r).collect();
        let full: Vec<_> = PERCENT_OF_ICMS_TABLE.iter().map(|(r, _)| *r).collect();
        assert_eq!(delta, full);
    }
}
