use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use credito_presumido::core::*;
use credito_presumido::nfe;
use credito_presumido::ttd;

const RATES: [&str; 5] = ["4.00", "7.00", "10.00", "12.00", "17.00"];

/// NF-e with `n` lines cycling through every rate, a third of them with a
/// reduced ICMS base.
fn build_nfe(n: usize) -> String {
    let mut dets = String::new();
    for i in 1..=n {
        let rate = RATES[i % RATES.len()];
        let base = if i % 3 == 0 { "800.00" } else { "1000.00" };
        dets.push_str(&format!(
            r#"<det nItem="{i}"><prod><NCM>7405500{d}</NCM><cBenef>SC850001</cBenef><vProd>1000.00</vProd><gCred><vCredPresumido>30.00</vCredPresumido></gCred></prod><imposto><ICMS><ICMS00><vBC>{base}</vBC><pICMS>{rate}</pICMS><vICMS>40.00</vICMS></ICMS00></ICMS></imposto></det>"#,
            d = i % 10
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe Id="NFe42240583245117000150550010000045671123456784"><ide><nNF>4567</nNF></ide>{dets}</infNFe></NFe></nfeProc>"#
    )
}

fn sample_lines(n: usize) -> Vec<InvoiceLine> {
    (1..=n)
        .map(|i| InvoiceLine {
            item_number: i.to_string(),
            ncm_code: "74055000".into(),
            icms_rate_percent: Decimal::from([4, 7, 10, 12, 17][i % 5]),
            icms_value: dec!(40),
            product_value: dec!(1000),
            icms_base: if i % 3 == 0 { dec!(800) } else { dec!(1000) },
            benefit_code: "SC850001".into(),
            declared_presumed_credit: dec!(30),
        })
        .collect()
}

fn bench_recalculate(c: &mut Criterion) {
    let lines = sample_lines(100);
    let ctx = AuditContext::new(YesNo::Yes, YesNo::No);
    c.bench_function("recalculate_100_lines", |b| {
        b.iter(|| black_box(ttd::recalculate_all(black_box(&lines), &ctx)));
    });
}

fn bench_extract(c: &mut Criterion) {
    let xml = build_nfe(10);
    c.bench_function("extract_10_lines", |b| {
        b.iter(|| black_box(nfe::extract_lines(black_box(xml.as_bytes()))));
    });
}

fn bench_audit_990_lines(c: &mut Criterion) {
    // 990 is the NF-e schema maximum for det
    let xml = build_nfe(990);
    let ctx = AuditContext::default();
    c.bench_function("audit_990_lines", |b| {
        b.iter(|| black_box(nfe::audit_nfe(black_box(xml.as_bytes()), &ctx)));
    });
}

criterion_group!(
    benches,
    bench_recalculate,
    bench_extract,
    bench_audit_990_lines,
);
criterion_main!(benches);
