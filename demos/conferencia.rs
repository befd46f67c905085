//! Audit one NF-e file and write the result table as CSV.
//!
//! ```text
//! cargo run --example conferencia --features all -- nota.xml [SIM|NÃO] [SIM|NÃO]
//! ```
//!
//! The table is written to `credito_presumido.csv` in the current directory.
//!
//! The two optional answers are, in order: "recipient opted into Simples
//! Nacional?" and "industry / carta de venda with 10% ICMS?". Both default
//! to NÃO.

use credito_presumido::core::*;
use credito_presumido::{nfe, report};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: conferencia <nfe.xml> [simples: SIM|NÃO] [industria 10%: SIM|NÃO]");
        std::process::exit(2);
    };

    let answer = |arg: Option<String>| -> YesNo {
        match arg.as_deref().map(str::parse::<YesNo>) {
            None => YesNo::No,
            Some(Ok(a)) => a,
            Some(Err(e)) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        }
    };
    let ctx = AuditContext::new(answer(args.next()), answer(args.next()));

    let xml = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            std::process::exit(1);
        }
    };

    let audit = match nfe::audit_nfe(&xml, &ctx) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for w in &audit.warnings {
        eprintln!("warning: {w}");
    }

    let h = &audit.header;
    eprintln!(
        "NF-e {} série {} ({})  simples: {}  indústria 10%: {}",
        h.number.as_deref().unwrap_or("?"),
        h.series.as_deref().unwrap_or("?"),
        h.issuer_name.as_deref().unwrap_or("emitente desconhecido"),
        ctx.simples_nacional_client,
        ctx.industry_ten_percent_icms,
    );

    let out = format!("{}.csv", report::DEFAULT_EXPORT_FILE_NAME);
    if let Err(e) = std::fs::write(&out, report::to_csv(&audit)) {
        eprintln!("cannot write {out}: {e}");
        std::process::exit(1);
    }
    eprintln!("{}: {} linhas gravadas em {out}", report::RESULT_SHEET_NAME, audit.lines.len());

    let s = audit.summary();
    eprintln!(
        "{} itens, {} sem alíquota TTD, {} fora de faixa, {} ignorados; diferença total {}",
        s.line_count,
        s.unclassified_count,
        s.out_of_range_count,
        s.warning_count,
        round_money(s.difference_total)
    );
}
