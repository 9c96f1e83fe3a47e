use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use faktura_pl::core::*;
use faktura_pl::preview::InvoiceView;

fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn build_invoice(lines: u32, currency: &str) -> InvoiceData {
    let rates = VatRate::offered();
    let mut builder = InvoiceBuilder::new("FV/1/06/2024")
        .place_of_issue("Warszawa")
        .issue_date(issue_date())
        .currency(currency)
        .seller(
            CompanyBuilder::new("Benchmark Sp. z o.o.")
                .address("ul. Prosta 1", "00-001", "Warszawa")
                .tax_id("5260250274")
                .bank_account("PL61109010140000071219812874")
                .build(),
        )
        .buyer(
            CompanyBuilder::new("Klient S.A.")
                .address("ul. Długa 5", "30-001", "Kraków")
                .tax_id("1234563218")
                .build(),
        );

    for i in 0..lines {
        builder = builder.add_item(
            ItemBuilder::new(
                format!("Pozycja {}", i + 1),
                Decimal::from(i % 7 + 1),
                "szt.",
                dec!(19.99),
            )
            .vat(rates[i as usize % rates.len()]),
        );
    }

    let mut invoice = builder.build().unwrap();
    if !invoice.is_domestic() {
        invoice.exchange_rate = ExchangeRateState {
            target_date: Some(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap()),
            resolved: Some(ResolvedRate {
                effective_date: NaiveDate::from_ymd_opt(2024, 6, 13).unwrap(),
                value: dec!(4.3213),
            }),
        };
    }
    invoice
}

fn bench_calculate(c: &mut Criterion) {
    let small = build_invoice(10, "PLN");
    let large = build_invoice(1000, "PLN");
    c.bench_function("calculate_10_items", |b| {
        b.iter(|| black_box(calculate(black_box(&small.items))));
    });
    c.bench_function("calculate_1000_items", |b| {
        b.iter(|| black_box(calculate(black_box(&large.items))));
    });
}

fn bench_validate(c: &mut Criterion) {
    let invoice = build_invoice(10, "PLN");
    c.bench_function("validate_invoice", |b| {
        b.iter(|| black_box(validate_invoice(black_box(&invoice))));
    });
}

fn bench_preview(c: &mut Criterion) {
    let domestic = build_invoice(10, "PLN");
    let foreign = build_invoice(10, "EUR");
    c.bench_function("preview_domestic_10_items", |b| {
        b.iter(|| black_box(InvoiceView::build(black_box(&domestic))));
    });
    c.bench_function("preview_converted_10_items", |b| {
        b.iter(|| black_box(InvoiceView::build(black_box(&foreign))));
    });
}

criterion_group!(benches, bench_calculate, bench_validate, bench_preview);
criterion_main!(benches);
