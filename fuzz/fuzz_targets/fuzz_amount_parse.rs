#![no_main]

use faktura_pl::core::dates::parse_date;
use faktura_pl::preview::{format_amount, parse_amount};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_date(s);
        if let Some(amount) = parse_amount(s) {
            let _ = format_amount(amount);
        }
    }
});
