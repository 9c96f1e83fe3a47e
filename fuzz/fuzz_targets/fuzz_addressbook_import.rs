#![no_main]

use faktura_pl::addressbook::{AddressBook, import_company};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut book = AddressBook::new();
        if book.import_json(s).is_ok() {
            let exported = book.export_json().unwrap();
            assert_eq!(AddressBook::parse_json(&exported).unwrap(), book);
        }
        let _ = import_company(s);
    }
});
