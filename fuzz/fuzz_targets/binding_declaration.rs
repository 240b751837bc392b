#![no_main]

use direct_di::{BindingCollection, BindingDeclaration, GenerationError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing never panics; failures are always malformed bindings
    match BindingDeclaration::parse(text) {
        Ok(declaration) => {
            let mut bindings = BindingCollection::new();
            bindings.add(declaration);
            match bindings.build() {
                Ok(table) => assert_eq!(table.len(), 1),
                Err(e) => assert!(matches!(e, GenerationError::MalformedBinding { .. })),
            }
        }
        Err(e) => assert!(matches!(e, GenerationError::MalformedBinding { .. })),
    }
});
