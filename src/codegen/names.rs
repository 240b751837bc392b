//! Identifier derivation for generated items.

use proc_macro2::{Ident, Span};

use crate::descriptors::Binding;

/// `activate_<ordinal>_<contract>`, e.g. `activate_0_foo` for `dyn Foo`.
pub(crate) fn activation_fn(binding: &Binding) -> Ident {
    Ident::new(
        &format!("activate_{}_{}", binding.ordinal, snake(binding.contract.display_name())),
        Span::call_site(),
    )
}

/// Slot field of a scoped binding on the generated scope.
pub(crate) fn slot_field(binding: &Binding) -> Ident {
    Ident::new(
        &format!("scoped_{}_{}", binding.ordinal, snake(binding.contract.display_name())),
        Span::call_site(),
    )
}

/// Snake-cases the identifier words of a rendered type, skipping `dyn`.
fn snake(type_name: &str) -> String {
    let words: Vec<String> = type_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty() && *word != "dyn")
        .map(snake_word)
        .collect();
    if words.is_empty() {
        "binding".to_string()
    } else {
        words.join("_")
    }
}

fn snake_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    let mut previous_lower = false;
    for c in word.chars() {
        if c.is_ascii_uppercase() {
            if previous_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            previous_lower = false;
        } else {
            out.push(c);
            previous_lower = true;
        }
    }
    out
}
