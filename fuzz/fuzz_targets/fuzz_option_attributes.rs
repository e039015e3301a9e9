#![no_main]

//! Arbitrary `data-*` values must never panic and must always produce a
//! usable configuration.

use libfuzzer_sys::fuzz_target;
use mantle_core::Document;
use mantle_widgets::modal::{ModalOptions, ModalSize};

const ATTRIBUTES: &[&str] = &[
    "data-size",
    "data-variant",
    "data-animation",
    "data-backdrop",
    "data-keyboard",
    "data-focus",
    "data-close-on-escape",
    "data-close-on-backdrop",
];

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let doc = Document::new();
    let node = doc.create_element("div");
    for (name, value) in ATTRIBUTES.iter().zip(text.split('\u{1f}')) {
        doc.set_attribute(node, name, value);
    }

    let options = ModalOptions::from_attributes(&doc, node);
    if let Ok(size) = text.parse::<ModalSize>() {
        assert_eq!(size.as_str().parse::<ModalSize>().ok(), Some(size));
    }
    let _ = options.backdrop_dismisses();
});
