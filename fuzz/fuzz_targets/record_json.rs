#![no_main]

use citeform::{CitationRecord, EmitOptions, FileNameInclusion, Format, LabelBundle, Locale};
use libfuzzer_sys::fuzz_target;
use quick_xml::Reader;
use quick_xml::events::Event;

fuzz_target!(|data: &[u8]| {
    let Ok(record) = serde_json::from_slice::<CitationRecord>(data) else {
        return;
    };
    let labels = LabelBundle::builtin();
    let locale = Locale::new("en");
    let options = EmitOptions {
        escape_html: data.len() % 2 == 0,
        file_name: FileNameInclusion::Always,
        extended: true,
    };

    for format in Format::ALL {
        let output = citeform::render(format, &record, &labels, &locale, &options)
            .expect("built-in labels cover every label");
        let again = citeform::render(format, &record, &labels, &locale, &options)
            .expect("built-in labels cover every label");
        assert_eq!(output, again, "{format} output is not deterministic");

        if format == Format::EndNoteXml {
            assert_balanced(&output);
        }
    }
});

fn assert_balanced(xml: &str) {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    loop {
        match reader.read_event().expect("EndNote output is well-formed") {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced EndNote output");
}
