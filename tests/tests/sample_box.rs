use static_box_packer::generate::{BoxSource, GenerateOptions};
use static_box_tests::{fixture_dirs, fixture_files, generate, parse, sample_box_path};
use std::collections::{BTreeMap, HashSet};
use test_case::test_case;

fn generate_sample(options: GenerateOptions) -> String {
    generate(&[BoxSource::new("sample", sample_box_path())], options).unwrap()
}

#[test]
fn embeds_every_file_exactly() {
    let text = generate_sample(GenerateOptions::default());
    let boxes = parse(&text).unwrap();
    assert_eq!(boxes.len(), 1);
    let parsed_box = &boxes[0];

    assert_eq!(parsed_box.name, "sample");

    // same set of files, same bytes
    let expected = fixture_files(&sample_box_path()).unwrap();
    let embedded = parsed_box
        .files
        .iter()
        .map(|(path, file)| (path.clone(), file.content.clone()))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(embedded, expected);

    // same set of directories, root included
    assert_eq!(
        parsed_box.dirs.keys().cloned().collect::<Vec<_>>(),
        fixture_dirs(&sample_box_path()).unwrap().into_iter().collect::<Vec<_>>()
    );
}

#[test]
fn content_is_never_scanned_for_placeholders() {
    let text = generate_sample(GenerateOptions::default());
    let boxes = parse(&text).unwrap();

    // this file contains delimiter sequences, they are copied verbatim
    let file = &boxes[0].files["names/with space & @at.txt"];
    assert_eq!(
        file.literal,
        "file name with reserved @ character and {@ delimiters @}\\n"
    );
}

#[test]
fn binary_content_uses_byte_escapes() {
    let text = generate_sample(GenerateOptions::default());
    let boxes = parse(&text).unwrap();

    let file = &boxes[0].files["bin/all-bytes.bin"];
    assert!(file.literal.starts_with("\\x00\\x01\\x02\\x03\\x04\\x05\\x06\\a\\b\\t\\n\\v\\f\\r\\x0e"));
    assert!(file.literal.contains(" !\\\"#$%&'()*+,-./0123456789"));
    assert!(file.literal.contains("xyz{|}~\\u007f\\x80\\x81"));
    assert!(file.literal.contains("\\\\"));
    assert_eq!(file.content.len(), 512);
}

#[test]
fn tree_links_every_node_once() {
    let text = generate_sample(GenerateOptions::default());
    let boxes = parse(&text).unwrap();
    let parsed_box = &boxes[0];

    // identifiers are unique
    let identifiers = parsed_box.identifiers().collect::<Vec<_>>();
    assert_eq!(
        identifiers.iter().collect::<HashSet<_>>().len(),
        identifiers.len()
    );

    // every file is listed by its parent dir, and only there
    for (path, file) in &parsed_box.files {
        let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent);
        for (dir_path, dir) in &parsed_box.dirs {
            let listed = dir.child_files.iter().filter(|child| **child == file.identifier).count();
            assert_eq!(listed, usize::from(dir_path == parent), "{path} in {dir_path:?}");
        }
    }

    // every dir except root is listed by its parent dir, and only there
    for (path, dir) in &parsed_box.dirs {
        let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent);
        for (dir_path, candidate) in &parsed_box.dirs {
            let listed = candidate.child_dirs.iter().filter(|child| **child == dir.identifier).count();
            let expected = !path.is_empty() && dir_path == parent;
            assert_eq!(listed, usize::from(expected), "{path:?} in {dir_path:?}");
        }
    }
}

#[test]
fn children_are_sorted_by_name() {
    let text = generate_sample(GenerateOptions::default());
    let boxes = parse(&text).unwrap();
    let parsed_box = &boxes[0];

    let root = &parsed_box.dirs[""];
    let child_dir_paths = root
        .child_dirs
        .iter()
        .map(|identifier| parsed_box.dir_by_identifier(identifier).unwrap().0.as_str())
        .collect::<Vec<_>>();
    assert_eq!(child_dir_paths, ["bin", "css", "js", "names", "text"]);

    let bin = &parsed_box.dirs["bin"];
    assert_eq!(
        bin.child_files,
        [
            parsed_box.files["bin/all-bytes.bin"].identifier.clone(),
            parsed_box.files["bin/invalid-utf8.bin"].identifier.clone(),
        ]
    );
}

#[test]
fn output_is_deterministic() {
    assert_eq!(
        generate_sample(GenerateOptions::default()),
        generate_sample(GenerateOptions::default())
    );
}

#[test_case(8; "minimal buffer")]
#[test_case(9; "odd buffer")]
#[test_case(13; "small buffer")]
#[test_case(64; "medium buffer")]
fn buffer_capacity_does_not_change_output(encoder_buffer_capacity: usize) {
    assert_eq!(
        generate_sample(GenerateOptions {
            encoder_buffer_capacity,
            ..GenerateOptions::default()
        }),
        generate_sample(GenerateOptions::default())
    );
}
