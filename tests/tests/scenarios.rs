use static_box_packer::{
    error::Error,
    generate::{BoxSource, GenerateOptions, Generator},
    render::Renderer,
};
use static_box_tests::{generate, parse};
use std::{collections::HashSet, fs};
use tempfile::TempDir;

#[test]
fn single_file_with_quote() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("a.txt"), b"hello\"world").unwrap();

    let text = generate(&[BoxSource::new("single", root.path())], GenerateOptions::default()).unwrap();
    let boxes = parse(&text).unwrap();

    let file = &boxes[0].files["a.txt"];
    assert_eq!(file.literal, "hello\\\"world");
    assert_eq!(file.content, b"hello\"world");
    assert_eq!(boxes[0].dirs[""].child_files, [file.identifier.clone()]);
}

#[test]
fn only_empty_directories() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("a").join("b")).unwrap();

    let text = generate(&[BoxSource::new("dirs", root.path())], GenerateOptions::default()).unwrap();
    let boxes = parse(&text).unwrap();
    let parsed_box = &boxes[0];

    assert!(parsed_box.files.is_empty());
    assert_eq!(
        parsed_box.dirs.keys().map(String::as_str).collect::<Vec<_>>(),
        ["", "a", "a/b"]
    );
    assert_eq!(
        parsed_box.dirs["a"].child_dirs,
        [parsed_box.dirs["a/b"].identifier.clone()]
    );
    assert_eq!(
        parsed_box.dirs[""].child_dirs,
        [parsed_box.dirs["a"].identifier.clone()]
    );
    assert!(parsed_box.dirs["a/b"].child_dirs.is_empty());
}

#[test]
fn character_split_by_refill_stays_whole() {
    let root = TempDir::new().unwrap();
    // with 8 byte buffer, first fill ends in the middle of the euro sign
    fs::write(root.path().join("euro.txt"), "123456€7€".as_bytes()).unwrap();

    let text = generate(
        &[BoxSource::new("euro", root.path())],
        GenerateOptions {
            encoder_buffer_capacity: 8,
            ..GenerateOptions::default()
        },
    )
    .unwrap();
    let boxes = parse(&text).unwrap();

    assert_eq!(boxes[0].files["euro.txt"].literal, "123456€7€");
}

#[test]
fn empty_root_directory() {
    let root = TempDir::new().unwrap();

    let text = generate(&[BoxSource::new("empty", root.path())], GenerateOptions::default()).unwrap();
    let boxes = parse(&text).unwrap();
    let parsed_box = &boxes[0];

    assert_eq!(parsed_box.name, "empty");
    assert!(parsed_box.files.is_empty());
    assert_eq!(parsed_box.dirs.len(), 1);
    assert!(parsed_box.dirs[""].child_dirs.is_empty());
    assert!(parsed_box.dirs[""].child_files.is_empty());
}

#[test]
fn identifiers_are_unique_across_boxes() {
    let first = TempDir::new().unwrap();
    fs::create_dir(first.path().join("sub")).unwrap();
    fs::write(first.path().join("sub").join("x.txt"), b"x").unwrap();
    let second = TempDir::new().unwrap();
    fs::write(second.path().join("y.txt"), b"y").unwrap();

    let text = generate(
        &[
            BoxSource::new("first", first.path()),
            BoxSource::new("second", second.path()),
        ],
        GenerateOptions::default(),
    )
    .unwrap();
    let boxes = parse(&text).unwrap();

    assert_eq!(
        boxes.iter().map(|parsed_box| parsed_box.name.as_str()).collect::<Vec<_>>(),
        ["first", "second"]
    );

    let identifiers = boxes
        .iter()
        .flat_map(|parsed_box| parsed_box.identifiers())
        .collect::<Vec<_>>();
    assert_eq!(identifiers.len(), 5);
    assert_eq!(identifiers.iter().collect::<HashSet<_>>().len(), 5);
}

#[test]
fn box_time_is_root_modification_time() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("a.txt"), b"a").unwrap();

    let text = generate(&[BoxSource::new("timed", root.path())], GenerateOptions::default()).unwrap();
    let boxes = parse(&text).unwrap();

    // box time and root dir time come from the same directory
    assert_eq!(boxes[0].mod_time, boxes[0].dirs[""].mod_time);
    assert!(boxes[0].mod_time > 0);
}

#[test]
fn template_with_reserved_sequence_is_rejected() {
    let error = Renderer::from_template_str("var content = \"{@{{ package_name }}@}\"").unwrap_err();

    assert!(matches!(error, Error::TemplateReservedSequence { .. }));
}

#[test]
fn custom_template_is_filled() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("a.txt"), b"line\n").unwrap();
    let output = TempDir::new().unwrap();
    let output_path = output.path().join("box.txt");

    let renderer = Renderer::from_template_str(
        "{% for box in boxes %}{% for file in box.files %}{{ file.path }}=\"{{ file.content }}\"\n{% endfor %}{% endfor %}",
    )
    .unwrap();
    let generator = Generator::with_parts(
        renderer,
        Box::new(static_box_packer::format::Passthrough),
        GenerateOptions::default(),
    );

    let report = generator
        .generate_file(&[BoxSource::new("custom", root.path())], &output_path)
        .unwrap()
        .unwrap();

    assert_eq!(fs::read_to_string(&output_path).unwrap(), "a.txt=\"line\\n\"\n");
    assert_eq!(report.files, 1);
    assert_eq!(report.content_bytes, 6);
}

#[test]
fn missing_root_fails_without_output() {
    let directory = TempDir::new().unwrap();
    let output_path = directory.path().join("box.go");

    let generator = Generator::new(GenerateOptions::default()).unwrap();
    let error = generator
        .generate_file(
            &[BoxSource::new("missing", directory.path().join("missing"))],
            &output_path,
        )
        .unwrap_err();

    assert!(matches!(error, Error::Discovery { name, .. } if name == "missing"));
    assert!(!output_path.exists());
    assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
}

#[test]
fn no_boxes_is_no_op() {
    let directory = TempDir::new().unwrap();
    let output_path = directory.path().join("box.go");

    let generator = Generator::new(GenerateOptions::default()).unwrap();

    assert!(generator.generate_file(&[], &output_path).unwrap().is_none());
    assert!(!output_path.exists());
}
