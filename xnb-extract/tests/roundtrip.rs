//! Unpack → edit-free → pack through real files

use xnb_extract::convert::{pack_file, unpack_file};
use xnb_extract::{
    ByteWriter, ContainerCodec, ConvertOptions, Fields, JsonContainer, PngCodec, TBIN_MAGIC,
    Value,
};

fn string(w: &mut ByteWriter, s: &str) {
    w.write_i32_le(s.len() as i32);
    w.write_ascii(s);
}

fn tbin_segment() -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.concat(TBIN_MAGIC);
    string(&mut w, "Farm");
    string(&mut w, "");
    // one string property
    w.write_i32_le(1);
    string(&mut w, "Music");
    w.concat(&[3]);
    string(&mut w, "spring");
    w.write_i32_le(2);
    for source in ["spring_outdoors", "paths"] {
        string(&mut w, source);
        string(&mut w, "");
        string(&mut w, source);
        w.concat(&[0x10; 32]);
        w.write_i32_le(0);
    }
    w.concat(b"layer data");
    w.into_bytes()
}

fn texture(width: i64, height: i64) -> Value {
    let len = (width * height * 4) as usize;
    Value::tagged(
        "Texture2D",
        Value::Map(Fields::from_iter([
            ("format", Value::Int(0)),
            ("width", Value::Int(width)),
            ("height", Value::Int(height)),
            ("data", Value::Bytes((0..len).map(|i| i as u8).collect())),
            ("mips", Value::Array(vec![])),
        ])),
    )
}

#[test]
fn test_tilemap_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let content = Value::tagged(
        "xTile.Map",
        Value::Map(Fields::from_iter([
            ("version", Value::Int(1)),
            ("data", Value::Bytes(tbin_segment())),
        ])),
    );
    let input = dir.path().join("Farm.xnbj");
    std::fs::write(&input, JsonContainer.encode(&content).unwrap()).unwrap();

    let opts = ConvertOptions::default();
    let text_path = dir.path().join("unpacked/Farm.json");
    let written = unpack_file(&input, &text_path, &JsonContainer, &PngCodec, &opts).unwrap();
    assert_eq!(written.sidecars, vec![dir.path().join("unpacked/Farm.tbin")]);

    let text = std::fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("spring_outdoors.png"));
    assert!(text.contains("paths.png"));
    let sidecar = std::fs::read(&written.sidecars[0]).unwrap();
    assert!(sidecar.starts_with(b"tBIN10"));
    assert!(sidecar.ends_with(b"layer data"));

    let repacked = dir.path().join("Farm.out.xnbj");
    pack_file(&text_path, &repacked, &JsonContainer, &PngCodec, &opts).unwrap();

    let decoded = JsonContainer
        .decode(&std::fs::read(&repacked).unwrap())
        .unwrap();
    assert_eq!(decoded, content);
}

#[test]
fn test_textures_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let content = Value::tagged(
        "Dictionary",
        Value::Map(Fields::from_iter([
            ("portrait", texture(2, 3)),
            (
                "frames",
                Value::Array(vec![texture(1, 1), Value::Null, texture(4, 1)]),
            ),
        ])),
    );
    let input = dir.path().join("Abigail.xnbj");
    std::fs::write(&input, JsonContainer.encode(&content).unwrap()).unwrap();

    let opts = ConvertOptions {
        indent: 2,
        ..ConvertOptions::default()
    };
    let text_path = dir.path().join("Abigail.json");
    let written = unpack_file(&input, &text_path, &JsonContainer, &PngCodec, &opts).unwrap();

    let names: Vec<_> = written
        .sidecars
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "Abigail.portrait.png",
            "Abigail.frames.0.png",
            "Abigail.frames.2.png"
        ]
    );

    let text = std::fs::read_to_string(&text_path).unwrap();
    assert!(text.starts_with("{\n  \"content\""));
    assert!(!text.contains("$bytes"));

    // Without edits the packed result matches the input exactly,
    // field order included.
    let repacked = dir.path().join("Abigail.out.xnbj");
    pack_file(&text_path, &repacked, &JsonContainer, &PngCodec, &opts).unwrap();
    let decoded = JsonContainer
        .decode(&std::fs::read(&repacked).unwrap())
        .unwrap();
    assert_eq!(decoded, content);

    let portrait = decoded
        .untagged()
        .as_map()
        .and_then(|m| m.get("portrait"))
        .and_then(|t| t.untagged().as_map())
        .unwrap();
    let keys: Vec<_> = portrait.keys().collect();
    assert_eq!(keys, ["format", "width", "height", "data", "mips"]);
}

#[test]
fn test_edited_sidecar_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Icon.xnbj");
    std::fs::write(&input, JsonContainer.encode(&texture(1, 1)).unwrap()).unwrap();

    let opts = ConvertOptions::default();
    let text_path = dir.path().join("Icon.json");
    unpack_file(&input, &text_path, &JsonContainer, &PngCodec, &opts).unwrap();

    let edited = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 4]));
    edited.save(dir.path().join("Icon.png")).unwrap();

    let repacked = dir.path().join("Icon.out.xnbj");
    pack_file(&text_path, &repacked, &JsonContainer, &PngCodec, &opts).unwrap();
    let decoded = JsonContainer
        .decode(&std::fs::read(&repacked).unwrap())
        .unwrap();
    let fields = decoded.untagged().as_map().unwrap();
    assert_eq!(fields.get("width"), Some(&Value::Int(2)));
    assert_eq!(fields.get("data"), Some(&Value::Bytes([1, 2, 3, 4].repeat(4))));
}
