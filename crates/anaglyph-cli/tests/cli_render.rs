use std::path::{Path, PathBuf};
use std::process::Command;

fn bin() -> String {
    std::env::var("CARGO_BIN_EXE_anaglyph").unwrap_or_else(|_| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/debug/anaglyph")
            .to_string_lossy()
            .to_string()
    })
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("anaglyph_cli_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn write_layer(path: &Path, lum: u8) {
    image::GrayAlphaImage::from_pixel(100, 4, image::LumaA([lum, 255]))
        .save(path)
        .expect("write layer png");
}

fn write_scene(dir: &Path, extra_layer: Option<&str>) -> PathBuf {
    write_layer(&dir.join("front.png"), 200);
    write_layer(&dir.join("back.png"), 100);
    let mut manifest = String::from(
        "[params]\nmin_disparity = 0.0\nmax_disparity = 2.0\n\n\
         [[layers]]\nname = \"depth=1\"\npath = \"front.png\"\n\n\
         [[layers]]\nname = \"depth=0\"\npath = \"back.png\"\n",
    );
    if let Some(name) = extra_layer {
        manifest.push_str(&format!(
            "\n[[layers]]\nname = \"{}\"\npath = \"back.png\"\n",
            name
        ));
    }
    let path = dir.join("scene.toml");
    std::fs::write(&path, manifest).expect("write manifest");
    path
}

#[test]
fn render_writes_anaglyph_png() {
    let dir = scratch_dir("render");
    let manifest = write_scene(&dir, None);
    let out = dir.join("out").join("scene.png");

    let output = Command::new(bin())
        .arg("render")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .output()
        .expect("failed to run anaglyph render");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fingerprint:"), "missing fingerprint in: {stdout}");

    let img = image::open(&out).expect("output is an image").to_rgba8();
    assert_eq!(img.dimensions(), (100, 4));
    assert_eq!(img.get_pixel(10, 0).0, [200, 160, 160, 255]);
    assert_eq!(img.get_pixel(99, 0).0, [100, 160, 160, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [200, 80, 80, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn render_is_deterministic() {
    let dir = scratch_dir("determinism");
    let manifest = write_scene(&dir, None);

    let fingerprint_of = |out: &Path| {
        let output = Command::new(bin())
            .arg("render")
            .arg(&manifest)
            .arg("-o")
            .arg(out)
            .output()
            .expect("failed to run anaglyph render");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .find(|l| l.contains("Fingerprint:"))
            .map(str::to_string)
            .expect("fingerprint line")
    };
    assert_eq!(
        fingerprint_of(&dir.join("a.png")),
        fingerprint_of(&dir.join("b.png"))
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_json_reports_every_layer() {
    let dir = scratch_dir("inspect");
    let manifest = write_scene(&dir, Some("background"));

    let output = Command::new(bin())
        .arg("inspect")
        .arg(&manifest)
        .arg("--json")
        .output()
        .expect("failed to run anaglyph inspect");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout not utf-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(report["width"], 100);
    assert_eq!(report["normal_layers"], serde_json::json!([]));
    let layers = report["layers"].as_array().expect("layers array");
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0]["name"], "depth=1");
    assert_eq!(layers[0]["disparity"], serde_json::json!([2.0, 2.0]));
    assert_eq!(layers[2]["name"], "background");
    assert_eq!(layers[2]["disparity"], serde_json::json!([0.0, 0.0]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn render_fails_on_missing_depth_map() {
    let dir = scratch_dir("missing_map");
    let manifest = write_scene(&dir, Some("fixdepthmap=nowhere"));

    let output = Command::new(bin())
        .arg("render")
        .arg(&manifest)
        .arg("-o")
        .arg(dir.join("never.png"))
        .output()
        .expect("failed to run anaglyph render");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
    assert!(!dir.join("never.png").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
