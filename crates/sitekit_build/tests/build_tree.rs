use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sitekit_build::{EnumMinifyMode, SpecBuildOptions, build_tree};

fn write_bytes(path: &Path, raw: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, raw).expect("write bytes");
}

fn checksum(path: &Path) -> String {
    let raw = fs::read(path).expect("read for checksum");
    hex::encode(Sha256::digest(&raw))
}

/// Relative path -> contents for every file; directories map to `None`.
fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    fn visit(root: &Path, dir: &Path, dict_out: &mut BTreeMap<PathBuf, Option<Vec<u8>>>) {
        for entry in fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("entry").path();
            let rel = path.strip_prefix(root).expect("under root").to_path_buf();
            if path.is_dir() {
                dict_out.insert(rel, None);
                visit(root, &path, dict_out);
            } else {
                dict_out.insert(rel, Some(fs::read(&path).expect("read file")));
            }
        }
    }

    let mut dict_out = BTreeMap::new();
    visit(root, root, &mut dict_out);
    dict_out
}

fn seed_site(src: &Path) {
    write_bytes(&src.join("index.html"), b"<html><!-- c --><script>// x\n</script></html>\n");
    write_bytes(&src.join("about.HTM"), b"/* legacy */ page\n");
    write_bytes(&src.join("notes.md"), b"# Notes // not a comment\n");
    write_bytes(&src.join("api.php"), b"<?php /* keep */ echo 1; ?>\n");
    write_bytes(&src.join("robots.txt"), b"User-agent: *\n");
    write_bytes(&src.join("assets/css/site.css"), b"body {\n  margin: 0; /* reset */\n}\n");
    write_bytes(&src.join("assets/css/THEME.CSS"), b"a  {  color : blue }\n");
    write_bytes(&src.join("assets/js/app.js"), b"// boot\nstart();\n");
    write_bytes(&src.join("assets/fonts/a.woff2"), &[0, 159, 146, 150, 255]);
    write_bytes(&src.join("assets/img/logo.png"), &[0x89, b'P', b'N', b'G']);
    write_bytes(&src.join("empty/.keep"), b"");
    write_bytes(&src.join(".git/config"), b"[core]\n");
    write_bytes(&src.join("node_modules/lib/index.js"), b"module.exports = 1;\n");
    write_bytes(&src.join("assets/__pycache__/x.pyc"), &[1, 2, 3]);
    write_bytes(&src.join(".idea/workspace.xml"), b"<xml/>");
    write_bytes(&src.join("build.py"), b"print('build')\n");
}

#[test]
fn every_kept_file_is_mirrored_once() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    let report = build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");
    assert_eq!(report.error_count(), 0);

    let dict_out = snapshot_tree(&out);
    let l_expected_files = [
        "index.html",
        "about.HTM",
        "notes.md",
        "api.php",
        "robots.txt",
        "assets/css/site.css",
        "assets/css/THEME.CSS",
        "assets/js/app.js",
        "assets/fonts/a.woff2",
        "assets/img/logo.png",
        "empty/.keep",
    ];
    for rel in l_expected_files {
        assert!(
            matches!(dict_out.get(Path::new(rel)), Some(Some(_))),
            "missing file {rel}"
        );
    }
    let n_files = dict_out.values().filter(|v| v.is_some()).count();
    assert_eq!(n_files, l_expected_files.len());
    assert_eq!(report.file_count(), l_expected_files.len() as u64);
}

#[test]
fn ignored_subtrees_never_appear() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");

    let l_ignored = [".git", "node_modules", "__pycache__", ".idea", "build.py"];
    for rel in snapshot_tree(&out).keys() {
        for component in rel.components() {
            let name = component.as_os_str().to_string_lossy();
            assert!(
                !l_ignored.contains(&name.as_ref()),
                "ignored name leaked into output: {}",
                rel.display()
            );
        }
    }
}

#[test]
fn minify_applies_by_case_insensitive_extension() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");

    assert_eq!(
        fs::read_to_string(out.join("assets/css/site.css")).expect("read"),
        "body { margin: 0; }"
    );
    assert_eq!(
        fs::read_to_string(out.join("assets/css/THEME.CSS")).expect("read"),
        "a { color : blue }"
    );
    assert_eq!(
        fs::read_to_string(out.join("assets/js/app.js")).expect("read"),
        "start();"
    );
}

#[test]
fn markup_and_assets_are_byte_identical() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");

    for rel in [
        "index.html",
        "about.HTM",
        "notes.md",
        "api.php",
        "robots.txt",
        "assets/fonts/a.woff2",
        "assets/img/logo.png",
    ] {
        assert_eq!(checksum(&src.join(rel)), checksum(&out.join(rel)), "{rel}");
    }
}

#[test]
fn undecodable_style_falls_back_to_exact_copy() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    write_bytes(&src.join("legacy.css"), b"p { font-family: \"Caf\xe9\"; }\n");
    write_bytes(&src.join("ok.js"), b"ok(); // fine\n");

    let report = build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");

    assert_eq!(checksum(&src.join("legacy.css")), checksum(&out.join("legacy.css")));
    assert_eq!(report.cnt_fallback, 1);
    assert_eq!(report.cnt_minified, 1);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].path, src.join("legacy.css"));
}

#[test]
fn rebuilding_unchanged_source_is_byte_identical() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    for rule_minify in [EnumMinifyMode::Regex, EnumMinifyMode::Lexical] {
        let spec_options = SpecBuildOptions {
            rule_minify,
            ..SpecBuildOptions::new(&src, &out)
        };
        build_tree(&spec_options).expect("first build");
        let dict_first = snapshot_tree(&out);
        build_tree(&spec_options).expect("second build");
        let dict_second = snapshot_tree(&out);
        assert_eq!(dict_first, dict_second);
    }
}

#[test]
fn stray_output_is_removed_on_rebuild() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("site");
    let out = tmp.path().join("dist");
    seed_site(&src);

    build_tree(&SpecBuildOptions::new(&src, &out)).expect("first build");
    write_bytes(&out.join("stray.txt"), b"left over");
    write_bytes(&out.join("old/dir/file.css"), b"x");

    build_tree(&SpecBuildOptions::new(&src, &out)).expect("second build");
    assert!(!out.join("stray.txt").exists());
    assert!(!out.join("old").exists());
}

#[test]
fn randomized_trees_mirror_without_errors() {
    fn derive_name(seed: u64, n_idx: usize) -> String {
        let mut value = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        value ^= (n_idx as u64).wrapping_mul(0x9E3779B97F4A7C15);
        let ext = ["css", "js", "html", "png", "TXT", "bin"][(value % 6) as usize];
        format!("f_{value:016x}.{ext}")
    }

    for n_seed in 0_u64..20 {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("site");
        let out = tmp.path().join("dist");

        let mut l_rel = Vec::new();
        for n_idx in 0..12 {
            let name = derive_name(n_seed, n_idx);
            let rel = match n_idx % 3 {
                0 => PathBuf::from("a").join(&name),
                1 => PathBuf::from("b/c").join(&name),
                _ => PathBuf::from(&name),
            };
            write_bytes(&src.join(&rel), b"x /* y */ z // w\n");
            l_rel.push(rel);
        }
        write_bytes(&src.join("b/node_modules/skip.js"), b"skip");

        let report = build_tree(&SpecBuildOptions::new(&src, &out)).expect("build tree");
        assert_eq!(report.error_count(), 0);
        for rel in &l_rel {
            assert!(out.join(rel).is_file(), "missing {}", rel.display());
        }
        assert!(!out.join("b/node_modules").exists());
    }
}
