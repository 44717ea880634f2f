//! End-to-end tests for the `md2page` binary.
//!
//! Each test builds a scratch working directory holding `bin/comrak` (a
//! shell script standing in for the real converter) and `template.html`,
//! then runs the binary from inside it.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "<!DOCTYPE html>\n<html><head><title></title></head>\n\
<body><main id=\"content\"></main></body></html>\n";

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Scratch directory with a template and a converter that runs `body`.
fn workdir(body: &str) -> TempDir {
    let dir = TempDir::new().expect("tmp dir");
    fs::write(dir.path().join("template.html"), TEMPLATE).expect("write template");
    write_converter(dir.path(), body);
    dir
}

fn write_converter(root: &Path, body: &str) {
    let bin = root.join("bin");
    fs::create_dir_all(&bin).expect("bin dir");
    let script = bin.join("comrak");
    fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("write converter");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
}

fn md2page(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("md2page"));
    cmd.current_dir(dir.path())
        .env_remove("MD2PAGE_CONVERTER")
        .env_remove("MD2PAGE_TEMPLATE")
        .env_remove("MD2PAGE_THEME")
        .env_remove("MD2PAGE_SITE_URL")
        .env_remove("RUST_LOG");
    cmd
}

const ECHO_PAGE: &str = "cat <<'EOF'\n<h1>Example Title</h1>\n<p>Hello &amp; welcome</p>\nEOF";

// ── Single page ──────────────────────────────────────────────────────────────

#[test]
fn renders_page_to_stdout() {
    let dir = workdir(ECHO_PAGE);
    let assert = md2page(&dir).arg("doc.md").assert().success();

    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(out.contains("<title>Example Title</title>"), "got: {out}");
    assert!(
        out.contains("<main id=\"content\"><h1>Example Title</h1>\n<p>Hello &amp; welcome</p>\n</main>"),
        "got: {out}"
    );
    assert!(out.starts_with("<!DOCTYPE html>"), "got: {out}");
    assert!(assert.get_output().stderr.is_empty());
}

#[test]
fn passes_fixed_arguments_to_converter() {
    let dir = workdir("printf '%s\\n' \"$@\" > args.txt");
    md2page(&dir).arg("notes/post.md").assert().success();

    let args = fs::read_to_string(dir.path().join("args.txt")).expect("args recorded");
    assert_eq!(
        args,
        "--unsafe\n--syntax-highlighting\nbase16-ocean.dark\nnotes/post.md\n"
    );
}

#[test]
fn missing_document_passes_empty_argument() {
    let dir = workdir("echo \"$#:[$4]\" > args.txt");
    md2page(&dir).assert().success();

    let args = fs::read_to_string(dir.path().join("args.txt")).expect("args recorded");
    assert_eq!(args, "4:[]\n");
}

#[test]
fn page_without_heading_has_empty_title() {
    let dir = workdir("echo '<p>no heading here</p>'");
    md2page(&dir)
        .arg("doc.md")
        .assert()
        .success()
        .stdout(contains("<title></title>").and(contains("<p>no heading here</p>")));
}

#[test]
fn code_blocks_are_tagged() {
    let dir = workdir("echo '<h1>T</h1><pre lang=\"rust\"><code>fn main() {}</code></pre>'");
    md2page(&dir)
        .arg("doc.md")
        .assert()
        .success()
        .stdout(contains("class=\"codeblock\"").and(contains("data-language=\"rust\"")));
}

#[test]
fn converter_failure_is_relayed() {
    let dir = workdir("echo 'parse error' >&2\nexit 2");
    md2page(&dir)
        .arg("bad.md")
        .assert()
        .code(2)
        .stdout("")
        .stderr("parse error\n");
}

#[test]
fn missing_template_fails() {
    let dir = workdir(ECHO_PAGE);
    fs::remove_file(dir.path().join("template.html")).expect("remove template");
    md2page(&dir)
        .arg("doc.md")
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("template"));
}

#[test]
fn missing_converter_fails() {
    let dir = workdir(ECHO_PAGE);
    fs::remove_file(dir.path().join("bin/comrak")).expect("remove converter");
    md2page(&dir).arg("doc.md").assert().code(1).stdout("");
}

#[test]
fn writes_output_file() {
    let dir = workdir(ECHO_PAGE);
    md2page(&dir)
        .args(["doc.md", "-o", "public/doc.html"])
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(dir.path().join("public/doc.html")).expect("output written");
    assert!(written.contains("<title>Example Title</title>"), "got: {written}");
}

#[test]
fn json_output_reports_title() {
    let dir = workdir(ECHO_PAGE);
    let assert = md2page(&dir).args(["doc.md", "--json"]).assert().success();

    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(value["title"], "Example Title");
    assert!(value["html"]
        .as_str()
        .unwrap_or_default()
        .contains("<title>Example Title</title>"));
    assert!(value["stats"]["fragment_bytes"].as_u64().unwrap_or(0) > 0);
}

// ── Site mode ────────────────────────────────────────────────────────────────

#[test]
fn site_mode_renders_each_page() {
    let dir = workdir("echo \"<h1>$4</h1>\"");
    for name in ["alpha", "beta"] {
        let page = dir.path().join("site").join(name);
        fs::create_dir_all(&page).expect("page dir");
        fs::write(page.join("index.md"), "# page").expect("write page");
    }

    md2page(&dir)
        .args(["--site", "site", "--no-progress"])
        .assert()
        .success()
        .stderr(contains("[UPDATED]"));

    let alpha = fs::read_to_string(dir.path().join("site/alpha/index.html")).expect("alpha");
    assert!(alpha.contains("<title>site/alpha/index.md</title>"), "got: {alpha}");
    assert!(dir.path().join("site/beta/index.html").exists());

    // Second run: nothing is stale.
    md2page(&dir)
        .args(["--site", "site", "--no-progress"])
        .assert()
        .success()
        .stderr(contains("[SKIPPED]").and(contains("[UPDATED]").not()));
}

#[test]
fn site_mode_fails_when_a_page_fails() {
    let dir = workdir("echo 'boom' >&2\nexit 3");
    let page = dir.path().join("site").join("post");
    fs::create_dir_all(&page).expect("page dir");
    fs::write(page.join("index.md"), "# page").expect("write page");

    md2page(&dir)
        .args(["--site", "site", "--no-progress"])
        .assert()
        .code(1)
        .stderr(contains("[ERRORED]"));
}

#[test]
fn site_mode_ignores_output_environment() {
    let dir = workdir("echo \"<h1>$4</h1>\"");
    let page = dir.path().join("site").join("post");
    fs::create_dir_all(&page).expect("page dir");
    fs::write(page.join("index.md"), "# page").expect("write page");

    md2page(&dir)
        .env("MD2PAGE_OUTPUT", "elsewhere.html")
        .args(["--site", "site", "--no-progress"])
        .assert()
        .success();

    assert!(dir.path().join("site/post/index.html").exists());
    assert!(!dir.path().join("elsewhere.html").exists());
}

#[test]
fn site_mode_indexes_posts_and_writes_feed() {
    let dir = workdir("sed 's/^/<p>/' \"$4\"");
    let page = dir.path().join("site").join("engine");
    fs::create_dir_all(&page).expect("page dir");
    fs::write(
        page.join("index.md"),
        "---\npost:\n  title: Chess Engines\n  author: Ana\n  date: 2023-02-14\n  desc: Search and evaluation\n---\nbody text\n",
    )
    .expect("write post");

    md2page(&dir)
        .args([
            "--site",
            "site",
            "--no-progress",
            "--site-url",
            "https://example.org/blog",
        ])
        .assert()
        .success()
        .stderr(contains("[INDEXED]").and(contains("[FEED]")));

    let post = fs::read_to_string(dir.path().join("site/engine/index.html")).expect("post");
    assert!(post.contains("<title>Chess Engines</title>"), "got: {post}");
    assert!(post.contains("<p>body text"), "got: {post}");
    assert!(!post.contains("title: Chess Engines"), "got: {post}");

    let index = fs::read_to_string(dir.path().join("site/writing/index.html")).expect("index");
    assert!(index.contains("<title>Writing</title>"), "got: {index}");
    assert!(index.contains("href=\"../engine/\""), "got: {index}");

    let feed = fs::read_to_string(dir.path().join("site/writing/rss.xml")).expect("feed");
    assert!(feed.contains("<link>https://example.org/blog/engine/</link>"), "got: {feed}");
}
