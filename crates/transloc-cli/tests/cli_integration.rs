use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn bin_cmd() -> Command {
    Command::cargo_bin("transloc-cli").expect("transloc-cli binary should be built")
}

fn workspace_root() -> PathBuf {
    // crates/transloc-cli -> <workspace root>
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap() // crates/
        .parent()
        .unwrap() // <workspace root>
        .to_path_buf()
}

fn fixture(rel: &str) -> PathBuf {
    workspace_root().join(rel)
}

#[test]
fn dump_writes_xliff_to_stdout() {
    let mut cmd = bin_cmd();
    cmd.args(["dump", "--no-date", "--catalogue"])
        .arg(fixture("test/fixtures/catalogue.fr.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            r#"xmlns="urn:oasis:names:tc:xliff:document:1.2""#,
        ))
        .stdout(predicate::str::contains(r#"resname="welcome.user""#))
        .stdout(predicate::str::contains(
            "<jms:reference-file>src/a.php</jms:reference-file>",
        ))
        .stdout(predicate::str::contains("<jms:reference>custom:thing</jms:reference>"))
        .stdout(predicate::str::contains(r#"<target state="new">Confirm order</target>"#));
}

#[test]
fn dump_honors_source_lang_and_cdata_rule() {
    let mut cmd = bin_cmd();
    cmd.args(["dump", "--no-date", "--source-lang", "en-GB", "--catalogue"])
        .arg(fixture("test/fixtures/catalogue.fr.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"source-language="en-GB""#))
        .stdout(predicate::str::contains(
            "<![CDATA[Votre panier contient des <b>articles</b>]]>",
        ));
}

#[test]
fn dump_writes_file_with_out() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("messages.fr.xlf");

    let mut cmd = bin_cmd();
    cmd.args(["--no-color", "dump", "--no-date", "--catalogue"])
        .arg(fixture("test/fixtures/catalogue.fr.json"))
        .arg("--out")
        .arg(&out);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("✔ XLIFF saved to"));

    let written = std::fs::read_to_string(&out).expect("output file written");
    let doc = roxmltree::Document::parse(&written).expect("output should be well-formed XML");
    assert_eq!(doc.root_element().tag_name().name(), "xliff");
    let units = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "trans-unit")
        .count();
    assert_eq!(units, 3);
}

#[test]
fn dump_fails_on_missing_domain() {
    let mut cmd = bin_cmd();
    cmd.args(["dump", "--domain", "validators", "--catalogue"])
        .arg(fixture("test/fixtures/catalogue.fr.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("validators"));
}

#[test]
fn domains_lists_counts_in_catalogue_order() {
    let mut cmd = bin_cmd();
    cmd.args(["--no-color", "domains", "--catalogue"])
        .arg(fixture("test/fixtures/catalogue.fr.json"));

    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(assert.get_output().stdout.as_ref()).to_string();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, ["messages: 3", "emails: 1"]);
}
