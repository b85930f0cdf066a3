use predicates::prelude::predicate;

#[test]
fn help_lists_inputs_and_validator_options() {
    assert_cmd::cargo::cargo_bin_cmd!("schemacheck")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--data"))
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("Validator options"))
        .stdout(predicate::str::contains("--all-errors"))
        .stdout(predicate::str::contains("--extra-formats"));
}

#[test]
fn version_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("schemacheck")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
