use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("rvl");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    // verification layer
    run_help(&home, &["predict"]);

    // dashboard
    run_help(&home, &["audit"]);
    run_help(&home, &["generate"]);
    run_help(&home, &["screen"]);
    run_help(&home, &["stream"]);
    run_help(&home, &["report"]);
    run_help(&home, &["status"]);
    run_help(&home, &["history"]);

    // grouped subcommands
    run_help(&home, &["audit", "upload"]);
    run_help(&home, &["audit", "generate"]);
}
