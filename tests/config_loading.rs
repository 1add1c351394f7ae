// tests/config_loading.rs

use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;
use sitehook::config::load_and_validate;
use sitehook::errors::SitehookError;
use sitehook::types::{BuildEngineKind, TriggerWhileRunningBehaviour, VcsKind};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = config_file(contents);
    match load_and_validate(file.path()) {
        Err(SitehookError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "'{msg}' does not mention '{needle}'");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn minimal_config_gets_observed_defaults() {
    let file = config_file(
        r#"
[repository]
path = "/srv/www/waitwhat/src"

[build]
output = "/srv/www/waitwhat/dist"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.listen, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(cfg.server.route, "/");
    assert_eq!(cfg.repository.vcs, VcsKind::Hg);
    assert_eq!(cfg.repository.executable, PathBuf::from("hg"));
    assert_eq!(cfg.repository.timeout, Duration::from_secs(5));
    assert_eq!(cfg.repository.log_limit, 15);
    assert!(!cfg.repository.merge_stderr);
    assert_eq!(cfg.build.engine, BuildEngineKind::Mirror);
    assert_eq!(cfg.build.input, PathBuf::from("/srv/www/waitwhat/src"));
    assert_eq!(cfg.build.output, PathBuf::from("/srv/www/waitwhat/dist"));
    assert_eq!(cfg.pipeline.behaviour, TriggerWhileRunningBehaviour::Queue);
}

#[test]
fn full_config_round_trips_into_settings() {
    let file = config_file(
        r#"
[server]
listen = "0.0.0.0:9000"
route = "/hooks/deploy"

[repository]
vcs = "git"
executable = "/usr/local/bin/git"
path = "/srv/site/src"
timeout = "1500ms"
log_limit = 30
merge_stderr = true

[build]
engine = "command"
input = "/srv/site/src/content"
output = "/srv/site/public"
command = ["zola", "build", "--output-dir", "{output}"]

[pipeline]
triggered_while_running_behaviour = "reject"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.route, "/hooks/deploy");
    assert_eq!(cfg.repository.vcs, VcsKind::Git);
    assert_eq!(cfg.repository.executable, PathBuf::from("/usr/local/bin/git"));
    assert_eq!(cfg.repository.timeout, Duration::from_millis(1500));
    assert_eq!(cfg.repository.log_limit, 30);
    assert!(cfg.repository.merge_stderr);
    assert_eq!(cfg.build.engine, BuildEngineKind::Command);
    assert_eq!(cfg.build.input, PathBuf::from("/srv/site/src/content"));
    assert_eq!(cfg.build.command[0], "zola");
    assert_eq!(cfg.pipeline.behaviour, TriggerWhileRunningBehaviour::Reject);
}

#[test]
fn relative_paths_resolve_against_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Sitehook.toml");
    fs::write(
        &path,
        r#"
[repository]
path = "src"

[build]
output = "dist"
"#,
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.repository.working_dir, dir.path().join("src"));
    assert_eq!(cfg.build.input, dir.path().join("src"));
    assert_eq!(cfg.build.output, dir.path().join("dist"));
}

#[test]
fn zero_timeout_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
timeout = "0s"
[build]
output = "/srv/dist"
"#,
        "timeout",
    );
}

#[test]
fn unparseable_timeout_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
timeout = "five seconds"
[build]
output = "/srv/dist"
"#,
        "[repository].timeout",
    );
}

#[test]
fn overflowing_timeout_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
timeout = "307445734561825861m"
[build]
output = "/srv/dist"
"#,
        "too large",
    );
}

#[test]
fn zero_log_limit_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
log_limit = 0
[build]
output = "/srv/dist"
"#,
        "log_limit",
    );
}

#[test]
fn empty_executable_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
executable = "  "
[build]
output = "/srv/dist"
"#,
        "executable",
    );
}

#[test]
fn command_engine_needs_a_command() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
[build]
engine = "command"
output = "/srv/dist"
"#,
        "[build].command",
    );
}

#[test]
fn mirror_output_inside_input_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/src"
[build]
output = "/srv/src/dist"
"#,
        "overlaps",
    );
}

#[test]
fn mirror_input_inside_output_is_rejected() {
    expect_config_error(
        r#"
[repository]
path = "/srv/site/src"
[build]
output = "/srv/site/src/.."
"#,
        "overlaps",
    );
}

#[test]
fn route_must_be_absolute() {
    expect_config_error(
        r#"
[server]
route = "deploy"
[repository]
path = "/srv/src"
[build]
output = "/srv/dist"
"#,
        "route",
    );
}

#[test]
fn bad_listen_address_is_rejected() {
    expect_config_error(
        r#"
[server]
listen = "localhost"
[repository]
path = "/srv/src"
[build]
output = "/srv/dist"
"#,
        "listen",
    );
}

#[test]
fn unknown_behaviour_is_a_toml_error() {
    let file = config_file(
        r#"
[repository]
path = "/srv/src"
[build]
output = "/srv/dist"
[pipeline]
triggered_while_running_behaviour = "cancel"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitehookError::TomlError(_))
    ));
}

#[test]
fn missing_repository_section_is_a_toml_error() {
    let file = config_file(
        r#"
[build]
output = "/srv/dist"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitehookError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/nonexistent/Sitehook.toml"),
        Err(SitehookError::IoError(_))
    ));
}
