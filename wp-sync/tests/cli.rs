use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::{tempdir, NamedTempFile};

/// Config pointing at a port nobody listens on: both fetches degrade to empty.
fn offline_config(output_dir: &std::path::Path) -> NamedTempFile {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    let yaml = format!(
        "site_base: \"http://127.0.0.1:{port}\"\noutput_dir: \"{}\"\n",
        output_dir.display()
    );
    write(config.path(), yaml).expect("Writing temp config failed");
    config
}

#[test]
fn sync_without_publish_succeeds_when_site_is_unreachable() {
    let out = tempdir().unwrap();
    let output_dir = out.path().join("_posts");
    let config = offline_config(&output_dir);

    let mut cmd = Command::cargo_bin("wp-sync").expect("Binary exists");
    cmd.arg("sync")
        .arg("--config")
        .arg(config.path())
        .arg("--no-publish")
        .env_remove("WP_SYNC_SITE_BASE")
        .env_remove("WP_SYNC_OUTPUT_DIR");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Synchronise complete").and(predicate::str::contains("publish: disabled")));
    assert!(output_dir.is_dir(), "output directory should be created");
}

#[test]
fn sync_fails_for_unparseable_config() {
    let config = NamedTempFile::new().unwrap();
    write(config.path(), "page_size: [").unwrap();

    let mut cmd = Command::cargo_bin("wp-sync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse").or(predicate::str::contains("YAML")));
}

#[test]
fn help_lists_sync_subcommand() {
    let mut cmd = Command::cargo_bin("wp-sync").expect("Binary exists");
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains("sync"));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use wp_sync::cli::{run, Cli, Commands};

    // A missing config file makes run() fail fast, after the initial event.
    let cli = Cli {
        command: Commands::Sync {
            config: Some(std::path::PathBuf::from("does-not-exist.yaml")),
            no_publish: true,
            no_prune: true,
        },
    };

    assert!(run(cli).await.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
