use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registration_core::{
    constants::{INBOX_DIR_ENV, OUTBOX_DIR_ENV, PERSON_ATTRIBUTE_TYPE_ENV},
    CancellationToken, FormFile, OutboxSubmitter, RegistrationConfig, RegistrationForm,
    SubmissionController, SubmissionError,
};

/// Suffix given to form files once their patient has been accepted into the outbox.
const SUBMITTED_SUFFIX: &str = "submitted";

/// Main entry point for the registration batch runner
///
/// Submits every form file in the inbox directory, once, through the outbox submitter.
/// Accepted forms are renamed with a `.submitted` suffix so a rerun does not register the
/// same patient twice; rejected forms are left in place with their values intact.
///
/// # Environment Variables
/// - `REGISTRATION_INBOX_DIR`: directory of `.yaml`/`.yml`/`.json` form files
///   (default: "registration_inbox")
/// - `REGISTRATION_OUTBOX_DIR`: directory accepted payloads are written to
///   (default: "registration_outbox")
/// - `REGISTRATION_PERSON_ATTRIBUTE_TYPE`: person-attribute type for the telephone number
///
/// # Errors
/// Returns an error if logging cannot be initialised, the configuration is invalid, or the
/// inbox directory cannot be read.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("registration_run=info".parse()?)
                .add_directive("registration_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RegistrationConfig::from_values(
        std::env::var(INBOX_DIR_ENV).ok(),
        std::env::var(OUTBOX_DIR_ENV).ok(),
        std::env::var(PERSON_ATTRIBUTE_TYPE_ENV).ok(),
    )?;

    if !cfg.inbox_dir().is_dir() {
        anyhow::bail!(
            "Inbox directory does not exist: {}",
            cfg.inbox_dir().display()
        );
    }

    tracing::info!("++ Registering forms from {}", cfg.inbox_dir().display());
    tracing::info!("++ Writing accepted payloads to {}", cfg.outbox_dir().display());

    let controller = SubmissionController::with_options(
        OutboxSubmitter::new(cfg.outbox_dir()),
        cfg.assembly_options(),
    );

    let abort = CancellationToken::new();
    let on_signal = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current form");
            on_signal.cancel();
        }
    });

    let mut accepted = 0usize;
    let mut failed = 0usize;
    let mut unmarked = 0usize;

    for path in form_files(cfg.inbox_dir())? {
        if abort.is_cancelled() {
            break;
        }

        let form = match FormFile::load(&path) {
            Ok(state) => RegistrationForm::from_state(state),
            Err(e) => {
                tracing::error!("{}: {e}", path.display());
                failed += 1;
                continue;
            }
        };

        match form.submit(&controller, abort.clone()).await {
            Ok(ack) => {
                tracing::info!(
                    "{}: accepted as {} ({})",
                    path.display(),
                    ack.id,
                    ack.path.display()
                );
                accepted += 1;
                if !mark_submitted(&path) {
                    unmarked += 1;
                }
            }
            Err(SubmissionError::Validation(failure)) => {
                tracing::warn!("{}: not submitted: {failure}", path.display());
                failed += 1;
            }
            Err(e) => {
                tracing::error!("{}: {e}", path.display());
                failed += 1;
            }
        }
    }

    tracing::info!("-- Done: {accepted} accepted, {failed} not submitted");
    if unmarked > 0 {
        tracing::warn!("-- {unmarked} accepted form(s) could not be renamed");
    }
    Ok(())
}

/// Form files in `dir`, sorted by name.
fn form_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            )
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Rename an accepted form so later runs skip it.
///
/// Failure is logged rather than returned: the patient is already in the outbox and the
/// remaining forms must still be processed.
fn mark_submitted(path: &Path) -> bool {
    match std::fs::rename(path, submitted_path(path)) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                "{}: accepted but could not be marked submitted, remove it before rerunning: {e}",
                path.display()
            );
            false
        }
    }
}

fn submitted_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SUBMITTED_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_path_appends_suffix() {
        assert_eq!(
            submitted_path(Path::new("inbox/paul.yaml")),
            PathBuf::from("inbox/paul.yaml.submitted")
        );
    }

    #[test]
    fn mark_submitted_renames_the_form() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let form = tmp.path().join("paul.yaml");
        std::fs::write(&form, "givenName: Paul\n").unwrap();

        assert!(mark_submitted(&form));
        assert!(!form.exists());
        assert!(tmp.path().join("paul.yaml.submitted").exists());
    }

    #[test]
    fn mark_submitted_reports_failure_without_erroring() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(!mark_submitted(&tmp.path().join("gone.yaml")));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn form_files_skips_other_extensions() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path();
        for name in ["b.yaml", "a.json", "c.yaml.submitted", "notes.txt"] {
            std::fs::write(dir.join(name), "").unwrap();
        }

        let files = form_files(dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml"]);
    }
}
