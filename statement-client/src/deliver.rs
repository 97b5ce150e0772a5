//! Download orchestration: name the rendered statement and save it.

use statement_core::{statement_filename, Customer, StatementFormat, StatementRequest};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::client::StatementClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::StatementTransport;

/// Where a downloaded statement ends up.
pub trait DownloadSink: Send + Sync {
    /// Store `payload` under `filename`, returning the final location.
    fn save(&self, filename: &str, payload: &[u8]) -> ClientResult<PathBuf>;
}

/// Saves statements into a directory on disk.
///
/// Each payload is written to a temporary file in the target directory and renamed into
/// place, so a failed write never leaves a partial statement behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, filename: &str, payload: &[u8]) -> ClientResult<PathBuf> {
        let name = safe_file_name(filename);
        let target = self.dir.join(&name);
        let save_err = |source: std::io::Error| ClientError::Save {
            path: target.clone(),
            source,
        };

        if !is_single_component(&name) {
            return Err(save_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "statement filename must be a single path component",
            )));
        }

        fs::create_dir_all(&self.dir).map_err(save_err)?;

        // Dropped (and deleted) on every early return below.
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(save_err)?;
        tmp.write_all(payload).map_err(save_err)?;
        tmp.flush().map_err(save_err)?;
        tmp.persist(&target).map_err(|e| save_err(e.error))?;

        Ok(target)
    }
}

/// Make a customer-derived filename safe to create inside the output directory.
///
/// Path separators become `_` and leading dots are dropped, so names like `AC/DC` or
/// `../x` cannot leave the directory.
fn safe_file_name(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '\0' { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_start_matches('.');
    if trimmed.is_empty() {
        "statement".to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Derive the filename for `customers` and hand the payload to `sink`.
pub fn deliver<S>(
    payload: &[u8],
    customers: &[Customer],
    format: StatementFormat,
    sink: &S,
) -> ClientResult<PathBuf>
where
    S: DownloadSink + ?Sized,
{
    let filename = statement_filename(customers, format);
    let path = sink.save(&filename, payload)?;
    info!(path = %path.display(), bytes = payload.len(), "statement saved");
    Ok(path)
}

/// Submit `request` and save the result.
///
/// Any failure is logged as a user-facing message and returned unchanged. The sink is
/// only touched after a successful submit.
pub async fn generate_and_deliver<T, S>(
    client: &StatementClient<T>,
    sink: &S,
    request: &StatementRequest,
) -> ClientResult<PathBuf>
where
    T: StatementTransport,
    S: DownloadSink + ?Sized,
{
    let result = match client.submit(request).await {
        Ok(payload) => deliver(&payload, request.customers(), request.statement_format(), sink),
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        error!("{}", err.user_message());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSink, RecordingTransport};
    use crate::transport::RawResponse;
    use statement_core::{build_statement_request, BillingPeriod};

    fn request(names: &[&str], format: StatementFormat) -> StatementRequest {
        let customers = names.iter().map(|n| Customer::new("", *n)).collect();
        build_statement_request(customers, vec![], BillingPeriod::default(), format).unwrap()
    }

    #[test]
    fn test_deliver_uses_derived_filename() {
        let sink = RecordingSink::default();
        let customers = [Customer::new("1", "Jane Doe"), Customer::new("2", "John Smith")];
        deliver(b"data", &customers, StatementFormat::Xlsx, &sink).unwrap();

        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "Jane_John_joint_statement.xlsx");
        assert_eq!(saved[0].1, b"data");
    }

    #[test]
    fn test_directory_sink_writes_file_and_no_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let path = deliver(b"hello", &[Customer::new("1", "  ")], StatementFormat::Txt, &sink)
            .unwrap();

        assert_eq!(path, dir.path().join("out").join("statement.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"hello");
        let entries: Vec<_> = fs::read_dir(dir.path().join("out")).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file must not remain");
    }

    #[test]
    fn test_directory_sink_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        sink.save("Jane_Doe_statement.pdf", b"old").unwrap();
        let path = sink.save("Jane_Doe_statement.pdf", b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_directory_sink_reports_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let sink = DirectorySink::new(&blocker);
        let err = sink.save("statement.pdf", b"data").unwrap_err();
        assert!(matches!(err, ClientError::Save { .. }));
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("Jane_Doe_statement.pdf"), "Jane_Doe_statement.pdf");
        assert_eq!(safe_file_name("AC/DC_statement.pdf"), "AC_DC_statement.pdf");
        assert_eq!(safe_file_name("a\\b_statement.txt"), "a_b_statement.txt");
        assert_eq!(safe_file_name("../escaped_statement.pdf"), "_escaped_statement.pdf");
        assert_eq!(safe_file_name(".hidden.pdf"), "hidden.pdf");
        assert_eq!(safe_file_name(".."), "statement");
    }

    #[test]
    fn test_slash_in_name_saves_inside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let sink = DirectorySink::new(&out);

        let path = deliver(b"pdf", &[Customer::new("1", "AC/DC Holdings")], StatementFormat::Pdf, &sink)
            .unwrap();

        assert_eq!(path, out.join("AC_DC_Holdings_statement.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"pdf");
    }

    #[test]
    fn test_dot_dot_name_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let sink = DirectorySink::new(&out);

        let path = deliver(b"pdf", &[Customer::new("1", "../escaped")], StatementFormat::Pdf, &sink)
            .unwrap();

        assert_eq!(path.parent(), Some(out.as_path()));
        assert!(!dir.path().join("escaped_statement.pdf").exists());
        let outside: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(outside, vec![std::ffi::OsString::from("out")]);
    }

    #[test]
    fn test_failed_persist_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the statement should go makes the rename fail.
        let blocker = dir.path().join("statement.pdf");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), b"x").unwrap();

        let sink = DirectorySink::new(dir.path());
        let err = sink.save("statement.pdf", b"data").unwrap_err();
        assert!(matches!(err, ClientError::Save { ref path, .. } if path == &blocker));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["statement.pdf".to_string()]);
        assert!(!names.iter().any(|n| n.starts_with(".tmp")));
    }

    #[tokio::test]
    async fn test_generate_and_deliver_saves_on_success() {
        let client = StatementClient::new(RecordingTransport::ok(b"%PDF".to_vec()));
        let sink = RecordingSink::default();

        let req = request(&["Jane Doe"], StatementFormat::Pdf);
        let path = generate_and_deliver(&client, &sink, &req).await.unwrap();

        assert_eq!(path, PathBuf::from("Jane_Doe_statement.pdf"));
        assert_eq!(sink.saved()[0].1, b"%PDF");
    }

    #[tokio::test]
    async fn test_generate_and_deliver_never_saves_on_server_error() {
        let client = StatementClient::new(RecordingTransport::respond(RawResponse::new(
            500,
            "server exploded",
        )));
        let sink = RecordingSink::default();

        let req = request(&["Jane Doe", "John Smith"], StatementFormat::Xlsx);
        let err = generate_and_deliver(&client, &sink, &req).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::RemoteStatement { status: 500, ref body } if body == "server exploded"
        ));
        assert!(sink.saved().is_empty());
    }

    #[tokio::test]
    async fn test_generate_and_deliver_propagates_transport_failure() {
        let client = StatementClient::new(RecordingTransport::unreachable("dns error"));
        let sink = RecordingSink::default();

        let req = request(&["Jane Doe"], StatementFormat::Txt);
        let err = generate_and_deliver(&client, &sink, &req).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert!(sink.saved().is_empty());
    }
}
