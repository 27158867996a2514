//! Editor-style scan session.
//!
//! A [`Session`] receives document change notifications, debounces them
//! per document, runs the scan and hands the result to a [`Publisher`].
//! It also keeps the last published findings per document so callers can
//! query them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::debounce::Debouncer;
use super::document::{Document, ScanOutcome, Scanner};
use crate::config::ConfigSource;
use crate::diagnostic::Finding;

/// Receives findings as documents are scanned.
pub trait Publisher: Send + Sync {
    /// Replaces the findings shown for `path`.
    fn publish(&self, path: &Path, findings: &[Finding]);

    /// Removes every finding shown for `path`.
    fn clear(&self, path: &Path);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DebounceKey {
    Document(PathBuf),
    AllDocuments,
}

struct Shared {
    scanner: Scanner,
    config: Box<dyn ConfigSource>,
    publisher: Arc<dyn Publisher>,
    findings: Mutex<HashMap<PathBuf, Vec<Finding>>>,
}

impl Shared {
    fn run(&self, doc: &Document, publish: bool) -> Vec<Finding> {
        let config = self.config.snapshot();
        match self.scanner.scan_document(doc, &config) {
            ScanOutcome::Disabled => {
                self.forget(&doc.path);
                Vec::new()
            }
            ScanOutcome::Ignored => Vec::new(),
            ScanOutcome::Scanned(findings) => {
                tracing::debug!("{}: {} findings", doc.path.display(), findings.len());
                if publish {
                    self.store(&doc.path, findings.clone());
                    self.publisher.publish(&doc.path, &findings);
                }
                findings
            }
        }
    }

    /// The finding store, recovered if a previous holder panicked.
    fn stored(&self) -> MutexGuard<'_, HashMap<PathBuf, Vec<Finding>>> {
        self.findings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, path: &Path, findings: Vec<Finding>) {
        self.stored().insert(path.to_path_buf(), findings);
    }

    fn forget(&self, path: &Path) {
        self.stored().remove(path);
        self.publisher.clear(path);
    }
}

/// Debounced document scanning with published results.
///
/// Scheduling methods spawn onto the current tokio runtime and must be
/// called from within one.
pub struct Session {
    shared: Arc<Shared>,
    debouncer: Debouncer<DebounceKey>,
}

impl Session {
    pub fn new(
        scanner: Scanner,
        config: impl ConfigSource + 'static,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                scanner,
                config: Box::new(config),
                publisher,
                findings: Mutex::new(HashMap::new()),
            }),
            debouncer: Debouncer::new(),
        }
    }

    /// Schedules a scan of `doc` after the document delay.
    ///
    /// A request for the same document while one is still waiting
    /// replaces it, so only the latest text is scanned.
    pub fn request_scan(&mut self, doc: Document) {
        let delay = self.shared.config.snapshot().document_delay();
        let shared = Arc::clone(&self.shared);
        self.debouncer
            .arm(DebounceKey::Document(doc.path.clone()), delay, async move {
                shared.run(&doc, true);
            });
    }

    /// Schedules a rescan of every given document after the all-documents
    /// delay. Used after installs, file creation or configuration changes.
    pub fn request_rescan_all(&mut self, docs: Vec<Document>) {
        let delay = self.shared.config.snapshot().all_documents_delay();
        let shared = Arc::clone(&self.shared);
        self.debouncer
            .arm(DebounceKey::AllDocuments, delay, async move {
                for doc in &docs {
                    shared.run(doc, true);
                }
            });
    }

    /// Scans `doc` immediately.
    ///
    /// With `publish` the result replaces the document's published
    /// findings; without it the findings are only returned.
    pub fn scan_now(&self, doc: &Document, publish: bool) -> Vec<Finding> {
        self.shared.run(doc, publish)
    }

    /// Drops a closed document: cancels its pending scan and clears its
    /// findings.
    pub fn close(&mut self, path: &Path) {
        self.debouncer.cancel(&DebounceKey::Document(path.to_path_buf()));
        self.shared.forget(path);
    }

    /// Last published findings for `path`.
    pub fn findings(&self, path: &Path) -> Option<Vec<Finding>> {
        self.shared.stored().get(path).cloned()
    }

    /// Returns true if a scan of `path` is waiting to run.
    pub fn is_pending(&self, path: &Path) -> bool {
        self.debouncer
            .is_pending(&DebounceKey::Document(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diagnostic::FindingKind;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Publish(PathBuf, Vec<String>),
        Clear(PathBuf),
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Publisher for Recorder {
        fn publish(&self, path: &Path, findings: &[Finding]) {
            let targets = findings.iter().map(|f| f.target.clone()).collect();
            self.events
                .lock()
                .unwrap()
                .push(Event::Publish(path.to_path_buf(), targets));
        }

        fn clear(&self, path: &Path) {
            self.events.lock().unwrap().push(Event::Clear(path.to_path_buf()));
        }
    }

    /// Config whose toggles can be flipped while a session holds it.
    #[derive(Default)]
    struct SharedConfig(Mutex<Config>);

    impl ConfigSource for Arc<SharedConfig> {
        fn snapshot(&self) -> Config {
            self.0.lock().unwrap().clone()
        }
    }

    fn setup() -> (TempDir, Arc<Recorder>, Session) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let recorder = Arc::new(Recorder::default());
        let session = Session::new(Scanner::default(), Config::default(), recorder.clone());
        (dir, recorder, session)
    }

    fn doc(dir: &TempDir, text: &str) -> Document {
        Document::new(dir.path().join("index.js"), text, "javascript")
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_scans_last_text_once() {
        let (dir, recorder, mut session) = setup();
        let path = dir.path().join("index.js");

        session.request_scan(doc(&dir, "import a from './a';"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.request_scan(doc(&dir, "import b from './b';"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.request_scan(doc(&dir, "import c from './c';"));

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(recorder.events().is_empty());
        assert!(session.is_pending(&path));

        tokio::time::sleep(Duration::from_millis(100)).await;
        let expected = dir.path().join("c.js").display().to_string();
        assert_eq!(
            recorder.events(),
            vec![Event::Publish(path.clone(), vec![expected])]
        );
        assert_eq!(session.findings(&path).unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_and_clears() {
        let (dir, recorder, mut session) = setup();
        let path = dir.path().join("index.js");

        session.scan_now(&doc(&dir, "import a from './a';"), true);
        session.request_scan(doc(&dir, "import b from './b';"));
        session.close(&path);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], Event::Clear(path.clone()));
        assert!(session.findings(&path).is_none());
    }

    #[tokio::test]
    async fn test_scan_now_without_publish() {
        let (dir, recorder, session) = setup();
        let findings = session.scan_now(&doc(&dir, "import a from './a';"), false);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MissingFile);
        assert!(recorder.events().is_empty());
        assert!(session.findings(&dir.path().join("index.js")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescan_all_uses_long_delay_and_fresh_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let recorder = Arc::new(Recorder::default());
        let config = Arc::new(SharedConfig::default());
        let mut session = Session::new(Scanner::default(), Arc::clone(&config), recorder.clone());

        let a = Document::new(dir.path().join("a.js"), "import x from './x';", "javascript");
        let b = Document::new(dir.path().join("b.ts"), "import y from './y';", "typescript");
        session.scan_now(&a, true);
        session.scan_now(&b, true);

        config.0.lock().unwrap().enable_diagnostics_typescript = false;
        session.request_rescan_all(vec![a.clone(), b.clone()]);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(recorder.events().len(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let events = recorder.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[2], Event::Publish(p, _) if p == &a.path));
        assert_eq!(events[3], Event::Clear(b.path.clone()));
        assert!(session.findings(&b.path).is_none());
        assert!(session.findings(&a.path).is_some());
    }

    #[tokio::test]
    async fn test_disabled_document_clears_without_publish() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let recorder = Arc::new(Recorder::default());
        let config = Arc::new(SharedConfig::default());
        let session = Session::new(Scanner::default(), Arc::clone(&config), recorder.clone());

        let d = doc(&dir, "import a from './a';");
        session.scan_now(&d, true);

        config.0.lock().unwrap().enable_diagnostics_javascript = false;
        assert!(session.scan_now(&d, false).is_empty());

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], Event::Clear(d.path.clone()));
        assert!(session.findings(&d.path).is_none());
    }

    #[tokio::test]
    async fn test_store_survives_poisoned_lock() {
        let (dir, _recorder, session) = setup();
        let shared = Arc::clone(&session.shared);
        let _ = std::thread::spawn(move || {
            let _guard = shared.findings.lock().unwrap();
            panic!("publisher panicked");
        })
        .join();
        assert!(session.shared.findings.is_poisoned());

        let d = doc(&dir, "import a from './a';");
        session.scan_now(&d, true);
        assert_eq!(session.findings(&d.path).unwrap().len(), 1);

        session.scan_now(&doc(&dir, ""), true);
        assert!(session.findings(&d.path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ignored_document_keeps_previous_findings() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let recorder = Arc::new(Recorder::default());
        let config = Arc::new(SharedConfig::default());
        let session = Session::new(Scanner::default(), Arc::clone(&config), recorder.clone());

        let d = doc(&dir, "import a from './a';");
        session.scan_now(&d, true);

        config.0.lock().unwrap().ignore_files_or_folders = vec!["index.js".to_string()];
        assert!(session.scan_now(&d, true).is_empty());

        assert_eq!(recorder.events().len(), 1);
        assert_eq!(session.findings(&d.path).unwrap().len(), 1);
    }
}
