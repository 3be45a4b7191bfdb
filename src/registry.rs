//! Name-keyed logger registry
//!
//! The registry guarantees at most one configuration pass per name: the
//! lookup, the configuration and the insert all happen under one mutex, so
//! concurrent first calls for the same name can never attach duplicate sinks.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_subscriber::fmt::MakeWriter;

use crate::error::{LoggerError, Result};
use crate::factory::LoggerOptions;
use crate::formatter::Formatter;
use crate::logger::{Logger, LoggerHandle};
use crate::sink::{ConsoleSink, FileSink, Sink};

/// Loggers configured so far, keyed by name
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, LoggerHandle>>,
    console: Arc<ConsoleSink>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    /// Create an empty registry whose loggers write to standard error
    pub fn new() -> Self {
        Self::with_console(ConsoleSink::stderr())
    }

    /// Create an empty registry whose console sink writes through `make_writer`
    pub fn with_console_writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::with_console(ConsoleSink::with_writer(make_writer))
    }

    fn with_console(console: ConsoleSink) -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
            console: Arc::new(console),
        }
    }

    /// The process-wide registry, created on first use
    pub fn global() -> &'static LoggerRegistry {
        static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, LoggerHandle>> {
        // Entries are only inserted once fully built, so a poisoned map is still consistent
        self.loggers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the logger for `options.name`, configuring it on first request
    ///
    /// An existing logger is returned as is; the rest of `options` is ignored.
    /// On failure nothing is registered.
    pub fn get_logger(&self, options: &LoggerOptions) -> Result<LoggerHandle> {
        let logger = {
            let mut loggers = self.lock();

            if let Some(existing) = loggers.get(&options.name) {
                return Ok(Arc::clone(existing));
            }

            let logger = Arc::new(self.configure(options)?);
            loggers.insert(options.name.clone(), Arc::clone(&logger));
            logger
        };

        // Emitted after the lock is released: subscribers may call back into the registry
        tracing::debug!(
            logger = %options.name,
            level = %options.level,
            sinks = ?logger.sink_kinds(),
            "Configured logger"
        );

        Ok(logger)
    }

    fn configure(&self, options: &LoggerOptions) -> Result<Logger> {
        let formatter = Arc::new(Formatter::new());
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::with_capacity(2);

        if let Some(path) = options.log_file_path() {
            let dir = options.log_dir();
            fs::create_dir_all(&dir).map_err(|source| LoggerError::CreateDir {
                path: dir.clone(),
                source,
            })?;

            let file = FileSink::open(&path)
                .map_err(|source| LoggerError::OpenFile { path, source })?;
            sinks.push(Arc::new(file));
        }

        let console: Arc<dyn Sink> = self.console.clone();
        sinks.push(console);

        Ok(Logger::new(
            options.name.as_str(),
            options.level,
            sinks,
            formatter,
        ))
    }

    /// Look up an already configured logger
    pub fn get(&self, name: &str) -> Option<LoggerHandle> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all configured loggers, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::sink::{MemoryWriter, SinkKind};
    use std::sync::mpsc;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Configures one logger per event target from inside the subscriber
    struct PerTargetLayer {
        registry: Arc<LoggerRegistry>,
    }

    impl<S: Subscriber> Layer<S> for PerTargetLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let target = event.metadata().target();
            let _ = self.registry.get_logger(&LoggerOptions::new(target));
        }
    }

    fn memory_registry() -> (LoggerRegistry, MemoryWriter) {
        let memory = MemoryWriter::default();
        (LoggerRegistry::with_console_writer(memory.clone()), memory)
    }

    fn split_line(line: &str) -> Vec<&str> {
        line.splitn(4, " - ").collect()
    }

    #[test]
    fn test_second_call_returns_same_logger() {
        let (registry, memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new("app")
            .file_name("app")
            .log_sub_dir(temp_dir.path());

        let first = registry.get_logger(&options).unwrap();
        let second = registry
            .get_logger(&options.clone().level(Level::Critical))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.level(), Level::Debug);
        assert_eq!(second.sink_kinds(), vec![SinkKind::File, SinkKind::Console]);

        second.info("once");
        assert_eq!(memory.lines().len(), 1);
        let file = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
        assert_eq!(file.lines().count(), 1);
    }

    #[test]
    fn test_console_only_writes_no_files() {
        let (registry, memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("out");

        let logger = registry
            .get_logger(&LoggerOptions::new("console").log_sub_dir(&log_dir))
            .unwrap();
        logger.debug("one");
        logger.info("two");

        assert!(!log_dir.exists());
        assert_eq!(logger.sink_kinds(), vec![SinkKind::Console]);
        assert_eq!(memory.lines().len(), 2);
    }

    #[test]
    fn test_file_mode_creates_directory_and_line() {
        let (registry, _memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("out");
        assert!(!log_dir.exists());

        let logger = registry
            .get_logger(
                &LoggerOptions::new("app")
                    .file_name("app")
                    .log_sub_dir(&log_dir),
            )
            .unwrap();
        logger.info("hello file");

        let content = fs::read_to_string(log_dir.join("app.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let parts = split_line(lines[0]);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].len(), "2026-01-21 14:30:45,123".len());
        assert_eq!(parts[0].as_bytes()[19], b',');
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "app");
        assert_eq!(parts[3], "hello file");
    }

    #[test]
    fn test_nested_directory_is_created() {
        let (registry, _memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("a").join("b").join("c");

        registry
            .get_logger(&LoggerOptions::new("deep").file_name("deep").log_sub_dir(&log_dir))
            .unwrap();

        assert!(log_dir.join("deep.log").exists());
    }

    #[test]
    fn test_level_filtering_applies_to_every_sink() {
        let (registry, memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();

        let logger = registry
            .get_logger(
                &LoggerOptions::new("quiet")
                    .level(Level::Warning)
                    .file_name("quiet")
                    .log_sub_dir(temp_dir.path()),
            )
            .unwrap();

        logger.info("ignored");
        let path = temp_dir.path().join("quiet.log");
        assert!(fs::read_to_string(&path).unwrap().is_empty());
        assert!(memory.contents().is_empty());

        logger.critical("reported");
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn test_loggers_are_isolated() {
        let parent_memory = MemoryWriter::default();
        let parent_registry = LoggerRegistry::with_console_writer(parent_memory.clone());
        let temp_dir = TempDir::new().unwrap();

        let _parent = parent_registry
            .get_logger(&LoggerOptions::new("app").file_name("app").log_sub_dir(temp_dir.path()))
            .unwrap();
        let child = parent_registry
            .get_logger(&LoggerOptions::new("app.db").file_name("db").log_sub_dir(temp_dir.path()))
            .unwrap();

        child.info("query done");
        assert!(!child.propagate());
        assert!(fs::read_to_string(temp_dir.path().join("app.log"))
            .unwrap()
            .is_empty());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("db.log"))
                .unwrap()
                .lines()
                .count(),
            1
        );
        // Shared console sink receives the child's line exactly once
        assert_eq!(parent_memory.lines().len(), 1);
        assert!(parent_memory.lines()[0].contains(" - app.db - "));
    }

    #[test]
    fn test_concurrent_first_calls_configure_once() {
        let (registry, memory) = memory_registry();
        let registry = Arc::new(registry);
        let temp_dir = TempDir::new().unwrap();
        let options = LoggerOptions::new("race")
            .file_name("race")
            .log_sub_dir(temp_dir.path());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let options = options.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.get_logger(&options).unwrap()
                })
            })
            .collect();
        let loggers: Vec<LoggerHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
        assert_eq!(loggers[0].sinks().len(), 2);
        assert_eq!(registry.len(), 1);

        loggers[0].info("single");
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn test_failed_configuration_registers_nothing() {
        let (registry, _memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let options = LoggerOptions::new("broken")
            .file_name("broken")
            .log_sub_dir(blocker.join("logs"));
        let err = registry.get_logger(&options).unwrap_err();

        assert!(matches!(err, LoggerError::CreateDir { .. }));
        assert!(err.io_error().is_some());
        assert!(!registry.contains("broken"));

        // The name can still be configured once the problem is gone
        let fixed = options.log_sub_dir(temp_dir.path().join("logs"));
        let logger = registry.get_logger(&fixed).unwrap();
        assert_eq!(logger.sinks().len(), 2);
    }

    #[test]
    fn test_unopenable_file_registers_nothing() {
        let (registry, _memory) = memory_registry();
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("app.log")).unwrap();

        let options = LoggerOptions::new("app")
            .file_name("app")
            .log_sub_dir(temp_dir.path());
        let err = registry.get_logger(&options).unwrap_err();

        assert!(matches!(err, LoggerError::OpenFile { .. }));
        assert!(err.io_error().is_some());
        assert!(!registry.contains("app"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_subscriber_can_reenter_registry() {
        let (registry, _memory) = memory_registry();
        let registry = Arc::new(registry);
        let (tx, rx) = mpsc::channel();

        let worker_registry = Arc::clone(&registry);
        thread::spawn(move || {
            let subscriber = tracing_subscriber::registry().with(PerTargetLayer {
                registry: Arc::clone(&worker_registry),
            });
            let result = tracing::subscriber::with_default(subscriber, || {
                worker_registry.get_logger(&LoggerOptions::new("app")).is_ok()
            });
            let _ = tx.send(result);
        });

        let configured = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("get_logger did not return while a subscriber used the registry");
        assert!(configured);
        assert!(registry.contains("app"));
        assert!(registry.contains("namedlog::registry"));
    }

    #[test]
    fn test_registry_lookup() {
        let (registry, _memory) = memory_registry();
        assert!(registry.is_empty());

        registry.get_logger(&LoggerOptions::new("b")).unwrap();
        registry.get_logger(&LoggerOptions::new("a")).unwrap();

        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
    }
}
