//! Four-level logging handle passed through generation.
//!
//! Generators never talk to a logging backend directly: they receive a
//! [`GenerationLogger`], which can be narrowed with [`GenerationLogger::child`]
//! so that every message carries the shape or task it came from.

use std::{fmt, sync::Arc};

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Error,
    Debug,
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "info"),
            Level::Error => write!(f, "error"),
            Level::Debug => write!(f, "debug"),
            Level::Warn => write!(f, "warn"),
        }
    }
}

/// Backend that receives fully prefixed messages.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Sink forwarding to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    debug: bool,
}

impl TracingSink {
    /// `debug` controls whether [`Level::Debug`] messages are forwarded.
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{}", message),
            Level::Error => tracing::error!("{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Debug if self.debug => tracing::debug!("{}", message),
            Level::Debug => {}
        }
    }
}

/// A cheaply cloneable logger with an optional message prefix.
#[derive(Clone)]
pub struct GenerationLogger {
    sink: Arc<dyn LogSink>,
    prefix: Option<Arc<str>>,
}

impl GenerationLogger {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self::from_sink(Arc::new(sink))
    }

    pub fn from_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { sink, prefix: None }
    }

    /// A logger backed by [`TracingSink`].
    pub fn tracing(debug: bool) -> Self {
        Self::new(TracingSink::new(debug))
    }

    /// A logger whose messages are prefixed with `prefix:`.
    ///
    /// Children of children accumulate prefixes: `a:b:message`.
    pub fn child(&self, prefix: impl fmt::Display) -> Self {
        let prefix = match &self.prefix {
            Some(parent) => format!("{}:{}", parent, prefix),
            None => prefix.to_string(),
        };
        Self {
            sink: Arc::clone(&self.sink),
            prefix: Some(prefix.into()),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        match &self.prefix {
            Some(prefix) => self
                .sink
                .log(level, &format!("{}:{}", prefix, message.as_ref())),
            None => self.sink.log(level, message.as_ref()),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(Level::Warn, message);
    }
}

impl fmt::Debug for GenerationLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationLogger")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tracing_test::traced_test;

    use super::*;

    #[derive(Default)]
    struct Capture(Mutex<Vec<(Level, String)>>);

    impl LogSink for Capture {
        fn log(&self, level: Level, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_child_prefixes_messages() {
        let capture = Arc::new(Capture::default());
        let logger = GenerationLogger::from_sink(capture.clone());

        logger.info("plain");
        logger.child("com.example#Foo").warn("careful");
        logger.child("npm").child("install").error("failed");

        let lines = capture.0.lock().unwrap().clone();
        assert_eq!(
            lines,
            vec![
                (Level::Info, "plain".to_string()),
                (Level::Warn, "com.example#Foo:careful".to_string()),
                (Level::Error, "npm:install:failed".to_string()),
            ]
        );
    }

    #[test]
    fn test_child_does_not_change_parent() {
        let logger = GenerationLogger::tracing(false);
        let child = logger.child("x");
        assert_eq!(logger.prefix(), None);
        assert_eq!(child.prefix(), Some("x"));
    }

    #[test]
    #[traced_test]
    fn test_tracing_sink_forwards() {
        let logger = GenerationLogger::tracing(false).child("shape");
        logger.info("hello from tracing");
        logger.debug("suppressed debug line");
        assert!(logs_contain("shape:hello from tracing"));
        assert!(!logs_contain("suppressed debug line"));
    }
}
