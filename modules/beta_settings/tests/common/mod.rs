//! Common test utilities: flag catalog, recording notifier and logging

#![allow(dead_code)]

use beta_settings::config::{Config, FlagKind, FlagSpec};
use beta_settings::Notifier;
use parking_lot::Mutex;

/// Catalog resembling the real beta features screen
pub fn test_config() -> Config {
    Config {
        flags: vec![
            FlagSpec::boolean("flagA", "Flag A"),
            FlagSpec::boolean("spruceWaterfallEnabled", "Waterfall page"),
            FlagSpec {
                kind: FlagKind::Choice(vec!["light".to_string(), "dark".to_string()]),
                ..FlagSpec::boolean("logTheme", "Log theme")
            },
            FlagSpec::boolean("parsleyAIEnabled", "Parsley AI"),
        ],
        ..Config::default()
    }
}

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Notifier that remembers every toast
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.toasts.lock().push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts.lock().push(Toast::Error(message.to_string()));
    }
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
