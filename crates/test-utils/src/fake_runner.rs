use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitehook::exec::{Capture, CaptureStatus, CommandRunner, CommandSpec};

use crate::Journal;

/// A fake runner that:
/// - records the first argument (`log`, `pull`, `update`, ...) of every
///   invocation in a shared journal, plus the full specs
/// - answers with canned text per first argument (empty + exit 0 otherwise)
/// - optionally sleeps before answering, to hold a pipeline open.
pub struct ScriptedRunner {
    journal: Journal,
    specs: Arc<Mutex<Vec<CommandSpec>>>,
    replies: HashMap<String, Capture>,
    delay: Duration,
}

impl ScriptedRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            specs: Arc::new(Mutex::new(Vec::new())),
            replies: HashMap::new(),
            delay: Duration::ZERO,
        }
    }

    /// Reply to `verb` with `text` and a clean exit.
    pub fn reply(self, verb: &str, text: &str) -> Self {
        self.reply_with(verb, Capture::new(text, CaptureStatus::Exited(Some(0))))
    }

    pub fn reply_with(mut self, verb: &str, capture: Capture) -> Self {
        self.replies.insert(verb.to_string(), capture);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Handle onto every spec seen, still readable after the runner has been
    /// moved into a controller.
    pub fn specs(&self) -> Arc<Mutex<Vec<CommandSpec>>> {
        Arc::clone(&self.specs)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Capture> + Send + 'a>> {
        Box::pin(async move {
            let verb = spec.args.first().cloned().unwrap_or_default();
            self.journal.lock().unwrap().push(verb.clone());
            self.specs.lock().unwrap().push(spec.clone());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.replies
                .get(&verb)
                .cloned()
                .unwrap_or_else(|| Capture::empty(CaptureStatus::Exited(Some(0))))
        })
    }
}
