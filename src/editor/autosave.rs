use std::time::{Duration, Instant};

use crate::store::{DocumentStore, StoreError};

/// Where a scheduled write currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// Nothing scheduled
    Idle,
    /// Debounce timer running; restarted on every keystroke
    Debouncing { deadline: Instant },
    /// Timer fired; waiting for an idle opportunity to write
    AwaitingIdle,
}

/// Owns the in-memory draft of one document and decouples keystrokes
/// from persistence: every input restarts a debounce timer, the write
/// itself waits for an idle grant, and `flush` supersedes both with a
/// synchronous write (or delete, when the draft is blank).
///
/// The editor is the sole writer of its record while it exists; list
/// screens re-read the collection when they regain the foreground.
pub struct AutosaveEditor<S: DocumentStore> {
    store: S,
    doc_id: String,
    title: String,
    body: String,
    debounce: Duration,
    pending: Pending,
    /// A write failed since the last successful one; retried at flush
    write_failed: bool,
}

impl<S: DocumentStore> AutosaveEditor<S> {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

    /// Open an existing document for editing. A missing record starts as
    /// an empty draft under the same id (it will only persist if typed
    /// into).
    pub fn open(store: S, doc_id: impl Into<String>) -> Self {
        let doc_id = doc_id.into();
        let (title, body) = match store.load_document(&doc_id) {
            Some(doc) => (doc.title, doc.body),
            None => (String::new(), String::new()),
        };
        AutosaveEditor {
            store,
            doc_id,
            title,
            body,
            debounce: Self::DEFAULT_DEBOUNCE,
            pending: Pending::Idle,
            write_failed: false,
        }
    }

    /// Create a fresh empty document and open it.
    pub fn create(mut store: S) -> Result<Self, StoreError> {
        let id = store.create_document()?;
        Ok(Self::open(store, id))
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// True when both fields are blank after trimming; a blank draft is
    /// deleted at flush instead of persisted.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }

    /// Record a title edit. The draft updates immediately; persistence is
    /// rescheduled for after the quiet period.
    pub fn input_title(&mut self, text: impl Into<String>, now: Instant) {
        self.title = text.into();
        self.schedule(now);
    }

    /// Record a body edit.
    pub fn input_body(&mut self, text: impl Into<String>, now: Instant) {
        self.body = text.into();
        self.schedule(now);
    }

    fn schedule(&mut self, now: Instant) {
        self.pending = Pending::Debouncing {
            deadline: now + self.debounce,
        };
    }

    /// True when a write is scheduled but not yet performed.
    pub fn has_pending_write(&self) -> bool {
        self.pending != Pending::Idle
    }

    /// Drive the scheduler. `idle` is true when the caller has no more
    /// urgent work this tick (the idle-callback analog); the debounced
    /// write only happens on an idle tick, but flush never waits for one.
    pub fn poll(&mut self, now: Instant, idle: bool) {
        if let Pending::Debouncing { deadline } = self.pending
            && now >= deadline
        {
            self.pending = Pending::AwaitingIdle;
        }
        if self.pending == Pending::AwaitingIdle && idle {
            self.pending = Pending::Idle;
            // Debounced writes always save; blankness is only evaluated
            // at flush boundaries. Failures stay out of the typing path.
            if self.store.save_document(&self.doc_id, &self.title, &self.body).is_err() {
                self.write_failed = true;
            } else {
                self.write_failed = false;
            }
        }
    }

    /// Synchronous checkpoint: cancel anything scheduled, then save the
    /// draft, or delete the record if the draft is blank. Invoked on
    /// suspend, quit, explicit done/back, and teardown; idempotent.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        // Cancel first so a stale scheduled write can never land after
        // (and overwrite) this checkpoint.
        self.pending = Pending::Idle;
        let result = if self.is_blank() {
            self.store.delete_document(&self.doc_id)
        } else {
            self.store.save_document(&self.doc_id, &self.title, &self.body)
        };
        self.write_failed = result.is_err();
        result
    }

    pub fn last_write_failed(&self) -> bool {
        self.write_failed
    }
}

impl<S: DocumentStore> Drop for AutosaveEditor<S> {
    fn drop(&mut self) {
        // Teardown checkpoint. Best effort: the error already went to
        // the write journal and there is no caller left to tell.
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::docs::MemoryDocuments;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Shared = Rc<RefCell<MemoryDocuments>>;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn editor() -> (AutosaveEditor<Shared>, Shared) {
        let store: Shared = Rc::default();
        let ed = AutosaveEditor::create(Rc::clone(&store)).unwrap();
        (ed, store)
    }

    #[test]
    fn typing_then_flush_writes_final_values_once() {
        let (mut ed, store) = editor();
        ed.input_title("Hello", Instant::now());
        ed.flush().unwrap();

        assert_eq!(store.borrow().write_count, 1);
        assert_eq!(store.borrow().docs[0].title, "Hello");
        assert_eq!(store.borrow().docs[0].body, "");
    }

    #[test]
    fn debounce_coalesces_keystrokes() {
        let (mut ed, store) = editor();
        let t0 = Instant::now();

        let mut text = String::new();
        for (i, ch) in "0123456789".chars().enumerate() {
            text.push(ch);
            let at = t0 + Duration::from_millis(40 * i as u64);
            ed.input_body(text.clone(), at);
            ed.poll(at, true);
        }
        // Ten keystrokes inside the quiet window: nothing written yet
        assert_eq!(store.borrow().write_count, 0);

        // 600ms after the last keystroke, exactly one write
        let late = t0 + Duration::from_millis(40 * 9 + 600);
        ed.poll(late, true);
        assert_eq!(store.borrow().write_count, 1);
        assert_eq!(store.borrow().docs[0].body, "0123456789");
    }

    #[test]
    fn debounce_restarts_on_each_keystroke() {
        let (mut ed, store) = editor();
        let t0 = Instant::now();

        ed.input_body("a", t0);
        ed.poll(t0 + Duration::from_millis(400), true);
        assert_eq!(store.borrow().write_count, 0);

        ed.input_body("ab", t0 + Duration::from_millis(400));
        // 500ms after the FIRST keystroke, but only 100 after the second
        ed.poll(t0 + DEBOUNCE, true);
        assert_eq!(store.borrow().write_count, 0);

        ed.poll(t0 + Duration::from_millis(901), true);
        assert_eq!(store.borrow().write_count, 1);
    }

    #[test]
    fn write_waits_for_idle_grant() {
        let (mut ed, store) = editor();
        let t0 = Instant::now();

        ed.input_body("x", t0);
        // Deadline passed, but the loop is busy
        ed.poll(t0 + Duration::from_millis(600), false);
        assert_eq!(store.borrow().write_count, 0);
        assert!(ed.has_pending_write());

        ed.poll(t0 + Duration::from_millis(700), true);
        assert_eq!(store.borrow().write_count, 1);
        assert!(!ed.has_pending_write());
    }

    #[test]
    fn flush_supersedes_scheduled_write() {
        let (mut ed, store) = editor();
        let t0 = Instant::now();

        ed.input_body("draft", t0);
        ed.flush().unwrap();
        assert_eq!(store.borrow().write_count, 1);

        // The originally-scheduled write must not fire afterwards
        ed.poll(t0 + Duration::from_secs(2), true);
        assert_eq!(store.borrow().write_count, 1);
    }

    #[test]
    fn create_then_abandon_leaves_no_record() {
        let (ed, store) = editor();
        drop(ed); // teardown flush
        assert!(store.borrow().docs.is_empty());
    }

    #[test]
    fn whitespace_only_draft_is_deleted() {
        let (mut ed, store) = editor();
        ed.input_body("  \n\t ", Instant::now());
        ed.flush().unwrap();
        assert!(store.borrow().docs.is_empty());
    }

    #[test]
    fn flush_is_idempotent() {
        let (mut ed, store) = editor();
        ed.input_title("note", Instant::now());

        ed.flush().unwrap();
        ed.flush().unwrap();
        assert_eq!(store.borrow().docs.len(), 1);
        assert_eq!(store.borrow().docs[0].title, "note");
    }

    #[test]
    fn failed_debounced_write_is_retried_at_flush() {
        let (mut ed, store) = editor();
        let t0 = Instant::now();

        ed.input_body("precious", t0);
        store.borrow_mut().fail_next_save = Some("quota exceeded".into());
        ed.poll(t0 + Duration::from_millis(600), true);
        assert!(ed.last_write_failed());
        assert_eq!(store.borrow().write_count, 0);

        ed.flush().unwrap();
        assert!(!ed.last_write_failed());
        assert_eq!(store.borrow().docs[0].body, "precious");
    }

    #[test]
    fn open_missing_id_starts_blank() {
        let store: Shared = Rc::default();
        let ed = AutosaveEditor::open(Rc::clone(&store), "gone");
        assert_eq!(ed.title(), "");
        assert!(ed.is_blank());
        drop(ed);
        // Blank draft under a missing id: teardown deletes nothing
        assert!(store.borrow().docs.is_empty());
    }

    #[test]
    fn open_loads_existing_draft() {
        let store: Shared = Rc::default();
        store.borrow_mut().save_document("n1", "Title", "Body").unwrap();
        store.borrow_mut().write_count = 0;

        let ed = AutosaveEditor::open(Rc::clone(&store), "n1");
        assert_eq!(ed.title(), "Title");
        assert_eq!(ed.body(), "Body");
    }
}
