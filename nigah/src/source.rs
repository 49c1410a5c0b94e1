use std::rc::Rc;

use serde_json::Value;

use crate::Capabilities;

/// An emission entry point: receives the event name and its arguments.
///
/// Entry points are reference counted so their identity can be compared
/// with [`same_entry`]. A source always dispatches through whatever entry
/// point is currently installed.
pub type EmitFn = Rc<dyn Fn(&str, &[Value])>;

/// Returns true if both entry points are the same allocation.
pub fn same_entry(a: &EmitFn, b: &EmitFn) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// An object that registers listeners and emits named events through a
/// swappable entry point.
///
/// This is the seam a [`Watcher`](crate::Watcher) wraps. Instead of patching
/// a method in place, the source exposes its current entry point and lets
/// the watcher install a replacement that records and then forwards to the
/// one it replaced. Restoring puts the captured entry point back.
///
/// [`Emitter`](crate::Emitter) is the in-crate implementation. Adapters
/// around other event objects implement this trait and report what they
/// support through [`capabilities`](Self::capabilities).
pub trait EventSource {
    /// Operations this source supports.
    ///
    /// A watcher refuses to wrap a source that lacks any of `on`, `once`
    /// or `emit`.
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Returns the entry point currently used by [`emit`](Self::emit), or
    /// `None` if the source cannot emit.
    fn emit_entry(&self) -> Option<EmitFn>;

    /// Install a new entry point. Subsequent emissions, including ones
    /// already in progress that re-enter the source, go through it.
    fn set_emit_entry(&self, entry: EmitFn);

    /// Emit `event` through the current entry point.
    ///
    /// The entry point is cloned out before it runs, so it may freely
    /// re-enter the source.
    fn emit(&self, event: &str, args: &[Value]) {
        if let Some(entry) = self.emit_entry() {
            entry(event, args);
        }
    }
}
