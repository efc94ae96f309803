//! The narrow seam between this crate and the rest of an interpreter.
//!
//! `Host` stands in for everything this crate deliberately does not own:
//! diagnostics output, the class/function tables' resolution of names it
//! does not itself define semantics for, and object-level comparison
//! hooks. A default, `log`-backed implementation is provided so the
//! crate is useful standalone (tests, `ValueSpace::new_default`); a real
//! interpreter overrides whichever sinks it needs richer behavior for.

use crate::values::object::PhpObject;
use crate::values::value::Value;

/// Diagnostic severities a `Host` can receive.
///
/// The distinct sink names an execution context forwards diagnostics
/// through (`notice`, `warn`, `error`, `fatal`, `deprecated`,
/// `catchable_fatal`, `recoverable_fatal`, `strict`, plus an
/// engine-specific warning channel kept separate from `warn` for
/// non-standard behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Notice,
    Warn,
    Error,
    Fatal,
    Deprecated,
    CatchableFatal,
    RecoverableFatal,
    Strict,
    /// A warning about engine-level (non-script-facing) behavior, kept
    /// distinct from `Warn` so a host can route it to a separate log
    /// channel without touching user-visible warning output.
    EngineWarn,
}

/// The host-provided collaborator surface.
///
/// Every method has a default that logs through the `log` crate and
/// otherwise does nothing — safe for standalone use. A full interpreter
/// overrides `resolve_function`/`resolve_class`/`compare_object` to
/// plug in its real function/class tables and object model.
pub trait Host {
    /// Receive a diagnostic. The default logs at a level derived from
    /// `severity` and never panics or aborts.
    fn diagnostic(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Notice => log::debug!("{message}"),
            Severity::Warn | Severity::Deprecated | Severity::Strict => {
                log::warn!("{message}")
            }
            Severity::EngineWarn => log::warn!("(engine) {message}"),
            Severity::Error
            | Severity::Fatal
            | Severity::CatchableFatal
            | Severity::RecoverableFatal => log::error!("{message}"),
        }
    }

    fn notice(&self, message: &str) {
        self.diagnostic(Severity::Notice, message);
    }
    fn warn(&self, message: &str) {
        self.diagnostic(Severity::Warn, message);
    }
    fn error(&self, message: &str) {
        self.diagnostic(Severity::Error, message);
    }
    /// The engine-only warning sink, kept apart from `warn`:
    /// non-standard-behavior diagnostics that aren't supposed to reach
    /// script-facing output.
    fn engine_warn(&self, message: &str) {
        self.diagnostic(Severity::EngineWarn, message);
    }
    /// Script execution cannot continue; a full interpreter aborts the
    /// running script here. This crate calls `fatal` and then returns a
    /// best-effort fallback value, so callers never unwind through it.
    fn fatal(&self, message: &str) {
        self.diagnostic(Severity::Fatal, message);
    }
    fn deprecated(&self, message: &str) {
        self.diagnostic(Severity::Deprecated, message);
    }
    fn catchable_fatal(&self, message: &str) {
        self.diagnostic(Severity::CatchableFatal, message);
    }
    fn recoverable_fatal(&self, message: &str) {
        self.diagnostic(Severity::RecoverableFatal, message);
    }
    fn strict(&self, message: &str) {
        self.diagnostic(Severity::Strict, message);
    }

    /// Resolve a bare function name to a callable value, for the
    /// function-name shape of callback resolution. `None` if unknown.
    fn resolve_function(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Resolve `class::method` (or an instance method lookup against an
    /// object's runtime class) to a callable value. `None` if unknown.
    fn resolve_method(&self, _class: &str, _method: &str) -> Option<Value> {
        None
    }

    /// Does `class` exist in the host's class table at all? Used to
    /// distinguish "unknown class" from "unknown method" in callback
    /// resolution errors.
    fn class_exists(&self, _class: &str) -> bool {
        false
    }

    /// The inline object-comparison hook. `Some(ordering)` short-circuits
    /// the default field-by-field aggregate comparison; `None` asks the
    /// comparator to fall back to comparing both objects' own
    /// `PhpObject` fields.
    fn compare_object(&self, _left: &PhpObject, _right: &PhpObject) -> Option<i8> {
        None
    }

    /// Whether the host wants SIGINT-equivalent notifications once an
    /// execution context is armed. Standalone
    /// use has no signal source, so the default is `false`.
    fn want_sigint_notifications(&self) -> bool {
        false
    }

    /// Does `obj` implement the *invokable* capability (PHP's
    /// `__invoke`)? Used by the callback resolver's object shape.
    fn is_invokable(&self, _obj: &PhpObject) -> bool {
        false
    }

    /// The bound invocable for an invokable object's `__invoke`, or
    /// `None` if `is_invokable` would also answer false.
    fn invokable_callable(&self, _obj: &PhpObject) -> Option<Value> {
        None
    }

    /// `$this` in the currently executing frame, if any — part of the
    /// host-interpreter seam's "current frame".
    fn current_this(&self) -> Option<PhpObject> {
        None
    }

    /// The class name a fresh default object is created under when
    /// coercing a non-object scalar via `as_object` (PHP's `(object)`
    /// cast). Defaults to `"stdClass"`, PHP's own builtin.
    fn default_object_class(&self) -> std::rc::Rc<str> {
        std::rc::Rc::from("stdClass")
    }

    /// The class context enclosing the current frame, used for
    /// visibility checks when resolving `self::`/`parent::`-relative
    /// callbacks. `None` outside any class context.
    fn current_context_class(&self) -> Option<std::rc::Rc<str>> {
        None
    }

    /// Read a variable out of the global frame. `None` if unset.
    fn global_get(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Write a variable into the global frame.
    fn global_set(&self, _name: &str, _value: Value) {}

    /// Mint the next resource id. The host owns this counter for the
    /// lifetime of the interpreter instance; every resource constructed by this
    /// crate goes through it so ids stay monotonically unique across
    /// file handles, directory handles, mysql links, and so on.
    fn next_resource_id(&self) -> u64;

    /// The engine's last observed POSIX errno, set by syscall-backed
    /// builtins outside this crate and readable by others. Default: no
    /// syscall has run yet.
    fn last_posix_errno(&self) -> i32 {
        0
    }

    /// Record the POSIX errno of the syscall a builtin just made.
    fn set_last_posix_errno(&self, _errno: i32) {}

    /// Compile a PHP source file to host-owned bytecode. The bytecode
    /// representation itself is entirely opaque to this crate — it is
    /// handed back as `Any` so a host can downcast to its own
    /// compiler's output type.
    fn compile_file(&self, path: &str) -> Result<std::rc::Rc<dyn std::any::Any>, String> {
        Err(format!("compile_file not supported by this host: {path}"))
    }

    /// Delegate to the external `serialize` module. The wire format itself is out of scope for
    /// this crate; see [`crate::serialize::serialize`] for the
    /// cycle-guarded entry point that calls this.
    fn serialize_value(&self, _v: &Value) -> Vec<u8> {
        Vec::new()
    }
}

/// A `Host` with every sink logging and every resolution hook returning
/// "unknown" — enough to exercise the value core without a real
/// interpreter behind it. A unit struct, so the resource-id counter it
/// needs to satisfy `Host::next_resource_id` lives in a thread-local
/// rather than on `self` — fine for tests and standalone use, where
/// there is exactly one of these per thread anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHost;

thread_local! {
    static DEFAULT_HOST_NEXT_RESOURCE_ID: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
}

impl Host for DefaultHost {
    fn next_resource_id(&self) -> u64 {
        DEFAULT_HOST_NEXT_RESOURCE_ID.with(|c| {
            let id = c.get() + 1;
            c.set(id);
            id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_resolves_nothing() {
        let host = DefaultHost;
        assert_eq!(host.resolve_function("strlen"), None);
        assert!(!host.class_exists("Foo"));
        assert_eq!(host.compare_object(&PhpObject::new("Foo"), &PhpObject::new("Foo")), None);
    }

    #[test]
    fn diagnostics_do_not_panic() {
        let host = DefaultHost;
        host.notice("n");
        host.warn("w");
        host.engine_warn("e");
        host.fatal("f");
    }

    #[test]
    fn resource_ids_are_monotonic() {
        let host = DefaultHost;
        let a = host.next_resource_id();
        let b = host.next_resource_id();
        assert!(b > a);
    }

    #[test]
    fn compile_file_is_unsupported_by_default() {
        let host = DefaultHost;
        assert!(host.compile_file("x.php").is_err());
    }
}
