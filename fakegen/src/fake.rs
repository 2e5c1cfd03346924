use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::thread::LocalKey;

use crate::{ARG_HISTORY_LEN, ZeroValue, registry};

/// A delegate invoked in place of the programmed return value.
///
/// Shared so that the delegate can be called while the owning fake is not
/// borrowed. A custom fake may inspect or re-arm its own state, or call its
/// own fake again.
pub type CustomFake<A, R> = Rc<dyn Fn(A) -> R>;

/// Box a closure as a custom fake for [`Fake::set_custom_fake_seq`].
///
/// `_like` only pins the argument and return types, so that the closure
/// signature is inferred from the fake it is destined for.
pub fn boxed_fake<A, R, F>(_like: &Fake<A, R>, f: F) -> Box<dyn Fn(A) -> R>
where
    F: Fn(A) -> R + 'static,
{
    Box::new(f)
}

/// Recorded state of a single faked function.
///
/// `A` is the tuple of argument types and `R` the return type, `()` for
/// functions that return nothing. A fresh fake is in the same state as a fake
/// that was just [reset](Fake::reset).
pub struct Fake<A, R = ()> {
    name: &'static str,
    capacity: usize,
    call_count: usize,
    arg_history_len: usize,
    arg_histories_dropped: usize,
    arg_val: Option<A>,
    arg_history: Vec<A>,
    /// Value returned when neither a custom fake nor a return sequence is set.
    pub return_val: R,
    return_val_seq: Vec<R>,
    return_val_seq_idx: usize,
    return_val_history: Vec<R>,
    custom_fake: Option<CustomFake<A, R>>,
    custom_fake_seq: Vec<CustomFake<A, R>>,
    custom_fake_seq_idx: usize,
}

/// What a recorded call resolves to.
pub(crate) enum Response<A, R> {
    Delegate(CustomFake<A, R>),
    Value(R),
}

impl<A, R> Response<A, R> {
    pub(crate) fn respond(self, args: A) -> R {
        match self {
            Response::Delegate(custom) => custom(args),
            Response::Value(ret) => ret,
        }
    }
}

impl<A: Clone, R: ZeroValue + Clone> Fake<A, R> {
    /// Create a fake with the default history capacity.
    pub fn new(name: &'static str) -> Self {
        Self::with_history_len(name, ARG_HISTORY_LEN)
    }

    /// Create a fake keeping at most `capacity` argument and return records.
    pub fn with_history_len(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            call_count: 0,
            arg_history_len: capacity,
            arg_histories_dropped: 0,
            arg_val: None,
            arg_history: Vec::new(),
            return_val: R::zero(),
            return_val_seq: Vec::new(),
            return_val_seq_idx: 0,
            return_val_history: Vec::new(),
            custom_fake: None,
            custom_fake_seq: Vec::new(),
            custom_fake_seq_idx: 0,
        }
    }

    /// Invoke the fake directly.
    ///
    /// This is the path for fakes owned by a test double value. Fakes defined
    /// with [`fake!`](crate::fake) go through [`invoke`] instead.
    pub fn call(&mut self, args: A) -> R {
        let ret = self.record_call(&args).respond(args);
        self.record_return(&ret);
        ret
    }

    /// Restore the zero state, keeping the name and configured capacity.
    pub fn reset(&mut self) {
        *self = Self::with_history_len(self.name, self.capacity);
    }

    pub(crate) fn record_call(&mut self, args: &A) -> Response<A, R> {
        self.arg_val = Some(args.clone());
        if self.call_count < self.arg_history_len {
            self.arg_history.push(args.clone());
        } else {
            self.arg_histories_dropped += 1;
        }
        self.call_count += 1;
        registry::record(self.name);

        if !self.custom_fake_seq.is_empty() {
            let custom = next_in_seq(&self.custom_fake_seq, &mut self.custom_fake_seq_idx);
            return Response::Delegate(Rc::clone(custom));
        }
        if let Some(custom) = &self.custom_fake {
            return Response::Delegate(Rc::clone(custom));
        }
        if !self.return_val_seq.is_empty() {
            let ret = next_in_seq(&self.return_val_seq, &mut self.return_val_seq_idx);
            return Response::Value(ret.clone());
        }
        Response::Value(self.return_val.clone())
    }

    pub(crate) fn record_return(&mut self, ret: &R) {
        if self.call_count.saturating_sub(1) < self.arg_history_len {
            self.return_val_history.push(ret.clone());
        }
    }
}

impl<A, R> Fake<A, R> {
    /// Name recorded in the global call history.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of invocations since the last reset.
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// Arguments of the most recent call, `None` before the first call.
    pub fn arg_val(&self) -> Option<&A> {
        self.arg_val.as_ref()
    }

    /// Arguments of every recorded call, oldest first.
    pub fn arg_history(&self) -> &[A] {
        &self.arg_history
    }

    /// Number of calls the argument history has room for.
    pub fn arg_history_len(&self) -> usize {
        self.arg_history_len
    }

    /// Lower or raise the live history limit until the next reset.
    pub fn set_arg_history_len(&mut self, len: usize) {
        self.arg_history_len = len;
    }

    /// Number of calls whose arguments did not fit in the history.
    pub fn arg_histories_dropped(&self) -> usize {
        self.arg_histories_dropped
    }

    /// Values returned by recorded calls, whatever their source.
    pub fn return_val_history(&self) -> &[R] {
        &self.return_val_history
    }

    /// Program the values returned by successive calls.
    ///
    /// Once exhausted the last value keeps being returned. An empty sequence
    /// leaves [`return_val`](Fake::return_val) in charge.
    pub fn set_return_seq(&mut self, seq: impl IntoIterator<Item = R>) {
        self.return_val_seq = seq.into_iter().collect();
        self.return_val_seq_idx = 0;
    }

    /// Length of the programmed return sequence.
    pub fn return_val_seq_len(&self) -> usize {
        self.return_val_seq.len()
    }

    /// Position in the return sequence, at most its length.
    pub fn return_val_seq_idx(&self) -> usize {
        self.return_val_seq_idx
    }

    /// Delegate every call to `f`, unless a custom fake sequence is set.
    pub fn set_custom_fake(&mut self, f: impl Fn(A) -> R + 'static) {
        self.custom_fake = Some(Rc::new(f));
    }

    /// Stop delegating to the single custom fake.
    pub fn clear_custom_fake(&mut self) {
        self.custom_fake = None;
    }

    /// Whether a single custom fake is set.
    pub fn has_custom_fake(&self) -> bool {
        self.custom_fake.is_some()
    }

    /// Delegate successive calls to successive entries of `seq`.
    ///
    /// Takes precedence over both the single custom fake and the return
    /// values. Once exhausted the last entry keeps being called.
    pub fn set_custom_fake_seq(&mut self, seq: impl IntoIterator<Item = Box<dyn Fn(A) -> R>>) {
        self.custom_fake_seq = seq.into_iter().map(Rc::from).collect();
        self.custom_fake_seq_idx = 0;
    }

    /// Length of the custom fake sequence.
    pub fn custom_fake_seq_len(&self) -> usize {
        self.custom_fake_seq.len()
    }

    /// Position in the custom fake sequence, at most its length.
    pub fn custom_fake_seq_idx(&self) -> usize {
        self.custom_fake_seq_idx
    }
}

impl<A: fmt::Debug, R: fmt::Debug> fmt::Debug for Fake<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fake")
            .field("name", &self.name)
            .field("call_count", &self.call_count)
            .field("arg_history_len", &self.arg_history_len)
            .field("arg_histories_dropped", &self.arg_histories_dropped)
            .field("arg_val", &self.arg_val)
            .field("arg_history", &self.arg_history)
            .field("return_val", &self.return_val)
            .field("return_val_seq", &self.return_val_seq)
            .field("return_val_seq_idx", &self.return_val_seq_idx)
            .field("return_val_history", &self.return_val_history)
            .field("custom_fake", &self.custom_fake.is_some())
            .field("custom_fake_seq_len", &self.custom_fake_seq.len())
            .field("custom_fake_seq_idx", &self.custom_fake_seq_idx)
            .finish()
    }
}

/// Entry at `idx`, advancing `idx` until the end, then the last entry.
///
/// Callers guarantee `seq` is non-empty.
fn next_in_seq<'a, T>(seq: &'a [T], idx: &mut usize) -> &'a T {
    if *idx < seq.len() {
        let entry = &seq[*idx];
        *idx += 1;
        entry
    } else {
        &seq[seq.len() - 1]
    }
}

/// Call the thread-local fake stored in `key`.
///
/// The state is only borrowed while recording, so a custom fake is free to
/// access the same fake. Used by the functions [`fake!`](crate::fake) defines.
#[doc(hidden)]
pub fn invoke<A, R>(key: &'static LocalKey<RefCell<Fake<A, R>>>, args: A) -> R
where
    A: Clone + 'static,
    R: ZeroValue + Clone + 'static,
{
    let response = key.with_borrow_mut(|fake| fake.record_call(&args));
    let ret = response.respond(args);
    key.with_borrow_mut(|fake| fake.record_return(&ret));
    ret
}
