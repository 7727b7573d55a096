//! State-change notifications
//!
//! Receivers are synchronous: a mutation is a local, in-memory event and
//! observers (a presentation layer re-rendering one input, a draft autosaver
//! queueing work) are expected to return quickly.

use crate::state::FieldChange;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type ReceiverFn = Arc<dyn Fn(&FieldChange) + Send + Sync>;

/// Handle returned by [`ChangeSignal::connect`], used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

struct ReceiverInfo {
	id: ReceiverId,
	receiver: ReceiverFn,
}

/// Dispatches [`FieldChange`] events to connected receivers in connection order.
pub struct ChangeSignal {
	receivers: Arc<RwLock<Vec<ReceiverInfo>>>,
	next_id: AtomicU64,
}

impl Default for ChangeSignal {
	fn default() -> Self {
		Self::new()
	}
}

impl ChangeSignal {
	pub fn new() -> Self {
		Self {
			receivers: Arc::new(RwLock::new(Vec::new())),
			next_id: AtomicU64::new(0),
		}
	}

	/// Connect a receiver
	///
	/// # Examples
	///
	/// ```
	/// use dynaform_forms::signals::ChangeSignal;
	/// use dynaform_forms::FieldChange;
	/// use serde_json::json;
	/// use std::sync::Arc;
	/// use std::sync::atomic::{AtomicUsize, Ordering};
	///
	/// let signal = ChangeSignal::new();
	/// let seen = Arc::new(AtomicUsize::new(0));
	/// let counter = seen.clone();
	/// let id = signal.connect(move |_change| {
	///     counter.fetch_add(1, Ordering::SeqCst);
	/// });
	///
	/// signal.send(&FieldChange { field: "a".into(), old: json!(""), new: json!("x") });
	/// assert_eq!(seen.load(Ordering::SeqCst), 1);
	/// assert!(signal.disconnect(id));
	/// ```
	pub fn connect<F>(&self, receiver: F) -> ReceiverId
	where
		F: Fn(&FieldChange) + Send + Sync + 'static,
	{
		let id = ReceiverId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.receivers.write().push(ReceiverInfo {
			id,
			receiver: Arc::new(receiver),
		});
		id
	}

	/// Disconnect a receiver, returning whether it was connected.
	pub fn disconnect(&self, id: ReceiverId) -> bool {
		let mut receivers = self.receivers.write();
		let original_len = receivers.len();
		receivers.retain(|r| r.id != id);
		receivers.len() < original_len
	}

	pub fn send(&self, change: &FieldChange) {
		// Receivers run outside the lock so they may connect or disconnect.
		let receivers: Vec<ReceiverFn> = self
			.receivers
			.read()
			.iter()
			.map(|r| Arc::clone(&r.receiver))
			.collect();

		for receiver in receivers {
			receiver(change);
		}
	}

	pub fn receiver_count(&self) -> usize {
		self.receivers.read().len()
	}

	pub fn disconnect_all(&self) {
		self.receivers.write().clear();
	}
}

impl fmt::Debug for ChangeSignal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChangeSignal")
			.field("receivers", &self.receiver_count())
			.finish()
	}
}
