#![forbid(unsafe_code)]

//! Snapshot-based undo/redo.
//!
//! The host owns its state type `T` and hands complete snapshots to the
//! history after each committed edit. Undo and redo hand an earlier or later
//! snapshot back for the host to render.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HistoryEngine<T>  (Rc<RefCell<..>> handle, listeners, guard) │
//! │   ┌────────────────────────────────────────────────────────┐ │
//! │   │ HistoryStack<T>                                        │ │
//! │   │   [Arc(s0), Arc(s1), Arc(s2), Arc(s3)]                 │ │
//! │   │                      ▲ cursor                          │ │
//! │   └────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`history`]: the list, cursor, eviction, and [`HistoryConfig`].
//! - [`engine`]: the shared handle with notifications, the re-entrancy
//!   guard, and batches.
//!
//! # Quick Start
//!
//! ```
//! use wg_runtime::undo::{HistoryConfig, HistoryEngine};
//!
//! let history = HistoryEngine::new(vec![0u32], &HistoryConfig::new(20));
//! history.push_described(vec![0, 8], "log 8h");
//! history.settle();
//!
//! let restored = history.undo().unwrap();
//! assert_eq!(**restored.state(), vec![0]);
//! assert!(history.can_redo());
//! ```
//!
//! # Memory Model
//!
//! Each entry holds an `Arc<T>`. Pushing clones nothing but the `Arc`, and
//! notifications hand out the same `Arc`. Memory is reclaimed when the
//! entry is evicted or pruned and the host drops its last reference.

pub mod engine;
pub mod history;

pub use engine::{GuardRelease, GuardState, HistoryEngine, ListenerId};
pub use history::{DEFAULT_MAX_HISTORY, HistoryConfig, HistoryEntry, HistoryStack};
