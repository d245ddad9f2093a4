/*!
 * Session state for the translation wizard.
 *
 * The wizard walks an operator through one file at a time:
 *
 * ```text
 * Welcome → FindFiles → Translate → Review → CreatePr
 *              ↑  ↺          ↑         │         │
 *              │             └─ retry ─┘         │
 *              └──────────── next file ──────────┘
 * ```
 *
 * `SessionState` is an immutable value; every transition returns a new state
 * with a bumped version, so concurrent handlers can detect stale updates.
 */

pub mod state;

// Re-export main types
pub use state::{SessionState, Step};
