//! Message classification
//!
//! Every backlog line is classified into exactly one [`MessageKind`]. The
//! classification is total: anything that is not a filibuster, an ignored
//! system line or a vote is a proposal candidate.
//!
//! # Vote syntax
//!
//! | Line | Target | Back-reference |
//! |------|--------|----------------|
//! | `<b> :D` | nearest preceding message | 0 |
//! | `<b> :D^^` | implicit | 2 (caret count) |
//! | `<b> :D~3` | implicit | 3 |
//! | `<b> a: :D` | `a`'s latest message | 0 |
//! | `<b> a, :D~1` | `a`'s message before the latest | 1 |
//! | `<b> :D~x+1` | implicit | 0 (expression is not evaluated) |

pub mod kind;

pub use kind::{MessageKind, VoteSpec, author_of, classify};
