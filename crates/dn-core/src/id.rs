//! Interned node ids.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

struct Names {
    rodeo: ThreadedRodeo,
    next: AtomicU32,
}

static NAMES: LazyLock<Names> = LazyLock::new(|| Names {
    rodeo: ThreadedRodeo::default(),
    next: AtomicU32::new(0),
});

/// Identifies a diagram node across crates without borrowing it.
///
/// The interaction subsystem keys its bindings by `NodeId` and asks the
/// owner for the node when an event arrives, so it never holds a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    pub fn intern(name: &str) -> Self {
        NodeId(NAMES.rodeo.get_or_intern(name))
    }

    pub fn as_str(&self) -> &str {
        NAMES.rodeo.resolve(&self.0)
    }

    /// An id for a node created without a name, such as `diamond_4`.
    /// Names a caller already interned are skipped.
    pub fn fresh(kind: &str) -> Self {
        loop {
            let n = NAMES.next.fetch_add(1, Ordering::Relaxed);
            let name = format!("{kind}_{n}");
            if NAMES.rodeo.get(&name).is_none() {
                return Self::intern(&name);
            }
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
