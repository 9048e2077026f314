//! Change notification for categories.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::CategorySpec;

/// Handle returned by [`CategorySpec::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

pub(crate) type Listener = Rc<dyn Fn(&CategoryEvent)>;

/// One change to a category: snapshots of the state before and after.
///
/// Snapshots carry no listeners.
#[derive(Clone, Debug)]
pub struct CategoryEvent {
    pub before: CategorySpec,
    pub after: CategorySpec,
}

impl CategoryEvent {
    #[must_use]
    pub fn name_changed(&self) -> bool {
        self.before.name() != self.after.name()
    }

    #[must_use]
    pub fn color_changed(&self) -> bool {
        self.before.color() != self.after.color()
    }

    #[must_use]
    pub fn filter_changed(&self) -> bool {
        self.before.filter() != self.after.filter()
    }

    #[must_use]
    pub fn whitelist_changed(&self) -> bool {
        self.before.whitelist() != self.after.whitelist()
    }

    #[must_use]
    pub fn blacklist_changed(&self) -> bool {
        self.before.blacklist() != self.after.blacklist()
    }
}
