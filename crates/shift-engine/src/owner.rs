//! Ownership scope of templates and exceptions.
//!
//! Configuration lives at two tiers: the facility-wide default and per-worker
//! overrides. Raw ids keep the storage convention where `0` is the facility.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who a template or exception belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum Owner {
    /// The facility default, consulted when a worker has no override.
    Facility,
    /// A specific worker.
    Worker(u64),
}

impl Owner {
    /// Map a raw owner id to a scope. `0` is the facility default.
    pub fn from_id(id: u64) -> Self {
        if id == 0 {
            Owner::Facility
        } else {
            Owner::Worker(id)
        }
    }

    /// The raw id, `0` for the facility.
    pub fn id(self) -> u64 {
        match self {
            Owner::Facility => 0,
            Owner::Worker(id) => id,
        }
    }

    pub fn is_facility(self) -> bool {
        self.id() == 0
    }

    /// The storage key for this owner. `Worker(0)` is the facility, as it is
    /// once written to disk.
    pub fn canonical(self) -> Self {
        Owner::from_id(self.id())
    }
}

impl From<u64> for Owner {
    fn from(id: u64) -> Self {
        Owner::from_id(id)
    }
}

impl From<Owner> for u64 {
    fn from(owner: Owner) -> Self {
        owner.id()
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Facility | Owner::Worker(0) => write!(f, "facility"),
            Owner::Worker(id) => write!(f, "worker {id}"),
        }
    }
}
