use std::collections::BTreeMap;
use std::fmt;

/// Independent fetch targets of the jobs screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchTarget {
    Listing,
    Suggestions,
    Cities,
    RisingSkills,
    Salary,
}

impl FetchTarget {
    pub const ALL: [FetchTarget; 5] = [
        FetchTarget::Listing,
        FetchTarget::Suggestions,
        FetchTarget::Cities,
        FetchTarget::RisingSkills,
        FetchTarget::Salary,
    ];

    /// Stable small integer, used as the transport slot for this target.
    pub fn index(self) -> u64 {
        match self {
            FetchTarget::Listing => 0,
            FetchTarget::Suggestions => 1,
            FetchTarget::Cities => 2,
            FetchTarget::RisingSkills => 3,
            FetchTarget::Salary => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FetchTarget::Listing => "listing",
            FetchTarget::Suggestions => "suggestions",
            FetchTarget::Cities => "cities",
            FetchTarget::RisingSkills => "rising_skills",
            FetchTarget::Salary => "salary",
        }
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle issued for one fetch. Unique across all targets of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Tracks the single current token per fetch target.
///
/// Beginning a fetch invalidates whatever token the target held before, so a
/// superseded response is recognised and dropped when it finally arrives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenRegistry {
    issued: u64,
    current: BTreeMap<FetchTarget, FetchToken>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self, target: FetchTarget) -> FetchToken {
        self.issued += 1;
        let token = FetchToken(self.issued);
        self.current.insert(target, token);
        token
    }

    pub fn is_current(&self, target: FetchTarget, token: FetchToken) -> bool {
        self.current.get(&target) == Some(&token)
    }

    /// Consume the token if it is current. A second arrival for the same token
    /// is rejected.
    pub fn finish(&mut self, target: FetchTarget, token: FetchToken) -> bool {
        if self.is_current(target, token) {
            self.current.remove(&target);
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self, target: FetchTarget) -> Option<FetchToken> {
        self.current.get(&target).copied()
    }

    pub fn invalidate(&mut self, target: FetchTarget) -> Option<FetchToken> {
        self.current.remove(&target)
    }

    pub fn invalidate_all(&mut self) {
        self.current.clear();
    }
}
