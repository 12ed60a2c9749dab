use log::debug;
use std::collections::HashSet;

/// Tracks operation ids handed out during one assembly run.
///
/// Collisions are resolved by appending `_2`, `_3`, ... so identical input always
/// yields identical ids.
#[derive(Debug, Default)]
pub struct OperationIdRegistry {
    allocated: HashSet<String>,
}

impl OperationIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `candidate`, or the first free suffixed variant of it.
    pub fn reserve(&mut self, candidate: &str) -> String {
        let mut id = candidate.to_string();
        let mut suffix = 2;
        while self.allocated.contains(&id) {
            id = format!("{candidate}_{suffix}");
            suffix += 1;
        }

        if id != candidate {
            debug!("Operation id {} already in use, using {}", candidate, id);
        }
        self.allocated.insert(id.clone());
        id
    }
}
