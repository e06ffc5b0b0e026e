use serde::{Deserialize, Serialize};

/// Decides from the number of linear components ending at a point whether
/// that point lies in the boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryNodeRule {
    /// Odd number of endpoints (the OGC SFS rule).
    #[default]
    Mod2,
    /// Any endpoint.
    EndPoint,
    /// More than one endpoint.
    MultiValentEndPoint,
    /// Exactly one endpoint.
    MonoValentEndPoint,
}

impl BoundaryNodeRule {
    pub fn is_in_boundary(self, count: usize) -> bool {
        match self {
            BoundaryNodeRule::Mod2 => count % 2 == 1,
            BoundaryNodeRule::EndPoint => count > 0,
            BoundaryNodeRule::MultiValentEndPoint => count > 1,
            BoundaryNodeRule::MonoValentEndPoint => count == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules() {
        let counts = [0, 1, 2, 3];
        let check = |rule: BoundaryNodeRule| counts.map(|n| rule.is_in_boundary(n));
        assert_eq!(check(BoundaryNodeRule::Mod2), [false, true, false, true]);
        assert_eq!(check(BoundaryNodeRule::EndPoint), [false, true, true, true]);
        assert_eq!(check(BoundaryNodeRule::MultiValentEndPoint), [false, false, true, true]);
        assert_eq!(check(BoundaryNodeRule::MonoValentEndPoint), [false, true, false, false]);
    }
}
