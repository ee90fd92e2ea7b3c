//! Bus stop node identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid node identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node ID: {reason}")]
pub struct InvalidNodeId {
    reason: &'static str,
}

/// The public identifier of a bus stop.
///
/// AtB calls this `codAzNodo`. It is distinct from the numeric station ID
/// (`cinFermata`) and is the key clients use to look up stops and departures.
///
/// # Examples
///
/// ```
/// use atb_server::domain::NodeId;
///
/// let node = NodeId::parse("16011376").unwrap();
/// assert_eq!(node.get(), 16011376);
///
/// // Only plain decimal digits are accepted
/// assert!(NodeId::parse("").is_err());
/// assert!(NodeId::parse("+12").is_err());
/// assert!(NodeId::parse("12a").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Parse a node ID from a string of ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidNodeId> {
        if s.is_empty() {
            return Err(InvalidNodeId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidNodeId {
                reason: "must contain only digits 0-9",
            });
        }

        s.parse().map(NodeId).map_err(|_| InvalidNodeId {
            reason: "out of range",
        })
    }

    /// Returns the numeric value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether departures from this stop head towards the city centre.
    ///
    /// AtB encodes direction in the thousands digit: `1` means towards
    /// Trondheim sentrum, anything else means away from it.
    pub fn is_towards_centrum(self) -> bool {
        (self.0 / 1000) % 10 == 1
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId(value)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(NodeId::parse("0").unwrap().get(), 0);
        assert_eq!(NodeId::parse("101").unwrap().get(), 101);
        assert_eq!(NodeId::parse("16011376").unwrap().get(), 16011376);
        assert_eq!(NodeId::parse("007").unwrap().get(), 7);
    }

    #[test]
    fn reject_empty() {
        assert!(NodeId::parse("").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(NodeId::parse("abc").is_err());
        assert!(NodeId::parse("-1").is_err());
        assert!(NodeId::parse("+1").is_err());
        assert!(NodeId::parse(" 1").is_err());
        assert!(NodeId::parse("1.5").is_err());
    }

    #[test]
    fn reject_overflow() {
        assert!(NodeId::parse("4294967296").is_err());
        assert!(NodeId::parse("99999999999999999999").is_err());
    }

    #[test]
    fn towards_centrum() {
        assert!(NodeId::from(16011376).is_towards_centrum());
        assert!(!NodeId::from(16010376).is_towards_centrum());
        assert!(!NodeId::from(101).is_towards_centrum());
        assert!(NodeId::from(1101).is_towards_centrum());
    }

    #[test]
    fn display_and_debug() {
        let node = NodeId::from(102);
        assert_eq!(node.to_string(), "102");
        assert_eq!(format!("{:?}", node), "NodeId(102)");
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&NodeId::from(16011376)).unwrap();
        assert_eq!(json, "16011376");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeId::from(16011376));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display then parse returns the same node
        #[test]
        fn roundtrip(n in any::<u32>()) {
            let node = NodeId::from(n);
            prop_assert_eq!(NodeId::parse(&node.to_string()).unwrap(), node);
        }

        /// Strings with a non-digit are always rejected
        #[test]
        fn non_digit_rejected(s in "[0-9]{0,4}[^0-9][0-9]{0,4}") {
            prop_assert!(NodeId::parse(&s).is_err());
        }
    }
}
