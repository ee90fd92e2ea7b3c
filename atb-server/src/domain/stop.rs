//! Bus stops and the stop directory.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::NodeId;

/// A single bus stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStop {
    /// Internal numeric station ID.
    pub stop_id: u32,
    /// Public node ID, unique within a directory.
    pub node_id: NodeId,
    /// Human-readable stop name.
    pub description: String,
    /// Coordinates as AtB publishes them; not reprojected.
    pub longitude: f64,
    pub latitude: f64,
    /// Short code shown on mobile clients.
    pub mobile_code: String,
    /// Short name shown on mobile clients.
    pub mobile_name: String,
}

/// The full set of known bus stops, with a node ID index.
///
/// The index holds positions into `stops` and is built by the constructor,
/// so a directory and its index always describe the same sequence. Neither
/// can be mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct BusStops {
    stops: Vec<BusStop>,

    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl BusStops {
    /// Build a directory from a list of stops.
    ///
    /// Node IDs must be unique; if a node ID repeats, the first stop wins and
    /// later ones are dropped.
    pub fn new(stops: Vec<BusStop>) -> Self {
        let mut index = HashMap::with_capacity(stops.len());
        let mut unique = Vec::with_capacity(stops.len());

        for stop in stops {
            if index.contains_key(&stop.node_id) {
                warn!(node_id = %stop.node_id, "dropping bus stop with duplicate node ID");
                continue;
            }
            index.insert(stop.node_id, unique.len());
            unique.push(stop);
        }

        Self {
            stops: unique,
            index,
        }
    }

    /// Look up a stop by node ID.
    pub fn get(&self, node_id: NodeId) -> Option<&BusStop> {
        self.index.get(&node_id).map(|&i| &self.stops[i])
    }

    /// Whether a stop with this node ID exists.
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.index.contains_key(&node_id)
    }

    /// All stops, in upstream order.
    pub fn stops(&self) -> &[BusStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl<'de> Deserialize<'de> for BusStops {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct StopList {
            stops: Vec<BusStop>,
        }

        StopList::deserialize(deserializer).map(|list| BusStops::new(list.stops))
    }
}

#[cfg(test)]
pub(crate) fn test_stop(node_id: u32, description: &str) -> BusStop {
    BusStop {
        stop_id: node_id.wrapping_add(100_000),
        node_id: NodeId::from(node_id),
        description: description.to_string(),
        longitude: 569006.0,
        latitude: 7034189.0,
        mobile_code: format!("{node_id} (Test)"),
        mobile_name: format!("Test ({node_id})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> BusStops {
        BusStops::new(vec![
            test_stop(101, "Prof. Brochs gt"),
            test_stop(102, "Gløshaugen Syd"),
            test_stop(103, "Studentersamfundet"),
        ])
    }

    #[test]
    fn lookup_by_node_id() {
        let stops = directory();
        assert_eq!(stops.len(), 3);

        let stop = stops.get(NodeId::from(102)).unwrap();
        assert_eq!(stop.node_id, NodeId::from(102));
        assert_eq!(stop.description, "Gløshaugen Syd");

        assert!(stops.get(NodeId::from(999)).is_none());
        assert!(stops.contains(NodeId::from(103)));
        assert!(!stops.contains(NodeId::from(999)));
    }

    #[test]
    fn preserves_upstream_order() {
        let stops = directory();
        let ids: Vec<u32> = stops.stops().iter().map(|s| s.node_id.get()).collect();
        assert_eq!(ids, vec![101, 102, 103]);
    }

    #[test]
    fn duplicate_node_ids_keep_first() {
        let stops = BusStops::new(vec![
            test_stop(101, "First"),
            test_stop(102, "Other"),
            test_stop(101, "Second"),
        ]);

        assert_eq!(stops.len(), 2);
        assert_eq!(stops.get(NodeId::from(101)).unwrap().description, "First");
        assert_eq!(stops.get(NodeId::from(102)).unwrap().description, "Other");
    }

    #[test]
    fn empty_directory() {
        let stops = BusStops::new(Vec::new());
        assert!(stops.is_empty());
        assert!(stops.get(NodeId::from(1)).is_none());
    }

    #[test]
    fn serializes_without_index() {
        let json = serde_json::to_value(directory()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert_eq!(json["stops"][0]["nodeId"], 101);
        assert_eq!(json["stops"][0]["stopId"], 100_101);
        assert_eq!(json["stops"][0]["mobileCode"], "101 (Test)");
    }

    #[test]
    fn deserialize_rebuilds_index() {
        let json = serde_json::to_string(&directory()).unwrap();
        let back: BusStops = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 3);
        assert_eq!(back.get(NodeId::from(103)).unwrap().description, "Studentersamfundet");
    }
}
