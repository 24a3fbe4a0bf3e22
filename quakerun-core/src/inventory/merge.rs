//! Inventory merge: a union over (network, station, channel) code identity.
//!
//! - First appearance fixes an entry's position; enumeration order from the
//!   catalog is preserved through arbitrarily many merges.
//! - When the same identity appears twice, the later payload wins.
//!   Higher-detail queries are only attempted after lower-detail ones, so
//!   later data is always at least as complete.
//! - Associative and commutative for disjoint identity sets; for colliding
//!   identities the last-write policy is the documented contract.

use super::{Inventory, Network, Station};

/// Merge `incoming` into `acc`, consuming it.
pub fn merge_inventory(acc: &mut Inventory, incoming: Inventory) {
    for net in incoming.networks {
        match acc.networks.iter_mut().find(|n| n.code == net.code) {
            Some(existing) => merge_network(existing, net),
            None => acc.networks.push(net),
        }
    }
}

fn merge_network(acc: &mut Network, incoming: Network) {
    for sta in incoming.stations {
        match acc.stations.iter_mut().find(|s| s.code == sta.code) {
            Some(existing) => merge_station(existing, sta),
            None => acc.stations.push(sta),
        }
    }
}

fn merge_station(acc: &mut Station, incoming: Station) {
    // Coordinates ride along with the winning station payload.
    acc.latitude = incoming.latitude;
    acc.longitude = incoming.longitude;
    for cha in incoming.channels {
        match acc
            .channels
            .iter_mut()
            .find(|c| c.code == cha.code && c.location == cha.location)
        {
            Some(existing) => *existing = cha,
            None => acc.channels.push(cha),
        }
    }
}

/// Fold an iterator of inventories into one, in iteration order.
#[must_use]
pub fn merge_all<I>(inventories: I) -> Inventory
where
    I: IntoIterator<Item = Inventory>,
{
    let mut acc = Inventory::new();
    for inv in inventories {
        merge_inventory(&mut acc, inv);
    }
    acc
}
