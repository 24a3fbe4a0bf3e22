use proptest::prelude::*;
use quakerun_core::{Channel, Inventory, Network, Station, merge_all, merge_inventory};

fn channel(code: &str, rate: f64) -> Channel {
    Channel {
        code: code.to_string(),
        location: String::new(),
        sampling_rate: rate,
        response: None,
    }
}

fn station(code: &str, channels: Vec<Channel>) -> Station {
    Station {
        code: code.to_string(),
        latitude: 0.0,
        longitude: 0.0,
        channels,
    }
}

fn network(code: &str, stations: Vec<Station>) -> Network {
    Network {
        code: code.to_string(),
        stations,
    }
}

fn single(net: &str, sta: &str, cha: &str, rate: f64) -> Inventory {
    Inventory {
        networks: vec![network(net, vec![station(sta, vec![channel(cha, rate)])])],
    }
}

/// Canonical form for set-equality comparisons: entry order within a merged
/// inventory follows merge order and carries no semantic weight.
fn canonical(mut inv: Inventory) -> Inventory {
    inv.networks.sort_by(|a, b| a.code.cmp(&b.code));
    for n in &mut inv.networks {
        n.stations.sort_by(|a, b| a.code.cmp(&b.code));
        for s in &mut n.stations {
            s.channels.sort_by(|a, b| a.code.cmp(&b.code));
        }
    }
    inv
}

#[test]
fn disjoint_merge_is_commutative_and_associative() {
    let a = single("NET1", "STA1", "BHZ", 20.0);
    let b = single("NET2", "STA2", "BHZ", 20.0);
    let c = single("NET3", "STA3", "BHZ", 40.0);

    let ab_then_c = merge_all([merge_all([a.clone(), b.clone()]), c.clone()]);
    let c_then_ab = merge_all([c.clone(), merge_all([a.clone(), b.clone()])]);
    let singles = merge_all([b, c, a]);

    assert_eq!(canonical(ab_then_c.clone()), canonical(c_then_ab));
    assert_eq!(canonical(ab_then_c), canonical(singles));
}

#[test]
fn colliding_identity_takes_the_later_payload() {
    let mut acc = single("IU", "ANMO", "BHZ", 20.0);
    merge_inventory(&mut acc, single("IU", "ANMO", "BHZ", 40.0));

    assert_eq!(acc.networks.len(), 1);
    let sta = &acc.networks[0].stations[0];
    assert_eq!(sta.channels.len(), 1);
    assert!((sta.channels[0].sampling_rate - 40.0).abs() < f64::EPSILON);
}

#[test]
fn first_appearance_fixes_position() {
    let mut acc = merge_all([single("IU", "ANMO", "BHZ", 20.0), single("II", "AAK", "BHZ", 20.0)]);
    // Re-merging an existing network must not move it.
    merge_inventory(&mut acc, single("II", "AAK", "BHN", 20.0));

    let codes: Vec<&str> = acc.networks.iter().map(|n| n.code.as_str()).collect();
    assert_eq!(codes, vec!["IU", "II"]);
    assert_eq!(acc.networks[1].stations[0].channels.len(), 2);
}

fn arb_path() -> impl Strategy<Value = (usize, usize, usize, f64)> {
    (0usize..4, 0usize..4, 0usize..3, 1.0f64..100.0)
}

const NETS: [&str; 4] = ["IU", "II", "GE", "AU"];
const STAS: [&str; 4] = ["ANMO", "AAK", "KIP", "NWAO"];
const CHAS: [&str; 3] = ["BHZ", "BHN", "BHE"];

proptest! {
    #[test]
    fn identities_are_unique_and_last_write_wins(paths in proptest::collection::vec(arb_path(), 0..40)) {
        let merged = merge_all(
            paths
                .iter()
                .map(|&(n, s, c, rate)| single(NETS[n], STAS[s], CHAS[c], rate)),
        );

        let mut seen = std::collections::HashSet::new();
        for net in &merged.networks {
            for sta in &net.stations {
                for cha in &sta.channels {
                    prop_assert!(seen.insert((net.code.clone(), sta.code.clone(), cha.code.clone())));
                    // The last contribution for this identity must have won.
                    let last = paths
                        .iter()
                        .rev()
                        .find(|&&(n, s, c, _)| {
                            NETS[n] == net.code && STAS[s] == sta.code && CHAS[c] == cha.code
                        })
                        .map(|&(_, _, _, rate)| rate)
                        .unwrap();
                    prop_assert!((cha.sampling_rate - last).abs() < f64::EPSILON);
                }
            }
        }
        prop_assert_eq!(seen.len(), {
            let idents: std::collections::HashSet<_> =
                paths.iter().map(|&(n, s, c, _)| (n, s, c)).collect();
            idents.len()
        });
    }
}
