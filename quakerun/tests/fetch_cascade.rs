use chrono::Duration;
use quakerun::fetch_inventory;
use quakerun_core::{DetailLevel, QuakeError, QueryScope, QuerySpec};
use quakerun_mock::{MockCatalog, fixtures};

fn base_spec() -> QuerySpec {
    QuerySpec::for_event(
        &fixtures::event(),
        (5.0, 90.0),
        &[],
        Duration::hours(1),
        Duration::hours(1),
    )
}

#[tokio::test]
async fn global_success_returns_after_exactly_one_query() {
    let catalog = MockCatalog::builder(fixtures::two_network_world()).build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    assert!(res.failures.is_empty());
    assert_eq!(catalog.calls(), 1);
    assert_eq!(res.inventory.networks.len(), 2);
    // Response detail made it through to the leaves.
    assert!(res.inventory.networks[0].stations[0].channels[0].response.is_some());
}

#[tokio::test]
async fn network_fallback_unions_station_results_without_failures() {
    // Broad query and IU's network query fail; IU's stations succeed one by
    // one, II succeeds at network scope.
    let catalog = MockCatalog::builder(fixtures::two_network_world())
        .deny_global()
        .deny_network("IU")
        .build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    assert!(res.failures.is_empty());
    let iu = res
        .inventory
        .networks
        .iter()
        .find(|n| n.code == "IU")
        .unwrap();
    assert_eq!(iu.stations.len(), 2);
    assert!(iu.stations.iter().all(|s| !s.channels.is_empty()));
    assert!(res.inventory.networks.iter().any(|n| n.code == "II"));
}

#[tokio::test]
async fn channel_failing_at_every_scope_is_dropped_and_logged() {
    let catalog = MockCatalog::builder(fixtures::two_network_world())
        .deny_global()
        .deny_network("IU")
        .deny_station("IU", "ANMO")
        .deny_channel("IU", "ANMO", "BHZ")
        .build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    assert_eq!(res.failures.len(), 1);
    let rec = &res.failures[0];
    assert_eq!(rec.scope, QueryScope::Channel);
    assert_eq!(rec.network.as_deref(), Some("IU"));
    assert_eq!(rec.station.as_deref(), Some("ANMO"));
    assert_eq!(rec.channel.as_deref(), Some("BHZ"));

    // The failed channel is absent; its siblings survived.
    let anmo = res
        .inventory
        .networks
        .iter()
        .find(|n| n.code == "IU")
        .unwrap()
        .stations
        .iter()
        .find(|s| s.code == "ANMO")
        .unwrap();
    let codes: Vec<&str> = anmo.channels.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["BHN", "BHE"]);
    assert!(res.inventory.networks.iter().any(|n| n.code == "II"));
}

#[tokio::test]
async fn failed_network_enumeration_degrades_to_one_global_record() {
    let catalog = MockCatalog::builder(fixtures::two_network_world())
        .deny_global()
        .deny(QueryScope::Global, Some(DetailLevel::Network), None, None, None)
        .build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    assert!(res.inventory.is_empty());
    assert_eq!(res.failures.len(), 1);
    assert_eq!(res.failures[0].scope, QueryScope::Global);
}

#[tokio::test]
async fn failed_station_enumeration_records_network_scope_and_continues() {
    let catalog = MockCatalog::builder(fixtures::two_network_world())
        .deny_global()
        .deny_network("IU")
        .deny(
            QueryScope::Network,
            Some(DetailLevel::Station),
            Some("IU"),
            None,
            None,
        )
        .build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    // IU could not be narrowed further; II was unaffected.
    assert_eq!(res.failures.len(), 1);
    assert_eq!(res.failures[0].scope, QueryScope::Network);
    assert_eq!(res.failures[0].network.as_deref(), Some("IU"));
    assert!(!res.inventory.networks.iter().any(|n| n.code == "IU"));
    assert!(res.inventory.networks.iter().any(|n| n.code == "II"));
}

#[tokio::test]
async fn malformed_spec_is_the_only_error() {
    let catalog = MockCatalog::builder(fixtures::two_network_world()).build();
    let mut spec = base_spec();
    spec.end = spec.start;

    let err = fetch_inventory(&catalog, &spec).await.unwrap_err();
    assert!(matches!(err, QuakeError::InvalidConfig(_)));
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn two_network_scenario_merges_broad_and_per_station_results() {
    // NET1 succeeds broadly; NET2 fails down to its stations, which all
    // succeed, so nothing reaches the failure log.
    let world = quakerun_core::Inventory {
        networks: vec![
            fixtures::network(
                "NET1",
                vec![fixtures::station("AAA", 10.0, 20.0), fixtures::station("BBB", 11.0, 21.0)],
            ),
            fixtures::network(
                "NET2",
                vec![fixtures::station("CCC", 12.0, 22.0), fixtures::station("DDD", 13.0, 23.0)],
            ),
        ],
    };
    let catalog = MockCatalog::builder(world)
        .deny_global()
        .deny_network("NET2")
        .build();

    let res = fetch_inventory(&catalog, &base_spec()).await.unwrap();

    assert!(res.failures.is_empty());
    let net1 = res
        .inventory
        .networks
        .iter()
        .find(|n| n.code == "NET1")
        .unwrap();
    assert_eq!(net1.stations.len(), 2);
    let net2 = res
        .inventory
        .networks
        .iter()
        .find(|n| n.code == "NET2")
        .unwrap();
    let codes: Vec<&str> = net2.stations.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["CCC", "DDD"]);
}
