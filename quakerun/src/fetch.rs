use quakerun_core::{
    CatalogClient, DetailLevel, FailureRecord, FetchResult, Inventory, QuakeError, QueryScope,
    QuerySpec, merge_inventory,
};

/// Fetch the inventory for `base`, degrading to narrower queries on failure.
///
/// One Global-scope query is attempted first; when it succeeds the result is
/// returned after exactly one client call with an empty failure log. When it
/// fails, candidate networks are enumerated and each is queried on its own,
/// falling back through stations to individual channels. A query that fails
/// where no finer fallback exists is recorded as a [`FailureRecord`] and its
/// subtree is dropped; the enclosing loops always continue, so every sibling
/// is exhausted before the cascade moves on.
///
/// Processing order follows the catalog's enumeration order and is preserved
/// in the merged inventory; it has no semantic weight beyond determinism.
///
/// # Errors
/// Only a malformed `base` spec fails the call. Partial failure never does:
/// it degrades into failure records inside the returned [`FetchResult`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, fields(source = client.name()))
)]
pub async fn fetch_inventory(
    client: &dyn CatalogClient,
    base: &QuerySpec,
) -> Result<FetchResult, QuakeError> {
    base.validate()?;

    // First, try to get everything in one query.
    if let Ok(inventory) = client.query(base).await {
        return Ok(FetchResult {
            source: client.name().to_string(),
            inventory,
            failures: vec![],
        });
    }

    let mut inventory = Inventory::new();
    let mut failures: Vec<FailureRecord> = vec![];

    // The broad query failed; enumerate candidate networks (names only) and
    // retry network by network. If even the enumeration fails there is
    // nothing left to narrow, so the whole source degrades to one record.
    let nets_spec = base.narrow(QueryScope::Global, DetailLevel::Network, None, None, None);
    let nets = match client.query(&nets_spec).await {
        Ok(inv) => inv,
        Err(e) => {
            failures.push(record(QueryScope::Global, None, None, None, &e));
            return Ok(FetchResult {
                source: client.name().to_string(),
                inventory,
                failures,
            });
        }
    };

    for net in &nets.networks {
        let net_spec = base.narrow(
            QueryScope::Network,
            DetailLevel::Response,
            Some(&net.code),
            None,
            None,
        );
        if let Ok(inv) = client.query(&net_spec).await {
            merge_inventory(&mut inventory, inv);
            continue;
        }

        // ... by station
        let stas_spec = base.narrow(
            QueryScope::Network,
            DetailLevel::Station,
            Some(&net.code),
            None,
            None,
        );
        let stas = match client.query(&stas_spec).await {
            Ok(inv) => inv,
            Err(e) => {
                failures.push(record(QueryScope::Network, Some(&net.code), None, None, &e));
                continue;
            }
        };

        for sta in stas.networks.iter().flat_map(|n| &n.stations) {
            let sta_spec = base.narrow(
                QueryScope::Station,
                DetailLevel::Response,
                Some(&net.code),
                Some(&sta.code),
                None,
            );
            if let Ok(inv) = client.query(&sta_spec).await {
                merge_inventory(&mut inventory, inv);
                continue;
            }

            // ... by channel
            let chas_spec = base.narrow(
                QueryScope::Station,
                DetailLevel::Channel,
                Some(&net.code),
                Some(&sta.code),
                None,
            );
            let chas = match client.query(&chas_spec).await {
                Ok(inv) => inv,
                Err(e) => {
                    failures.push(record(
                        QueryScope::Station,
                        Some(&net.code),
                        Some(&sta.code),
                        None,
                        &e,
                    ));
                    continue;
                }
            };

            for cha in chas
                .networks
                .iter()
                .flat_map(|n| &n.stations)
                .flat_map(|s| &s.channels)
            {
                let cha_spec = base.narrow(
                    QueryScope::Channel,
                    DetailLevel::Response,
                    Some(&net.code),
                    Some(&sta.code),
                    Some(&cha.code),
                );
                match client.query(&cha_spec).await {
                    Ok(inv) => merge_inventory(&mut inventory, inv),
                    Err(e) => {
                        // Skip the channel; its siblings are unaffected.
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            network = %net.code,
                            station = %sta.code,
                            channel = %cha.code,
                            "dropping channel after exhausting fallback"
                        );
                        failures.push(record(
                            QueryScope::Channel,
                            Some(&net.code),
                            Some(&sta.code),
                            Some(&cha.code),
                            &e,
                        ));
                    }
                }
            }
        }
    }

    Ok(FetchResult {
        source: client.name().to_string(),
        inventory,
        failures,
    })
}

fn record(
    scope: QueryScope,
    network: Option<&str>,
    station: Option<&str>,
    channel: Option<&str>,
    err: &QuakeError,
) -> FailureRecord {
    FailureRecord {
        scope,
        network: network.map(str::to_string),
        station: station.map(str::to_string),
        channel: channel.map(str::to_string),
        reason: err.to_string(),
    }
}
