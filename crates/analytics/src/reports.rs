use crate::engine::AnalyticsEngine;
use core_types::{Apartment, Customer, EngineError, Owner, Reservation};
use std::collections::{HashMap, HashSet};

/// Counts reservations per owner, by name.
///
/// Every owner who owns at least one apartment appears, with 0 when none of
/// their apartments has ever been reserved. Ordered by owner id.
pub fn count_reservations_per_owner(
    owners: &[Owner],
    ownership: &[(i32, i32)],
    reservations: &[Reservation],
) -> Vec<(String, i64)> {
    let owner_of: HashMap<i32, i32> = ownership
        .iter()
        .map(|&(owner_id, apartment_id)| (apartment_id, owner_id))
        .collect();

    let mut counts: HashMap<i32, i64> = HashMap::new();
    for &(owner_id, _) in ownership {
        counts.entry(owner_id).or_insert(0);
    }
    for r in reservations {
        if let Some(&owner_id) = owner_of.get(&r.apartment_id) {
            *counts.entry(owner_id).or_insert(0) += 1;
        }
    }

    owners
        .iter()
        .filter_map(|o| counts.get(&o.owner_id).map(|&n| (o.name.clone(), n)))
        .collect()
}

/// The customer with the most reservations, ties broken by lowest customer
/// id. `None` when no reservations exist at all.
pub fn top_customer_of(customers: &[Customer], reservations: &[Reservation]) -> Option<Customer> {
    let mut counts: HashMap<i32, i64> = HashMap::new();
    for r in reservations {
        *counts.entry(r.customer_id).or_insert(0) += 1;
    }

    customers
        .iter()
        .filter_map(|c| counts.get(&c.customer_id).map(|&n| (c, n)))
        // Strictly-greater keeps the first (lowest-id) customer among
        // equals, since the customer slice ascends by id.
        .fold(None::<(&Customer, i64)>, |best, (c, n)| match best {
            Some((_, best_n)) if n <= best_n => best,
            _ => Some((c, n)),
        })
        .map(|(c, _)| c.clone())
}

/// Owners who own an apartment in every distinct `(city, country)` location
/// on the marketplace. Empty when there are no apartments at all (covering
/// zero locations is not considered an achievement).
pub fn owners_covering_locations(
    owners: &[Owner],
    apartments: &[Apartment],
    ownership: &[(i32, i32)],
) -> Vec<Owner> {
    let all_locations: HashSet<(&str, &str)> = apartments
        .iter()
        .map(|a| (a.city.as_str(), a.country.as_str()))
        .collect();
    if all_locations.is_empty() {
        return Vec::new();
    }

    let location_of: HashMap<i32, (&str, &str)> = apartments
        .iter()
        .map(|a| (a.apartment_id, (a.city.as_str(), a.country.as_str())))
        .collect();

    let mut covered: HashMap<i32, HashSet<(&str, &str)>> = HashMap::new();
    for &(owner_id, apartment_id) in ownership {
        if let Some(&location) = location_of.get(&apartment_id) {
            covered.entry(owner_id).or_default().insert(location);
        }
    }

    owners
        .iter()
        .filter(|o| {
            covered
                .get(&o.owner_id)
                .is_some_and(|set| set.len() == all_locations.len())
        })
        .cloned()
        .collect()
}

impl AnalyticsEngine {
    /// Reservation volume per owner, for the ownership report.
    pub async fn reservation_count_per_owner(&self) -> Result<Vec<(String, i64)>, EngineError> {
        let owners = self.store.all_owners().await?;
        let ownership = self.store.ownership_pairs().await?;
        let reservations = self.store.all_reservations().await?;
        Ok(count_reservations_per_owner(&owners, &ownership, &reservations))
    }

    /// The most frequently booking customer, or `None` with no bookings.
    pub async fn top_customer(&self) -> Result<Option<Customer>, EngineError> {
        let customers = self.store.all_customers().await?;
        let reservations = self.store.all_reservations().await?;
        Ok(top_customer_of(&customers, &reservations))
    }

    /// Owners present in every city the marketplace operates in.
    pub async fn owners_in_all_cities(&self) -> Result<Vec<Owner>, EngineError> {
        let owners = self.store.all_owners().await?;
        let apartments = self.store.all_apartments().await?;
        let ownership = self.store.ownership_pairs().await?;
        Ok(owners_covering_locations(&owners, &apartments, &ownership))
    }
}
