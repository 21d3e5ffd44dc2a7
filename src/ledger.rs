// 📒 Parking Ledger - Vehicle lifecycle over an injected store
//
// Every operation loads map + registry, decides on local copies, then writes
// both back with a single commit. Failures return before the commit, so the
// stored state is never partially updated.
//
// Lifecycle per vehicle: parked <-> unparked, forever. Records are never removed.

use crate::error::{LedgerError, LedgerResult};
use crate::fees::FeeCalculator;
use crate::model::{NewVehicle, ParkingMap, SizeClass, SlotCoord, Vehicle, VehicleStatus};
use crate::slots::find_nearest;
use crate::store::{Event, ParkingStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

// ============================================================================
// REQUESTS & OUTCOMES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParkRequest {
    /// First park: a new record is created
    New(NewVehicle),

    /// Re-park an existing record by id
    Existing(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParkOutcome {
    /// Vehicle now occupies a slot; `vehicles` is the updated registry
    Parked { vehicle: Vehicle, vehicles: Vec<Vehicle> },

    /// Nothing changed, the vehicle was already parked
    AlreadyParked(Vehicle),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnparkOutcome {
    Unparked(Receipt),

    /// Nothing changed, the vehicle was already unparked
    AlreadyUnparked(Vehicle),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub vehicle: Vehicle,
    pub elapsed_units: u64,
    pub fee: u64,
}

// ============================================================================
// LEDGER
// ============================================================================

pub struct ParkingLedger<S: ParkingStore> {
    store: S,
    fees: FeeCalculator,
}

impl<S: ParkingStore> ParkingLedger<S> {
    pub fn new(store: S, fees: FeeCalculator) -> Self {
        ParkingLedger { store, fees }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fees(&self) -> &FeeCalculator {
        &self.fees
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn map(&self) -> LedgerResult<ParkingMap> {
        self.store
            .get_map()?
            .ok_or_else(|| LedgerError::PreconditionFailed("provide a map first".to_string()))
    }

    pub fn vehicles(&self) -> LedgerResult<Vec<Vehicle>> {
        Ok(self.store.get_vehicles()?)
    }

    pub fn vehicle(&self, id: u64) -> LedgerResult<Vehicle> {
        self.store
            .get_vehicles()?
            .into_iter()
            .find(|v| v.id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    // ------------------------------------------------------------------------
    // Map
    // ------------------------------------------------------------------------

    /// Replace the map and reset the registry to empty
    pub fn set_map(&mut self, map: ParkingMap) -> LedgerResult<ParkingMap> {
        self.set_map_at(map, Utc::now())
    }

    pub fn set_map_at(&mut self, mut map: ParkingMap, now: DateTime<Utc>) -> LedgerResult<ParkingMap> {
        map.validate()?;
        // Occupants would reference vehicles that no longer exist
        map.clear_occupants();

        self.store.commit(&map, &[])?;

        let slots = map.iter().count();
        info!(entrances = map.entrances().len(), slots, "parking map set, registry reset");
        self.record(Event::new(
            "map_set",
            "map",
            json!({ "entrances": map.entrances().len(), "slots": slots }),
            now,
        ));

        Ok(map)
    }

    // ------------------------------------------------------------------------
    // Park
    // ------------------------------------------------------------------------

    pub fn park(&mut self, request: ParkRequest) -> LedgerResult<ParkOutcome> {
        self.park_at(request, Utc::now())
    }

    pub fn park_at(&mut self, request: ParkRequest, now: DateTime<Utc>) -> LedgerResult<ParkOutcome> {
        match request {
            ParkRequest::New(spec) => self.park_new(spec, now),
            ParkRequest::Existing(id) => self.repark(id, now),
        }
    }

    fn park_new(&mut self, spec: NewVehicle, now: DateTime<Utc>) -> LedgerResult<ParkOutcome> {
        let size = SizeClass::try_from(spec.size).map_err(LedgerError::InvalidInput)?;
        let (mut map, mut vehicles) = self.load()?;

        let id = next_id(&vehicles);
        let found = find_nearest(&map, size).ok_or(LedgerError::NoAvailableSlot { size })?;
        occupy(&mut map, found.coord(), id)?;

        let vehicle = Vehicle::new(id, spec.name, size, found.coord(), now);
        vehicles.push(vehicle.clone());

        self.store.commit(&map, &vehicles)?;

        info!(
            vehicle_id = id,
            size = %size,
            entrance = found.entrance,
            slot = found.slot,
            distance = found.distance,
            "vehicle parked"
        );
        self.record(Event::new(
            "vehicle_parked",
            &vehicle_entity(id),
            json!({ "name": vehicle.name, "size": size, "parkedAt": found.coord() }),
            now,
        ));

        Ok(ParkOutcome::Parked { vehicle, vehicles })
    }

    fn repark(&mut self, id: u64, now: DateTime<Utc>) -> LedgerResult<ParkOutcome> {
        let (mut map, mut vehicles) = self.load()?;

        let vehicle = vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if vehicle.is_parked() {
            debug!(vehicle_id = id, "vehicle already parked");
            return Ok(ParkOutcome::AlreadyParked(vehicle.clone()));
        }

        let unparked_at = vehicle.unpark_time.ok_or_else(|| {
            LedgerError::Inconsistent(format!("vehicle {} is unparked but has no unpark time", id))
        })?;

        let found = find_nearest(&map, vehicle.size).ok_or(LedgerError::NoAvailableSlot { size: vehicle.size })?;

        // Short gaps count as continuous parking
        let idle_units = self.fees.elapsed_units(unparked_at, now);
        let continued = idle_units <= 1;
        if !continued {
            vehicle.park_time = now;
        }

        vehicle.status = VehicleStatus::Parked;
        vehicle.unpark_time = None;
        vehicle.parked_at = Some(found.coord());
        let vehicle = vehicle.clone();

        occupy(&mut map, found.coord(), id)?;
        self.store.commit(&map, &vehicles)?;

        info!(
            vehicle_id = id,
            idle_units,
            continued,
            entrance = found.entrance,
            slot = found.slot,
            "vehicle re-parked"
        );
        self.record(Event::new(
            "vehicle_reparked",
            &vehicle_entity(id),
            json!({ "idleUnits": idle_units, "continued": continued, "parkedAt": found.coord() }),
            now,
        ));

        Ok(ParkOutcome::Parked { vehicle, vehicles })
    }

    // ------------------------------------------------------------------------
    // Unpark
    // ------------------------------------------------------------------------

    pub fn unpark(&mut self, id: u64) -> LedgerResult<UnparkOutcome> {
        self.unpark_at(id, Utc::now())
    }

    pub fn unpark_at(&mut self, id: u64, now: DateTime<Utc>) -> LedgerResult<UnparkOutcome> {
        let (mut map, mut vehicles) = self.load()?;

        let vehicle = vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if !vehicle.is_parked() {
            debug!(vehicle_id = id, "vehicle already unparked");
            return Ok(UnparkOutcome::AlreadyUnparked(vehicle.clone()));
        }

        let coord = vehicle.parked_at.ok_or_else(|| {
            LedgerError::Inconsistent(format!("vehicle {} is parked but has no slot", id))
        })?;
        release(&mut map, coord, id)?;

        vehicle.status = VehicleStatus::Unparked;
        vehicle.unpark_time = Some(now);
        vehicle.parked_at = None;

        let charge = self.fees.compute_fee(vehicle.park_time, now, vehicle.size);
        let receipt = Receipt {
            vehicle: vehicle.clone(),
            elapsed_units: charge.elapsed_units,
            fee: charge.fee,
        };

        self.store.commit(&map, &vehicles)?;

        info!(
            vehicle_id = id,
            elapsed_units = charge.elapsed_units,
            fee = charge.fee,
            "vehicle unparked"
        );
        self.record(Event::new(
            "vehicle_unparked",
            &vehicle_entity(id),
            json!({ "freed": coord, "elapsedUnits": charge.elapsed_units, "fee": charge.fee }),
            now,
        ));

        Ok(UnparkOutcome::Unparked(receipt))
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn load(&self) -> LedgerResult<(ParkingMap, Vec<Vehicle>)> {
        let map = self.map()?;
        let vehicles = self.store.get_vehicles()?;
        Ok((map, vehicles))
    }

    /// The state is already committed; a lost audit entry is only logged
    fn record(&mut self, event: Event) {
        if let Err(e) = self.store.append_event(&event) {
            warn!(event_type = %event.event_type, error = %e, "failed to record audit event");
        }
    }
}

fn next_id(vehicles: &[Vehicle]) -> u64 {
    vehicles.iter().map(|v| v.id + 1).max().unwrap_or(0)
}

fn vehicle_entity(id: u64) -> String {
    format!("vehicle:{}", id)
}

fn occupy(map: &mut ParkingMap, coord: SlotCoord, id: u64) -> LedgerResult<()> {
    let slot = map
        .slot_mut(coord)
        .ok_or_else(|| LedgerError::Inconsistent(format!("slot {} is outside the map", coord)))?;
    slot.occupant = Some(id);
    Ok(())
}

fn release(map: &mut ParkingMap, coord: SlotCoord, id: u64) -> LedgerResult<()> {
    let slot = map
        .slot_mut(coord)
        .ok_or_else(|| LedgerError::Inconsistent(format!("slot {} is outside the map", coord)))?;

    if slot.occupant != Some(id) {
        return Err(LedgerError::Inconsistent(format!(
            "slot {} is held by {:?}, not vehicle {}",
            coord, slot.occupant, id
        )));
    }

    slot.occupant = None;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::fees::FeeSchedule;
    use crate::model::Slot;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    // 1 unit = 10 seconds
    fn ledger() -> ParkingLedger<MemoryStore> {
        ParkingLedger::new(MemoryStore::new(), FeeCalculator::new(FeeSchedule::with_unit_seconds(10)))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn units(n: i64) -> Duration {
        Duration::seconds(n * 10)
    }

    fn test_map() -> ParkingMap {
        ParkingMap::new(vec![
            vec![Slot::new(SizeClass::Small, 1.0), Slot::new(SizeClass::Large, 4.0)],
            vec![Slot::new(SizeClass::Medium, 2.0)],
            vec![Slot::new(SizeClass::Large, 3.0)],
        ])
        .unwrap()
    }

    fn new_vehicle(name: &str, size: u8) -> ParkRequest {
        ParkRequest::New(NewVehicle::new(name, size))
    }

    fn expect_parked(outcome: ParkOutcome) -> (Vehicle, Vec<Vehicle>) {
        match outcome {
            ParkOutcome::Parked { vehicle, vehicles } => (vehicle, vehicles),
            other => panic!("expected Parked, got {:?}", other),
        }
    }

    fn expect_receipt(outcome: UnparkOutcome) -> Receipt {
        match outcome {
            UnparkOutcome::Unparked(receipt) => receipt,
            other => panic!("expected Unparked, got {:?}", other),
        }
    }

    #[test]
    fn test_park_requires_map() {
        let mut ledger = ledger();
        let result = ledger.park_at(new_vehicle("a", 0), t0());
        assert!(matches!(result, Err(LedgerError::PreconditionFailed(_))));
        assert!(matches!(ledger.map(), Err(LedgerError::PreconditionFailed(_))));
        assert!(matches!(ledger.unpark_at(0, t0()), Err(LedgerError::PreconditionFailed(_))));
    }

    #[test]
    fn test_size_checked_before_map() {
        let mut ledger = ledger();
        let result = ledger.park_at(new_vehicle("tank", 3), t0());
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn test_park_assigns_nearest_slot_and_sequential_ids() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();

        let (first, _) = expect_parked(ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap());
        assert_eq!(first.id, 0);
        assert_eq!(first.status, VehicleStatus::Parked);
        assert_eq!(first.park_time, t0());
        assert_eq!(first.parked_at, Some(SlotCoord { entrance: 0, slot: 0 }));

        let (second, vehicles) = expect_parked(ledger.park_at(new_vehicle("van", 1), t0()).unwrap());
        assert_eq!(second.id, 1);
        assert_eq!(second.parked_at, Some(SlotCoord { entrance: 1, slot: 0 }));
        assert_eq!(vehicles.len(), 2);

        let (third, _) = expect_parked(ledger.park_at(new_vehicle("bus", 2), t0()).unwrap());
        assert_eq!(third.id, 2);
        assert_eq!(third.parked_at, Some(SlotCoord { entrance: 2, slot: 0 }));

        let map = ledger.map().unwrap();
        assert_eq!(map.slot(SlotCoord { entrance: 0, slot: 0 }).unwrap().occupant, Some(0));
        assert_eq!(map.slot(SlotCoord { entrance: 1, slot: 0 }).unwrap().occupant, Some(1));
        assert_eq!(map.slot(SlotCoord { entrance: 2, slot: 0 }).unwrap().occupant, Some(2));
    }

    #[test]
    fn test_park_rejects_oversized_vehicle() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();

        let result = ledger.park_at(new_vehicle("tank", 3), t0());
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        assert!(ledger.vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_no_available_slot_leaves_state_unchanged() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();

        ledger.park_at(new_vehicle("bus1", 2), t0()).unwrap();
        ledger.park_at(new_vehicle("bus2", 2), t0()).unwrap();

        let map_before = ledger.map().unwrap();
        let vehicles_before = ledger.vehicles().unwrap();

        let result = ledger.park_at(new_vehicle("bus3", 2), t0());
        assert!(matches!(
            result,
            Err(LedgerError::NoAvailableSlot { size: SizeClass::Large })
        ));

        assert_eq!(ledger.map().unwrap(), map_before);
        assert_eq!(ledger.vehicles().unwrap(), vehicles_before);
    }

    #[test]
    fn test_immediate_unpark_charges_flat_rate() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();

        let receipt = expect_receipt(ledger.unpark_at(0, t0()).unwrap());
        assert_eq!(receipt.elapsed_units, 0);
        assert_eq!(receipt.fee, 40);
        assert_eq!(receipt.vehicle.status, VehicleStatus::Unparked);
        assert_eq!(receipt.vehicle.unpark_time, Some(t0()));
        assert_eq!(receipt.vehicle.parked_at, None);

        let map = ledger.map().unwrap();
        assert!(map.slot(SlotCoord { entrance: 0, slot: 0 }).unwrap().is_free());
        assert_eq!(ledger.vehicle(0).unwrap(), receipt.vehicle);
    }

    #[test]
    fn test_unpark_bills_by_size() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("bus", 2), t0()).unwrap();

        let receipt = expect_receipt(ledger.unpark_at(0, t0() + units(26)).unwrap());
        assert_eq!(receipt.elapsed_units, 26);
        assert_eq!(receipt.fee, 5040);
        assert_eq!(receipt.fee, ledger.fees().fee_for_units(26, SizeClass::Large));
        assert_eq!(ledger.fees().schedule().unit_seconds, 10);
    }

    #[test]
    fn test_unpark_unknown_and_twice() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();

        assert!(matches!(ledger.unpark_at(9, t0()), Err(LedgerError::NotFound(9))));

        expect_receipt(ledger.unpark_at(0, t0() + units(5)).unwrap());
        let vehicles_before = ledger.vehicles().unwrap();

        match ledger.unpark_at(0, t0() + units(8)).unwrap() {
            UnparkOutcome::AlreadyUnparked(vehicle) => assert_eq!(vehicle.unpark_time, Some(t0() + units(5))),
            other => panic!("expected AlreadyUnparked, got {:?}", other),
        }
        assert_eq!(ledger.vehicles().unwrap(), vehicles_before);
    }

    #[test]
    fn test_repark_already_parked_is_noop() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();

        let outcome = ledger.park_at(ParkRequest::Existing(0), t0() + units(1)).unwrap();
        assert!(matches!(outcome, ParkOutcome::AlreadyParked(ref v) if v.id == 0));
        assert_eq!(ledger.vehicles().unwrap().len(), 1);

        assert!(matches!(
            ledger.park_at(ParkRequest::Existing(5), t0()),
            Err(LedgerError::NotFound(5))
        ));
    }

    #[test]
    fn test_repark_after_short_gap_keeps_park_time() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();
        ledger.unpark_at(0, t0() + units(4)).unwrap();

        let reparked_at = t0() + units(4) + Duration::seconds(5);
        let (vehicle, vehicles) = expect_parked(ledger.park_at(ParkRequest::Existing(0), reparked_at).unwrap());
        assert_eq!(vehicle.id, 0);
        assert_eq!(vehicle.status, VehicleStatus::Parked);
        assert_eq!(vehicle.park_time, t0());
        assert_eq!(vehicle.unpark_time, None);
        assert_eq!(vehicle.parked_at, Some(SlotCoord { entrance: 0, slot: 0 }));
        assert_eq!(vehicles.len(), 1);

        // Billing covers the whole span since the original park
        let receipt = expect_receipt(ledger.unpark_at(0, t0() + units(6)).unwrap());
        assert_eq!(receipt.elapsed_units, 6);
        assert_eq!(receipt.fee, 40 + 20 * 3);
    }

    #[test]
    fn test_repark_after_long_gap_resets_park_time() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();
        ledger.unpark_at(0, t0() + units(4)).unwrap();

        let reparked_at = t0() + units(10);
        let (vehicle, _) = expect_parked(ledger.park_at(ParkRequest::Existing(0), reparked_at).unwrap());
        assert_eq!(vehicle.park_time, reparked_at);

        let receipt = expect_receipt(ledger.unpark_at(0, reparked_at + units(2)).unwrap());
        assert_eq!(receipt.elapsed_units, 2);
        assert_eq!(receipt.fee, 40);
    }

    #[test]
    fn test_repark_without_slot_leaves_vehicle_unparked() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("bus1", 2), t0()).unwrap();
        ledger.unpark_at(0, t0() + units(1)).unwrap();
        ledger.park_at(new_vehicle("bus2", 2), t0() + units(2)).unwrap();
        ledger.park_at(new_vehicle("bus3", 2), t0() + units(2)).unwrap();

        let vehicles_before = ledger.vehicles().unwrap();
        let result = ledger.park_at(ParkRequest::Existing(0), t0() + units(3));
        assert!(matches!(result, Err(LedgerError::NoAvailableSlot { .. })));
        assert_eq!(ledger.vehicles().unwrap(), vehicles_before);
        assert_eq!(ledger.vehicle(0).unwrap().status, VehicleStatus::Unparked);
    }

    #[test]
    fn test_set_map_resets_registry() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();
        assert_eq!(ledger.vehicles().unwrap().len(), 1);

        let mut incoming = test_map();
        incoming.slot_mut(SlotCoord { entrance: 1, slot: 0 }).unwrap().occupant = Some(42);

        let stored = ledger.set_map_at(incoming, t0()).unwrap();
        assert!(stored.iter().all(|(_, slot)| slot.is_free()));
        assert!(ledger.vehicles().unwrap().is_empty());

        let (vehicle, _) = expect_parked(ledger.park_at(new_vehicle("van", 1), t0()).unwrap());
        assert_eq!(vehicle.id, 0);
    }

    #[test]
    fn test_occupants_match_parked_vehicles() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("a", 0), t0()).unwrap();
        ledger.park_at(new_vehicle("b", 0), t0()).unwrap();
        ledger.park_at(new_vehicle("c", 1), t0()).unwrap();
        ledger.unpark_at(1, t0() + units(3)).unwrap();
        ledger.park_at(ParkRequest::Existing(1), t0() + units(20)).unwrap();
        ledger.unpark_at(0, t0() + units(21)).unwrap();

        let map = ledger.map().unwrap();
        let vehicles = ledger.vehicles().unwrap();

        for (coord, slot) in map.iter() {
            if let Some(id) = slot.occupant {
                let vehicle = vehicles.iter().find(|v| v.id == id).unwrap();
                assert_eq!(vehicle.parked_at, Some(coord));
            }
        }
        for vehicle in &vehicles {
            match vehicle.status {
                VehicleStatus::Parked => {
                    assert!(vehicle.parked_at.is_some());
                    assert!(vehicle.unpark_time.is_none());
                }
                VehicleStatus::Unparked => {
                    assert!(vehicle.parked_at.is_none());
                    assert!(vehicle.unpark_time.is_some());
                }
            }
        }
    }

    #[test]
    fn test_events_recorded() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();
        ledger.unpark_at(0, t0() + units(5)).unwrap();
        ledger.park_at(ParkRequest::Existing(0), t0() + units(9)).unwrap();

        let types: Vec<&str> = ledger.store().events().iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["map_set", "vehicle_parked", "vehicle_unparked", "vehicle_reparked"]);

        let unparked = &ledger.store().events()[2];
        assert_eq!(unparked.entity_id, "vehicle:0");
        assert_eq!(unparked.data["fee"], 80);
    }

    #[test]
    fn test_ledger_over_sqlite() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut ledger = ParkingLedger::new(store, FeeCalculator::default());

        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("van", 1), t0()).unwrap();
        let receipt = expect_receipt(ledger.unpark_at(0, t0() + Duration::hours(5)).unwrap());

        assert_eq!(receipt.elapsed_units, 5);
        assert_eq!(receipt.fee, 40 + 60 * 2);
        assert_eq!(ledger.vehicle(0).unwrap().status, VehicleStatus::Unparked);
        assert_eq!(ledger.store().get_events(Some("vehicle:0")).unwrap().len(), 2);
    }

    #[test]
    fn test_receipt_json_shape() {
        let mut ledger = ledger();
        ledger.set_map_at(test_map(), t0()).unwrap();
        ledger.park_at(new_vehicle("scooter", 0), t0()).unwrap();
        let receipt = expect_receipt(ledger.unpark_at(0, t0()).unwrap());

        let value = serde_json::to_value(&receipt).unwrap();
        assert_eq!(value["elapsedUnits"], 0);
        assert_eq!(value["fee"], 40);
        assert_eq!(value["vehicle"]["status"], "unparked");
    }
}
