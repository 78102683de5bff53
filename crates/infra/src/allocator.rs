//! Sequential `EMP###` allocation.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use worksphere_core::{DomainError, DomainResult};
use worksphere_directory::{Employee, EmployeeCode};

use crate::store::{EntityStore, StoreError};

/// Hands out employee codes strictly above every code ever seen.
///
/// The next number is `max(store maximum, high-water mark) + 1`, computed
/// and reserved under one mutex. The high-water mark only grows, so a code
/// is never reissued even after the employee holding the highest code is
/// deleted.
#[derive(Debug)]
pub struct EmployeeIdAllocator<S> {
    store: S,
    high_water: Mutex<u64>,
}

impl<S> EmployeeIdAllocator<S>
where
    S: EntityStore<Employee>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            high_water: Mutex::new(0),
        }
    }

    /// Fails only once the number space is exhausted; the high-water mark is
    /// left untouched in that case.
    pub fn next_employee_id(&self) -> DomainResult<EmployeeCode> {
        let mut high_water = self.high_water.lock().unwrap_or_else(PoisonError::into_inner);

        let stored = match self.indexed_max() {
            Ok(max) => max,
            Err(err) => {
                warn!(error = %err, "indexed max query failed; scanning employees");
                match self.scanned_max() {
                    Ok(max) => max,
                    Err(err) => {
                        warn!(error = %err, "employee scan failed; allocating from high-water mark");
                        0
                    }
                }
            }
        };

        let next = stored
            .max(*high_water)
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("employee code numbers are exhausted"))?;
        *high_water = next;
        debug!(next, "allocated employee code");
        Ok(EmployeeCode::from_number(next))
    }

    /// Raise the high-water mark past a code assigned outside the allocator
    /// (manual override).
    pub fn observe(&self, code: &EmployeeCode) {
        if let Some(n) = code.number() {
            let mut high_water = self.high_water.lock().unwrap_or_else(PoisonError::into_inner);
            *high_water = (*high_water).max(n);
        }
    }

    /// Maximum well-formed number via the store's indexed query.
    pub fn indexed_max(&self) -> Result<u64, StoreError> {
        Ok(self.store.max_by(&|e: &Employee| e.code.number())?.unwrap_or(0))
    }

    /// Maximum well-formed number via a full scan.
    pub fn scanned_max(&self) -> Result<u64, StoreError> {
        let employees = self.store.list()?;
        Ok(EmployeeCode::max_number(employees.iter().map(|e| &e.code)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use proptest::prelude::*;

    use worksphere_core::{EmployeeId, UserId};
    use worksphere_directory::{EmployeeProfile, NewEmployee};

    use super::*;
    use crate::store::InMemoryEntityStore;

    fn employee(user: u64, code: &str) -> Employee {
        Employee::new(
            NewEmployee {
                user_id: UserId::new(user),
                code: EmployeeCode::new(code).unwrap(),
                first_name: "First".to_string(),
                last_name: "Last".to_string(),
                email: format!("user{user}@example.com"),
                profile: EmployeeProfile::default(),
                manager_id: None,
                department_id: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    /// Store whose indexed query can be switched off.
    struct FlakyIndex {
        inner: InMemoryEntityStore<Employee>,
        index_down: AtomicBool,
    }

    impl EntityStore<Employee> for FlakyIndex {
        fn find(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
            self.inner.find(id)
        }
        fn save(&self, e: Employee) -> Result<Employee, StoreError> {
            self.inner.save(e)
        }
        fn delete(&self, id: EmployeeId) -> Result<bool, StoreError> {
            self.inner.delete(id)
        }
        fn list(&self) -> Result<Vec<Employee>, StoreError> {
            self.inner.list()
        }
        fn find_where(&self, p: &dyn Fn(&Employee) -> bool) -> Result<Vec<Employee>, StoreError> {
            self.inner.find_where(p)
        }
        fn max_by(&self, key: &dyn Fn(&Employee) -> Option<u64>) -> Result<Option<u64>, StoreError> {
            if self.index_down.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("index offline".to_string()))
            } else {
                self.inner.max_by(key)
            }
        }
    }

    fn seeded(codes: &[&str]) -> Arc<InMemoryEntityStore<Employee>> {
        let store = Arc::new(InMemoryEntityStore::new());
        for (i, code) in codes.iter().enumerate() {
            store.save(employee(i as u64 + 1, code)).unwrap();
        }
        store
    }

    #[test]
    fn empty_store_yields_emp001() {
        let alloc = EmployeeIdAllocator::new(seeded(&[]));
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP001");
    }

    #[test]
    fn continues_after_the_highest_code() {
        let alloc = EmployeeIdAllocator::new(seeded(&["EMP001", "EMP005", "EMP003", "LEGACY-9"]));
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP006");
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP007");
    }

    #[test]
    fn deleting_the_top_employee_does_not_cause_reuse() {
        let store = seeded(&["EMP001"]);
        let alloc = EmployeeIdAllocator::new(store.clone());
        let code = alloc.next_employee_id().unwrap();
        let saved = store.save(employee(50, code.as_str())).unwrap();
        store.delete(saved.id).unwrap();
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP003");
    }

    #[test]
    fn observed_override_is_skipped() {
        let alloc = EmployeeIdAllocator::new(seeded(&[]));
        alloc.observe(&EmployeeCode::new("EMP040").unwrap());
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP041");
    }

    #[test]
    fn exhausted_number_space_is_an_error_not_a_wrap() {
        let alloc = EmployeeIdAllocator::new(seeded(&[]));
        alloc.observe(&EmployeeCode::from_number(u64::MAX));
        let err = alloc.next_employee_id().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        // Still refuses; nothing was reserved.
        assert!(alloc.next_employee_id().is_err());
    }

    #[test]
    fn primary_and_fallback_paths_agree() {
        let store = FlakyIndex {
            inner: InMemoryEntityStore::new(),
            index_down: AtomicBool::new(false),
        };
        for (i, code) in ["EMP004", "EMP010", "EMP2", "EMP007"].iter().enumerate() {
            store.save(employee(i as u64 + 1, code)).unwrap();
        }
        let alloc = EmployeeIdAllocator::new(store);
        assert_eq!(alloc.indexed_max().unwrap(), alloc.scanned_max().unwrap());

        alloc.store.index_down.store(true, Ordering::SeqCst);
        assert!(alloc.indexed_max().is_err());
        assert_eq!(alloc.next_employee_id().unwrap().as_str(), "EMP011");
    }

    #[test]
    fn concurrent_allocation_never_duplicates() {
        let alloc = Arc::new(EmployeeIdAllocator::new(seeded(&["EMP001"])));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = alloc.clone();
                std::thread::spawn(move || (0..25).map(|_| alloc.next_employee_id().unwrap()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|c| c.number().unwrap())
            .collect();
        all.sort_unstable();
        let before = all.len();
        all.dedup();
        assert_eq!(all.len(), before);
        assert_eq!(all.first(), Some(&2));
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        /// Interleaving allocations with deletions keeps the sequence strictly increasing.
        #[test]
        fn sequence_is_strictly_increasing(ops in proptest::collection::vec(any::<bool>(), 1..30)) {
            let store = seeded(&[]);
            let alloc = EmployeeIdAllocator::new(store.clone());
            let mut last = 0;
            let mut user = 100;
            for delete_top in ops {
                if delete_top {
                    if let Some(top) = store.list().unwrap().into_iter().max_by_key(|e| e.code.number()) {
                        store.delete(top.id).unwrap();
                    }
                }
                let code = alloc.next_employee_id().unwrap();
                let n = code.number().unwrap();
                prop_assert!(n > last);
                last = n;
                user += 1;
                store.save(employee(user, code.as_str())).unwrap();
            }
        }
    }
}
