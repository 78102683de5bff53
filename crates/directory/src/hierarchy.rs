//! Reporting-line integrity.

use std::collections::HashSet;

use worksphere_core::{DomainError, DomainResult, EmployeeId};

/// Reject a manager assignment that would create a reporting cycle.
///
/// Walks from `new_manager` up the chain using `manager_of`; reaching
/// `employee` means the assignment closes a loop. A lookup error aborts the
/// walk and is returned as is.
pub fn ensure_no_cycle<F>(employee: EmployeeId, new_manager: Option<EmployeeId>, mut manager_of: F) -> DomainResult<()>
where
    F: FnMut(EmployeeId) -> DomainResult<Option<EmployeeId>>,
{
    let Some(start) = new_manager else {
        return Ok(());
    };
    if start == employee {
        return Err(DomainError::invariant("an employee cannot manage themselves"));
    }

    let mut seen = HashSet::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if id == employee {
            return Err(DomainError::invariant(format!(
                "assigning manager {start} to employee {employee} would create a reporting cycle"
            )));
        }
        // Pre-existing loop above us; nothing we add can close it further.
        if !seen.insert(id) {
            break;
        }
        current = manager_of(id)?;
    }
    Ok(())
}
