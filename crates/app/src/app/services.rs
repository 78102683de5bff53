use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use worksphere_auth::{PasswordHasher, User};
use worksphere_core::{DomainError, DomainResult, EmployeeId, EntityKind};
use worksphere_directory::{Department, Employee};
use worksphere_events::{EventEnvelope, InMemoryEventBus};
use worksphere_feedback::PerformanceFeedback;
use worksphere_infra::{
    BcryptHasher, BusNotifier, Config, EmployeeIdAllocator, EntityStore, InMemoryEntityStore, Notification,
    Notifier, StoreError,
};
use worksphere_leave::LeaveRequest;
use worksphere_staffing::Project;

/// Bus carrying notification envelopes in the single-process wiring.
pub type NotificationBus = Arc<InMemoryEventBus<EventEnvelope<Notification>>>;

type EmployeeStore = Arc<dyn EntityStore<Employee>>;

/// Allocation attempts before a persistent code collision is reported.
const MAX_CODE_ATTEMPTS: usize = 3;

/// One store per entity.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn EntityStore<User>>,
    pub employees: EmployeeStore,
    pub departments: Arc<dyn EntityStore<Department>>,
    pub projects: Arc<dyn EntityStore<Project>>,
    pub leaves: Arc<dyn EntityStore<LeaveRequest>>,
    pub feedback: Arc<dyn EntityStore<PerformanceFeedback>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryEntityStore::<User>::new()),
            employees: Arc::new(InMemoryEntityStore::<Employee>::new()),
            departments: Arc::new(InMemoryEntityStore::<Department>::new()),
            projects: Arc::new(InMemoryEntityStore::<Project>::new()),
            leaves: Arc::new(InMemoryEntityStore::<LeaveRequest>::new()),
            feedback: Arc::new(InMemoryEntityStore::<PerformanceFeedback>::new()),
        }
    }
}

/// Behavioural settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub default_employee_password: String,
    pub seed_departments: bool,
    pub recent_employees_limit: usize,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            admin_username: config.admin_username.clone(),
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            default_employee_password: config.default_employee_password.clone(),
            seed_departments: config.seed_departments,
            recent_employees_limit: config.recent_employees_limit,
        }
    }
}

#[derive(Clone)]
pub struct Services {
    pub(crate) stores: Stores,
    pub(crate) allocator: Arc<EmployeeIdAllocator<EmployeeStore>>,
    pub(crate) hasher: Arc<dyn PasswordHasher>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) settings: Settings,
}

impl Services {
    pub fn new(
        stores: Stores,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn Notifier>,
        settings: Settings,
    ) -> Self {
        let allocator = Arc::new(EmployeeIdAllocator::new(stores.employees.clone()));
        Self {
            stores,
            allocator,
            hasher,
            notifier,
            settings,
        }
    }

    /// Single-process wiring: in-memory stores, bcrypt, notifications on an
    /// in-memory bus (returned so callers can subscribe).
    pub fn in_memory(config: &Config) -> (Self, NotificationBus) {
        let bus: NotificationBus = Arc::new(InMemoryEventBus::new());
        let services = Self::new(
            Stores::in_memory(),
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            Arc::new(BusNotifier::new(bus.clone())),
            Settings::from(config),
        );
        (services, bus)
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn allocator(&self) -> &EmployeeIdAllocator<EmployeeStore> {
        &self.allocator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ─────────────────────────────────────────────────────────────────────
    // Shared lookups
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub(crate) fn employee(&self, id: EmployeeId) -> DomainResult<Employee> {
        self.stores
            .employees
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::Employee))
    }

    pub(crate) fn manager(&self, id: EmployeeId) -> DomainResult<Employee> {
        self.stores
            .employees
            .find(id)?
            .ok_or(DomainError::NotFound(EntityKind::Manager))
    }

    pub(crate) fn full_name_of(&self, id: EmployeeId) -> DomainResult<Option<String>> {
        Ok(self.stores.employees.find(id)?.map(|e| e.full_name()))
    }

    /// Persist a new employee, drawing codes from the allocator until one is
    /// free.
    pub(crate) fn insert_employee(&self, mut employee: Employee) -> DomainResult<Employee> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            employee.code = self.allocator.next_employee_id()?;
            match self.stores.employees.save(employee.clone()) {
                Ok(saved) => return Ok(saved),
                Err(StoreError::UniqueViolation { field: "code", value, .. }) => {
                    warn!(attempt, code = %value, "employee code already taken; reallocating");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(DomainError::conflict(format!(
            "could not allocate a free employee code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    pub(crate) fn publish(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}
