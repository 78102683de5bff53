//! Account operations. These run before a principal exists, so they take no
//! [`RequestContext`](crate::RequestContext).

use tracing::{info, warn};

use worksphere_auth::{NewUser, PasswordHasher, Role, User};
use worksphere_core::{DomainError, DomainResult, EntityKind};
use worksphere_directory::{Department, DepartmentInput, Employee, EmployeeCode, EmployeeProfile, NewEmployee};
use worksphere_infra::EntityStore;

use crate::app::dto::{AccountView, SeedReport, SignupRequest};
use crate::app::services::Services;

const DEFAULT_DEPARTMENTS: [(&str, &str, &str); 4] = [
    ("Engineering", "ENG", "Software development and engineering"),
    ("Human Resources", "HR", "People operations and recruitment"),
    ("Marketing", "MKT", "Marketing and communications"),
    ("Finance", "FIN", "Finance and accounting"),
];

impl Services {
    /// Register an account. The email doubles as the username; every role but
    /// ADMIN also gets an employee profile with the next free code.
    pub fn signup(&self, req: SignupRequest) -> DomainResult<AccountView> {
        let role: Role = req.role.parse()?;
        let email = req.email.trim().to_ascii_lowercase();
        if self.find_user(&email)?.is_some() {
            return Err(DomainError::conflict("email already exists"));
        }

        let hash = self.hasher.hash(&req.password)?;
        let user = User::new(
            NewUser {
                username: email.clone(),
                email,
                password_hash: hash,
                first_name: req.first_name,
                last_name: req.last_name,
                role,
            },
            Self::now(),
        )?;
        let user = self.stores.users.save(user)?;

        if role.has_employee_profile() {
            let employee = Employee::new(
                NewEmployee {
                    user_id: user.id,
                    code: EmployeeCode::from_number(0),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    profile: EmployeeProfile::default(),
                    manager_id: None,
                    department_id: None,
                },
                Self::now(),
            )
            .and_then(|e| self.insert_employee(e));
            if let Err(err) = employee {
                if let Err(cleanup) = self.stores.users.delete(user.id) {
                    warn!(user_id = %user.id, error = %cleanup, "failed to roll back account");
                }
                return Err(err);
            }
        }

        info!(username = %user.username, %role, "account registered");
        self.account_view(user)
    }

    /// Account summary for an authenticated username (or email).
    pub fn login_profile(&self, username: &str) -> DomainResult<AccountView> {
        let user = self
            .find_user(username)?
            .ok_or(DomainError::NotFound(EntityKind::User))?;
        self.account_view(user)
    }

    /// Check a password and return the account summary. Unknown accounts and
    /// wrong passwords are indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> DomainResult<AccountView> {
        let bad_credentials = || DomainError::forbidden("bad credentials");
        let user = self.find_user(username)?.ok_or_else(bad_credentials)?;
        if !user.enabled || !self.hasher.verify(password, &user.password_hash)? {
            return Err(bad_credentials());
        }
        self.account_view(user)
    }

    /// Bootstrap data: the admin account if absent and, when enabled and no
    /// department exists yet, the default departments. Safe to run repeatedly.
    pub fn seed(&self) -> DomainResult<SeedReport> {
        let mut report = SeedReport::default();

        if self.find_user(&self.settings.admin_username)?.is_none() {
            let hash = self.hasher.hash(&self.settings.admin_password)?;
            let admin = User::new(
                NewUser {
                    username: self.settings.admin_username.clone(),
                    email: self.settings.admin_email.clone(),
                    password_hash: hash,
                    first_name: "System".to_string(),
                    last_name: "Administrator".to_string(),
                    role: Role::Admin,
                },
                Self::now(),
            )?;
            self.stores.users.save(admin)?;
            report.admin_created = true;
            info!(username = %self.settings.admin_username, "admin account created");
        }

        if self.settings.seed_departments && self.stores.departments.list()?.is_empty() {
            for (name, code, description) in DEFAULT_DEPARTMENTS {
                let input = DepartmentInput::new(name, code).with_description(description);
                self.stores.departments.save(Department::new(input, Self::now())?)?;
                report.departments_created += 1;
            }
            info!(count = report.departments_created, "default departments created");
        }

        Ok(report)
    }

    /// Account by username, or by email when no username matches.
    fn find_user(&self, login: &str) -> DomainResult<Option<User>> {
        let wanted = login.trim().to_ascii_lowercase();
        let by_username = self
            .stores
            .users
            .find_one(&|u: &User| u.username.to_ascii_lowercase() == wanted)?;
        if by_username.is_some() {
            return Ok(by_username);
        }
        Ok(self.stores.users.find_one(&|u: &User| u.email == wanted)?)
    }

    fn account_view(&self, user: User) -> DomainResult<AccountView> {
        let user_id = user.id;
        let employee = self.stores.employees.find_one(&|e: &Employee| e.user_id == user_id)?;
        Ok(AccountView {
            full_name: user.full_name(),
            user_type: user.primary_role(),
            roles: user.roles.iter().map(|r| r.authority().to_string()).collect(),
            user_id: user.id,
            username: user.username,
            email: user.email,
            employee_id: employee.as_ref().map(|e| e.id),
            employee_code: employee.map(|e| e.code),
        })
    }
}
