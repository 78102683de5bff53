//! End-to-end operation tests through the in-memory wiring.

use chrono::NaiveDate;
use proptest::prelude::*;

use worksphere_app::app::dto::{
    AccountView, ApplyLeaveRequest, CreateEmployeeRequest, CreateFeedbackRequest, CreateProjectRequest, EmployeeView,
    ProjectView, SignupRequest, UpdateEmployeeRequest, UpdateProjectRequest,
};
use worksphere_app::{NotificationBus, RequestContext, Services};
use worksphere_auth::Role;
use worksphere_core::{DomainError, EmployeeId, EntityKind};
use worksphere_directory::{DepartmentInput, EmployeePatch};
use worksphere_events::EventBus;
use worksphere_feedback::FeedbackInput;
use worksphere_infra::Config;
use worksphere_leave::{LeaveStatus, LeaveType};
use worksphere_staffing::{ProjectInput, ProjectStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

fn setup() -> (Services, NotificationBus, RequestContext) {
    let config = Config {
        bcrypt_cost: 4,
        ..Config::default()
    };
    let (services, bus) = Services::in_memory(&config);
    services.seed().unwrap();
    let admin = RequestContext::new("admin", [Role::Admin]);
    (services, bus, admin)
}

fn signup(services: &Services, email: &str, role: &str) -> AccountView {
    services
        .signup(SignupRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
            first_name: "First".to_string(),
            last_name: email.split('@').next().unwrap().to_string(),
            role: role.to_string(),
        })
        .unwrap()
}

/// A MANAGER account with its profile and request context.
fn manager(services: &Services, email: &str) -> (EmployeeId, RequestContext) {
    let account = signup(services, email, "MANAGER");
    (account.employee_id.unwrap(), RequestContext::new(email, [Role::Manager]))
}

fn hire(services: &Services, admin: &RequestContext, name: &str, manager_id: Option<EmployeeId>) -> EmployeeView {
    services
        .create_employee(
            admin,
            CreateEmployeeRequest {
                first_name: name.to_string(),
                last_name: "Tester".to_string(),
                email: format!("{name}@worksphere.com"),
                manager_id,
                ..CreateEmployeeRequest::default()
            },
        )
        .unwrap()
}

fn as_employee(view: &EmployeeView) -> RequestContext {
    RequestContext::new(view.email.clone(), [Role::Employee])
}

fn project(services: &Services, admin: &RequestContext, name: &str, manager_id: Option<EmployeeId>) -> ProjectView {
    services
        .create_project(
            admin,
            CreateProjectRequest {
                details: ProjectInput {
                    name: name.to_string(),
                    ..ProjectInput::default()
                },
                manager_id,
                ..CreateProjectRequest::default()
            },
        )
        .unwrap()
}

fn sick_leave() -> ApplyLeaveRequest {
    ApplyLeaveRequest {
        employee_id: None,
        manager_id: None,
        leave_type: LeaveType::Sick,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        reason: "Flu".to_string(),
    }
}

fn feedback(sprint: &str, score: i32) -> FeedbackInput {
    FeedbackInput {
        sprint: sprint.to_string(),
        score,
        comments: Some("Solid sprint".to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts and bootstrap
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn seed_is_idempotent() {
    let (services, _bus, admin) = setup();
    let departments = services.list_departments(&admin).unwrap();
    let codes: Vec<_> = departments.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, ["ENG", "HR", "MKT", "FIN"]);

    let again = services.seed().unwrap();
    assert!(!again.admin_created);
    assert_eq!(again.departments_created, 0);
    assert_eq!(services.list_departments(&admin).unwrap().len(), 4);
}

#[test]
fn admin_login_profile_has_no_employee() {
    let (services, _bus, _admin) = setup();
    let profile = services.login_profile("admin").unwrap();
    assert_eq!(profile.email, "admin@worksphere.com");
    assert_eq!(profile.user_type, Some(Role::Admin));
    assert!(profile.roles.contains("ROLE_ADMIN"));
    assert_eq!(profile.employee_id, None);

    assert!(services.authenticate("admin", "Admin@123").is_ok());
    assert!(matches!(
        services.authenticate("admin", "wrong"),
        Err(DomainError::Forbidden(_))
    ));
}

#[test]
fn signup_creates_profile_for_non_admin_roles() {
    let (services, _bus, _admin) = setup();
    let hr = signup(&services, "Hana@WorkSphere.com", "ROLE_HR");
    assert_eq!(hr.username, "hana@worksphere.com");
    assert_eq!(hr.user_type, Some(Role::Hr));
    assert_eq!(hr.employee_code.unwrap().as_str(), "EMP001");

    let second_admin = signup(&services, "root@worksphere.com", "admin");
    assert_eq!(second_admin.employee_id, None);
}

#[test]
fn signup_rejects_duplicate_email_and_unknown_role() {
    let (services, _bus, _admin) = setup();
    signup(&services, "dup@worksphere.com", "EMPLOYEE");

    let duplicate = services.signup(SignupRequest {
        email: "DUP@worksphere.com".to_string(),
        password: "secret123".to_string(),
        first_name: "Again".to_string(),
        last_name: "Dup".to_string(),
        role: "EMPLOYEE".to_string(),
    });
    assert!(matches!(duplicate, Err(DomainError::Conflict(_))));

    let unknown = services.signup(SignupRequest {
        email: "new@worksphere.com".to_string(),
        password: "secret123".to_string(),
        first_name: "New".to_string(),
        last_name: "Hire".to_string(),
        role: "SUPERVISOR".to_string(),
    });
    assert!(matches!(unknown, Err(DomainError::InvalidRole(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn employee_codes_increase_and_are_not_reused_after_delete() {
    let (services, _bus, admin) = setup();
    let a = hire(&services, &admin, "ann", None);
    let b = hire(&services, &admin, "bob", None);
    let c = hire(&services, &admin, "cyd", None);
    assert_eq!(
        [a.code.as_str(), b.code.as_str(), c.code.as_str()],
        ["EMP001", "EMP002", "EMP003"]
    );

    services.delete_employee(&admin, c.id).unwrap();
    let d = hire(&services, &admin, "dee", None);
    assert_eq!(d.code.as_str(), "EMP004");
}

#[test]
fn code_override_moves_the_allocator_forward() {
    let (services, _bus, admin) = setup();
    let a = hire(&services, &admin, "ann", None);
    services
        .update_employee(
            &admin,
            a.id,
            UpdateEmployeeRequest {
                patch: EmployeePatch {
                    code: Some("EMP050".to_string()),
                    ..EmployeePatch::default()
                },
                ..UpdateEmployeeRequest::default()
            },
        )
        .unwrap();
    assert_eq!(hire(&services, &admin, "bob", None).code.as_str(), "EMP051");
}

#[test]
fn code_override_at_the_numeric_ceiling_is_rejected() {
    let (services, _bus, admin) = setup();
    let a = hire(&services, &admin, "alice", None);
    let err = services
        .update_employee(
            &admin,
            a.id,
            UpdateEmployeeRequest {
                patch: EmployeePatch {
                    code: Some(format!("EMP{}", u64::MAX)),
                    ..EmployeePatch::default()
                },
                ..UpdateEmployeeRequest::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(services.get_employee(&admin, a.id).unwrap().code.as_str(), "EMP001");

    assert_eq!(hire(&services, &admin, "bob", None).code.as_str(), "EMP002");
}

#[test]
fn created_employee_reads_back_department() {
    let (services, _bus, admin) = setup();
    let engineering = services
        .list_departments(&admin)
        .unwrap()
        .into_iter()
        .find(|d| d.code == "ENG")
        .unwrap();

    let created = services
        .create_employee(
            &admin,
            CreateEmployeeRequest {
                first_name: "Dana".to_string(),
                last_name: "Lee".to_string(),
                email: "dana@worksphere.com".to_string(),
                department_id: Some(engineering.id),
                ..CreateEmployeeRequest::default()
            },
        )
        .unwrap();

    let fetched = services.get_employee(&admin, created.id).unwrap();
    assert_eq!(fetched.department_id, Some(engineering.id));
    assert_eq!(fetched.department_name.as_deref(), Some("Engineering"));
    assert_eq!(fetched.role, Some(Role::Employee));

    let listed = services.get_department(&admin, engineering.id).unwrap();
    assert_eq!(listed.employees.len(), 1);
}

#[test]
fn create_employee_with_unknown_references_is_not_found() {
    let (services, _bus, admin) = setup();
    let missing_manager = services.create_employee(
        &admin,
        CreateEmployeeRequest {
            first_name: "X".to_string(),
            last_name: "Y".to_string(),
            email: "xy@worksphere.com".to_string(),
            manager_id: Some(EmployeeId::new(404)),
            ..CreateEmployeeRequest::default()
        },
    );
    assert_eq!(missing_manager.unwrap_err(), DomainError::NotFound(EntityKind::Manager));
    // No account is left behind.
    assert!(services.login_profile("xy@worksphere.com").is_err());
}

#[test]
fn manager_reassignment_rejects_cycles() {
    let (services, _bus, admin) = setup();
    let lead = hire(&services, &admin, "lead", None);
    let report = hire(&services, &admin, "report", Some(lead.id));

    let err = services
        .update_employee(
            &admin,
            lead.id,
            UpdateEmployeeRequest {
                manager_id: Some(report.id),
                ..UpdateEmployeeRequest::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::InvariantViolation(_)));
}

#[test]
fn role_change_replaces_the_role_set() {
    let (services, _bus, admin) = setup();
    let e = hire(&services, &admin, "promo", None);
    let updated = services
        .update_employee(
            &admin,
            e.id,
            UpdateEmployeeRequest {
                role: Some("role_manager".to_string()),
                ..UpdateEmployeeRequest::default()
            },
        )
        .unwrap();
    assert_eq!(updated.role, Some(Role::Manager));

    let bad = services.update_employee(
        &admin,
        e.id,
        UpdateEmployeeRequest {
            role: Some("CEO".to_string()),
            ..UpdateEmployeeRequest::default()
        },
    );
    assert!(matches!(bad, Err(DomainError::InvalidRole(_))));
}

#[test]
fn user_without_profile_is_unresolved() {
    let (services, _bus, admin) = setup();
    let err = services.my_profile(&admin).unwrap_err();
    assert_eq!(err, DomainError::UnresolvedPrincipal("admin".to_string()));
}

#[test]
fn employee_self_service_respects_restricted_fields() {
    let (services, _bus, admin) = setup();
    let e = hire(&services, &admin, "self", None);
    let ctx = as_employee(&e);

    let updated = services
        .update_my_profile(
            &ctx,
            EmployeePatch {
                city: Some("Pune".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.profile.city.as_deref(), Some("Pune"));

    let err = services
        .update_my_profile(
            &ctx,
            EmployeePatch {
                code: Some("EMP999".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[test]
fn list_employees_follows_hierarchy_scope() {
    let (services, _bus, admin) = setup();
    let (m, m_ctx) = manager(&services, "boss@worksphere.com");
    let mine = hire(&services, &admin, "mine", Some(m));
    let other = hire(&services, &admin, "other", None);

    let visible: Vec<_> = services.list_employees(&m_ctx).unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(visible, [mine.id]);

    assert!(matches!(
        services.get_employee(&m_ctx, other.id),
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        services.get_employee(&as_employee(&mine), other.id),
        Err(DomainError::Forbidden(_))
    ));
    assert_eq!(services.list_employees(&admin).unwrap().len(), 3);
}

#[test]
fn employee_cannot_create_employees() {
    let (services, _bus, admin) = setup();
    let e = hire(&services, &admin, "plain", None);
    let err = services
        .create_employee(&as_employee(&e), CreateEmployeeRequest::default())
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[test]
fn delete_employee_releases_everything_attached() {
    let (services, _bus, admin) = setup();
    let (m, _m_ctx) = manager(&services, "lead@worksphere.com");
    let report = hire(&services, &admin, "report", Some(m));
    let p = project(&services, &admin, "Atlas", Some(m));
    services.assign_employee(&admin, p.id, m).unwrap();
    services.apply_for_leave(&as_employee(&report), sick_leave()).unwrap();

    services.delete_employee(&admin, m).unwrap();

    assert_eq!(services.get_employee(&admin, report.id).unwrap().manager_id, None);
    let p = services.get_project(&admin, p.id).unwrap();
    assert_eq!(p.manager_id, None);
    assert!(p.members.is_empty());
    assert!(services.leaves_by_employee(&admin, report.id).unwrap().is_empty());
    assert!(services.login_profile("lead@worksphere.com").is_err());
}

#[test]
fn recent_employees_are_newest_first() {
    let (services, _bus, admin) = setup();
    hire(&services, &admin, "one", None);
    let two = hire(&services, &admin, "two", None);
    let three = hire(&services, &admin, "three", None);

    let recent: Vec<_> = services
        .recent_employees(&admin, None)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(recent, [three.id, two.id]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Departments
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn department_delete_requires_no_members() {
    let (services, _bus, admin) = setup();
    let empty = services
        .create_department(&admin, DepartmentInput::new("Legal", "leg"))
        .unwrap();
    assert_eq!(empty.code, "LEG");
    services.delete_department(&admin, empty.id).unwrap();
    assert_eq!(
        services.get_department(&admin, empty.id).unwrap_err(),
        DomainError::NotFound(EntityKind::Department)
    );

    let staffed = services
        .create_department(&admin, DepartmentInput::new("Ops", "OPS"))
        .unwrap();
    let e = hire(&services, &admin, "ops", None);
    services
        .update_employee(
            &admin,
            e.id,
            UpdateEmployeeRequest {
                department_id: Some(staffed.id),
                ..UpdateEmployeeRequest::default()
            },
        )
        .unwrap();
    assert!(matches!(
        services.delete_department(&admin, staffed.id),
        Err(DomainError::Conflict(_))
    ));
}

#[test]
fn department_names_and_codes_are_unique() {
    let (services, _bus, admin) = setup();
    let err = services
        .create_department(&admin, DepartmentInput::new("Engineering 2", "eng"))
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn manager_sees_exactly_their_projects() {
    let (services, _bus, admin) = setup();
    let (m1, m1_ctx) = manager(&services, "m1@worksphere.com");
    let (m2, _m2_ctx) = manager(&services, "m2@worksphere.com");
    let a = project(&services, &admin, "Apollo", Some(m1));
    project(&services, &admin, "Borealis", Some(m2));
    let c = project(&services, &admin, "Cygnus", Some(m1));

    let mut visible: Vec<_> = services.list_projects(&m1_ctx).unwrap().into_iter().map(|p| p.id).collect();
    visible.sort();
    assert_eq!(visible, [a.id, c.id]);
    assert_ne!(a.code, c.code);
    assert!(a.code.starts_with("PRJ"));
}

#[test]
fn foreign_project_is_forbidden_for_a_manager() {
    let (services, _bus, admin) = setup();
    let (_m1, m1_ctx) = manager(&services, "m1@worksphere.com");
    let (m2, _m2_ctx) = manager(&services, "m2@worksphere.com");
    let foreign = project(&services, &admin, "Borealis", Some(m2));
    let e = hire(&services, &admin, "dev", None);

    assert!(matches!(
        services.get_project(&m1_ctx, foreign.id),
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        services.assign_employee(&m1_ctx, foreign.id, e.id),
        Err(DomainError::Forbidden(_))
    ));
}

#[test]
fn assignment_has_set_semantics() {
    let (services, _bus, admin) = setup();
    let (m, m_ctx) = manager(&services, "pm@worksphere.com");
    let p = project(&services, &admin, "Atlas", Some(m));
    let e = hire(&services, &admin, "dev", Some(m));
    let outsider = hire(&services, &admin, "outsider", None);

    services.assign_employee(&m_ctx, p.id, e.id).unwrap();
    let twice = services.assign_employee(&m_ctx, p.id, e.id).unwrap();
    assert_eq!(twice.member_ids(), [e.id]);
    assert!(services.get_employee(&admin, e.id).unwrap().project_ids.contains(&p.id));

    let unchanged = services.remove_employee(&m_ctx, p.id, outsider.id).unwrap();
    assert_eq!(unchanged, twice);

    let removed = services.remove_employee(&m_ctx, p.id, e.id).unwrap();
    assert!(removed.members.is_empty());
    assert!(services.get_employee(&admin, e.id).unwrap().project_ids.is_empty());
}

#[test]
fn profile_edits_do_not_drop_project_membership() {
    let (services, _bus, admin) = setup();
    let (m, m_ctx) = manager(&services, "pm@worksphere.com");
    let atlas = project(&services, &admin, "Atlas", Some(m));
    let borealis = project(&services, &admin, "Borealis", Some(m));
    let e = hire(&services, &admin, "dev", Some(m));
    let ctx = as_employee(&e);

    // Profile read before the assignments, written back after them.
    let stale = services.my_profile(&ctx).unwrap();
    assert!(stale.project_ids.is_empty());
    services.assign_employee(&m_ctx, atlas.id, e.id).unwrap();
    services.assign_employee(&m_ctx, borealis.id, e.id).unwrap();

    let updated = services
        .update_my_profile(
            &ctx,
            EmployeePatch {
                city: Some("Pune".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.project_ids.len(), 2);
    assert!(updated.project_ids.contains(&atlas.id) && updated.project_ids.contains(&borealis.id));

    services.delete_project(&admin, atlas.id).unwrap();
    let after = services.get_employee(&admin, e.id).unwrap();
    assert_eq!(after.project_ids.into_iter().collect::<Vec<_>>(), [borealis.id]);
}

#[test]
fn create_project_skips_unknown_references() {
    let (services, _bus, admin) = setup();
    let e = hire(&services, &admin, "dev", None);
    let p = services
        .create_project(
            &admin,
            CreateProjectRequest {
                code: Some("ATLAS-1".to_string()),
                details: ProjectInput {
                    name: "Atlas".to_string(),
                    ..ProjectInput::default()
                },
                manager_id: Some(EmployeeId::new(404)),
                member_ids: vec![e.id, EmployeeId::new(405)],
            },
        )
        .unwrap();
    assert_eq!(p.manager_id, None);
    assert_eq!(p.member_ids(), [e.id]);

    let duplicate = services.create_project(
        &admin,
        CreateProjectRequest {
            code: Some("ATLAS-1".to_string()),
            details: ProjectInput {
                name: "Atlas again".to_string(),
                ..ProjectInput::default()
            },
            ..CreateProjectRequest::default()
        },
    );
    assert!(matches!(duplicate, Err(DomainError::Conflict(_))));
}

#[test]
fn assigning_unknown_employee_is_not_found() {
    let (services, _bus, admin) = setup();
    let p = project(&services, &admin, "Atlas", None);
    assert_eq!(
        services.assign_employee(&admin, p.id, EmployeeId::new(999)).unwrap_err(),
        DomainError::NotFound(EntityKind::Employee)
    );
}

#[test]
fn employees_see_projects_they_belong_to_and_their_teammates() {
    let (services, _bus, admin) = setup();
    let a = hire(&services, &admin, "ann", None);
    let b = hire(&services, &admin, "bob", None);
    let c = hire(&services, &admin, "cyd", None);
    let shared = project(&services, &admin, "Shared", None);
    let other = project(&services, &admin, "Other", None);
    for id in [a.id, b.id] {
        services.assign_employee(&admin, shared.id, id).unwrap();
    }
    services.assign_employee(&admin, other.id, c.id).unwrap();
    services.assign_employee(&admin, other.id, a.id).unwrap();

    let mine: Vec<_> = services
        .list_projects(&as_employee(&b))
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(mine, [shared.id]);

    let mates: Vec<_> = services
        .team_members(&as_employee(&a), None)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(mates, [b.id, c.id]);
}

#[test]
fn manager_cannot_hand_a_project_to_someone_else() {
    let (services, _bus, admin) = setup();
    let (m1, m1_ctx) = manager(&services, "m1@worksphere.com");
    let (m2, _m2_ctx) = manager(&services, "m2@worksphere.com");
    let p = project(&services, &admin, "Atlas", Some(m1));

    let renamed = services
        .update_project(
            &m1_ctx,
            p.id,
            UpdateProjectRequest {
                details: ProjectInput {
                    name: "Atlas v2".to_string(),
                    status: ProjectStatus::OnHold,
                    ..ProjectInput::default()
                },
                manager_id: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Atlas v2");
    assert_eq!(services.projects_by_status(&admin, ProjectStatus::OnHold).unwrap().len(), 1);

    let handover = services.update_project(
        &m1_ctx,
        p.id,
        UpdateProjectRequest {
            details: ProjectInput {
                name: "Atlas v3".to_string(),
                ..ProjectInput::default()
            },
            manager_id: Some(m2),
        },
    );
    assert!(matches!(handover, Err(DomainError::Forbidden(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Leave
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn approval_is_visible_and_final() {
    let (services, bus, admin) = setup();
    let sub = bus.subscribe();
    let (m, m_ctx) = manager(&services, "boss@worksphere.com");
    let e = hire(&services, &admin, "eli", Some(m));

    let applied = services.apply_for_leave(&as_employee(&e), sick_leave()).unwrap();
    assert_eq!(applied.status, LeaveStatus::Pending);
    assert_eq!(applied.manager_id, m);
    assert_eq!(applied.days, 3);

    let pending = services.pending_leaves(&m_ctx).unwrap();
    assert_eq!(pending.len(), 1);

    let approved = services.approve_leave(&m_ctx, applied.id).unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);

    let by_employee = services.leaves_by_employee(&admin, e.id).unwrap();
    assert_eq!(by_employee[0].status, LeaveStatus::Approved);
    let by_manager = services
        .leaves_by_manager(&m_ctx, None, Some(LeaveStatus::Approved))
        .unwrap();
    assert_eq!(by_manager.len(), 1);
    assert!(services.pending_leaves(&m_ctx).unwrap().is_empty());

    let again = services.reject_leave(&m_ctx, applied.id).unwrap_err();
    assert_eq!(again, DomainError::invariant("leave request already decided"));

    let delivered: Vec<_> = sub
        .drain()
        .into_iter()
        .map(|env| (env.payload().topic, env.payload().recipient))
        .collect();
    assert_eq!(delivered, [("leave.applied", m), ("leave.decided", e.id)]);
}

#[test]
fn manager_decides_only_requests_routed_to_them() {
    let (services, _bus, admin) = setup();
    let (m1, _m1_ctx) = manager(&services, "m1@worksphere.com");
    let (_m2, m2_ctx) = manager(&services, "m2@worksphere.com");
    let e = hire(&services, &admin, "eli", Some(m1));
    let leave = services.apply_for_leave(&as_employee(&e), sick_leave()).unwrap();

    assert!(matches!(
        services.approve_leave(&m2_ctx, leave.id),
        Err(DomainError::Forbidden(_))
    ));
    assert_eq!(
        services.reject_leave(&admin, leave.id).unwrap().status,
        LeaveStatus::Rejected
    );
}

#[test]
fn leave_without_a_manager_is_not_found() {
    let (services, _bus, admin) = setup();
    let loner = hire(&services, &admin, "loner", None);
    assert_eq!(
        services.apply_for_leave(&as_employee(&loner), sick_leave()).unwrap_err(),
        DomainError::NotFound(EntityKind::Manager)
    );
}

#[test]
fn employees_apply_only_for_themselves() {
    let (services, _bus, admin) = setup();
    let (m, _m_ctx) = manager(&services, "boss@worksphere.com");
    let a = hire(&services, &admin, "ann", Some(m));
    let b = hire(&services, &admin, "bob", Some(m));

    let err = services
        .apply_for_leave(
            &as_employee(&a),
            ApplyLeaveRequest {
                employee_id: Some(b.id),
                ..sick_leave()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    services.apply_for_leave(&as_employee(&a), sick_leave()).unwrap();
    assert_eq!(services.my_leaves(&as_employee(&a)).unwrap().len(), 1);
    assert!(services.my_leaves(&as_employee(&b)).unwrap().is_empty());
    assert!(matches!(
        services.pending_leaves(&as_employee(&a)),
        Err(DomainError::Forbidden(_))
    ));
}

#[test]
fn invalid_leave_dates_are_rejected() {
    let (services, _bus, admin) = setup();
    let (m, _m_ctx) = manager(&services, "boss@worksphere.com");
    let e = hire(&services, &admin, "eli", Some(m));
    let backwards = ApplyLeaveRequest {
        start_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        ..sick_leave()
    };
    assert!(matches!(
        services.apply_for_leave(&as_employee(&e), backwards),
        Err(DomainError::Validation(_))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn managers_review_only_direct_reports() {
    let (services, _bus, admin) = setup();
    let (m, m_ctx) = manager(&services, "boss@worksphere.com");
    let report = hire(&services, &admin, "report", Some(m));
    let stranger = hire(&services, &admin, "stranger", None);

    let entry = services
        .create_feedback(
            &m_ctx,
            CreateFeedbackRequest {
                manager_id: None,
                employee_id: report.id,
                input: feedback("Sprint 1", 8),
            },
        )
        .unwrap();
    assert_eq!(entry.manager_id, m);

    let foreign = services.create_feedback(
        &m_ctx,
        CreateFeedbackRequest {
            manager_id: None,
            employee_id: stranger.id,
            input: feedback("Sprint 1", 8),
        },
    );
    assert!(matches!(foreign, Err(DomainError::Forbidden(_))));

    let negative = services.create_feedback(
        &m_ctx,
        CreateFeedbackRequest {
            manager_id: None,
            employee_id: report.id,
            input: feedback("Sprint 2", -1),
        },
    );
    assert!(matches!(negative, Err(DomainError::Validation(_))));

    let revised = services.update_feedback(&m_ctx, entry.id, feedback("Sprint 1", 85)).unwrap();
    assert_eq!(revised.score, 85);
    assert_eq!(services.feedback_by_sprint(&admin, report.id, "Sprint 1").unwrap().len(), 1);
    assert_eq!(services.my_feedback(&as_employee(&report)).unwrap().len(), 1);
    assert_eq!(services.feedback_by_manager(&m_ctx, None).unwrap().len(), 1);

    let by_employee = services.create_feedback(
        &as_employee(&report),
        CreateFeedbackRequest {
            manager_id: Some(m),
            employee_id: report.id,
            input: feedback("Sprint 3", 5),
        },
    );
    assert!(matches!(by_employee, Err(DomainError::Forbidden(_))));

    services.delete_feedback(&m_ctx, entry.id).unwrap();
    assert!(services.feedback_by_employee(&admin, report.id).unwrap().is_empty());
}

#[test]
fn admin_must_name_the_reviewing_manager() {
    let (services, _bus, admin) = setup();
    let e = hire(&services, &admin, "eli", None);
    let err = services
        .create_feedback(
            &admin,
            CreateFeedbackRequest {
                manager_id: None,
                employee_id: e.id,
                input: feedback("Sprint 1", 7),
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboards
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dashboards_count_the_organisation() {
    let (services, _bus, admin) = setup();
    let hr_account = signup(&services, "hr@worksphere.com", "HR");
    let hr = RequestContext::new(hr_account.username.clone(), [Role::Hr]);
    let (m, _m_ctx) = manager(&services, "boss@worksphere.com");
    let e = hire(&services, &admin, "eli", Some(m));
    project(&services, &admin, "Atlas", Some(m));
    services.apply_for_leave(&as_employee(&e), sick_leave()).unwrap();

    let hr_view = services.hr_dashboard(&hr).unwrap();
    assert_eq!(hr_view.total_employees, 3);
    assert_eq!(hr_view.active_projects, 1);
    assert_eq!(hr_view.pending_leaves, 1);

    assert!(matches!(services.admin_dashboard(&hr), Err(DomainError::Forbidden(_))));

    let admin_view = services.admin_dashboard(&admin).unwrap();
    assert_eq!(admin_view.total_hrs, 1);
    assert_eq!(admin_view.total_managers, 1);
    assert_eq!(admin_view.total_projects, 1);
    assert_eq!(admin_view.recent_employees.len(), 2);
    assert_eq!(admin_view.recent_employees[0].id, e.id);
}

// ─────────────────────────────────────────────────────────────────────────────
// Allocation under churn
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    /// `true` hires, `false` deletes the newest employee still present.
    #[test]
    fn codes_strictly_increase_under_hire_and_delete(ops in proptest::collection::vec(any::<bool>(), 1..6)) {
        let (services, _bus, admin) = setup();
        let mut alive: Vec<EmployeeId> = Vec::new();
        let mut last = 0u64;

        for (i, hire_next) in ops.into_iter().enumerate() {
            if hire_next || alive.is_empty() {
                let e = hire(&services, &admin, &format!("p{i}"), None);
                let n = e.code.number().unwrap();
                prop_assert!(n > last, "{} issued after EMP{:03}", e.code, last);
                last = n;
                alive.push(e.id);
            } else if let Some(id) = alive.pop() {
                services.delete_employee(&admin, id).unwrap();
            }
        }
    }
}
