use anyhow::Context;
use chrono::{Duration, Utc};

use worksphere_app::app::dto::{ApplyLeaveRequest, CreateEmployeeRequest, SignupRequest, UpdateEmployeeRequest};
use worksphere_app::app::errors::ErrorBody;
use worksphere_app::{RequestContext, Services};
use worksphere_auth::Role;
use worksphere_events::EventBus;
use worksphere_infra::{Config, spawn_notification_logger};
use worksphere_leave::LeaveType;
use worksphere_observability::tracing::{self as logging, LogFormat};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    logging::init(&config.log_level, LogFormat::parse(&config.log_format));

    let (services, bus) = Services::in_memory(&config);
    let logger = spawn_notification_logger(bus.subscribe()).context("starting notification logger")?;

    let report = services.seed()?;
    tracing::info!(
        admin_created = report.admin_created,
        departments_created = report.departments_created,
        "bootstrap complete"
    );

    run_demo(&services)?;

    logger.shutdown();
    Ok(())
}

/// Walk one leave request through its lifecycle against the seeded data.
fn run_demo(services: &Services) -> anyhow::Result<()> {
    let admin = RequestContext::new(services.settings().admin_username.clone(), [Role::Admin]);

    let manager = services.signup(SignupRequest {
        email: "maya.manager@worksphere.com".to_string(),
        password: "Manager@123".to_string(),
        first_name: "Maya".to_string(),
        last_name: "Rao".to_string(),
        role: "MANAGER".to_string(),
    })?;
    let manager_id = manager.employee_id.context("manager has no employee profile")?;

    let employee = services.create_employee(
        &admin,
        CreateEmployeeRequest {
            first_name: "Eli".to_string(),
            last_name: "Moss".to_string(),
            email: "eli.moss@worksphere.com".to_string(),
            manager_id: Some(manager_id),
            ..CreateEmployeeRequest::default()
        },
    )?;
    services.update_employee(
        &admin,
        employee.id,
        UpdateEmployeeRequest {
            department_id: services.list_departments(&admin)?.first().map(|d| d.id),
            ..UpdateEmployeeRequest::default()
        },
    )?;
    tracing::info!(employee = %employee.code, manager = ?manager.employee_code, "demo staff ready");

    let as_employee = RequestContext::new(employee.email.clone(), [Role::Employee]);
    let start = Utc::now().date_naive() + Duration::days(7);
    let leave = services.apply_for_leave(
        &as_employee,
        ApplyLeaveRequest {
            employee_id: None,
            manager_id: None,
            leave_type: LeaveType::Paid,
            start_date: start,
            end_date: start + Duration::days(2),
            reason: "Family trip".to_string(),
        },
    )?;

    let as_manager = RequestContext::new(manager.username.clone(), [Role::Manager]);
    let decided = services.approve_leave(&as_manager, leave.id)?;
    tracing::info!(leave_id = %decided.id, status = %decided.status, days = decided.days, "demo leave decided");

    if let Err(err) = services.admin_dashboard(&as_employee) {
        let body = serde_json::to_string(&ErrorBody::from(&err))?;
        tracing::info!(%body, "employee denied the admin dashboard");
    }

    let dashboard = services.hr_dashboard(&admin)?;
    tracing::info!(
        total_employees = dashboard.total_employees,
        pending_leaves = dashboard.pending_leaves,
        "hr dashboard"
    );
    Ok(())
}
