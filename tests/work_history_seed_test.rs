// ==========================================
// WorkHistoryApi / SeedApi 集成测试
// ==========================================
// 测试范围:
// 1. 作业记录写入校验与批量查询
// 2. 演示数据写入、重复写入拒绝、reset 重建
// ==========================================

mod helpers;

use chrono::NaiveDate;
use helpers::api_test_helper::*;
use skill_matrix::api::seed_api::EMPLOYEES_PER_DEPARTMENT;
use skill_matrix::api::work_history_api::CreateWorkHistoryRequest;
use skill_matrix::api::ApiError;

fn entry(employee_id: &str, day: u32, hours: f64) -> CreateWorkHistoryRequest {
    CreateWorkHistoryRequest {
        employee_id: employee_id.to_string(),
        work_date: NaiveDate::from_ymd_opt(2026, 9, day).unwrap(),
        hours_worked: hours,
        machine_id: None,
        shift: Some("早班".to_string()),
        notes: None,
    }
}

#[test]
fn test_work_history_批量查询() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("冲压车间");
    let machine = env.create_machine(&dept.department_id, "压机1号", false);
    let e1 = env.create_employee(&dept.department_id, "EMP-0001", "Male");
    let e2 = env.create_employee(&dept.department_id, "EMP-0002", "Male");
    let e3 = env.create_employee(&dept.department_id, "EMP-0003", "Male");

    let mut with_machine = entry(&e1.employee_id, 1, 8.0);
    with_machine.machine_id = Some(machine.machine_id.clone());
    let saved = env
        .work_history_api
        .create_entry(with_machine)
        .expect("写入失败");
    assert_eq!(saved.department_id.as_deref(), Some(dept.department_id.as_str()));

    env.work_history_api
        .create_entry(entry(&e1.employee_id, 2, 7.5))
        .unwrap();
    env.work_history_api
        .create_entry(entry(&e2.employee_id, 1, 24.0))
        .unwrap();
    env.work_history_api
        .create_entry(entry(&e3.employee_id, 1, 4.0))
        .unwrap();

    let ids = format!("{}, {},{}", e1.employee_id, e2.employee_id, e1.employee_id);
    let history = env
        .work_history_api
        .list_for_employees(&ids)
        .expect("查询失败");
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|h| h.employee_id != e3.employee_id));
    assert_eq!(history[0].work_date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
}

#[test]
fn test_work_history_参数校验() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("冲压车间");
    let employee = env.create_employee(&dept.department_id, "EMP-0001", "Male");

    for hours in [0.0, -1.0, 24.5, f64::NAN] {
        let result = env
            .work_history_api
            .create_entry(entry(&employee.employee_id, 1, hours));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))), "hours={}", hours);
    }

    let result = env.work_history_api.create_entry(entry("missing", 1, 8.0));
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    let mut unknown_machine = entry(&employee.employee_id, 1, 8.0);
    unknown_machine.machine_id = Some("missing".to_string());
    let result = env.work_history_api.create_entry(unknown_machine);
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    let result = env.work_history_api.list_for_employees(" , ");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_seed_database_写入与重建() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let report = env.seed_api.seed_database(false).expect("写入演示数据失败");
    assert_eq!(report.departments, 4);
    assert_eq!(report.employees, 4 * EMPLOYEES_PER_DEPARTMENT);
    assert!(report.employee_skills > 0);
    assert!(report.work_history > 0);

    let departments = env.department_api.list_departments().unwrap();
    assert_eq!(departments.len(), 4);
    assert!(departments
        .iter()
        .all(|d| d.employee_count == EMPLOYEES_PER_DEPARTMENT as i64));

    let err = env.seed_api.seed_database(false).expect_err("已有数据时应拒绝");
    assert!(matches!(err, ApiError::Conflict(_)));

    let again = env.seed_api.seed_database(true).expect("reset 重建失败");
    assert_eq!(again, report);
    assert_eq!(env.employee_api.list_employees(None).unwrap().len(), again.employees);

    let summary = env.dashboard_api.get_summary().unwrap();
    assert_eq!(summary.department_count, 4);
    assert!(summary.critical_station_count > 0);
}

#[test]
fn test_seed_database_女性员工不分配限制机台() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed_api.seed_database(false).unwrap();

    let restricted: Vec<_> = env
        .skill_api
        .list_machines(None)
        .unwrap()
        .into_iter()
        .filter(|m| !m.female_eligible)
        .collect();

    for employee in env.employee_api.list_employees(None).unwrap() {
        if employee.gender != skill_matrix::domain::Gender::Female {
            continue;
        }
        let profile = env.employee_api.get_skill_profile(&employee.employee_id).unwrap();
        for entry in profile.entries {
            let on_restricted = entry
                .machine_id
                .as_ref()
                .is_some_and(|id| restricted.iter().any(|m| &m.machine_id == id));
            assert!(!on_restricted, "女性员工 {} 不应出现在限制机台", employee.employee_code);
        }
    }
}
