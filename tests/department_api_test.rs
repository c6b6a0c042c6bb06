// ==========================================
// DepartmentApi / ManagerApi 集成测试
// ==========================================
// 测试范围:
// 1. 部门 CRUD 与人数统计
// 2. 名称唯一性（忽略大小写，仅未删除记录）
// 3. 删除约束与软删除可见性
// 4. 部门月度得分快照
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use skill_matrix::api::department_api::{CreateDepartmentRequest, UpdateDepartmentRequest};
use skill_matrix::api::ApiError;

#[test]
fn test_list_departments_包含人数统计() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let press = env.create_department("冲压车间");
    env.create_department("焊装车间");

    env.create_manager(&press.department_id, "张主管");
    env.create_employee(&press.department_id, "EMP-0001", "Male");
    env.create_employee(&press.department_id, "EMP-0002", "Female");

    let list = env.department_api.list_departments().expect("查询失败");
    assert_eq!(list.len(), 2);

    let press_row = list
        .iter()
        .find(|d| d.department.department_id == press.department_id)
        .expect("应包含冲压车间");
    assert_eq!(press_row.employee_count, 2);
    assert_eq!(press_row.manager_count, 1);

    // 软删除后不再计数
    let leaving = env.create_employee(&press.department_id, "EMP-0003", "Male");
    let deputy = env.create_manager(&press.department_id, "李主管");
    env.employee_api.delete_employee(&leaving.employee_id).expect("删除员工失败");
    env.manager_api.delete_manager(&deputy.manager_id).expect("删除主管失败");

    let press_row = env
        .department_api
        .get_department(&press.department_id)
        .expect("查询失败");
    assert_eq!(press_row.employee_count, 2);
    assert_eq!(press_row.manager_count, 1);

    let list = env.department_api.list_departments().expect("查询失败");
    let press_row = list
        .iter()
        .find(|d| d.department.department_id == press.department_id)
        .expect("应包含冲压车间");
    assert_eq!(press_row.employee_count, 2);
    assert_eq!(press_row.manager_count, 1);
    assert_eq!(env.manager_api.list_managers(None).unwrap().len(), 1);

    let err = env
        .manager_api
        .delete_manager(&deputy.manager_id)
        .expect_err("重复删除应返回不存在");
    assert_eq!(err.http_status(), 404);
}

#[test]
fn test_create_department_重名冲突() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.create_department("Assembly");

    let result = env.department_api.create_department(CreateDepartmentRequest {
        name: "  assembly ".to_string(),
        description: None,
    });
    assert!(matches!(result, Err(ApiError::Conflict(_))), "got {:?}", result);
}

#[test]
fn test_create_department_名称为空() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.department_api.create_department(CreateDepartmentRequest {
        name: "   ".to_string(),
        description: None,
    });
    let err = result.expect_err("空名称应被拒绝");
    assert_eq!(err.http_status(), 400);
}

#[test]
fn test_delete_department_有员工时拒绝() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("涂装车间");
    let employee = env.create_employee(&dept.department_id, "EMP-0001", "Male");

    let result = env.department_api.delete_department(&dept.department_id);
    assert!(matches!(result, Err(ApiError::Conflict(_))));

    env.employee_api
        .delete_employee(&employee.employee_id)
        .expect("删除员工失败");
    env.department_api
        .delete_department(&dept.department_id)
        .expect("员工删除后应允许删除部门");

    let result = env.department_api.get_department(&dept.department_id);
    assert!(matches!(result, Err(ApiError::NotFound(_))));
    assert!(env.department_api.list_departments().unwrap().is_empty());
}

#[test]
fn test_软删除后名称可复用() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("总装车间");
    env.department_api
        .delete_department(&dept.department_id)
        .expect("删除失败");

    let again = env.create_department("总装车间");
    assert_ne!(again.department_id, dept.department_id);
}

#[test]
fn test_update_department_改名冲突() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.create_department("冲压车间");
    let weld = env.create_department("焊装车间");

    let result = env.department_api.update_department(
        &weld.department_id,
        UpdateDepartmentRequest {
            name: Some("冲压车间".to_string()),
            description: None,
        },
    );
    assert!(matches!(result, Err(ApiError::Conflict(_))));

    let updated = env
        .department_api
        .update_department(
            &weld.department_id,
            UpdateDepartmentRequest {
                name: None,
                description: Some("车身焊接".to_string()),
            },
        )
        .expect("更新描述失败");
    assert_eq!(updated.name, "焊装车间");
    assert_eq!(updated.description.as_deref(), Some("车身焊接"));
}

#[test]
fn test_create_manager_部门不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.manager_api.create_manager(
        skill_matrix::api::department_api::CreateManagerRequest {
            name: "李主管".to_string(),
            email: None,
            department_id: "missing".to_string(),
        },
    );
    assert!(matches!(result, Err(ApiError::ValidationError(_))));
}

#[test]
fn test_snapshot_performance_按月覆盖() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("冲压车间");
    let machine = env.create_machine(&dept.department_id, "压机1号", true);
    let e1 = env.create_employee(&dept.department_id, "EMP-0001", "Male");
    let e2 = env.create_employee(&dept.department_id, "EMP-0002", "Male");
    env.rate_machine(&e1.employee_id, &machine.machine_id, "Expert");
    env.rate_machine(&e2.employee_id, &machine.machine_id, "Medium");

    let record = env
        .department_api
        .snapshot_performance(&dept.department_id, "2026-09")
        .expect("快照失败");
    // (4 + 2) / 2 / 4 = 75%
    assert_eq!(record.score, 75.0);

    env.rate_machine(&e2.employee_id, &machine.machine_id, "Expert");
    env.department_api
        .snapshot_performance(&dept.department_id, "2026-09")
        .expect("快照失败");

    let history = env
        .department_api
        .list_performance(&dept.department_id)
        .expect("查询失败");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, 100.0);
}

#[test]
fn test_snapshot_performance_月份格式错误() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("冲压车间");

    let result = env
        .department_api
        .snapshot_performance(&dept.department_id, "2026-13");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}
