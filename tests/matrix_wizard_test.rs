// ==========================================
// MatrixApi 集成测试
// ==========================================
// 测试范围:
// 1. 向导步骤流转与各步骤约束（含回退后缩小部门范围）
// 2. 完成向导 → 保存矩阵 → CSV 导出 → 导出日志
// 3. 导出文件重新导入后单元格一致
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use skill_matrix::api::matrix_api::{
    AddColumnRequest, AddEmployeeRequest, FinalizeRequest, SelectDepartmentsRequest,
    SetCellRequest,
};
use skill_matrix::api::ApiError;
use skill_matrix::domain::{Employee, MatrixColumnKind, SkillLevel, WizardStep};

struct Fixture {
    env: ApiTestEnv,
    department_id: String,
    machine_id: String,
    skill_id: String,
    employees: Vec<Employee>,
    outsider: Employee,
}

fn fixture() -> Fixture {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let dept = env.create_department("冲压车间");
    let other = env.create_department("焊装车间");
    let machine = env.create_machine(&dept.department_id, "压机1号", true);
    let skill = env.create_skill("安全操作");
    let employees = vec![
        env.create_employee(&dept.department_id, "EMP-0001", "Male"),
        env.create_employee(&dept.department_id, "EMP-0002", "Female"),
    ];
    let outsider = env.create_employee(&other.department_id, "EMP-0003", "Male");

    Fixture {
        department_id: dept.department_id,
        machine_id: machine.machine_id,
        skill_id: skill.skill_id,
        employees,
        outsider,
        env,
    }
}

/// 建立草稿并推进到员工步骤（两列 + 两名员工）
fn draft_at_employees(f: &Fixture) -> String {
    let api = &f.env.matrix_api;
    let draft = api.create_draft().expect("创建草稿失败");
    let id = draft.draft_id;

    api.select_departments(
        &id,
        SelectDepartmentsRequest {
            department_ids: vec![f.department_id.clone()],
        },
    )
    .expect("选择部门失败");
    api.advance(&id).expect("前进到技能步骤失败");

    api.add_column(
        &id,
        AddColumnRequest {
            kind: MatrixColumnKind::Machine,
            ref_id: f.machine_id.clone(),
            label: None,
        },
    )
    .expect("添加机台列失败");
    api.add_column(
        &id,
        AddColumnRequest {
            kind: MatrixColumnKind::Skill,
            ref_id: f.skill_id.clone(),
            label: Some("安全".to_string()),
        },
    )
    .expect("添加技能列失败");
    api.advance(&id).expect("前进到员工步骤失败");

    for employee in &f.employees {
        api.add_employee(
            &id,
            AddEmployeeRequest {
                employee_id: employee.employee_id.clone(),
            },
        )
        .expect("添加员工失败");
    }
    id
}

fn set(f: &Fixture, draft_id: &str, employee: &Employee, label: &str, level: &str) {
    f.env
        .matrix_api
        .set_cell(
            draft_id,
            SetCellRequest {
                employee_id: employee.employee_id.clone(),
                column_label: label.to_string(),
                level: level.to_string(),
            },
        )
        .expect("设置单元格失败");
}

fn finalize(f: &Fixture, draft_id: &str, name: &str) -> skill_matrix::domain::SkillMatrix {
    f.env
        .matrix_api
        .finalize(
            draft_id,
            FinalizeRequest {
                name: name.to_string(),
                created_by: Some("tester".to_string()),
            },
        )
        .expect("完成向导失败")
}

#[test]
fn test_向导步骤约束() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let draft = api.create_draft().unwrap();
    assert_eq!(draft.step, WizardStep::Departments);

    let err = api.advance(&draft.draft_id).expect_err("未选部门不能前进");
    assert!(matches!(err, ApiError::InvalidStateTransition(_)));

    let err = api.back(&draft.draft_id).expect_err("第一步不能后退");
    assert!(matches!(err, ApiError::InvalidStateTransition(_)));

    let err = api
        .select_departments(
            &draft.draft_id,
            SelectDepartmentsRequest {
                department_ids: vec!["missing".to_string()],
            },
        )
        .expect_err("未知部门应被拒绝");
    assert_eq!(err.http_status(), 400);

    let err = api
        .add_column(
            &draft.draft_id,
            AddColumnRequest {
                kind: MatrixColumnKind::Machine,
                ref_id: f.machine_id.clone(),
                label: None,
            },
        )
        .expect_err("部门步骤不能添加列");
    assert!(matches!(err, ApiError::InvalidStateTransition(_)));
}

#[test]
fn test_向导列与员工校验() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = draft_at_employees(&f);

    let draft = api.get_draft(&id).unwrap();
    assert_eq!(draft.step, WizardStep::Employees);
    assert_eq!(draft.columns.len(), 2);
    assert_eq!(draft.columns[0].label, "压机1号");
    assert_eq!(draft.rows.len(), 2);
    assert!(draft.rows.iter().all(|r| r.cells.len() == 2));

    let err = api
        .add_employee(
            &id,
            AddEmployeeRequest {
                employee_id: f.outsider.employee_id.clone(),
            },
        )
        .expect_err("非所选部门员工应被拒绝");
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = api
        .add_employee(
            &id,
            AddEmployeeRequest {
                employee_id: f.employees[0].employee_id.clone(),
            },
        )
        .expect_err("重复员工应被拒绝");
    assert!(matches!(err, ApiError::Conflict(_)));

    api.back(&id).expect("后退失败");
    let err = api
        .add_column(
            &id,
            AddColumnRequest {
                kind: MatrixColumnKind::Skill,
                ref_id: f.skill_id.clone(),
                label: Some("安全".to_string()),
            },
        )
        .expect_err("重复列标题应被拒绝");
    assert!(matches!(err, ApiError::Conflict(_)));

    let draft = api.remove_column(&id, "安全").expect("删除列失败");
    assert_eq!(draft.columns.len(), 1);
    assert!(draft.rows.iter().all(|r| r.cells.len() == 1));
}

#[test]
fn test_回退缩小部门_移除越界员工() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = api.create_draft().unwrap().draft_id;

    api.select_departments(
        &id,
        SelectDepartmentsRequest {
            department_ids: vec![f.department_id.clone(), f.outsider.department_id.clone()],
        },
    )
    .unwrap();
    api.advance(&id).unwrap();
    api.add_column(
        &id,
        AddColumnRequest {
            kind: MatrixColumnKind::Machine,
            ref_id: f.machine_id.clone(),
            label: None,
        },
    )
    .unwrap();
    api.advance(&id).unwrap();
    for employee in f.employees.iter().chain(std::iter::once(&f.outsider)) {
        api.add_employee(
            &id,
            AddEmployeeRequest {
                employee_id: employee.employee_id.clone(),
            },
        )
        .unwrap();
    }
    assert_eq!(api.get_draft(&id).unwrap().rows.len(), 3);

    api.back(&id).unwrap();
    api.back(&id).unwrap();
    let draft = api
        .select_departments(
            &id,
            SelectDepartmentsRequest {
                department_ids: vec![f.department_id.clone()],
            },
        )
        .unwrap();

    assert_eq!(draft.department_ids, vec![f.department_id.clone()]);
    assert_eq!(draft.rows.len(), 2);
    assert!(draft
        .rows
        .iter()
        .all(|r| r.employee_id != f.outsider.employee_id));

    // 保存后的矩阵只包含所选部门的员工
    api.advance(&id).unwrap();
    api.advance(&id).unwrap();
    api.advance(&id).unwrap();
    let matrix = finalize(&f, &id, "冲压矩阵");
    assert_eq!(matrix.rows.len(), 2);
}

#[test]
fn test_完成向导并导出() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = draft_at_employees(&f);

    set(&f, &id, &f.employees[0], "压机1号", "High");
    set(&f, &id, &f.employees[0], "安全", "Low");
    set(&f, &id, &f.employees[1], "安全", "Advanced");

    let err = api
        .finalize(
            &id,
            FinalizeRequest {
                name: "冲压矩阵".to_string(),
                created_by: None,
            },
        )
        .expect_err("未到审核步骤不能完成");
    assert!(matches!(err, ApiError::InvalidStateTransition(_)));

    api.advance(&id).expect("前进到审核步骤失败");
    let matrix = finalize(&f, &id, "冲压矩阵");
    assert_eq!(matrix.rows.len(), 2);
    assert_eq!(matrix.created_by, "tester");
    assert!(matches!(api.get_draft(&id), Err(ApiError::NotFound(_))));

    let summaries = api.list_matrices().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].column_count, 2);
    assert_eq!(summaries[0].row_count, 2);

    let file = api
        .export_matrix(&matrix.matrix_id, Some("tester"))
        .expect("导出失败");
    assert!(file.file_name.ends_with(".csv"));
    assert_eq!(file.row_count, 2);

    let text = String::from_utf8(file.bytes.clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Employee Code,Employee Name,压机1号,安全,Average");
    assert_eq!(lines[1], "EMP-0001,员工EMP-0001,High,Low,2.00");
    assert_eq!(lines[2], "EMP-0002,员工EMP-0002,None,Expert,2.00");

    let logs = api.list_export_logs(Some(&matrix.matrix_id), None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].row_count, 2);
    assert_eq!(logs[0].exported_by, "tester");
}

#[test]
fn test_导出后重新导入单元格一致() {
    let f = fixture();
    let api = &f.env.matrix_api;

    let first = draft_at_employees(&f);
    set(&f, &first, &f.employees[0], "压机1号", "Expert");
    set(&f, &first, &f.employees[1], "压机1号", "Medium");
    set(&f, &first, &f.employees[1], "安全", "High");
    api.advance(&first).unwrap();
    let original = finalize(&f, &first, "原始矩阵");
    let exported = api.export_matrix(&original.matrix_id, None).unwrap();

    let second = draft_at_employees(&f);
    let outcome = api
        .import_file(&second, "csv", &exported.bytes)
        .expect("导入失败");
    assert_eq!(outcome.applied_rows, 2);
    assert_eq!(outcome.applied_cells, 4);
    assert!(outcome.skipped.is_empty());

    api.advance(&second).unwrap();
    let reimported = finalize(&f, &second, "导入矩阵");

    for (a, b) in original.rows.iter().zip(reimported.rows.iter()) {
        assert_eq!(a.employee_code, b.employee_code);
        assert_eq!(a.cells, b.cells);
    }
    assert_eq!(
        reimported.rows[0].cells.get("压机1号"),
        Some(&SkillLevel::Expert)
    );
}

#[test]
fn test_导入跳过未知工号与无效等级() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = draft_at_employees(&f);

    let csv = "Employee Code,Employee Name,压机1号,安全\n\
               EMP-0001,甲,High,\n\
               EMP-9999,无名,Low,Low\n\
               EMP-0002,乙,Guru,Low\n";
    let outcome = api
        .import_file(&id, "csv", csv.as_bytes())
        .expect("导入失败");

    // 无效等级只跳过该单元格，其余单元格照常合并
    assert_eq!(outcome.applied_rows, 2);
    let skipped_rows: Vec<usize> = outcome.skipped.iter().map(|s| s.row_number).collect();
    assert_eq!(skipped_rows, vec![3, 4]);

    let draft = api.get_draft(&id).unwrap();
    let row = draft
        .rows
        .iter()
        .find(|r| r.employee_code == "EMP-0001")
        .unwrap();
    assert_eq!(row.cells.get("压机1号"), Some(&SkillLevel::High));
    assert_eq!(row.cells.get("安全"), Some(&SkillLevel::None));

    let row = draft
        .rows
        .iter()
        .find(|r| r.employee_code == "EMP-0002")
        .unwrap();
    assert_eq!(row.cells.get("压机1号"), Some(&SkillLevel::None));
    assert_eq!(row.cells.get("安全"), Some(&SkillLevel::Low));
}

#[test]
fn test_导入格式与空文件() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = draft_at_employees(&f);

    let err = api.import_file(&id, "pdf", b"x").expect_err("不支持的格式");
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api.import_file(&id, "csv", b"").expect_err("空文件");
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .import_file(&id, "csv", "Name,压机1号\n甲,High\n".as_bytes())
        .expect_err("缺少工号列");
    assert_eq!(err.http_status(), 400);
}

#[test]
fn test_删除矩阵() {
    let f = fixture();
    let api = &f.env.matrix_api;
    let id = draft_at_employees(&f);
    api.advance(&id).unwrap();
    let matrix = finalize(&f, &id, "待删除");

    api.delete_matrix(&matrix.matrix_id).expect("删除失败");
    assert!(matches!(
        api.get_matrix(&matrix.matrix_id),
        Err(ApiError::NotFound(_))
    ));
    assert!(api.list_matrices().unwrap().is_empty());
    assert!(matches!(
        api.export_matrix(&matrix.matrix_id, None),
        Err(ApiError::NotFound(_))
    ));
}
