// ==========================================
// 工厂员工技能矩阵管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换各层错误为用户可读的错误消息
// 映射: 校验类 400 / 未找到 404 / 冲突 409 / 其他 500
// ==========================================

use crate::engine::matrix_builder::MatrixBuilderError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源冲突: {0}")]
    Conflict(String),

    #[error("无效的状态转换: {0}")]
    InvalidStateTransition(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::ValidationError(_)
            | ApiError::InvalidStateTransition(_)
            | ApiError::ImportError(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// 错误代码（返回给前端）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::DatabaseTransactionError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("引用的记录不存在: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 MatrixBuilderError 转换
// ==========================================
impl From<MatrixBuilderError> for ApiError {
    fn from(err: MatrixBuilderError) -> Self {
        match &err {
            MatrixBuilderError::WrongStep { .. }
            | MatrixBuilderError::IncompleteStep(..)
            | MatrixBuilderError::AtFirstStep
            | MatrixBuilderError::AtLastStep => ApiError::InvalidStateTransition(err.to_string()),
            MatrixBuilderError::DuplicateColumn(_) | MatrixBuilderError::DuplicateEmployee(_) => {
                ApiError::Conflict(err.to_string())
            }
            MatrixBuilderError::UnknownColumn(_)
            | MatrixBuilderError::UnknownEmployee(_)
            | MatrixBuilderError::EmptyField(_) => ApiError::ValidationError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_状态码映射() {
        let err: ApiError = RepositoryError::not_found("Department", "D1").into();
        assert_eq!(err.http_status(), 404);

        let err: ApiError = RepositoryError::UniqueConstraintViolation("name".into()).into();
        assert_eq!(err.http_status(), 409);

        let err: ApiError = RepositoryError::ForeignKeyViolation("dept".into()).into();
        assert_eq!(err.http_status(), 400);

        let err: ApiError = RepositoryError::LockError("poisoned".into()).into();
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(!err.is_client_error());

        let err: ApiError = RepositoryError::DatabaseQueryError("syntax".into()).into();
        assert_eq!(err.code(), "DATABASE_ERROR");

        let err: ApiError = RepositoryError::ValidationError("bad".into()).into();
        assert_eq!(err.http_status(), 400);

        let err: ApiError = RepositoryError::FieldValueError {
            field: "level".into(),
            message: "未知等级".into(),
        }
        .into();
        assert_eq!(err.code(), "INVALID_INPUT");

        let err: ApiError = RepositoryError::SerializationError("eof".into()).into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_matrix_builder_error_状态码映射() {
        let err: ApiError = MatrixBuilderError::AtFirstStep.into();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.code(), "INVALID_STATE_TRANSITION");

        let err: ApiError = MatrixBuilderError::DuplicateColumn("冲床".into()).into();
        assert_eq!(err.http_status(), 409);
    }

    #[test]
    fn test_import_error_状态码映射() {
        let err: ApiError = ImportError::MissingColumn("Employee Code".into()).into();
        assert_eq!(err.http_status(), 400);
        assert!(err.to_string().contains("Employee Code"));
    }
}
