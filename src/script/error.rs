/// Problems a script can have. Compilation keeps going after any of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompileErrorCode {
    StringExpected,
    NumberExpected,
    FewerParametersExpected,
    VariableExpected,
    UndefinedVariable,
    ObjectNameExpected,
    ObjectAllocationError,
    InvalidParameters,
    DuplicateOverride,
    UnexpectedToken,
    ObjectBaseNotFound,
    UnsupportedByRenderSystem,
    ReferenceToaNonExistingObject,
}

impl std::fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CompileErrorCode::StringExpected => "string expected",
            CompileErrorCode::NumberExpected => "number expected",
            CompileErrorCode::FewerParametersExpected => "fewer parameters expected",
            CompileErrorCode::VariableExpected => "variable expected",
            CompileErrorCode::UndefinedVariable => "undefined variable",
            CompileErrorCode::ObjectNameExpected => "object name expected",
            CompileErrorCode::ObjectAllocationError => "object allocation error",
            CompileErrorCode::InvalidParameters => "invalid parameters",
            CompileErrorCode::DuplicateOverride => "duplicate object override",
            CompileErrorCode::UnexpectedToken => "unexpected token",
            CompileErrorCode::ObjectBaseNotFound => "object base not found",
            CompileErrorCode::UnsupportedByRenderSystem => "object unsupported by render system",
            CompileErrorCode::ReferenceToaNonExistingObject => "reference to a non existing object",
        };
        write!(f, "{}", text)
    }
}

/// One recorded problem, pointing at the script location that caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub code: CompileErrorCode,
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Compiler error: {} in {}({}): {}",
            self.code, self.file, self.line, self.message
        )
    }
}

impl std::error::Error for CompileError {}
