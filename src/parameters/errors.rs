use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParameterError {
    #[error("Parameter '{0}' is already bound in this statement")]
    Duplicate(String),

    #[error("Could not generate a unique parameter name for '{suffix}' after {attempts} attempts")]
    GenerationExhausted { suffix: String, attempts: u32 },
}
