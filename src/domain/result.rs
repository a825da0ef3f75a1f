//! Result type alias for the transfer job

use super::errors::TransferError;

/// Result type alias for transfer operations
///
/// # Examples
///
/// ```
/// use ga4_transfer::domain::result::Result;
/// use ga4_transfer::domain::errors::TransferError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TransferError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(TransferError::Io("test error".to_string()));
        assert!(result.is_err());
    }
}
