//! Positional argument count checks.

use cmdtree_core::ArgumentShape;

use crate::error::CliError;

/// Accepts `count` if it equals the length of any declared shape.
///
/// A command that declares no shapes takes no positional arguments.
///
/// # Examples
///
/// ```
/// use cmdtree::check_arity;
///
/// let shapes = vec![
///     vec!["service".to_string()],
///     vec!["service".to_string(), "region".to_string()],
/// ];
/// assert!(check_arity(1, &shapes).is_ok());
/// assert!(check_arity(2, &shapes).is_ok());
/// assert!(check_arity(0, &shapes).is_err());
/// assert!(check_arity(0, &[]).is_ok());
/// ```
pub fn check_arity(count: usize, shapes: &[ArgumentShape]) -> Result<(), CliError> {
    let accepted = if shapes.is_empty() {
        count == 0
    } else {
        shapes.iter().any(|shape| shape.len() == count)
    };

    if accepted {
        Ok(())
    } else {
        Err(CliError::InvalidArgumentCount(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(names: &[&str]) -> ArgumentShape {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_shapes_means_no_arguments() {
        assert!(check_arity(0, &[]).is_ok());
        assert_eq!(check_arity(1, &[]), Err(CliError::InvalidArgumentCount(1)));
    }

    #[test]
    fn test_single_shape_is_fixed_arity() {
        let shapes = vec![shape(&["source", "dest"])];

        assert!(check_arity(2, &shapes).is_ok());
        assert_eq!(check_arity(1, &shapes), Err(CliError::InvalidArgumentCount(1)));
        assert_eq!(check_arity(3, &shapes), Err(CliError::InvalidArgumentCount(3)));
    }

    #[test]
    fn test_alternative_shapes() {
        let shapes = vec![shape(&[]), shape(&["name"]), shape(&["name", "a", "b"])];

        for count in [0, 1, 3] {
            assert!(check_arity(count, &shapes).is_ok(), "count {count}");
        }
        assert_eq!(check_arity(2, &shapes), Err(CliError::InvalidArgumentCount(2)));
    }
}
