use crate::domain::error::DomainError;

/// Project names must begin with an ASCII letter or `@` (scoped packages).
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    match name.chars().next() {
        None => Err(invalid("name is empty")),
        Some(c) if c.is_ascii_alphabetic() || c == '@' => {
            if name.chars().any(char::is_whitespace) {
                Err(invalid("name cannot contain whitespace"))
            } else {
                Ok(())
            }
        }
        Some(_) => Err(invalid("name must begin with a letter or @")),
    }
}

/// A plugin must report a non-empty name.
pub fn validate_plugin_name(name: &str, source_ref: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::MissingPluginName {
            source_ref: source_ref.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names() {
        assert!(validate_project_name("shop").is_ok());
        assert!(validate_project_name("@acme/shop").is_ok());
        assert!(validate_project_name("Shop2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("1shop").is_err());
        assert!(validate_project_name("-shop").is_err());
        assert!(validate_project_name("my shop").is_err());
    }

    #[test]
    fn blank_plugin_name_carries_source_ref() {
        let err = validate_plugin_name("  ", "/plugins/broken").unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingPluginName {
                source_ref: "/plugins/broken".into()
            }
        );
        assert!(err.to_string().starts_with("plugin name not found\n"));
    }
}
