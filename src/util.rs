use std::env;
use thiserror::Error;

/// npm refuses names longer than this.
pub static MAX_PACKAGE_NAME_LENGTH: usize = 214;

lazy_static! {
    static ref PACKAGE_NAME_RE: regex::Regex =
        regex::Regex::new(r"^(@[a-z0-9-~][a-z0-9-._~]*/)?[a-z0-9-~][a-z0-9-._~]*$").unwrap();
}

#[derive(Debug, Error)]
pub enum PackageNameError {
    #[error("Package name, \"{0}\", is too long, name must be {1} characters or fewer")]
    NameTooLong(String, usize),
    #[error("Package name, \"{0}\", contains invalid characters. Please use lowercase alpha-numeric characters, '-', '.', and '_'")]
    InvalidCharacters(String),
}

/// Checks whether a given package name is acceptable or not
pub fn validate_package_name(package_name: &str) -> Result<(), PackageNameError> {
    if package_name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Err(PackageNameError::NameTooLong(
            package_name.to_string(),
            MAX_PACKAGE_NAME_LENGTH,
        ));
    }

    if !PACKAGE_NAME_RE.is_match(package_name) {
        return Err(PackageNameError::InvalidCharacters(
            package_name.to_string(),
        ));
    }

    Ok(())
}

pub fn typesync_should_print_color() -> bool {
    env::var("TYPESYNC_DISABLE_COLOR")
        .map(|_| false)
        .unwrap_or_else(|_| atty::is(atty::Stream::Stdout))
}

#[cfg(test)]
mod package_name_tests {
    use super::*;

    #[test]
    fn plain_and_scoped_names_are_accepted() {
        assert!(validate_package_name("lodash").is_ok());
        assert!(validate_package_name("left-pad").is_ok());
        assert!(validate_package_name("@types/node").is_ok());
    }

    #[test]
    fn uppercase_and_path_characters_are_rejected() {
        assert!(validate_package_name("Lodash").is_err());
        assert!(validate_package_name("../escape").is_err());
        assert!(validate_package_name("lodash/extra").is_err());
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "a".repeat(MAX_PACKAGE_NAME_LENGTH + 1);
        assert!(validate_package_name(&name).is_err());
    }
}
